//! Domain models for orderbook crossing and trade simulation.

mod deal;
mod error;
mod fees;
mod opportunity;
mod order;
mod orderbook;

pub use deal::ArbitrageDeal;
pub use error::DomainError;
pub use fees::{Fee, Fees};
pub use opportunity::Opportunity;
pub use order::{Deal, Order};
pub use orderbook::{Asks, Bids, Orderbook, Side, SortedLevels};
