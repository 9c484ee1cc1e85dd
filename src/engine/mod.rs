//! Orderbook crossing and trade simulation.
//!
//! Everything here is synchronous and works on in-memory snapshots. Every
//! price, volume, fee and spread is a [`rust_decimal::Decimal`].

mod detector;
mod error;
mod matcher;
mod rebase;
mod spread;
mod walker;

pub use detector::{DetectionParams, detect};
pub use error::{EngineError, Result};
pub use matcher::{Crossing, cross_books, find_arbitrage_deals};
pub use rebase::{convert_orderbook, convert_price_in_order, convert_price_in_order_list};
pub use spread::{book_spread, get_spread};
pub use walker::{Fill, trade_by_amount, trade_by_volume};

#[cfg(test)]
mod tests;
