//! Relative spread between an ask and a bid.

use rust_decimal::Decimal;

use super::{EngineError, Result};
use crate::domain::Orderbook;

/// Returns (bid − ask) / bid.
///
/// Positive when buying at `ask` and selling at `bid` is profitable.
pub fn get_spread(ask: Decimal, bid: Decimal) -> Result<Decimal> {
    if bid <= Decimal::ZERO {
        return Err(EngineError::NonPositiveBid(bid));
    }
    bid.checked_sub(ask)
        .and_then(|diff| diff.checked_div(bid))
        .ok_or(EngineError::Overflow("spread"))
}

/// Returns the relative spread between the best ask and best bid of a book.
///
/// None if either side is empty. Negative values are normal for an
/// uncrossed book.
pub fn book_spread(book: &Orderbook) -> Option<Decimal> {
    let ask = book.best_ask()?;
    let bid = book.best_bid()?;
    get_spread(ask.price(), bid.price()).ok()
}
