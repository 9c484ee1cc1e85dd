//! Greedy crossing of two independent orderbooks.
//!
//! The best ask of the buy book is paired with the best bid of the sell book
//! until the fee-adjusted spread is no longer positive or a side runs out.
//! Because asks only get more expensive and bids only get cheaper, the first
//! unprofitable pair ends the run.

use std::collections::VecDeque;

use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::{EngineError, Result, get_spread};
use crate::domain::{ArbitrageDeal, Asks, Bids, Fee, Order};

/// Crossing is the outcome of one matcher run.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossing {
    /// Fills in the order they were matched.
    pub deals: Vec<ArbitrageDeal>,
    /// Ask liquidity left after the run.
    pub asks: Asks,
    /// Bid liquidity left after the run.
    pub bids: Bids,
}

impl Crossing {
    /// Total base volume matched, or None if it does not fit in a Decimal.
    pub fn total_volume(&self) -> Option<Decimal> {
        self.deals
            .iter()
            .try_fold(Decimal::ZERO, |total, d| total.checked_add(d.volume()))
    }
}

/// Matches `asks` (book to buy from) against `bids` (book to sell into).
///
/// Fees are validated before any matching happens.
pub fn find_arbitrage_deals(
    asks: &Asks,
    bids: &Bids,
    fee_buy: Decimal,
    fee_sell: Decimal,
) -> Result<Vec<ArbitrageDeal>> {
    let fee_buy = Fee::new(fee_buy)?;
    let fee_sell = Fee::new(fee_sell)?;
    Ok(cross_books(asks, bids, fee_buy, fee_sell)?.deals)
}

/// Like [`find_arbitrage_deals`] but also returns the unconsumed levels.
///
/// The caller's books are never modified; the run works on its own copies.
pub fn cross_books(asks: &Asks, bids: &Bids, fee_buy: Fee, fee_sell: Fee) -> Result<Crossing> {
    let mut ask_queue: VecDeque<Order> = asks.iter().copied().collect();
    let mut bid_queue: VecDeque<Order> = bids.iter().copied().collect();
    let mut deals = Vec::new();

    while let (Some(&ask), Some(&bid)) = (ask_queue.front(), bid_queue.front()) {
        let adjusted_ask = fee_buy
            .buy_price(ask.price())
            .ok_or(EngineError::Overflow("fee-adjusted ask"))?;
        let adjusted_bid = fee_sell
            .sell_price(bid.price())
            .ok_or(EngineError::Overflow("fee-adjusted bid"))?;
        let spread = get_spread(adjusted_ask, adjusted_bid)?;
        if spread <= Decimal::ZERO {
            trace!(ask = %ask.price(), bid = %bid.price(), spread = %spread, "Books no longer cross");
            break;
        }

        let volume = ask.volume().min(bid.volume());

        // Equal volumes consume both levels in one step.
        ask_queue.pop_front();
        if let Some(rest) = ask.reduced_by(volume) {
            ask_queue.push_front(rest);
        }
        bid_queue.pop_front();
        if let Some(rest) = bid.reduced_by(volume) {
            bid_queue.push_front(rest);
        }

        let deal = ArbitrageDeal::new(ask.price(), bid.price(), volume, fee_buy, fee_sell)
            .ok_or(EngineError::Overflow("deal amounts"))?;
        trace!(
            price_buy = %deal.price_buy(),
            price_sell = %deal.price_sell(),
            volume = %deal.volume(),
            spread = %deal.spread(),
            "Matched levels"
        );
        deals.push(deal);
    }

    debug!(
        deals = deals.len(),
        asks_left = ask_queue.len(),
        bids_left = bid_queue.len(),
        "Crossed books"
    );

    Ok(Crossing {
        deals,
        asks: Asks::new(ask_queue.into())?,
        bids: Bids::new(bid_queue.into())?,
    })
}
