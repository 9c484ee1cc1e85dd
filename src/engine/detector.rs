//! Cross-exchange opportunity detection over two orderbook snapshots.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use super::{EngineError, Result, cross_books};
use crate::domain::{Fee, Opportunity, Orderbook};

/// Thresholds an opportunity must meet to be reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// Minimum net profit as a percentage of the buy cost.
    pub min_profit_percent: Decimal,
    /// Minimum matched base volume.
    pub min_quantity: Decimal,
    /// How long an opportunity stays valid after detection.
    pub opportunity_ttl: Duration,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            min_profit_percent: Decimal::ZERO,
            min_quantity: Decimal::ZERO,
            opportunity_ttl: Duration::zero(),
        }
    }
}

/// Looks for an opportunity buying on `buy_book` and selling on `sell_book`.
///
/// Returns Ok(None) when the books do not cross or the result misses a
/// threshold in `params`.
pub fn detect(
    buy_book: &Orderbook,
    sell_book: &Orderbook,
    fee_buy: Fee,
    fee_sell: Fee,
    params: &DetectionParams,
    now: DateTime<Utc>,
) -> Result<Option<Opportunity>> {
    if buy_book.pair != sell_book.pair {
        return Err(EngineError::PairMismatch {
            buy: buy_book.pair.clone(),
            sell: sell_book.pair.clone(),
        });
    }

    let crossing = cross_books(&buy_book.asks, &sell_book.bids, fee_buy, fee_sell)?;
    let Some(opportunity) = Opportunity::from_deals(
        &buy_book.pair,
        &buy_book.exchange,
        &sell_book.exchange,
        crossing.deals,
        now,
        params.opportunity_ttl,
    )?
    else {
        return Ok(None);
    };

    if opportunity.quantity < params.min_quantity {
        debug!(
            pair = %opportunity.pair,
            quantity = %opportunity.quantity,
            min_quantity = %params.min_quantity,
            "Opportunity below minimum quantity"
        );
        return Ok(None);
    }

    if opportunity.profit_percent < params.min_profit_percent {
        debug!(
            pair = %opportunity.pair,
            profit_percent = %opportunity.profit_percent,
            min_profit_percent = %params.min_profit_percent,
            "Opportunity below profit threshold"
        );
        return Ok(None);
    }

    Ok(Some(opportunity))
}
