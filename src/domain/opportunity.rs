//! Arbitrage opportunity domain model.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{ArbitrageDeal, DomainError, Fee};

/// Opportunity aggregates the fills of one cross-exchange crossing.
#[derive(Debug, Clone, Serialize)]
pub struct Opportunity {
    /// Identifier built from pair, exchanges and detection time.
    pub id: String,
    /// Trading pair (e.g., "BTC/USDT").
    pub pair: String,
    /// Exchange where to buy.
    pub buy_exchange: String,
    /// Exchange where to sell.
    pub sell_exchange: String,
    /// Volume-weighted ask price paid on the buy exchange.
    pub buy_price: Decimal,
    /// Volume-weighted bid price received on the sell exchange.
    pub sell_price: Decimal,
    /// Total matched base volume.
    pub quantity: Decimal,
    /// Profit before fees.
    pub gross_profit: Decimal,
    /// Profit after all fees.
    pub net_profit: Decimal,
    /// Net profit as a percentage of the fee-inclusive buy cost.
    pub profit_percent: Decimal,
    /// Taker fee on the buy exchange.
    pub buy_fee: Fee,
    /// Taker fee on the sell exchange.
    pub sell_fee: Fee,
    /// Individual fills, best first.
    pub deals: Vec<ArbitrageDeal>,
    /// When this opportunity was detected.
    pub detected_at: DateTime<Utc>,
    /// When this opportunity is considered stale.
    pub expires_at: DateTime<Utc>,
}

impl Opportunity {
    /// Builds an opportunity from matcher output.
    ///
    /// Returns Ok(None) when `deals` is empty, and an overflow error when a
    /// total does not fit in a Decimal.
    pub fn from_deals(
        pair: &str,
        buy_exchange: &str,
        sell_exchange: &str,
        deals: Vec<ArbitrageDeal>,
        detected_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Option<Self>, DomainError> {
        let Some(first) = deals.first() else {
            return Ok(None);
        };
        let (buy_fee, sell_fee) = (first.fee_buy(), first.fee_sell());

        let mut quantity = Decimal::ZERO;
        let mut buy_notional = Decimal::ZERO;
        let mut sell_notional = Decimal::ZERO;
        let mut buy_cost = Decimal::ZERO;
        let mut net_profit = Decimal::ZERO;
        for deal in &deals {
            quantity = add(quantity, Some(deal.volume()), "quantity")?;
            buy_notional = add(
                buy_notional,
                deal.price_buy().checked_mul(deal.volume()),
                "buy notional",
            )?;
            sell_notional = add(
                sell_notional,
                deal.price_sell().checked_mul(deal.volume()),
                "sell notional",
            )?;
            buy_cost = add(buy_cost, Some(deal.buy_cost()), "buy cost")?;
            net_profit = add(net_profit, Some(deal.profit()), "net profit")?;
        }

        if quantity.is_zero() {
            return Ok(None);
        }

        let profit_percent = if buy_cost.is_zero() {
            Decimal::ZERO
        } else {
            net_profit
                .checked_div(buy_cost)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or(DomainError::Overflow("profit percent"))?
        };

        let expires_at = detected_at
            .checked_add_signed(ttl)
            .ok_or(DomainError::Overflow("expiry"))?;

        Ok(Some(Self {
            id: format!(
                "{}:{}:{}:{}",
                pair,
                buy_exchange,
                sell_exchange,
                detected_at.timestamp_millis()
            ),
            pair: pair.to_string(),
            buy_exchange: buy_exchange.to_string(),
            sell_exchange: sell_exchange.to_string(),
            buy_price: buy_notional / quantity,
            sell_price: sell_notional / quantity,
            quantity,
            gross_profit: sell_notional - buy_notional,
            net_profit,
            profit_percent,
            buy_fee,
            sell_fee,
            deals,
            detected_at,
            expires_at,
        }))
    }

    /// Returns true if the opportunity has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Returns true if the net profit is positive.
    pub fn is_profitable(&self) -> bool {
        self.net_profit > Decimal::ZERO
    }
}

fn add(total: Decimal, value: Option<Decimal>, what: &'static str) -> Result<Decimal, DomainError> {
    value
        .and_then(|v| total.checked_add(v))
        .ok_or(DomainError::Overflow(what))
}
