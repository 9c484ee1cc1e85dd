//! Trading fee structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Fee is a trading fee rate expressed as a decimal fraction
/// (e.g., 0.001 for 0.1%). Always within [0, 1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Fee(Decimal);

impl Fee {
    pub const ZERO: Fee = Fee(Decimal::ZERO);

    /// Creates a new Fee, rejecting rates outside [0, 1).
    pub fn new(rate: Decimal) -> Result<Self, DomainError> {
        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            return Err(DomainError::InvalidFee(rate));
        }
        Ok(Self(rate))
    }

    /// Returns the fee rate.
    pub fn rate(&self) -> Decimal {
        self.0
    }

    /// Effective cost of buying one unit at `price`: price × (1 + fee).
    ///
    /// None if the result does not fit in a Decimal.
    pub fn buy_price(&self, price: Decimal) -> Option<Decimal> {
        price.checked_mul(Decimal::ONE + self.0)
    }

    /// Effective proceeds of selling one unit at `price`: price × (1 − fee).
    pub fn sell_price(&self, price: Decimal) -> Option<Decimal> {
        price.checked_mul(Decimal::ONE - self.0)
    }
}

impl TryFrom<Decimal> for Fee {
    type Error = DomainError;

    fn try_from(rate: Decimal) -> Result<Self, Self::Error> {
        Fee::new(rate)
    }
}

impl From<Fee> for Decimal {
    fn from(fee: Fee) -> Self {
        fee.0
    }
}

/// Fees represents the trading fees for a pair on an exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fees {
    /// Maker fee (for limit orders that add liquidity).
    pub maker: Fee,
    /// Taker fee (for orders that remove liquidity).
    pub taker: Fee,
}

impl Fees {
    /// Creates a new Fees instance.
    pub fn new(maker: Fee, taker: Fee) -> Self {
        Self { maker, taker }
    }
}
