//! Price levels and the fills produced from them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Order is a single price level of an orderbook.
///
/// Both fields are strictly positive. Orders are never mutated; reducing
/// the volume of a level produces a new Order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOrder")]
pub struct Order {
    price: Decimal,
    volume: Decimal,
}

#[derive(Deserialize)]
struct RawOrder {
    price: Decimal,
    volume: Decimal,
}

impl TryFrom<RawOrder> for Order {
    type Error = DomainError;

    fn try_from(raw: RawOrder) -> Result<Self, Self::Error> {
        Order::new(raw.price, raw.volume)
    }
}

impl Order {
    /// Creates a new Order, rejecting a zero or negative price or volume.
    pub fn new(price: Decimal, volume: Decimal) -> Result<Self, DomainError> {
        if price <= Decimal::ZERO {
            return Err(DomainError::InvalidPrice(price));
        }
        if volume <= Decimal::ZERO {
            return Err(DomainError::InvalidVolume(volume));
        }
        Ok(Self { price, volume })
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn volume(&self) -> Decimal {
        self.volume
    }

    /// Returns price × volume in quote currency, or None if it does not fit
    /// in a Decimal.
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.volume)
    }

    /// Returns the same level with `volume` removed from it, or None when
    /// nothing is left.
    pub(crate) fn reduced_by(&self, volume: Decimal) -> Option<Self> {
        let remaining = self.volume - volume;
        (remaining > Decimal::ZERO).then_some(Self {
            price: self.price,
            volume: remaining,
        })
    }
}

/// Deal is one simulated fill against a single book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    /// Execution price.
    pub price: Decimal,
    /// Filled base volume.
    pub volume: Decimal,
}

impl Deal {
    /// Returns price × volume in quote currency, or None on overflow.
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.volume)
    }
}

impl From<Order> for Deal {
    fn from(order: Order) -> Self {
        Self {
            price: order.price,
            volume: order.volume,
        }
    }
}
