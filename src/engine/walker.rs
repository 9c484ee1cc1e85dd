//! Walking one side of a book to simulate a market fill.
//!
//! Levels are consumed best price first, so only checked [`SortedLevels`]
//! are accepted. Running out of liquidity is not an error: the returned
//! [`Fill`] reports what could not be filled.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::domain::{Deal, SortedLevels};

/// Fill is the result of walking a book towards a target.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fill {
    /// Fills in the order the levels were consumed.
    pub deals: Vec<Deal>,
    /// Part of the target left over when the book ran dry, in the
    /// target's unit (quote for amount walks, base for volume walks).
    pub unfilled: Decimal,
}

impl Fill {
    /// Returns true if the whole target was filled.
    pub fn is_complete(&self) -> bool {
        self.unfilled <= Decimal::ZERO
    }

    /// Total filled base volume, or None if it does not fit in a Decimal.
    pub fn total_volume(&self) -> Option<Decimal> {
        self.deals
            .iter()
            .try_fold(Decimal::ZERO, |total, d| total.checked_add(d.volume))
    }

    /// Total quote notional, or None if it does not fit in a Decimal.
    pub fn total_notional(&self) -> Option<Decimal> {
        self.deals
            .iter()
            .try_fold(Decimal::ZERO, |total, d| total.checked_add(d.notional()?))
    }

    /// Volume-weighted execution price, if anything was filled.
    pub fn average_price(&self) -> Option<Decimal> {
        let volume = self.total_volume()?;
        if volume.is_zero() {
            return None;
        }
        self.total_notional()?.checked_div(volume)
    }
}

/// Spends up to `amount` of quote currency against `levels`.
pub fn trade_by_amount<L: SortedLevels>(levels: &L, amount: Decimal) -> Fill {
    let mut remaining = amount.max(Decimal::ZERO);
    let mut deals = Vec::new();

    for level in levels.iter() {
        if remaining <= Decimal::ZERO {
            break;
        }

        // A notional too large for a Decimal is always above the target.
        if let Some(notional) = level.notional().filter(|n| *n <= remaining) {
            deals.push(Deal::from(*level));
            remaining -= notional;
            continue;
        }

        if let Some(volume) = partial_volume(remaining, level.price()) {
            deals.push(Deal {
                price: level.price(),
                volume,
            });
        }
        remaining = Decimal::ZERO;
    }

    debug!(
        side = %levels.side(),
        target_amount = %amount,
        deals = deals.len(),
        unfilled = %remaining,
        "Walked book by amount"
    );

    Fill {
        deals,
        unfilled: remaining,
    }
}

/// Fills up to `volume` of base currency against `levels`.
pub fn trade_by_volume<L: SortedLevels>(levels: &L, volume: Decimal) -> Fill {
    let mut remaining = volume.max(Decimal::ZERO);
    let mut deals = Vec::new();

    for level in levels.iter() {
        if remaining <= Decimal::ZERO {
            break;
        }

        if level.volume() <= remaining {
            deals.push(Deal::from(*level));
            remaining -= level.volume();
            continue;
        }

        deals.push(Deal {
            price: level.price(),
            volume: remaining,
        });
        remaining = Decimal::ZERO;
    }

    debug!(
        side = %levels.side(),
        target_volume = %volume,
        deals = deals.len(),
        unfilled = %remaining,
        "Walked book by volume"
    );

    Fill {
        deals,
        unfilled: remaining,
    }
}

/// Largest positive volume at `price` whose notional does not exceed `amount`.
fn partial_volume(amount: Decimal, price: Decimal) -> Option<Decimal> {
    let volume = amount.checked_div(price)?;
    let volume = match volume.checked_mul(price) {
        // Division rounded up in the last digit.
        Some(notional) if notional > amount => volume - Decimal::new(1, volume.scale()),
        Some(_) => volume,
        None => return None,
    };
    (volume > Decimal::ZERO).then_some(volume)
}
