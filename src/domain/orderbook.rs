//! Orderbook data structures.

use std::ops::Deref;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{DomainError, Order};

/// Side names one half of an orderbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Sell-side levels, cheapest first.
    Ask,
    /// Buy-side levels, highest first.
    Bid,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Ask => write!(f, "ask"),
            Side::Bid => write!(f, "bid"),
        }
    }
}

/// Returns the index of the first level that breaks best-first ordering.
fn first_unsorted(levels: &[Order], side: Side) -> Option<usize> {
    levels
        .windows(2)
        .position(|w| match side {
            Side::Ask => w[1].price() < w[0].price(),
            Side::Bid => w[1].price() > w[0].price(),
        })
        .map(|i| i + 1)
}

/// SortedLevels is one side of a book whose price order has been checked.
///
/// Only [`Asks`] and [`Bids`] implement it, so algorithms that walk levels
/// best-first never see unvalidated input.
pub trait SortedLevels: Deref<Target = [Order]> {
    /// Which side of the book the levels belong to.
    fn side(&self) -> Side;
}

impl SortedLevels for Asks {
    fn side(&self) -> Side {
        Side::Ask
    }
}

impl SortedLevels for Bids {
    fn side(&self) -> Side {
        Side::Bid
    }
}

/// Asks is a list of sell-side levels sorted ascending by price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Order>", into = "Vec<Order>")]
pub struct Asks(Vec<Order>);

impl Asks {
    /// Wraps `levels`, failing if a level is cheaper than the one before it.
    pub fn new(levels: Vec<Order>) -> Result<Self, DomainError> {
        match first_unsorted(&levels, Side::Ask) {
            Some(index) => Err(DomainError::UnsortedLevels {
                side: Side::Ask,
                index,
            }),
            None => Ok(Self(levels)),
        }
    }

    /// Keeps only the best `depth` levels.
    pub fn truncate(&mut self, depth: usize) {
        self.0.truncate(depth);
    }
}

/// Bids is a list of buy-side levels sorted descending by price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Order>", into = "Vec<Order>")]
pub struct Bids(Vec<Order>);

impl Bids {
    /// Wraps `levels`, failing if a level is higher than the one before it.
    pub fn new(levels: Vec<Order>) -> Result<Self, DomainError> {
        match first_unsorted(&levels, Side::Bid) {
            Some(index) => Err(DomainError::UnsortedLevels {
                side: Side::Bid,
                index,
            }),
            None => Ok(Self(levels)),
        }
    }

    /// Keeps only the best `depth` levels.
    pub fn truncate(&mut self, depth: usize) {
        self.0.truncate(depth);
    }
}

impl Deref for Asks {
    type Target = [Order];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for Bids {
    type Target = [Order];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<Order>> for Asks {
    type Error = DomainError;

    fn try_from(levels: Vec<Order>) -> Result<Self, Self::Error> {
        Asks::new(levels)
    }
}

impl TryFrom<Vec<Order>> for Bids {
    type Error = DomainError;

    fn try_from(levels: Vec<Order>) -> Result<Self, Self::Error> {
        Bids::new(levels)
    }
}

impl From<Asks> for Vec<Order> {
    fn from(asks: Asks) -> Self {
        asks.0
    }
}

impl From<Bids> for Vec<Order> {
    fn from(bids: Bids) -> Self {
        bids.0
    }
}

/// Orderbook is a snapshot of bids and asks for a trading pair on one exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orderbook {
    /// The trading pair in "BASE/QUOTE" format (e.g., "BTC/USDT").
    pub pair: String,
    /// The exchange name this orderbook belongs to.
    pub exchange: String,
    /// Bid price levels (highest to lowest).
    pub bids: Bids,
    /// Ask price levels (lowest to highest).
    pub asks: Asks,
    /// Timestamp when this orderbook was captured.
    pub timestamp: DateTime<Utc>,
}

impl Orderbook {
    /// Returns the best bid price level, if available.
    pub fn best_bid(&self) -> Option<&Order> {
        self.bids.first()
    }

    /// Returns the best ask price level, if available.
    pub fn best_ask(&self) -> Option<&Order> {
        self.asks.first()
    }

    /// Keeps only the best `depth` levels on each side.
    pub fn truncate(&mut self, depth: usize) {
        self.bids.truncate(depth);
        self.asks.truncate(depth);
    }

    /// Returns how old the snapshot is at `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.timestamp
    }
}
