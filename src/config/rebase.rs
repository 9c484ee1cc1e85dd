//! Quote-currency rebasing rules.

use serde::Deserialize;

/// Re-expresses snapshots of `source` as `target` by multiplying every
/// price by `rate` (e.g., BTC/ETH × ETH/USDT rate = BTC/USDT).
#[derive(Debug, Clone, Deserialize)]
pub struct RebaseRule {
    pub source: String,
    pub target: String,
    /// Decimal string, must be positive.
    pub rate: String,
}
