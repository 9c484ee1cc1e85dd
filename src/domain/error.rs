//! Value model error types.

use rust_decimal::Decimal;
use thiserror::Error;

use super::Side;

/// DomainError reports a value that violates a model invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("invalid price {0}: must be positive")]
    InvalidPrice(Decimal),
    #[error("invalid volume {0}: must be positive")]
    InvalidVolume(Decimal),
    #[error("invalid fee {0}: must be in [0, 1)")]
    InvalidFee(Decimal),
    #[error("{side} levels are not sorted best-first at index {index}")]
    UnsortedLevels { side: Side, index: usize },
    #[error("decimal overflow while computing {0}")]
    Overflow(&'static str),
}
