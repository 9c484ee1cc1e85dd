//! Engine error types.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::DomainError;

/// EngineError is returned by the crossing and trade-simulation routines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("bid price {0} must be positive")]
    NonPositiveBid(Decimal),
    #[error("cannot cross {buy} against {sell}: pairs differ")]
    PairMismatch { buy: String, sell: String },
    #[error("decimal overflow while computing {0}")]
    Overflow(&'static str),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
