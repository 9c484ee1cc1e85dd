//! Configuration error types.

use thiserror::Error;

/// Error raised while loading the YAML file or deriving detection settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[from] std::io::Error),
    /// Malformed YAML or a duration that does not parse.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// A decimal given as a string (fee override, threshold) did not parse.
    #[error("{field}: invalid decimal {value:?}: {reason}")]
    InvalidDecimal {
        field: String,
        value: String,
        reason: String,
    },
    #[error("validation failed: {0}")]
    Validation(String),
}
