//! Scanner error types.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::ConfigError;

/// Scanner error type.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read snapshot {path}: {source}")]
    ReadSnapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse snapshot {path}: {source}")]
    ParseSnapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("scan did not finish within {0:?}")]
    Timeout(Duration),
}
