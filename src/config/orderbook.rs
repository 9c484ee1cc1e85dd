//! Snapshot preprocessing configuration.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

/// How snapshots are trimmed before detection.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderbookConfig {
    /// Levels kept per side, best first. Must be positive when set.
    pub max_depth: Option<usize>,
    /// Snapshots whose timestamp is older than this at preparation time are
    /// dropped with a warning. Zero keeps every snapshot.
    #[serde(default, with = "duration")]
    pub max_age: Duration,
}
