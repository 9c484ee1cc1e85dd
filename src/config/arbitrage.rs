//! Thresholds and limits for opportunity detection.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

/// Settings that shape what the scanner reports.
#[derive(Debug, Clone, Deserialize)]
pub struct ArbitrageConfig {
    /// Filters applied to every crossing. Without it nothing is filtered
    /// and opportunities never outlive their detection instant.
    pub cross_exchange: Option<CrossExchangeConfig>,
    /// Wall-clock limit for collecting one scan. When exceeded the scan
    /// fails with a timeout error and its results are discarded. Zero
    /// disables the limit.
    #[serde(default, with = "duration")]
    pub detection_timeout: Duration,
}

/// Filters turned into detection parameters by [`super::Config::detection_params`].
#[derive(Debug, Clone, Deserialize)]
pub struct CrossExchangeConfig {
    /// Minimum net profit over buy cost, as a fraction ("0.003" keeps
    /// opportunities at 0.3% or better).
    pub min_profit_threshold: Option<String>,
    /// Minimum matched base volume; must not be negative.
    pub min_quantity: Option<String>,
    /// Added to the detection time to produce `expires_at`.
    #[serde(default, with = "duration")]
    pub opportunity_ttl: Duration,
}
