//! Configuration loading and validation for the arbitrage scanner.
//!
//! Uses serde_yaml to load YAML configuration files. Fee rates can be
//! overridden per exchange through environment variables, which are also
//! read from a `.env` file when one exists.

mod app;
mod arbitrage;
mod duration;
mod error;
mod exchange;
mod orderbook;
mod rebase;

pub use app::AppConfig;
pub use arbitrage::{ArbitrageConfig, CrossExchangeConfig};
pub use error::ConfigError;
pub use exchange::ExchangeConfig;
pub use orderbook::OrderbookConfig;
pub use rebase::RebaseRule;

use rust_decimal::Decimal;
use serde::Deserialize;
use std::{collections::HashMap, env, fs, path::PathBuf, str::FromStr};

use crate::engine::DetectionParams;

/// Root configuration structure for the scanner.
///
/// Required sections: app, exchanges, pairs.
/// Optional sections: orderbook, arbitrage, snapshots, rebase.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application-level settings like name and environment.
    pub app: AppConfig,
    /// Maps exchange names to their configurations.
    pub exchanges: HashMap<String, ExchangeConfig>,
    /// Snapshot depth and staleness settings (optional).
    pub orderbook: Option<OrderbookConfig>,
    /// Detection thresholds (optional).
    pub arbitrage: Option<ArbitrageConfig>,
    /// List of trading pairs to scan (e.g., "BTC/USDT").
    pub pairs: Vec<String>,
    /// JSON orderbook snapshot files.
    #[serde(default)]
    pub snapshots: Vec<PathBuf>,
    /// Quote-currency conversions applied to snapshots.
    #[serde(default)]
    pub rebase: Vec<RebaseRule>,
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    ///
    /// First loads environment variables from `.env` file (if exists), then
    /// applies `{EXCHANGE}_FEE_TAKER` and `{EXCHANGE}_FEE_MAKER` overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parses, applies env overrides and validates a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_yaml::from_str(content)?;

        config.load_fee_overrides_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Override fee rates from environment variables.
    fn load_fee_overrides_from_env(&mut self) {
        for (name, exchange) in self.exchanges.iter_mut() {
            if !exchange.enabled {
                continue;
            }

            let env_prefix = name.to_uppercase();
            if let Ok(taker) = env::var(format!("{}_FEE_TAKER", env_prefix)) {
                exchange.fee_taker = Some(taker);
            }
            if let Ok(maker) = env::var(format!("{}_FEE_MAKER", env_prefix)) {
                exchange.fee_maker = Some(maker);
            }
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.is_empty() {
            return Err(ConfigError::Validation("app.name is required".into()));
        }

        if self.pairs.is_empty() {
            return Err(ConfigError::Validation(
                "at least one trading pair is required".into(),
            ));
        }

        let mut enabled_exchanges = 0;
        for (name, exchange) in &self.exchanges {
            if exchange.enabled {
                enabled_exchanges += 1;
                exchange.fees(name)?;
            }
        }

        if enabled_exchanges == 0 {
            return Err(ConfigError::Validation(
                "at least one exchange must be enabled".into(),
            ));
        }

        if let Some(ref orderbook) = self.orderbook {
            if orderbook.max_depth == Some(0) {
                return Err(ConfigError::Validation(
                    "orderbook.max_depth must be positive".into(),
                ));
            }
        }

        for rule in &self.rebase {
            if rule.source == rule.target {
                return Err(ConfigError::Validation(format!(
                    "rebase {}: source and target must differ",
                    rule.source
                )));
            }
            let rate = parse_decimal(&format!("rebase.{}.rate", rule.source), &rule.rate)?;
            if rate <= Decimal::ZERO {
                return Err(ConfigError::Validation(format!(
                    "rebase {}: rate must be positive",
                    rule.source
                )));
            }
        }

        self.detection_params()?;

        Ok(())
    }

    /// Returns the enabled exchange names, sorted.
    pub fn enabled_exchanges(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .exchanges
            .iter()
            .filter(|(_, ex)| ex.enabled)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Builds detection thresholds from the `arbitrage.cross_exchange` section.
    pub fn detection_params(&self) -> Result<DetectionParams, ConfigError> {
        let mut params = DetectionParams::default();

        let Some(cross) = self
            .arbitrage
            .as_ref()
            .and_then(|a| a.cross_exchange.as_ref())
        else {
            return Ok(params);
        };

        if let Some(ref threshold) = cross.min_profit_threshold {
            let threshold = parse_decimal("min_profit_threshold", threshold)?;
            params.min_profit_percent = threshold
                .checked_mul(Decimal::ONE_HUNDRED)
                .ok_or_else(|| {
                    ConfigError::Validation("min_profit_threshold is out of range".into())
                })?;
        }

        if let Some(ref quantity) = cross.min_quantity {
            let quantity = parse_decimal("min_quantity", quantity)?;
            if quantity < Decimal::ZERO {
                return Err(ConfigError::Validation(
                    "min_quantity must not be negative".into(),
                ));
            }
            params.min_quantity = quantity;
        }

        params.opportunity_ttl = chrono::Duration::from_std(cross.opportunity_ttl)
            .map_err(|e| ConfigError::Validation(format!("opportunity_ttl: {}", e)))?;

        Ok(params)
    }
}

/// Parses a decimal string field, naming the field on failure.
pub(crate) fn parse_decimal(field: &str, value: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value.trim()).map_err(|e| ConfigError::InvalidDecimal {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}
