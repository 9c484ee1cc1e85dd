//! Exchange configuration.

use serde::Deserialize;

use super::{ConfigError, parse_decimal};
use crate::domain::{Fee, Fees};

/// Settings for a single exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Whether snapshots from this exchange take part in scans.
    #[serde(default)]
    pub enabled: bool,
    /// Taker fee as a decimal string (e.g., "0.001" for 0.1%).
    pub fee_taker: Option<String>,
    /// Maker fee as a decimal string. Defaults to zero.
    pub fee_maker: Option<String>,
}

impl ExchangeConfig {
    /// Parses the configured fee strings.
    pub fn fees(&self, name: &str) -> Result<Fees, ConfigError> {
        let taker = self.fee_taker.as_deref().ok_or_else(|| {
            ConfigError::Validation(format!("exchange {}: fee_taker is required", name))
        })?;
        let taker = parse_fee(&format!("exchanges.{}.fee_taker", name), taker)?;

        let maker = match self.fee_maker.as_deref() {
            Some(maker) => parse_fee(&format!("exchanges.{}.fee_maker", name), maker)?,
            None => Fee::ZERO,
        };

        Ok(Fees::new(maker, taker))
    }
}

fn parse_fee(field: &str, value: &str) -> Result<Fee, ConfigError> {
    let rate = parse_decimal(field, value)?;
    Fee::new(rate).map_err(|e| ConfigError::Validation(format!("{}: {}", field, e)))
}
