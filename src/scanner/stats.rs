//! Runtime statistics for the scanner.

use rust_decimal::Decimal;

/// Counters accumulated across scans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub scans: u64,
    pub combinations_scanned: u64,
    pub opportunities_detected: u64,
    pub failed_combinations: u64,
    pub total_volume: Decimal,
    pub total_profit: Decimal,
}

impl Stats {
    /// Adds the counters of `other` to `self`.
    pub fn merge(&mut self, other: &Stats) {
        self.scans = self.scans.saturating_add(other.scans);
        self.combinations_scanned = self
            .combinations_scanned
            .saturating_add(other.combinations_scanned);
        self.opportunities_detected = self
            .opportunities_detected
            .saturating_add(other.opportunities_detected);
        self.failed_combinations = self
            .failed_combinations
            .saturating_add(other.failed_combinations);
        self.total_volume = self.total_volume.saturating_add(other.total_volume);
        self.total_profit = self.total_profit.saturating_add(other.total_profit);
    }
}
