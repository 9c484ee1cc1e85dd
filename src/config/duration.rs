//! Custom serde module for duration strings like "30s", "5m" or "1m30s".

use serde::{self, Deserialize, Deserializer};
use std::time::Duration;

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) => parse_duration(&s).map_err(serde::de::Error::custom),
        None => Ok(Duration::ZERO),
    }
}

/// Parses a sequence of `<number><unit>` segments and sums them.
/// A bare number is read as seconds.
pub(crate) fn parse_duration(s: &str) -> Result<Duration, String> {
    let mut rest = s.trim();
    let mut total = Duration::ZERO;

    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        let (num_str, tail) = rest.split_at(num_end);
        if num_str.is_empty() {
            return Err(format!("invalid duration: {}", s));
        }
        let num: f64 = num_str
            .parse()
            .map_err(|_| format!("invalid duration number: {}", num_str))?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);

        let multiplier = match unit.trim() {
            "ms" => 1e-3,
            "s" | "" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            other => return Err(format!("unknown duration unit: {}", other)),
        };

        total = Duration::try_from_secs_f64(num * multiplier)
            .ok()
            .and_then(|segment| total.checked_add(segment))
            .ok_or_else(|| format!("duration out of range: {}", s))?;
        rest = next.trim_start();
    }

    Ok(total)
}
