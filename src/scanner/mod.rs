//! Cross-exchange scanning over orderbook snapshots.
//!
//! Every (pair, buy exchange, sell exchange) combination is independent, so
//! each one runs on its own blocking worker.

mod error;
mod stats;

pub use error::ScanError;
pub use stats::Stats;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::{Config, parse_decimal};
use crate::domain::{Fees, Opportunity, Orderbook};
use crate::engine::{DetectionParams, EngineError, convert_orderbook, detect};

/// A parsed `rebase` rule.
#[derive(Debug, Clone)]
struct Rebase {
    source: String,
    target: String,
    rate: Decimal,
}

/// Outcome of one detection worker.
struct Detection {
    pair: String,
    buy_exchange: String,
    sell_exchange: String,
    result: Result<Option<Opportunity>, EngineError>,
}

/// Scanner finds cross-exchange opportunities in a set of snapshots.
pub struct Scanner {
    cfg: Config,
    fees: HashMap<String, Fees>,
    rebases: Vec<Rebase>,
    params: DetectionParams,
    detection_timeout: Option<Duration>,
    stats: Mutex<Stats>,
}

impl Scanner {
    /// Creates a new Scanner from a validated config.
    pub fn new(cfg: Config) -> Result<Self, ScanError> {
        let mut fees = HashMap::new();
        for (name, exchange) in cfg.exchanges.iter().filter(|(_, ex)| ex.enabled) {
            fees.insert(name.clone(), exchange.fees(name)?);
        }

        let rebases = cfg
            .rebase
            .iter()
            .map(|rule| {
                Ok(Rebase {
                    source: rule.source.clone(),
                    target: rule.target.clone(),
                    rate: parse_decimal("rebase.rate", &rule.rate)?,
                })
            })
            .collect::<Result<Vec<_>, ScanError>>()?;

        let params = cfg.detection_params()?;

        let detection_timeout = cfg
            .arbitrage
            .as_ref()
            .map(|a| a.detection_timeout)
            .filter(|d| !d.is_zero());

        Ok(Self {
            cfg,
            fees,
            rebases,
            params,
            detection_timeout,
            stats: Mutex::new(Stats::default()),
        })
    }

    /// Reads every configured snapshot file.
    pub fn load_snapshots(&self) -> Result<Vec<Orderbook>, ScanError> {
        let mut books = Vec::with_capacity(self.cfg.snapshots.len());
        for path in &self.cfg.snapshots {
            let content = fs::read_to_string(path).map_err(|source| ScanError::ReadSnapshot {
                path: path.clone(),
                source,
            })?;
            let book: Orderbook =
                serde_json::from_str(&content).map_err(|source| ScanError::ParseSnapshot {
                    path: path.clone(),
                    source,
                })?;
            debug!(
                path = %path.display(),
                exchange = %book.exchange,
                pair = %book.pair,
                "Loaded snapshot"
            );
            books.push(book);
        }
        Ok(books)
    }

    /// Rebases, filters and truncates snapshots for scanning.
    ///
    /// Snapshots from disabled exchanges, of unconfigured pairs, or older
    /// than `orderbook.max_age` are dropped.
    pub fn prepare(&self, books: Vec<Orderbook>, now: DateTime<Utc>) -> Vec<Orderbook> {
        let max_depth = self.cfg.orderbook.as_ref().and_then(|o| o.max_depth);
        let max_age = self
            .cfg
            .orderbook
            .as_ref()
            .map(|o| o.max_age)
            .filter(|d| !d.is_zero())
            .and_then(|d| chrono::Duration::from_std(d).ok());

        books
            .into_iter()
            .filter_map(|book| {
                if !self.fees.contains_key(&book.exchange) {
                    debug!(exchange = %book.exchange, "Skipping snapshot from disabled exchange");
                    return None;
                }

                let mut book = self.rebase(book)?;

                if !self.cfg.pairs.contains(&book.pair) {
                    debug!(pair = %book.pair, "Skipping snapshot of unconfigured pair");
                    return None;
                }

                if let Some(max_age) = max_age {
                    let age = book.age(now);
                    if age > max_age {
                        warn!(
                            exchange = %book.exchange,
                            pair = %book.pair,
                            age_ms = age.num_milliseconds(),
                            "Skipping stale snapshot"
                        );
                        return None;
                    }
                }

                if let Some(depth) = max_depth {
                    book.truncate(depth);
                }

                Some(book)
            })
            .collect()
    }

    fn rebase(&self, book: Orderbook) -> Option<Orderbook> {
        let Some(rule) = self.rebases.iter().find(|r| r.source == book.pair) else {
            return Some(book);
        };

        match convert_orderbook(&book, &rule.target, rule.rate) {
            Ok(rebased) => {
                debug!(
                    exchange = %book.exchange,
                    source = %rule.source,
                    target = %rule.target,
                    rate = %rule.rate,
                    "Rebased snapshot"
                );
                Some(rebased)
            }
            Err(e) => {
                warn!(exchange = %book.exchange, pair = %book.pair, error = %e, "Failed to rebase snapshot");
                None
            }
        }
    }

    /// Runs detection over every ordered pair of exchanges quoting the same pair.
    ///
    /// Opportunities are returned most profitable first. A failing
    /// combination is logged and counted without affecting the others.
    ///
    /// Statistics are merged only once every combination has been collected,
    /// so a timed-out scan leaves [`Scanner::stats`] untouched. Aborting on
    /// timeout cannot interrupt a blocking detection that has already
    /// started; such workers run to completion and their results are dropped.
    pub async fn scan(&self, books: Vec<Orderbook>) -> Result<Vec<Opportunity>, ScanError> {
        let now = Utc::now();

        let mut by_pair: BTreeMap<String, Vec<Arc<Orderbook>>> = BTreeMap::new();
        for book in books {
            by_pair.entry(book.pair.clone()).or_default().push(Arc::new(book));
        }

        let mut workers = JoinSet::new();
        for (pair, pair_books) in &by_pair {
            for buy in pair_books {
                for sell in pair_books {
                    if buy.exchange == sell.exchange {
                        continue;
                    }

                    let (Some(buy_fees), Some(sell_fees)) =
                        (self.fees.get(&buy.exchange), self.fees.get(&sell.exchange))
                    else {
                        continue;
                    };

                    let (fee_buy, fee_sell) = (buy_fees.taker, sell_fees.taker);
                    let params = self.params;
                    let buy = Arc::clone(buy);
                    let sell = Arc::clone(sell);
                    let pair = pair.clone();

                    workers.spawn_blocking(move || Detection {
                        result: detect(&buy, &sell, fee_buy, fee_sell, &params, now),
                        pair,
                        buy_exchange: buy.exchange.clone(),
                        sell_exchange: sell.exchange.clone(),
                    });
                }
            }
        }

        info!(
            pairs = by_pair.len(),
            combinations = workers.len(),
            "Starting scan"
        );

        let mut delta = Stats {
            scans: 1,
            ..Default::default()
        };
        let mut opportunities = match self.detection_timeout {
            Some(limit) => {
                let outcome = tokio::time::timeout(limit, collect(&mut workers, &mut delta)).await;
                match outcome {
                    Ok(found) => found,
                    Err(_) => {
                        workers.abort_all();
                        warn!(timeout = ?limit, "Scan timed out");
                        return Err(ScanError::Timeout(limit));
                    }
                }
            }
            None => collect(&mut workers, &mut delta).await,
        };
        self.stats.lock().await.merge(&delta);
        opportunities.sort_by(|a, b| b.net_profit.cmp(&a.net_profit));

        info!(opportunities = opportunities.len(), "Scan finished");
        Ok(opportunities)
    }

    /// Returns a copy of the current statistics.
    pub async fn stats(&self) -> Stats {
        self.stats.lock().await.clone()
    }
}

async fn collect(workers: &mut JoinSet<Detection>, stats: &mut Stats) -> Vec<Opportunity> {
    let mut opportunities = Vec::new();

    while let Some(joined) = workers.join_next().await {
        stats.combinations_scanned += 1;

        let detection = match joined {
            Ok(detection) => detection,
            Err(e) => {
                stats.failed_combinations += 1;
                warn!(error = %e, "Detection worker failed");
                continue;
            }
        };

        match detection.result {
            Ok(Some(opportunity)) => {
                info!(
                    pair = %detection.pair,
                    buy_exchange = %detection.buy_exchange,
                    sell_exchange = %detection.sell_exchange,
                    quantity = %opportunity.quantity,
                    net_profit = %opportunity.net_profit,
                    profit_percent = %opportunity.profit_percent.round_dp(4),
                    "Opportunity detected"
                );
                stats.opportunities_detected += 1;
                stats.total_volume = stats.total_volume.saturating_add(opportunity.quantity);
                stats.total_profit = stats.total_profit.saturating_add(opportunity.net_profit);
                opportunities.push(opportunity);
            }
            Ok(None) => {
                debug!(
                    pair = %detection.pair,
                    buy_exchange = %detection.buy_exchange,
                    sell_exchange = %detection.sell_exchange,
                    "No opportunity"
                );
            }
            Err(e) => {
                stats.failed_combinations += 1;
                warn!(
                    pair = %detection.pair,
                    buy_exchange = %detection.buy_exchange,
                    sell_exchange = %detection.sell_exchange,
                    error = %e,
                    "Detection failed"
                );
            }
        }
    }

    opportunities
}
