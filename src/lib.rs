//! Orderbook crossing and trade-simulation engine.
//!
//! Computes relative spreads, rebases prices across quote currencies, walks
//! a single book to fill a target, and greedily crosses two books from
//! different exchanges into profitable arbitrage fills after fees.

pub mod config;
pub mod domain;
pub mod engine;
pub mod scanner;
