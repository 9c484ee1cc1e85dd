use arbitrage_engine::config::Config;
use arbitrage_engine::scanner::Scanner;
use chrono::Utc;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

fn parse_config_path() -> String {
    for arg in env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    DEFAULT_CONFIG_PATH.to_string()
}

fn init_tracing(log_level: Option<&str>) {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    // Logs go to stderr so stdout carries only the JSON report.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = parse_config_path();

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.app.log_level.as_deref());

    info!(
        app = %config.app.name,
        env = %config.app.env,
        config = %config_path,
        exchanges = ?config.enabled_exchanges(),
        pairs = ?config.pairs,
        "Scanner initialized"
    );

    let scanner = match Scanner::new(config) {
        Ok(scanner) => scanner,
        Err(e) => {
            error!(error = %e, "Failed to create scanner");
            return ExitCode::FAILURE;
        }
    };

    let books = match scanner.load_snapshots() {
        Ok(books) => scanner.prepare(books, Utc::now()),
        Err(e) => {
            error!(error = %e, "Failed to load snapshots");
            return ExitCode::FAILURE;
        }
    };

    let opportunities = match scanner.scan(books).await {
        Ok(opportunities) => opportunities,
        Err(e) => {
            error!(error = %e, "Scan failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&opportunities) {
        Ok(report) => println!("{}", report),
        Err(e) => {
            error!(error = %e, "Failed to serialize report");
            return ExitCode::FAILURE;
        }
    }

    let stats = scanner.stats().await;
    info!(
        combinations = stats.combinations_scanned,
        opportunities = stats.opportunities_detected,
        failed = stats.failed_combinations,
        total_volume = %stats.total_volume,
        total_profit = %stats.total_profit,
        "Scan complete"
    );

    ExitCode::SUCCESS
}
