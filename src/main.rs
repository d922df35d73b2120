//! POS totals CLI
//!
//! Command-line interface for pricing orders from CSV files and writing the
//! invoice ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- items.csv > ledger.csv
//! cargo run -- --strategy sync --tax-mode inclusive-split items.csv > ledger.csv
//! cargo run -- --promotions promotions.csv --discounts discounts.csv items.csv > ledger.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 items.csv > ledger.csv
//! ```
//!
//! Merchant settings come from `POS_*` environment variables and can be
//! overridden by flags. The ledger goes to stdout; logs go to stderr and are
//! filtered with `RUST_LOG` (default `info`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid configuration, file not found, output not writable, etc.)

use pos_totals_engine::cli;
use pos_totals_engine::config::Config;
use pos_totals_engine::strategy;
use std::process;
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG` when set and `info` otherwise
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() {
    init_tracing();

    let args = cli::parse_args();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            process::exit(1);
        }
    };

    let run = match cli::build_run(&args, config) {
        Ok(run) => run,
        Err(e) => {
            tracing::error!(error = %e, "failed to prepare pricing run");
            process::exit(1);
        }
    };

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.items_file, &run, &mut output) {
        tracing::error!(error = %e, "pricing run failed");
        process::exit(1);
    }
}
