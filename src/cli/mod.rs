// CLI module
// Command-line interface, argument parsing and run assembly

mod args;

pub use args::{CliArgs, StrategyType};

use crate::config::Config;
use crate::core::Checkout;
use crate::io::{load_discounts, load_promotions, load_stock};
use crate::strategy::PricingRun;
use crate::types::PricingError;
use clap::Parser;
use std::sync::Arc;

/// Parse command-line arguments using clap
///
/// If parsing fails (e.g., invalid arguments, missing required arguments,
/// or --help flag), clap displays an error message or help text and exits
/// the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Build the pricing run described by the arguments
///
/// # Arguments
///
/// * `args` - Parsed command-line arguments
/// * `config` - Configuration from the environment; flags take precedence
///
/// # Errors
///
/// Returns an error if a promotions, discounts or stock file is given but
/// cannot be opened.
pub fn build_run(args: &CliArgs, config: Config) -> Result<PricingRun, PricingError> {
    let config = args.apply_to(config);
    let (business_date, now) = args.clock();

    let checkout = Checkout::new(
        config.pricing_settings(),
        config.merchant_id.clone(),
        business_date,
        now,
    );
    let mut run = PricingRun::new(checkout);
    run.issued_today = args.issued_today;

    if let Some(path) = &args.promotions_file {
        run.promotions = load_promotions(path)?;
    }
    if let Some(path) = &args.discounts_file {
        run.discounts = Arc::new(load_discounts(path)?);
    }
    if let Some(path) = &args.stock_file {
        run.stock = load_stock(path)?;
    }

    tracing::info!(
        merchant = %config.merchant_id,
        tax_mode = %config.tax_mode,
        trade_type = %config.trade_type,
        business_date = %business_date,
        promotions = run.promotions.len(),
        discounts = run.discounts.len(),
        "starting pricing run"
    );

    Ok(run)
}
