use crate::config::Config;
use crate::strategy::BatchConfig;
use crate::types::{TaxMode, TradeType};
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Price POS orders and write the invoice ledger
#[derive(Parser, Debug)]
#[command(name = "pos-totals")]
#[command(about = "Price POS orders and write the invoice ledger", long_about = None)]
pub struct CliArgs {
    /// Cart CSV: order,product,quantity,price,cgst,sgst,igst,price_type
    #[arg(value_name = "ITEMS", help = "Path to the cart items CSV file")]
    pub items_file: PathBuf,

    /// Order promotions CSV
    #[arg(
        long = "promotions",
        value_name = "CSV",
        help = "Coupons and loyalty redemptions per order"
    )]
    pub promotions_file: Option<PathBuf>,

    /// Product discounts CSV
    #[arg(
        long = "discounts",
        value_name = "CSV",
        help = "Time-windowed product discounts (RFC 3339 start_at/end_at)"
    )]
    pub discounts_file: Option<PathBuf>,

    /// Stock levels CSV
    #[arg(long = "stock", value_name = "CSV", help = "Available stock per product")]
    pub stock_file: Option<PathBuf>,

    #[arg(
        long = "tax-mode",
        value_name = "MODE",
        help = "exclusive, inclusive-split or inclusive-mrp (overrides POS_TAX_MODE)"
    )]
    pub tax_mode: Option<TaxMode>,

    #[arg(
        long = "trade-type",
        value_name = "TYPE",
        help = "intra-state or inter-state (overrides POS_TRADE_TYPE)"
    )]
    pub trade_type: Option<TradeType>,

    #[arg(
        long = "igst-override",
        value_name = "RATE",
        help = "IGST rate replacing line rates on inter-state sales"
    )]
    pub igst_override: Option<Decimal>,

    #[arg(
        long = "additional-tax",
        value_name = "RATE",
        help = "Surcharge percentage applied after the coupon"
    )]
    pub additional_tax: Option<Decimal>,

    #[arg(
        long = "min-points",
        value_name = "N",
        help = "Minimum point balance before loyalty can be redeemed"
    )]
    pub min_points: Option<u64>,

    #[arg(long = "merchant", value_name = "ID", help = "Merchant ID used for bill numbering")]
    pub merchant: Option<String>,

    #[arg(
        long = "date",
        value_name = "YYYY-MM-DD",
        help = "Business date for bill numbers (default: local date of --now)"
    )]
    pub date: Option<NaiveDate>,

    #[arg(
        long = "now",
        value_name = "RFC3339",
        help = "Instant used for discount windows (default: current time)"
    )]
    pub now: Option<DateTime<Utc>>,

    #[arg(
        long = "issued-today",
        value_name = "COUNT",
        default_value_t = 0,
        help = "Invoices the merchant already issued on the business date"
    )]
    pub issued_today: u32,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of rows and orders per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of rows read and orders priced per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent pricing tasks (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of pricing tasks per batch (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,
}

/// Available processing strategies
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// # Returns
    ///
    /// A `BatchConfig` with values from CLI arguments or defaults.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Overlay the flags that were given on top of environment configuration
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(mode) = self.tax_mode {
            config.tax_mode = mode;
        }
        if let Some(trade_type) = self.trade_type {
            config.trade_type = trade_type;
        }
        if self.igst_override.is_some() {
            config.igst_override = self.igst_override;
        }
        if self.additional_tax.is_some() {
            config.additional_tax_rate = self.additional_tax;
        }
        if let Some(min_points) = self.min_points {
            config.min_points_to_redeem = min_points;
        }
        if let Some(merchant) = &self.merchant {
            config.merchant_id = merchant.clone();
        }
        config
    }

    /// Business date and discount instant for the run
    ///
    /// Without `--date`, the business date is the local calendar date of `now`.
    pub fn clock(&self) -> (NaiveDate, DateTime<Utc>) {
        let now = self.now.unwrap_or_else(Utc::now);
        let date = self
            .date
            .unwrap_or_else(|| now.with_timezone(&Local).date_naive());
        (date, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    // Strategy parsing tests
    #[rstest]
    #[case::default_strategy(&["program", "items.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "items.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "items.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        match (&parsed.strategy, &expected) {
            (StrategyType::Sync, StrategyType::Sync) => (),
            (StrategyType::Async, StrategyType::Async) => (),
            _ => panic!("Expected {:?}, got {:?}", expected, parsed.strategy),
        }
    }

    #[rstest]
    #[case::all_defaults(&["program", "items.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "items.csv"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "items.csv"], 1000, 8)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "items.csv"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();
        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
    }

    #[test]
    fn test_pricing_flags_parse() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--promotions",
            "promotions.csv",
            "--discounts",
            "discounts.csv",
            "--stock",
            "stock.csv",
            "--tax-mode",
            "inclusive-mrp",
            "--trade-type",
            "inter-state",
            "--igst-override",
            "12",
            "--additional-tax",
            "2.5",
            "--min-points",
            "100",
            "--merchant",
            "store-42",
            "--date",
            "2025-01-09",
            "--now",
            "2025-01-09T10:00:00Z",
            "--issued-today",
            "7",
            "items.csv",
        ])
        .unwrap();

        assert_eq!(parsed.items_file, PathBuf::from("items.csv"));
        assert_eq!(parsed.promotions_file, Some(PathBuf::from("promotions.csv")));
        assert_eq!(parsed.tax_mode, Some(TaxMode::InclusiveMrp));
        assert_eq!(parsed.trade_type, Some(TradeType::InterState));
        assert_eq!(parsed.igst_override, Some(Decimal::from(12)));
        assert_eq!(parsed.additional_tax, Some(Decimal::new(25, 1)));
        assert_eq!(parsed.min_points, Some(100));
        assert_eq!(parsed.issued_today, 7);

        let (date, now) = parsed.clock();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
        assert_eq!(now, Utc.with_ymd_and_hms(2025, 1, 9, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_flags_override_environment() {
        let env = Config {
            tax_mode: TaxMode::InclusiveSplit,
            merchant_id: "env-merchant".to_string(),
            min_points_to_redeem: 50,
            ..Config::default()
        };
        let parsed =
            CliArgs::try_parse_from(["program", "--tax-mode", "exclusive", "items.csv"]).unwrap();

        let config = parsed.apply_to(env);

        assert_eq!(config.tax_mode, TaxMode::Exclusive);
        assert_eq!(config.merchant_id, "env-merchant");
        assert_eq!(config.min_points_to_redeem, 50);
    }

    // Error handling tests
    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "items.csv"])]
    #[case::invalid_tax_mode(&["program", "--tax-mode", "gross", "items.csv"])]
    #[case::invalid_rate(&["program", "--additional-tax", "lots", "items.csv"])]
    #[case::invalid_date(&["program", "--date", "09/01/2025", "items.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
