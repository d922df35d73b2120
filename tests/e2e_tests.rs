//! End-to-end integration tests
//!
//! These tests validate the complete pricing pipeline using predefined CSV
//! fixtures. Each test:
//! 1. Reads items.csv (and any promotions/discounts/stock tables) from a fixture directory
//! 2. Builds the run from `settings.env` and extra `args`, as the binary would
//! 3. Prices every order and writes the ledger CSV
//! 4. Compares actual output with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Each tax mode (exclusive, inclusive split, inclusive MRP)
//! - Coupons, loyalty redemption and the minimum point balance
//! - Time-windowed product discounts
//! - Inter-state sales with an IGST override and a surcharge
//! - Malformed rows and stock limits
//! - Bill numbers past 99 invoices in a day
//!
//! Each test is run twice: once with the synchronous strategy and once with the async strategy.

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pos_totals_engine::cli::{build_run, CliArgs, StrategyType};
    use pos_totals_engine::config::Config;
    use pos_totals_engine::strategy::create_strategy;
    use rstest::rstest;
    use std::collections::HashMap;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    const BUSINESS_DATE: &str = "2025-01-09";
    const NOW: &str = "2025-01-09T10:00:00Z";

    /// Read `KEY=VALUE` lines, ignoring blanks and `#` comments
    fn read_env_file(path: &Path) -> HashMap<String, String> {
        if !path.exists() {
            return HashMap::new();
        }
        fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect()
    }

    /// Command line for a fixture: fixed clock, optional tables, extra args
    fn fixture_args(fixture_dir: &str) -> Vec<String> {
        let mut args = vec![
            "pos-totals".to_string(),
            "--date".to_string(),
            BUSINESS_DATE.to_string(),
            "--now".to_string(),
            NOW.to_string(),
        ];

        for (flag, file) in [
            ("--promotions", "promotions.csv"),
            ("--discounts", "discounts.csv"),
            ("--stock", "stock.csv"),
        ] {
            let path = format!("{}/{}", fixture_dir, file);
            if Path::new(&path).exists() {
                args.push(flag.to_string());
                args.push(path);
            }
        }

        let extra = format!("{}/args", fixture_dir);
        if Path::new(&extra).exists() {
            let content = fs::read_to_string(&extra)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", extra, e));
            args.extend(content.split_whitespace().map(str::to_string));
        }

        args.push(format!("{}/items.csv", fixture_dir));
        args
    }

    /// Run a test fixture by pricing items.csv and comparing with expected.csv
    ///
    /// # Arguments
    ///
    /// * `fixture_name` - Name of the fixture directory (e.g., "exclusive_basic")
    /// * `strategy_type` - Processing strategy to use (Sync or Async)
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Fixture files cannot be read
    /// - Output doesn't match expected
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let items_path = format!("{}/items.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&items_path).exists(),
            "Items file not found: {}",
            items_path
        );
        assert!(
            Path::new(&expected_path).exists(),
            "Expected file not found: {}",
            expected_path
        );

        let env = read_env_file(Path::new(&format!("{}/settings.env", fixture_dir)));
        let config = Config::from_env_map(env)
            .unwrap_or_else(|e| panic!("Invalid settings for {}: {}", fixture_name, e));

        let args = CliArgs::try_parse_from(fixture_args(&fixture_dir))
            .unwrap_or_else(|e| panic!("Invalid args for {}: {}", fixture_name, e));
        let run = build_run(&args, config)
            .unwrap_or_else(|e| panic!("Failed to build run for {}: {}", fixture_name, e));

        let strategy = create_strategy(strategy_type.clone(), None);

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");
        strategy
            .process(Path::new(&items_path), &run, &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to price orders: {}", e));
        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );
    }

    /// End-to-end test for all fixtures with both processing strategies
    #[rstest]
    #[case("exclusive_basic")]
    #[case("inclusive_split")]
    #[case("inclusive_mrp")]
    #[case("promotions")]
    #[case("product_discounts")]
    #[case("inter_state_surcharge")]
    #[case("malformed_and_stock")]
    #[case("bill_number_rollover")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, strategy);
    }

    #[rstest]
    fn test_missing_items_file_is_an_error(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let args = CliArgs::try_parse_from(["pos-totals", "missing.csv"]).unwrap();
        let run = build_run(&args, Config::default()).unwrap();

        let mut output = Vec::new();
        let result = create_strategy(strategy, None).process(Path::new("missing.csv"), &run, &mut output);

        assert!(result.is_err());
        assert!(output.is_empty());
    }
}
