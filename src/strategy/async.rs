//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. Orders are priced in batches using task-based
//! parallelism.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── SharedInvoiceCounter (bill number sequencing)
//!     └── BatchProcessor (partitioned pricing on tokio tasks)
//! ```
//!
//! # Ordering
//!
//! - The cart file is read in batches of `batch_size` rows and grouped into orders
//! - Bill numbers are issued in first-seen order before any pricing starts
//! - Orders are then priced in batches of `batch_size`, each batch spread over
//!   up to `max_concurrent_batches` tasks
//! - Results are restored to input order, so the ledger matches the sync strategy

use crate::core::r#async::{BatchProcessor, PendingOrder, SharedInvoiceCounter};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_ledger_csv;
use crate::io::sync_reader::open_error;
use crate::strategy::{OrderBook, PricingRun, ProcessingStrategy};
use crate::types::{LedgerRecord, PricingError};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for async batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Rows read per batch, and orders priced per batch
    pub batch_size: usize,

    /// Worker threads, and maximum pricing tasks per batch
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        run: &PricingRun,
        output: &mut dyn Write,
    ) -> Result<(), PricingError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| PricingError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        let records = runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| open_error(input_path, e))?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut orders = OrderBook::new();
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }
                for (order, item) in batch {
                    orders.add(order, item, &run.stock);
                }
            }

            let checkout = &run.checkout;
            let mut invoices = SharedInvoiceCounter::new().with_count(
                &checkout.merchant,
                checkout.business_date,
                run.issued_today,
            );

            let pending: Vec<PendingOrder> = orders
                .into_orders()
                .into_iter()
                .enumerate()
                .map(|(position, (order, cart))| PendingOrder {
                    position,
                    promotion: run.promotion_for(&order),
                    bill_number: checkout.issue_bill_number(&mut invoices),
                    order,
                    items: cart.items().to_vec(),
                })
                .collect();

            let processor = BatchProcessor::new(
                Arc::clone(&run.checkout),
                Arc::clone(&run.discounts),
                self.config.max_concurrent_batches,
            );

            let mut records: Vec<LedgerRecord> = Vec::with_capacity(pending.len());
            let mut pending = pending.into_iter().peekable();
            while pending.peek().is_some() {
                let batch: Vec<PendingOrder> =
                    pending.by_ref().take(self.config.batch_size).collect();
                let results = processor.process_batch(batch).await?;
                records.extend(results.into_iter().map(|r| r.priced.record));
            }

            Ok::<_, PricingError>(records)
        })?;

        write_ledger_csv(&records, output)?;

        tracing::info!(orders = records.len(), strategy = "async", "priced orders");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Checkout;
    use crate::strategy::SyncProcessingStrategy;
    use crate::types::PricingSettings;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rstest::rstest;
    use tempfile::NamedTempFile;

    const HEADER: &str = "order,product,quantity,price,cgst,sgst,igst,price_type\n";

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run() -> PricingRun {
        PricingRun::new(Checkout::new(
            PricingSettings::default(),
            "M1",
            NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 9, 10, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn test_async_strategy_prices_single_order() {
        let file = create_temp_csv(&format!("{}A1,SKU-1,2,100,9,9,0,\n", HEADER));

        let mut output = Vec::new();
        AsyncProcessingStrategy::new(BatchConfig::default())
            .process(file.path(), &run(), &mut output)
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output.lines().nth(1),
            Some("A1,090125-01,200.00,18.00,18.00,0.00,36.00,0.00,0,0.00,236.00")
        );
    }

    #[rstest]
    #[case::tiny_batches(BatchConfig::new(1, 4))]
    #[case::small_batches(BatchConfig::new(3, 2))]
    #[case::single_batch(BatchConfig::new(1000, 8))]
    fn test_async_strategy_matches_sync_output(#[case] config: BatchConfig) {
        let mut content = HEADER.to_string();
        for i in 0..40 {
            content.push_str(&format!("O{},SKU-{},{},{}.50,6,6,0,\n", i % 13, i % 5, i % 3 + 1, i));
        }
        let file = create_temp_csv(&content);

        let mut sync_output = Vec::new();
        SyncProcessingStrategy
            .process(file.path(), &run(), &mut sync_output)
            .unwrap();

        let mut async_output = Vec::new();
        AsyncProcessingStrategy::new(config)
            .process(file.path(), &run(), &mut async_output)
            .unwrap();

        assert_eq!(
            String::from_utf8(async_output).unwrap(),
            String::from_utf8(sync_output).unwrap()
        );
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let mut output = Vec::new();
        let result = AsyncProcessingStrategy::new(BatchConfig::default()).process(
            Path::new("nonexistent.csv"),
            &run(),
            &mut output,
        );
        assert!(matches!(result, Err(PricingError::FileNotFound { .. })));
    }

    #[rstest]
    #[case::zero_batch_size(0, 4, 1000, 4)]
    #[case::zero_max_concurrent(10, 0, 10, num_cpus::get())]
    fn test_batch_config_zero_values_fall_back(
        #[case] batch_size: usize,
        #[case] max_concurrent: usize,
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let config = BatchConfig::new(batch_size, max_concurrent);
        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
    }
}
