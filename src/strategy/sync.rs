//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Cart validation to `Cart` via the order book
//! - Numbering and pricing to `Checkout` with an `InvoiceLedger`
//! - CSV output to `csv_format::write_ledger_csv`
//!
//! Rows of one order may be interleaved with other orders, so the whole cart
//! file is grouped before the first order is priced.

use crate::core::InvoiceLedger;
use crate::io::csv_format::write_ledger_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{OrderBook, PricingRun, ProcessingStrategy};
use crate::types::{LedgerRecord, PricingError, PromotionContext};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        run: &PricingRun,
        output: &mut dyn Write,
    ) -> Result<(), PricingError> {
        let mut reader = SyncReader::new(input_path)?;
        let mut orders = OrderBook::new();

        while let Some(row) = reader.next() {
            match row {
                Ok((order, item)) => orders.add(order, item, &run.stock),
                Err(e) => tracing::warn!(line = reader.line(), error = %e, "skipping cart row"),
            }
        }

        let checkout = &run.checkout;
        let mut invoices = InvoiceLedger::new().with_count(
            &checkout.merchant,
            checkout.business_date,
            run.issued_today,
        );

        let records: Vec<LedgerRecord> = orders
            .into_orders()
            .into_iter()
            .map(|(order, cart)| {
                let promotion = run.promotion_for(&order);
                let promotions = PromotionContext::for_order(&run.discounts, &promotion);
                checkout
                    .price_order(&order, cart.items(), &promotions, &mut invoices)
                    .record
            })
            .collect();

        write_ledger_csv(&records, output)?;

        tracing::info!(orders = records.len(), strategy = "sync", "priced orders");
        Ok(())
    }
}
