//! Core traits for the engine's external collaborators
//!
//! The engine reads two pieces of shared state it does not own: how many
//! invoices a merchant has issued today, and how much stock a product has.
//! Both are abstracted so the synchronous (HashMap) and concurrent (DashMap)
//! implementations can be used interchangeably.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Trait for counting issued invoices per merchant and business day
pub trait InvoiceCounter {
    /// Number of invoices the merchant has issued on `day`
    fn issued_on(&self, merchant: &str, day: NaiveDate) -> u32;

    /// Record one more issued invoice and return the new count
    fn record_issued(&mut self, merchant: &str, day: NaiveDate) -> u32;
}

/// Trait for read-only stock lookups
pub trait StockLevels {
    /// Quantity available for `product`
    ///
    /// `None` means the product's stock is not tracked and any quantity may
    /// be reserved.
    fn available(&self, product: &str) -> Option<Decimal>;
}
