//! Thread-safe invoice counter for async batch processing
//!
//! `SharedInvoiceCounter` keeps the same per-merchant, per-day counts as
//! [`crate::core::InvoiceLedger`] but in a `DashMap`, so it can be shared
//! across tokio tasks behind an `Arc`.
//!
//! # Concurrency
//!
//! Each increment is atomic per key. Sequencing a bill number is still a
//! separate read followed by a later `record_issued`, so two tasks that both
//! read before either records will format the same number. Callers that need
//! unique numbers must sequence from a single task, as
//! [`crate::strategy::AsyncProcessingStrategy`] does.

use crate::core::traits::InvoiceCounter;
use chrono::NaiveDate;
use dashmap::DashMap;

/// Concurrent issued-invoice counts keyed by merchant and day
#[derive(Debug, Default)]
pub struct SharedInvoiceCounter {
    counts: DashMap<(String, NaiveDate), u32>,
}

impl SharedInvoiceCounter {
    /// Create an empty counter
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
        }
    }

    /// Seed the count for a merchant's day, e.g. from invoices already stored
    pub fn with_count(self, merchant: &str, day: NaiveDate, count: u32) -> Self {
        self.counts.insert((merchant.to_string(), day), count);
        self
    }

    /// Number of invoices the merchant has issued on `day`
    pub fn issued_on(&self, merchant: &str, day: NaiveDate) -> u32 {
        self.counts
            .get(&(merchant.to_string(), day))
            .map(|entry| *entry.value())
            .unwrap_or(0)
    }

    /// Atomically record one more issued invoice and return the new count
    pub fn record_issued(&self, merchant: &str, day: NaiveDate) -> u32 {
        let mut entry = self.counts.entry((merchant.to_string(), day)).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }
}

impl InvoiceCounter for SharedInvoiceCounter {
    fn issued_on(&self, merchant: &str, day: NaiveDate) -> u32 {
        SharedInvoiceCounter::issued_on(self, merchant, day)
    }

    fn record_issued(&mut self, merchant: &str, day: NaiveDate) -> u32 {
        SharedInvoiceCounter::record_issued(self, merchant, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_record_and_read() {
        let counter = SharedInvoiceCounter::new();
        assert_eq!(counter.issued_on("M1", day()), 0);
        assert_eq!(counter.record_issued("M1", day()), 1);
        assert_eq!(counter.record_issued("M1", day()), 2);
        assert_eq!(counter.issued_on("M1", day()), 2);
        assert_eq!(counter.issued_on("M2", day()), 0);
    }

    #[test]
    fn test_seeded_count() {
        let counter = SharedInvoiceCounter::new().with_count("M1", day(), 99);
        assert_eq!(counter.record_issued("M1", day()), 100);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let counter = Arc::new(SharedInvoiceCounter::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..25 {
                        counter.record_issued("M1", day());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.issued_on("M1", day()), 200);
    }
}
