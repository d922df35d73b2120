//! In-memory invoice counter
//!
//! Keeps, per merchant and business day, the number of invoices issued so
//! far. Stands in for the count query against the hosted invoice table.

use crate::core::traits::InvoiceCounter;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Issued-invoice counts keyed by merchant and day
#[derive(Debug, Default)]
pub struct InvoiceLedger {
    counts: HashMap<(String, NaiveDate), u32>,
}

impl InvoiceLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        InvoiceLedger {
            counts: HashMap::new(),
        }
    }

    /// Seed the count for a merchant's day, e.g. from invoices already stored
    pub fn with_count(mut self, merchant: &str, day: NaiveDate, count: u32) -> Self {
        self.counts.insert((merchant.to_string(), day), count);
        self
    }
}

impl InvoiceCounter for InvoiceLedger {
    fn issued_on(&self, merchant: &str, day: NaiveDate) -> u32 {
        self.counts
            .get(&(merchant.to_string(), day))
            .copied()
            .unwrap_or(0)
    }

    fn record_issued(&mut self, merchant: &str, day: NaiveDate) -> u32 {
        let count = self.counts.entry((merchant.to_string(), day)).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_start_at_zero() {
        let ledger = InvoiceLedger::new();
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(ledger.issued_on("M1", day), 0);
    }

    #[test]
    fn test_record_increments_only_that_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let next = day.succ_opt().unwrap();
        let mut ledger = InvoiceLedger::new().with_count("M1", day, 4);

        assert_eq!(ledger.record_issued("M1", day), 5);
        assert_eq!(ledger.issued_on("M1", day), 5);
        assert_eq!(ledger.issued_on("M1", next), 0);
        assert_eq!(ledger.issued_on("M2", day), 0);
    }
}
