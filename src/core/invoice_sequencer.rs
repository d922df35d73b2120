//! Invoice sequencing
//!
//! Bill numbers have the form `DDMMYY-NN`, where `NN` is one more than the
//! number of invoices the merchant has already issued since local midnight,
//! zero-padded to two digits.
//!
//! Sequencing is read-then-format: the count is read from an
//! [`InvoiceCounter`] and nothing is reserved. Two checkouts that read the
//! same count before either records its invoice get the same number. The
//! caller records issued invoices with [`InvoiceCounter::record_issued`].

use crate::core::traits::InvoiceCounter;
use crate::types::BillNumber;
use chrono::NaiveDate;

/// Format the bill number that follows `issued_today` invoices on `day`
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use pos_totals_engine::core::invoice_sequencer::bill_number;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(bill_number(day, 0).as_str(), "050324-01");
/// assert_eq!(bill_number(day, 11).as_str(), "050324-12");
/// ```
pub fn bill_number(day: NaiveDate, issued_today: u32) -> BillNumber {
    let sequence = u64::from(issued_today) + 1;
    BillNumber::new(format!("{}-{:02}", day.format("%d%m%y"), sequence))
}

/// Read the merchant's count for `day` and format the next bill number
pub fn next_bill_number<C>(counter: &C, merchant: &str, day: NaiveDate) -> BillNumber
where
    C: InvoiceCounter + ?Sized,
{
    bill_number(day, counter.issued_on(merchant, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::invoice_counter::InvoiceLedger;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case::first_of_day(day(2024, 3, 5), 0, "050324-01")]
    #[case::ninth(day(2024, 12, 31), 8, "311224-09")]
    #[case::two_digits(day(2025, 1, 9), 41, "090125-42")]
    #[case::widens_past_99(day(2025, 1, 9), 99, "090125-100")]
    fn test_bill_number_format(
        #[case] date: NaiveDate,
        #[case] issued: u32,
        #[case] expected: &str,
    ) {
        assert_eq!(bill_number(date, issued).as_str(), expected);
    }

    #[test]
    fn test_sequence_is_monotonic_per_day() {
        let mut ledger = InvoiceLedger::new();
        let today = day(2024, 3, 5);

        let mut issued = Vec::new();
        for _ in 0..3 {
            let number = next_bill_number(&ledger, "M1", today);
            ledger.record_issued("M1", today);
            issued.push(number.to_string());
        }

        assert_eq!(issued, vec!["050324-01", "050324-02", "050324-03"]);
    }

    #[test]
    fn test_sequence_restarts_each_day_and_per_merchant() {
        let mut ledger = InvoiceLedger::new();
        let monday = day(2024, 3, 4);
        let tuesday = day(2024, 3, 5);

        ledger.record_issued("M1", monday);
        ledger.record_issued("M1", monday);

        assert_eq!(next_bill_number(&ledger, "M1", monday).as_str(), "040324-03");
        assert_eq!(next_bill_number(&ledger, "M1", tuesday).as_str(), "050324-01");
        assert_eq!(next_bill_number(&ledger, "M2", monday).as_str(), "040324-01");
    }

    #[test]
    fn test_unrecorded_reads_collide() {
        // Two checkouts reading before either records get the same number
        let ledger = InvoiceLedger::new();
        let today = day(2024, 3, 5);
        let first = next_bill_number(&ledger, "M1", today);
        let second = next_bill_number(&ledger, "M1", today);
        assert_eq!(first, second);
    }
}
