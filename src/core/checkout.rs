//! Checkout orchestration
//!
//! Ties the invoice sequencer and the totals aggregator together for one
//! order: issue a bill number, compute the breakdown, embed the number and
//! derive the ledger record. Merchant identity, business date and "now" are
//! explicit fields rather than ambient state so that the same inputs always
//! price the same way.

use crate::core::invoice_sequencer::next_bill_number;
use crate::core::totals::compute_breakdown;
use crate::core::traits::InvoiceCounter;
use crate::types::{
    BillNumber, Breakdown, LedgerRecord, LineItem, MerchantId, PricingSettings, PromotionContext,
};
use chrono::{DateTime, NaiveDate, Utc};

/// Result of pricing one order
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub breakdown: Breakdown,
    pub record: LedgerRecord,
}

/// Fixed context shared by every order of a checkout session
#[derive(Debug, Clone)]
pub struct Checkout {
    pub settings: PricingSettings,
    pub merchant: MerchantId,
    /// Local business day used for invoice numbering
    pub business_date: NaiveDate,
    /// Wall clock used for discount windows
    pub now: DateTime<Utc>,
}

impl Checkout {
    pub fn new(
        settings: PricingSettings,
        merchant: impl Into<MerchantId>,
        business_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Checkout {
            settings,
            merchant: merchant.into(),
            business_date,
            now,
        }
    }

    /// Issue the next bill number and record it as issued
    pub fn issue_bill_number<C>(&self, counter: &mut C) -> BillNumber
    where
        C: InvoiceCounter + ?Sized,
    {
        let number = next_bill_number(counter, &self.merchant, self.business_date);
        counter.record_issued(&self.merchant, self.business_date);
        number
    }

    /// Compute a breakdown without issuing an invoice (live cart summary)
    pub fn preview(&self, items: &[LineItem], promotions: &PromotionContext<'_>) -> Breakdown {
        compute_breakdown(items, &self.settings, promotions, self.now)
    }

    /// Price an order under an already issued bill number
    pub fn finalize(
        &self,
        order: &str,
        items: &[LineItem],
        promotions: &PromotionContext<'_>,
        bill_number: BillNumber,
    ) -> PricedOrder {
        let breakdown = self.preview(items, promotions).with_bill_number(bill_number);
        let record = LedgerRecord::from_breakdown(order, &breakdown);

        tracing::debug!(
            order,
            bill_number = %breakdown.bill_number.as_ref().map(BillNumber::as_str).unwrap_or_default(),
            grand_total = %record.total_amount,
            "priced order"
        );

        PricedOrder { breakdown, record }
    }

    /// Issue a bill number and price the order in one step
    pub fn price_order<C>(
        &self,
        order: &str,
        items: &[LineItem],
        promotions: &PromotionContext<'_>,
        counter: &mut C,
    ) -> PricedOrder
    where
        C: InvoiceCounter + ?Sized,
    {
        let bill_number = self.issue_bill_number(counter);
        self.finalize(order, items, promotions, bill_number)
    }
}
