//! Invoice identity and the persisted ledger record

use super::breakdown::Breakdown;
use super::line_item::OrderId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Merchant identifier used to scope invoice numbering
pub type MerchantId = String;

/// Human-readable bill number in `DDMMYY-NN` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillNumber(String);

impl BillNumber {
    /// Wrap an already formatted bill number
    pub fn new(value: impl Into<String>) -> Self {
        BillNumber(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BillNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Invoice fields written to the ledger
///
/// Amounts come from [`Breakdown::rounded`], so `tax_amount` is the sum of the
/// GST columns and `total_amount` follows from the other rounded columns.
/// `discount_amount` carries the coupon discount only; the loyalty discount
/// has its own column and is reflected in `total_amount`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    pub order: OrderId,
    pub bill_number: Option<BillNumber>,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub loyalty_points_redeemed: u64,
    pub loyalty_discount_amount: Decimal,
    pub total_amount: Decimal,
}

impl LedgerRecord {
    /// Build the persisted record for an order from its breakdown
    pub fn from_breakdown(order: impl Into<OrderId>, breakdown: &Breakdown) -> Self {
        let rounded = breakdown.rounded();
        LedgerRecord {
            order: order.into(),
            bill_number: rounded.bill_number,
            subtotal: rounded.subtotal,
            cgst: rounded.cgst_total,
            sgst: rounded.sgst_total,
            igst: rounded.igst_total,
            tax_amount: rounded.tax_amount,
            discount_amount: rounded.coupon_discount_amount,
            loyalty_points_redeemed: rounded.loyalty_points_redeemed,
            loyalty_discount_amount: rounded.loyalty_discount_amount,
            total_amount: rounded.grand_total,
        }
    }
}
