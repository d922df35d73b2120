//! Computed totals for a cart
//!
//! A [`Breakdown`] is produced fresh on every recalculation and is the single
//! source for the cart summary, the receipt and the ledger record. It keeps
//! full decimal precision; rounding happens only when rendering or persisting
//! (see [`Breakdown::rounded`], which [`crate::types::LedgerRecord`] persists).

use super::ledger::BillNumber;
use super::line_item::{PriceType, ProductRef, TaxRates};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places used when money leaves the engine
pub const MONEY_DP: u32 = 2;

/// Round a monetary amount for display or persistence
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Tax amounts split by GST component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaxTotals {
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
}

impl TaxTotals {
    pub const ZERO: TaxTotals = TaxTotals {
        cgst: Decimal::ZERO,
        sgst: Decimal::ZERO,
        igst: Decimal::ZERO,
    };

    pub fn total(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }

    /// Round each component so that the rounded components sum to the
    /// rounded total
    ///
    /// Any leftover cent goes to the component with the largest unrounded
    /// amount, SGST on a CGST/SGST tie.
    pub fn rounded(&self) -> TaxTotals {
        let mut rounded = TaxTotals {
            cgst: round_money(self.cgst),
            sgst: round_money(self.sgst),
            igst: round_money(self.igst),
        };
        let residual = round_money(self.total()) - rounded.total();
        if residual.is_zero() {
            return rounded;
        }

        if self.igst > self.cgst && self.igst > self.sgst {
            rounded.igst += residual;
        } else if self.sgst >= self.cgst {
            rounded.sgst += residual;
        } else {
            rounded.cgst += residual;
        }
        rounded
    }
}

impl std::ops::Add for TaxTotals {
    type Output = TaxTotals;

    fn add(self, rhs: TaxTotals) -> TaxTotals {
        TaxTotals {
            cgst: self.cgst + rhs.cgst,
            sgst: self.sgst + rhs.sgst,
            igst: self.igst + rhs.igst,
        }
    }
}

/// Per-line result of tax resolution, discounting and normalization
#[derive(Debug, Clone, PartialEq)]
pub struct LineBreakdown {
    pub product_ref: ProductRef,
    pub quantity: Decimal,
    pub price_type: PriceType,

    /// Price as entered in the catalog
    pub catalog_price: Decimal,

    /// Unit selling price after the active product discount, before
    /// normalization
    pub effective_price: Decimal,

    /// Tax-exclusive unit price; every line total is computed from this
    pub base_price: Decimal,

    /// Unit price shown to the customer
    pub display_price: Decimal,

    /// Rates after trade-type resolution
    pub rates: TaxRates,

    /// `base_price × quantity`
    pub line_base: Decimal,

    /// Tax on this line; figures are analytics-only in MRP mode
    pub tax: TaxTotals,

    /// Saving from the product discount, `(catalog − effective) × quantity`
    pub product_discount: Decimal,
}

/// Totals for one cart
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub lines: Vec<LineBreakdown>,

    /// Sum of line bases
    pub subtotal: Decimal,

    /// Charged CGST, including its share of the additional tax
    pub cgst_total: Decimal,
    /// Charged SGST, including its share of the additional tax
    pub sgst_total: Decimal,
    /// Charged IGST, including the additional tax on inter-state sales
    pub igst_total: Decimal,

    /// Merchant surcharge portion of `tax_amount`
    pub additional_tax: Decimal,

    /// Informational; already folded into the line bases
    pub product_discount_total: Decimal,

    pub coupon_discount_amount: Decimal,
    pub loyalty_points_redeemed: u64,
    pub loyalty_discount_amount: Decimal,

    /// `cgst_total + sgst_total + igst_total`
    pub tax_amount: Decimal,

    /// Tax figures for analytics
    ///
    /// Equal to the charged totals except in MRP mode, where nothing is
    /// charged and this holds the tax embedded in the final prices.
    pub reported_tax: TaxTotals,

    pub grand_total: Decimal,

    /// Set once the checkout has sequenced an invoice
    pub bill_number: Option<BillNumber>,
}

impl Breakdown {
    /// Attach the bill number issued for this checkout
    pub fn with_bill_number(mut self, bill_number: BillNumber) -> Self {
        self.bill_number = Some(bill_number);
        self
    }

    /// Copy of the order-level figures rounded for display and persistence
    ///
    /// The rounded figures keep both order identities:
    /// `tax_amount = cgst_total + sgst_total + igst_total` and
    /// `grand_total = max(0, subtotal + tax_amount − coupon − loyalty)`.
    /// Line detail is kept at full precision.
    pub fn rounded(&self) -> Breakdown {
        let charged = TaxTotals {
            cgst: self.cgst_total,
            sgst: self.sgst_total,
            igst: self.igst_total,
        }
        .rounded();
        let subtotal = round_money(self.subtotal);
        let coupon = round_money(self.coupon_discount_amount);
        let loyalty = round_money(self.loyalty_discount_amount);
        let tax_amount = charged.total();

        Breakdown {
            lines: self.lines.clone(),
            subtotal,
            cgst_total: charged.cgst,
            sgst_total: charged.sgst,
            igst_total: charged.igst,
            additional_tax: round_money(self.additional_tax),
            product_discount_total: round_money(self.product_discount_total),
            coupon_discount_amount: coupon,
            loyalty_points_redeemed: self.loyalty_points_redeemed,
            loyalty_discount_amount: loyalty,
            tax_amount,
            reported_tax: self.reported_tax.rounded(),
            grand_total: (subtotal + tax_amount - coupon - loyalty).max(Decimal::ZERO),
            bill_number: self.bill_number.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case::half_up(Decimal::new(12345, 3), Decimal::new(1235, 2))]
    #[case::below_half(Decimal::new(12344, 3), Decimal::new(1234, 2))]
    #[case::already_two_places(Decimal::new(2124, 1), Decimal::new(2124, 1))]
    #[case::negative_midpoint(Decimal::new(-5, 3), Decimal::new(-1, 2))]
    fn test_round_money(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money(input), expected);
    }

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tax(cgst: &str, sgst: &str, igst: &str) -> TaxTotals {
        TaxTotals {
            cgst: d(cgst),
            sgst: d(sgst),
            igst: d(igst),
        }
    }

    fn breakdown(subtotal: &str, charged: TaxTotals, coupon: &str, loyalty: &str) -> Breakdown {
        let subtotal = d(subtotal);
        let coupon = d(coupon);
        let loyalty = d(loyalty);
        Breakdown {
            lines: Vec::new(),
            subtotal,
            cgst_total: charged.cgst,
            sgst_total: charged.sgst,
            igst_total: charged.igst,
            additional_tax: Decimal::ZERO,
            product_discount_total: Decimal::ZERO,
            coupon_discount_amount: coupon,
            loyalty_points_redeemed: 0,
            loyalty_discount_amount: loyalty,
            tax_amount: charged.total(),
            reported_tax: charged,
            grand_total: (subtotal + charged.total() - coupon - loyalty).max(Decimal::ZERO),
            bill_number: None,
        }
    }

    #[test]
    fn test_tax_totals_add() {
        let a = tax("9", "9", "0");
        let b = TaxTotals::ZERO + a + a;
        assert_eq!(b.cgst, d("18"));
        assert_eq!(b.total(), d("36"));
    }

    #[rstest]
    #[case::no_residual(tax("18", "18", "0"), tax("18", "18", "0"))]
    #[case::cent_up_to_later_tie(tax("1.1025", "1.1025", "0"), tax("1.10", "1.11", "0"))]
    #[case::cent_down_to_later_tie(tax("5.357142", "5.357142", "0"), tax("5.36", "5.35", "0"))]
    #[case::igst_only(tax("0", "0", "2.205"), tax("0", "0", "2.21"))]
    #[case::sub_cent_components(tax("0.004", "0.004", "0"), tax("0", "0.01", "0"))]
    fn test_tax_totals_rounded_reconciles(#[case] input: TaxTotals, #[case] expected: TaxTotals) {
        let rounded = input.rounded();
        assert_eq!(rounded, expected);
        assert_eq!(rounded.total(), round_money(input.total()));
    }

    #[rstest]
    #[case::exclusive_half_cent(breakdown("12.25", tax("1.1025", "1.1025", "0"), "0", "0"), "14.46")]
    #[case::inclusive_split(breakdown("89.285714", tax("5.357143", "5.357143", "0"), "0", "0"), "100.00")]
    #[case::with_coupon_and_loyalty(breakdown("10.005", tax("0.9005", "0.9005", "0"), "1.1805", "2"), "8.63")]
    #[case::clamped(breakdown("5", tax("0", "0", "0"), "5", "0.004"), "0")]
    fn test_rounded_breakdown_keeps_identities(#[case] breakdown: Breakdown, #[case] expected: &str) {
        let rounded = breakdown.rounded();

        assert_eq!(
            rounded.cgst_total + rounded.sgst_total + rounded.igst_total,
            rounded.tax_amount
        );
        assert_eq!(
            (rounded.subtotal + rounded.tax_amount
                - rounded.coupon_discount_amount
                - rounded.loyalty_discount_amount)
                .max(Decimal::ZERO),
            rounded.grand_total
        );
        assert_eq!(rounded.grand_total, d(expected));
        assert_eq!(rounded, rounded.rounded());
    }
}
