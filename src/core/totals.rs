//! Totals aggregation
//!
//! `(cart, settings, promotions, now) → Breakdown`, as a pure function.
//!
//! Per line: resolve tax, apply the active product discount, normalize the
//! discounted price, then compute the line base and line tax. Across lines:
//! sum bases into the subtotal and taxes per component, then run the
//! order-level discount stack.
//!
//! The tax mode decides what happens to line tax:
//!
//! - **Exclusive / inclusive split**: line tax is charged; the coupon applies
//!   to `subtotal + tax`
//! - **Inclusive MRP**: nothing is charged; the tax embedded in the MRP is
//!   reported in [`Breakdown::reported_tax`] and the coupon applies to the
//!   plain subtotal
//!
//! No intermediate value is rounded, so recomputing from the same inputs
//! always yields an identical breakdown.

use crate::core::discount_stacker::{
    additional_tax, apply_product_discount, coupon_amount, redeem_loyalty,
};
use crate::core::price_normalizer::{embedded_tax, normalize};
use crate::core::tax_resolver;
use crate::types::{
    Breakdown, LineBreakdown, LineItem, PricingSettings, PromotionContext, TaxMode, TaxTotals,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Compute the full breakdown for a cart
///
/// # Arguments
///
/// * `items` - Cart lines; quantities are assumed positive (checked by [`crate::core::Cart`])
/// * `settings` - Merchant tax regime and overrides
/// * `promotions` - Product discounts, coupon and loyalty redemption
/// * `now` - Wall clock used to evaluate product discount windows
///
/// # Returns
///
/// A fully populated, non-negative breakdown without a bill number
pub fn compute_breakdown(
    items: &[LineItem],
    settings: &PricingSettings,
    promotions: &PromotionContext<'_>,
    now: DateTime<Utc>,
) -> Breakdown {
    let mode = settings.tax.mode;

    let lines: Vec<LineBreakdown> = items
        .iter()
        .map(|item| price_line(item, settings, promotions, now))
        .collect();

    let subtotal: Decimal = lines.iter().map(|l| l.line_base).sum();
    let product_discount_total: Decimal = lines.iter().map(|l| l.product_discount).sum();
    let line_tax = lines
        .iter()
        .fold(TaxTotals::ZERO, |acc, line| acc + line.tax);

    // Coupon base and charged line tax depend on whether tax reaches the total
    let (charged_line_tax, coupon_base) = match mode {
        TaxMode::Exclusive | TaxMode::InclusiveSplit => (line_tax, subtotal + line_tax.total()),
        TaxMode::InclusiveMrp => (TaxTotals::ZERO, subtotal),
    };

    let coupon_discount_amount = coupon_amount(promotions.coupon.as_ref(), coupon_base);
    let post_coupon = coupon_base - coupon_discount_amount;

    let surcharge = if mode.charges_tax() {
        additional_tax(
            settings.additional_tax_rate,
            post_coupon,
            settings.tax.trade_type,
        )
    } else {
        TaxTotals::ZERO
    };
    let payable_before_loyalty = post_coupon + surcharge.total();

    let redemption = redeem_loyalty(
        promotions.loyalty.as_ref(),
        payable_before_loyalty,
        settings.min_points_to_redeem,
    );

    let charged = charged_line_tax + surcharge;
    let tax_amount = charged.total();
    let reported_tax = match mode {
        TaxMode::InclusiveMrp => line_tax,
        TaxMode::Exclusive | TaxMode::InclusiveSplit => charged,
    };

    let grand_total = (subtotal + tax_amount - coupon_discount_amount - redemption.amount)
        .max(Decimal::ZERO);

    Breakdown {
        lines,
        subtotal,
        cgst_total: charged.cgst,
        sgst_total: charged.sgst,
        igst_total: charged.igst,
        additional_tax: surcharge.total(),
        product_discount_total,
        coupon_discount_amount,
        loyalty_points_redeemed: redemption.points,
        loyalty_discount_amount: redemption.amount,
        tax_amount,
        reported_tax,
        grand_total,
        bill_number: None,
    }
}

/// Resolve, discount and normalize a single line
fn price_line(
    item: &LineItem,
    settings: &PricingSettings,
    promotions: &PromotionContext<'_>,
    now: DateTime<Utc>,
) -> LineBreakdown {
    let rates = tax_resolver::resolve(item, settings.tax.trade_type, settings.igst_override);
    let rate = rates.total();

    let effective_price = apply_product_discount(
        item.catalog_price,
        promotions.product_discounts.get(&item.product_ref),
        now,
    );
    let normalized = normalize(effective_price, rate, settings.tax.mode);
    let line_base = normalized.base * item.quantity;

    let tax = match settings.tax.mode {
        TaxMode::Exclusive | TaxMode::InclusiveSplit => TaxTotals {
            cgst: line_base * rates.cgst / Decimal::ONE_HUNDRED,
            sgst: line_base * rates.sgst / Decimal::ONE_HUNDRED,
            igst: line_base * rates.igst / Decimal::ONE_HUNDRED,
        },
        TaxMode::InclusiveMrp => TaxTotals {
            cgst: embedded_tax(line_base, rates.cgst, rate),
            sgst: embedded_tax(line_base, rates.sgst, rate),
            igst: embedded_tax(line_base, rates.igst, rate),
        },
    };

    LineBreakdown {
        product_ref: item.product_ref.clone(),
        quantity: item.quantity,
        price_type: item.price_type,
        catalog_price: item.catalog_price,
        effective_price,
        base_price: normalized.base,
        display_price: normalized.display,
        rates,
        line_base,
        tax,
        product_discount: (item.catalog_price - effective_price) * item.quantity,
    }
}
