//! Discount stacking
//!
//! Adjustments are applied in a fixed order and each step works on the
//! result of the previous one:
//!
//! 1. product discount, on the unit selling price before normalization
//! 2. coupon, once, on the order amount
//! 3. additional tax (merchant surcharge), on the post-coupon amount
//! 4. loyalty redemption, on the post-coupon amount
//!
//! Reordering the steps changes the result. Every step clamps silently so
//! the running amount never goes below zero.

use crate::types::{
    Coupon, DiscountKind, LoyaltyRedemption, ProductDiscount, TaxTotals, TradeType,
};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Outcome of a loyalty redemption after clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Redemption {
    pub points: u64,
    pub amount: Decimal,
}

/// Apply a product discount to a unit price
///
/// An absent discount, or one whose window does not contain `now`, leaves
/// the price untouched.
pub fn apply_product_discount(
    price: Decimal,
    discount: Option<&ProductDiscount>,
    now: DateTime<Utc>,
) -> Decimal {
    let Some(discount) = discount.filter(|d| d.is_active(now)) else {
        return price;
    };

    let discounted = match discount.kind {
        DiscountKind::Percentage => {
            price * (Decimal::ONE - discount.value / Decimal::ONE_HUNDRED)
        }
        DiscountKind::Fixed => price - discount.value,
    };

    discounted.max(Decimal::ZERO)
}

/// Monetary effect of a coupon on `base`
///
/// Clamped to `[0, base]`.
pub fn coupon_amount(coupon: Option<&Coupon>, base: Decimal) -> Decimal {
    let Some(coupon) = coupon else {
        return Decimal::ZERO;
    };
    if coupon.value <= Decimal::ZERO || base <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let amount = match coupon.kind {
        DiscountKind::Percentage => base * coupon.value / Decimal::ONE_HUNDRED,
        DiscountKind::Fixed => coupon.value,
    };

    amount.min(base)
}

/// Merchant surcharge on the post-coupon amount, split by trade type
///
/// Intra-state sales split the surcharge evenly across CGST and SGST;
/// inter-state sales put all of it on IGST.
pub fn additional_tax(
    rate: Option<Decimal>,
    post_coupon: Decimal,
    trade_type: TradeType,
) -> TaxTotals {
    let rate = match rate {
        Some(rate) if rate > Decimal::ZERO => rate,
        _ => return TaxTotals::ZERO,
    };
    if post_coupon <= Decimal::ZERO {
        return TaxTotals::ZERO;
    }

    let surcharge = post_coupon * rate / Decimal::ONE_HUNDRED;
    match trade_type {
        TradeType::IntraState => {
            let half = surcharge / Decimal::TWO;
            TaxTotals {
                cgst: half,
                sgst: surcharge - half,
                igst: Decimal::ZERO,
            }
        }
        TradeType::InterState => TaxTotals {
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            igst: surcharge,
        },
    }
}

/// Clamp and value a loyalty redemption against the amount still payable
///
/// Redeemed points are `min(requested, available, ⌊amount / rupees_per_point⌋)`.
/// Nothing is redeemed when the balance is below `min_points_to_redeem` or the
/// point value is not positive.
pub fn redeem_loyalty(
    loyalty: Option<&LoyaltyRedemption>,
    amount: Decimal,
    min_points_to_redeem: u64,
) -> Redemption {
    let Some(loyalty) = loyalty else {
        return Redemption::default();
    };
    if loyalty.points_available < min_points_to_redeem
        || loyalty.rupees_per_point <= Decimal::ZERO
        || amount <= Decimal::ZERO
    {
        return Redemption::default();
    }

    // A quotient past Decimal or u64 range saturates
    let absorbable = amount
        .checked_div(loyalty.rupees_per_point)
        .map(|points| points.floor())
        .and_then(|points| points.to_u64())
        .unwrap_or(u64::MAX);

    let points = loyalty
        .points_requested
        .min(loyalty.points_available)
        .min(absorbable);

    Redemption {
        points,
        amount: Decimal::from(points) * loyalty.rupees_per_point,
    }
}
