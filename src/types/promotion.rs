//! Promotion records consumed by the discount stacker
//!
//! The engine never manages the lifecycle of these records; it receives
//! whatever the caller fetched. A failed upstream read is represented by the
//! absence of a promotion, never by an error.

use super::line_item::ProductRef;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Whether a discount value is a percentage or a currency amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    Percentage,
    Fixed,
}

impl FromStr for DiscountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "percentage" | "percent" | "%" => Ok(DiscountKind::Percentage),
            "fixed" | "flat" | "amount" => Ok(DiscountKind::Fixed),
            other => Err(format!("unknown discount kind '{}'", other)),
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountKind::Percentage => write!(f, "percentage"),
            DiscountKind::Fixed => write!(f, "fixed"),
        }
    }
}

/// Time-windowed discount attached to a single product
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDiscount {
    /// First instant the discount applies (inclusive)
    pub start_at: DateTime<Utc>,
    /// Last instant the discount applies (inclusive)
    pub end_at: DateTime<Utc>,
    pub kind: DiscountKind,
    pub value: Decimal,
}

impl ProductDiscount {
    /// Returns true if `start_at <= now <= end_at`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start_at <= now && now <= self.end_at
    }
}

/// Product discounts keyed by product, at most one per product
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscountBook {
    discounts: HashMap<ProductRef, ProductDiscount>,
}

impl DiscountBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the discount for a product, replacing any previous one
    ///
    /// # Returns
    ///
    /// The discount that was replaced, if any
    pub fn insert(
        &mut self,
        product: impl Into<ProductRef>,
        discount: ProductDiscount,
    ) -> Option<ProductDiscount> {
        self.discounts.insert(product.into(), discount)
    }

    /// The discount configured for `product`, active or not
    pub fn get(&self, product: &str) -> Option<&ProductDiscount> {
        self.discounts.get(product)
    }

    /// The discount for `product` if its window contains `now`
    pub fn active_for(&self, product: &str, now: DateTime<Utc>) -> Option<&ProductDiscount> {
        self.get(product).filter(|d| d.is_active(now))
    }

    pub fn len(&self) -> usize {
        self.discounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discounts.is_empty()
    }
}

/// Order-level coupon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub kind: DiscountKind,
    pub value: Decimal,
}

impl Coupon {
    pub fn percentage(value: Decimal) -> Self {
        Coupon {
            kind: DiscountKind::Percentage,
            value,
        }
    }

    pub fn fixed(value: Decimal) -> Self {
        Coupon {
            kind: DiscountKind::Fixed,
            value,
        }
    }
}

/// Loyalty points the customer wants to convert into a discount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyRedemption {
    /// Points asked for at the counter
    pub points_requested: u64,
    /// Customer's current balance
    pub points_available: u64,
    /// Currency value of a single point
    pub rupees_per_point: Decimal,
}

/// Order-scoped promotions: coupon and loyalty redemption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderPromotion {
    pub coupon: Option<Coupon>,
    pub loyalty: Option<LoyaltyRedemption>,
}

/// The three stackable adjustments for one recalculation
#[derive(Debug, Clone, Copy)]
pub struct PromotionContext<'a> {
    /// Per-product, time-windowed discounts
    pub product_discounts: &'a DiscountBook,
    pub coupon: Option<Coupon>,
    pub loyalty: Option<LoyaltyRedemption>,
}

impl<'a> PromotionContext<'a> {
    /// Context with product discounts only
    pub fn new(product_discounts: &'a DiscountBook) -> Self {
        PromotionContext {
            product_discounts,
            coupon: None,
            loyalty: None,
        }
    }

    /// Context combining a discount book with an order's coupon and loyalty
    pub fn for_order(product_discounts: &'a DiscountBook, order: &OrderPromotion) -> Self {
        PromotionContext {
            product_discounts,
            coupon: order.coupon,
            loyalty: order.loyalty,
        }
    }

    pub fn with_coupon(mut self, coupon: Coupon) -> Self {
        self.coupon = Some(coupon);
        self
    }

    pub fn with_loyalty(mut self, loyalty: LoyaltyRedemption) -> Self {
        self.loyalty = Some(loyalty);
        self
    }
}
