//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `line_item`: Cart line items and tax rate triples
//! - `settings`: Merchant tax regime and pricing settings
//! - `promotion`: Product discounts, coupons and loyalty redemptions
//! - `breakdown`: Computed totals and display rounding
//! - `ledger`: Bill numbers and the persisted invoice record
//! - `error`: Error types for the engine's edges

pub mod breakdown;
pub mod error;
pub mod ledger;
pub mod line_item;
pub mod promotion;
pub mod settings;

pub use breakdown::{round_money, Breakdown, LineBreakdown, TaxTotals};
pub use error::PricingError;
pub use ledger::{BillNumber, LedgerRecord, MerchantId};
pub use line_item::{LineItem, OrderId, PriceType, ProductRef, TaxRates};
pub use promotion::{
    Coupon, DiscountBook, DiscountKind, LoyaltyRedemption, OrderPromotion, ProductDiscount,
    PromotionContext,
};
pub use settings::{PricingSettings, TaxMode, TaxSettings, TradeType};
