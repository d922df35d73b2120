//! Line item types for the POS Totals Engine
//!
//! This module defines the cart line item, its tax rate triple and the
//! pricing unit (fixed per piece or per unit of weight).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog product identifier
///
/// Opaque key owned by the catalog; the engine only compares it.
pub type ProductRef = String;

/// Order (checkout) identifier used to group line items in batch input
pub type OrderId = String;

/// How a line's quantity is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    /// Quantity is a unit count and the catalog price is per piece
    #[default]
    Fixed,

    /// Quantity is a weight and the catalog price is per unit of weight
    Weight,
}

/// GST percentages attached to a line
///
/// Only one side is meaningful per transaction: either the CGST + SGST pair
/// (intra-state) or IGST (inter-state). The [`crate::core::tax_resolver`]
/// decides which side applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxRates {
    /// Central GST percentage
    pub cgst: Decimal,
    /// State GST percentage
    pub sgst: Decimal,
    /// Integrated GST percentage
    pub igst: Decimal,
}

impl TaxRates {
    /// Rates with every component zero
    pub const ZERO: TaxRates = TaxRates {
        cgst: Decimal::ZERO,
        sgst: Decimal::ZERO,
        igst: Decimal::ZERO,
    };

    /// Create a rate triple
    pub fn new(cgst: Decimal, sgst: Decimal, igst: Decimal) -> Self {
        TaxRates { cgst, sgst, igst }
    }

    /// Intra-state rates with explicit CGST and SGST parts
    pub fn intra_state(cgst: Decimal, sgst: Decimal) -> Self {
        TaxRates {
            cgst,
            sgst,
            igst: Decimal::ZERO,
        }
    }

    /// Inter-state rate carried entirely by IGST
    pub fn inter_state(igst: Decimal) -> Self {
        TaxRates {
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            igst,
        }
    }

    /// Combined effective rate `cgst + sgst + igst`
    pub fn total(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }

    /// Returns true if any component is negative
    pub fn has_negative(&self) -> bool {
        self.cgst < Decimal::ZERO || self.sgst < Decimal::ZERO || self.igst < Decimal::ZERO
    }
}

/// One product inside a cart
///
/// Created when a product is added to the cart, mutated when its quantity
/// changes and dropped when removed or when the cart is cleared after checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// Catalog product key
    pub product_ref: ProductRef,

    /// Units (fixed) or weight (weight-priced); must be positive
    pub quantity: Decimal,

    /// Merchant-entered price
    ///
    /// Whether it already includes tax depends on the merchant's
    /// [`crate::types::TaxMode`].
    pub catalog_price: Decimal,

    /// Tax percentages as configured on the product
    pub tax_rates: TaxRates,

    /// Unit of `quantity`
    pub price_type: PriceType,
}

impl LineItem {
    /// Create a fixed-price line item
    pub fn new(
        product_ref: impl Into<ProductRef>,
        quantity: Decimal,
        catalog_price: Decimal,
        tax_rates: TaxRates,
    ) -> Self {
        LineItem {
            product_ref: product_ref.into(),
            quantity,
            catalog_price,
            tax_rates,
            price_type: PriceType::Fixed,
        }
    }

    /// Switch the line to weight pricing
    pub fn by_weight(mut self) -> Self {
        self.price_type = PriceType::Weight;
        self
    }
}
