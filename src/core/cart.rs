//! Cart management
//!
//! The cart owns the line items for one checkout and guards the invariants
//! the totals aggregator relies on but does not check:
//! - every quantity is strictly positive
//! - prices and tax rates are non-negative
//! - the quantity reserved for a product never exceeds its available stock
//!
//! Violations are rejected at mutation time and leave the cart unchanged.

use crate::core::traits::StockLevels;
use crate::types::{LineItem, PricingError};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Stock source that never limits reservations
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl StockLevels for Unlimited {
    fn available(&self, _product: &str) -> Option<Decimal> {
        None
    }
}

/// Stock snapshot keyed by product
///
/// Products missing from the table are treated as untracked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockTable {
    levels: HashMap<String, Decimal>,
}

impl StockTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, product: impl Into<String>, available: Decimal) {
        self.levels.insert(product.into(), available);
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl StockLevels for StockTable {
    fn available(&self, product: &str) -> Option<Decimal> {
        self.levels.get(product).copied()
    }
}

/// Mutable collection of line items for one checkout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Add a product to the cart
    ///
    /// Adding a product that is already in the cart increases its quantity;
    /// the price and rates of the existing line are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The quantity is zero or negative
    /// - The price or a tax rate is negative
    /// - The combined quantity would exceed available stock
    pub fn add_item<S>(&mut self, item: LineItem, stock: &S) -> Result<(), PricingError>
    where
        S: StockLevels + ?Sized,
    {
        validate_line(&item)?;

        let existing = self.position(&item.product_ref);
        let reserved = existing
            .map(|idx| self.items[idx].quantity)
            .unwrap_or(Decimal::ZERO);
        check_stock(stock, &item.product_ref, reserved + item.quantity)?;

        match existing {
            Some(idx) => self.items[idx].quantity += item.quantity,
            None => self.items.push(item),
        }
        Ok(())
    }

    /// Replace the quantity of a product already in the cart
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not in the cart, the quantity is
    /// not positive, or the quantity exceeds available stock.
    pub fn update_quantity<S>(
        &mut self,
        product: &str,
        quantity: Decimal,
        stock: &S,
    ) -> Result<(), PricingError>
    where
        S: StockLevels + ?Sized,
    {
        let idx = self
            .position(product)
            .ok_or_else(|| PricingError::item_not_in_cart(product))?;

        if quantity <= Decimal::ZERO {
            return Err(PricingError::invalid_quantity(product, quantity));
        }
        check_stock(stock, product, quantity)?;

        self.items[idx].quantity = quantity;
        Ok(())
    }

    /// Remove a product from the cart
    ///
    /// # Returns
    ///
    /// The removed line
    pub fn remove_item(&mut self, product: &str) -> Result<LineItem, PricingError> {
        let idx = self
            .position(product)
            .ok_or_else(|| PricingError::item_not_in_cart(product))?;
        Ok(self.items.remove(idx))
    }

    /// Drop every line, e.g. after checkout
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in insertion order
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, product: &str) -> Option<usize> {
        self.items.iter().position(|i| i.product_ref == product)
    }
}

fn validate_line(item: &LineItem) -> Result<(), PricingError> {
    if item.quantity <= Decimal::ZERO {
        return Err(PricingError::invalid_quantity(
            &item.product_ref,
            item.quantity,
        ));
    }
    if item.catalog_price < Decimal::ZERO {
        return Err(PricingError::invalid_line_item(
            &item.product_ref,
            "negative catalog price",
        ));
    }
    if item.tax_rates.has_negative() {
        return Err(PricingError::invalid_line_item(
            &item.product_ref,
            "negative tax rate",
        ));
    }
    Ok(())
}

fn check_stock<S>(stock: &S, product: &str, requested: Decimal) -> Result<(), PricingError>
where
    S: StockLevels + ?Sized,
{
    match stock.available(product) {
        Some(available) if requested > available => Err(PricingError::insufficient_stock(
            product, available, requested,
        )),
        _ => Ok(()),
    }
}
