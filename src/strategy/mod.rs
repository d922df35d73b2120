//! Processing strategy module for batch checkout runs
//!
//! This module defines the Strategy pattern for the complete pipeline: read
//! cart rows, group them into orders, issue bill numbers, price every order
//! and write the ledger. Different implementations (synchronous, asynchronous
//! batch) can be selected at runtime and produce identical output.

use crate::cli::StrategyType;
use crate::core::{Cart, Checkout, StockLevels, StockTable};
use crate::types::{DiscountBook, LineItem, OrderId, OrderPromotion, PricingError};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Everything a run needs besides the cart file
#[derive(Debug, Clone)]
pub struct PricingRun {
    pub checkout: Arc<Checkout>,
    pub promotions: HashMap<OrderId, OrderPromotion>,
    pub discounts: Arc<DiscountBook>,
    pub stock: StockTable,
    /// Invoices the merchant had already issued on the business date
    pub issued_today: u32,
}

impl PricingRun {
    /// Run with no promotions, discounts, stock limits or prior invoices
    pub fn new(checkout: Checkout) -> Self {
        PricingRun {
            checkout: Arc::new(checkout),
            promotions: HashMap::new(),
            discounts: Arc::new(DiscountBook::new()),
            stock: StockTable::new(),
            issued_today: 0,
        }
    }

    /// Coupon and loyalty request for an order; none if it has no row
    pub fn promotion_for(&self, order: &str) -> OrderPromotion {
        self.promotions.get(order).copied().unwrap_or_default()
    }
}

/// Trait for complete processing strategies
pub trait ProcessingStrategy: Send + Sync {
    /// Price every order in `input_path` and write the ledger CSV to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be opened or the output cannot be
    /// written. Malformed rows and rejected lines are logged and skipped.
    fn process(
        &self,
        input_path: &Path,
        run: &PricingRun,
        output: &mut dyn Write,
    ) -> Result<(), PricingError>;
}

pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

/// Carts built from cart rows, remembering the order each was first seen
#[derive(Debug, Default)]
pub(crate) struct OrderBook {
    sequence: Vec<OrderId>,
    carts: HashMap<OrderId, Cart>,
}

impl OrderBook {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a row to its order's cart; rejected lines are logged and dropped
    pub(crate) fn add<S>(&mut self, order: OrderId, item: LineItem, stock: &S)
    where
        S: StockLevels + ?Sized,
    {
        if !self.carts.contains_key(&order) {
            self.sequence.push(order.clone());
        }
        let product = item.product_ref.clone();
        let cart = self.carts.entry(order.clone()).or_default();
        if let Err(e) = cart.add_item(item, stock) {
            tracing::warn!(order = %order, product = %product, error = %e, "rejected cart line");
        }
    }

    /// Non-empty carts in first-seen order
    pub(crate) fn into_orders(mut self) -> Vec<(OrderId, Cart)> {
        let mut orders = Vec::with_capacity(self.sequence.len());
        for order in self.sequence {
            match self.carts.remove(&order) {
                Some(cart) if !cart.is_empty() => orders.push((order, cart)),
                _ => tracing::warn!(order = %order, "order has no valid lines, skipping"),
            }
        }
        orders
    }
}
