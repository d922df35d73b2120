//! Concurrent pricing of order batches
//!
//! This module provides the `BatchProcessor` struct, which prices a batch of
//! independent orders on tokio tasks.
//!
//! # Design
//!
//! Orders share no mutable state once their bill numbers are issued, so a
//! batch is split into contiguous partitions and each partition is priced on
//! its own task. Every order carries its input position; results are sorted
//! by it, so output order never depends on task scheduling.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<Checkout>      (settings, merchant, business date, now)
//!     ├── Arc<DiscountBook>  (product discounts, read-only)
//!     └── partitions         (maximum tasks per batch)
//! ```

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::core::checkout::{Checkout, PricedOrder};
use crate::types::{
    BillNumber, DiscountBook, LineItem, OrderId, OrderPromotion, PricingError, PromotionContext,
};

/// An order whose bill number has already been sequenced
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOrder {
    /// Position of the order in the input, used to restore ordering
    pub position: usize,
    pub order: OrderId,
    pub items: Vec<LineItem>,
    pub promotion: OrderPromotion,
    pub bill_number: BillNumber,
}

/// Priced order tagged with its input position
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    pub position: usize,
    pub priced: PricedOrder,
}

/// Prices batches of orders across tokio tasks
///
/// Cloning is cheap: the checkout context and discount book are shared.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    checkout: Arc<Checkout>,
    discounts: Arc<DiscountBook>,
    partitions: usize,
}

impl BatchProcessor {
    /// Create a processor that spreads each batch over at most `partitions` tasks
    pub fn new(checkout: Arc<Checkout>, discounts: Arc<DiscountBook>, partitions: usize) -> Self {
        Self {
            checkout,
            discounts,
            partitions: partitions.max(1),
        }
    }

    /// Split a batch into at most `partitions` contiguous, non-empty chunks
    pub fn partition(&self, batch: Vec<PendingOrder>) -> Vec<Vec<PendingOrder>> {
        if batch.is_empty() {
            return Vec::new();
        }

        let chunk_size = batch.len().div_ceil(self.partitions);
        let mut chunks = Vec::with_capacity(self.partitions);
        let mut current = Vec::with_capacity(chunk_size);

        for order in batch {
            current.push(order);
            if current.len() == chunk_size {
                chunks.push(std::mem::replace(
                    &mut current,
                    Vec::with_capacity(chunk_size),
                ));
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    /// Price a chunk of orders sequentially
    pub fn price_orders(&self, orders: Vec<PendingOrder>) -> Vec<ProcessingResult> {
        orders
            .into_iter()
            .map(|pending| {
                let promotions = PromotionContext::for_order(&self.discounts, &pending.promotion);
                let priced = self.checkout.finalize(
                    &pending.order,
                    &pending.items,
                    &promotions,
                    pending.bill_number,
                );
                ProcessingResult {
                    position: pending.position,
                    priced,
                }
            })
            .collect()
    }

    /// Price a batch concurrently
    ///
    /// # Returns
    ///
    /// Results sorted by input position.
    ///
    /// # Errors
    ///
    /// Returns `TaskFailed` if any partition's task panicked.
    pub async fn process_batch(
        &self,
        batch: Vec<PendingOrder>,
    ) -> Result<Vec<ProcessingResult>, PricingError> {
        let tasks = self
            .partition(batch)
            .into_iter()
            .map(|chunk| {
                let processor = self.clone();
                tokio::spawn(async move { processor.price_orders(chunk) })
            })
            .collect();

        join_partitions(tasks).await
    }
}

async fn join_partitions(
    tasks: Vec<JoinHandle<Vec<ProcessingResult>>>,
) -> Result<Vec<ProcessingResult>, PricingError> {
    let mut results = Vec::new();
    for task in tasks {
        match task.await {
            Ok(chunk_results) => results.extend(chunk_results),
            Err(e) => {
                tracing::error!(error = %e, "pricing task failed");
                return Err(PricingError::TaskFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    results.sort_by_key(|r| r.position);
    Ok(results)
}
