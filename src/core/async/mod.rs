//! Concurrent implementations of core components
//!
//! - **SharedInvoiceCounter**: per-merchant, per-day invoice counts in a DashMap
//! - **BatchProcessor**: prices batches of already-numbered orders on tokio tasks
//!
//! # Thread Safety
//!
//! Pricing is a pure function of its inputs, so tasks only share read-only
//! state (`Arc<Checkout>`, `Arc<DiscountBook>`). The invoice counter is the
//! one piece of shared mutable state and locks per merchant/day key.

pub mod batch_processor;
pub mod invoice_counter;

pub use batch_processor::{BatchProcessor, PendingOrder, ProcessingResult};
pub use invoice_counter::SharedInvoiceCounter;
