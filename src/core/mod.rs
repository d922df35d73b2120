//! Core pricing logic
//!
//! This module contains the pricing pipeline and its collaborators:
//! - `tax_resolver`: Effective CGST/SGST/IGST rates for a line
//! - `price_normalizer`: Base and display prices under each tax mode
//! - `discount_stacker`: Product discounts, coupons, surcharge and loyalty
//! - `totals`: Per-line and order-level breakdown
//! - `invoice_sequencer`: Daily bill numbers
//! - `invoice_counter`: In-memory issued-invoice counts
//! - `cart`: Line item management with stock checks
//! - `checkout`: Bill number issuance plus pricing for one order
//! - `traits`: Abstractions over invoice counts and stock levels
//! - `async`: Concurrent counter and batch pricing

pub mod r#async;
pub mod cart;
pub mod checkout;
pub mod discount_stacker;
pub mod invoice_counter;
pub mod invoice_sequencer;
pub mod price_normalizer;
pub mod tax_resolver;
pub mod totals;
pub mod traits;

pub use cart::{Cart, StockTable, Unlimited};
pub use checkout::{Checkout, PricedOrder};
pub use invoice_counter::InvoiceLedger;
pub use invoice_sequencer::{bill_number, next_bill_number};
pub use totals::compute_breakdown;
pub use traits::{InvoiceCounter, StockLevels};
