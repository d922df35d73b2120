//! POS Pricing & Invoice Totals Engine
//!
//! # Overview
//!
//! This library turns a cart of line items into a fully priced invoice
//! breakdown under Indian GST rules, and writes a ledger of priced orders
//! from CSV input using either a sync or an async strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (LineItem, PricingSettings, Breakdown, LedgerRecord, ...)
//! - [`config`] - Merchant configuration from `POS_*` environment variables
//! - [`cli`] - CLI arguments parsing and run assembly
//! - [`core`] - Business logic components:
//!   - [`core::tax_resolver`] - Effective CGST/SGST/IGST rates per line
//!   - [`core::price_normalizer`] - Base and display prices for each tax mode
//!   - [`core::discount_stacker`] - Product discount, coupon, surcharge and loyalty
//!   - [`core::totals`] - Per-line and order-level breakdown
//!   - [`core::invoice_sequencer`] - `DDMMYY-NN` bill numbers
//!   - [`core::cart`] and [`core::checkout`] - Cart invariants and one-order checkout
//! - [`io`] - CSV input and ledger output
//! - [`strategy`] - Sync and async end-to-end pipelines
//!
//! # Tax Modes
//!
//! - **Exclusive**: catalog price excludes tax; tax is added on top
//! - **Inclusive (split)**: catalog price includes tax; the base is backed out
//!   and tax is reported separately
//! - **Inclusive (MRP)**: catalog price is final; no tax is charged and the
//!   embedded tax is reported for analytics only
//!
//! # Adjustment Order
//!
//! Product discounts reduce the unit price before tax. The coupon applies to
//! the taxed subtotal, the merchant surcharge to the post-coupon amount, and
//! loyalty points are redeemed last. All arithmetic is exact decimal; amounts
//! are rounded to two places only in ledger records and rounded breakdowns.

pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use config::{Config, ConfigError};
pub use core::{compute_breakdown, Cart, Checkout, InvoiceLedger, PricedOrder};
pub use io::write_ledger_csv;
pub use types::{
    BillNumber, Breakdown, LedgerRecord, LineItem, PricingError, PricingSettings,
    PromotionContext, TaxMode, TaxRates, TradeType,
};
