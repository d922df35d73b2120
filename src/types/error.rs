//! Error types for the POS Totals Engine
//!
//! The totals computation itself never fails: degenerate inputs are clamped
//! to a defined, non-negative breakdown. Errors exist only at the edges.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed rows, invalid numbers or enums
//! - **Cart Errors**: Non-positive quantity, negative price or rate, insufficient stock
//! - **Configuration Errors**: Invalid environment or CLI settings
//! - **Task Errors**: A concurrent pricing task did not complete

use crate::config::ConfigError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the totals engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// File not found at the specified path
    ///
    /// Fatal: processing cannot start.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the malformed row is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A row parsed as CSV but holds a value the engine cannot use
    #[error("Invalid {field} '{value}'{}", context.as_ref().map(|c| format!(" for {}", c)).unwrap_or_default())]
    InvalidRecord {
        /// Column name
        field: String,
        /// Offending raw value
        value: String,
        /// Order or product the row belongs to
        context: Option<String>,
    },

    /// Quantity must be strictly positive
    #[error("Invalid quantity {quantity} for product {product}")]
    InvalidQuantity {
        product: String,
        quantity: Decimal,
    },

    /// Negative catalog price or tax rate
    #[error("Invalid line item for product {product}: {reason}")]
    InvalidLineItem { product: String, reason: String },

    /// Reservation would exceed available stock
    #[error("Insufficient stock for product {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: Decimal,
        requested: Decimal,
    },

    /// Quantity update or removal for a product that is not in the cart
    #[error("Product {product} is not in the cart")]
    ItemNotInCart { product: String },

    /// A concurrent pricing task panicked or was cancelled
    ///
    /// Fatal: the ledger would be missing the task's orders.
    #[error("Pricing task failed: {message}")]
    TaskFailed { message: String },

    /// Invalid configuration value
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<std::io::Error> for PricingError {
    fn from(error: std::io::Error) -> Self {
        PricingError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for PricingError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        PricingError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl PricingError {
    /// Create an InvalidRecord error
    pub fn invalid_record(field: &str, value: &str, context: Option<&str>) -> Self {
        PricingError::InvalidRecord {
            field: field.to_string(),
            value: value.to_string(),
            context: context.map(str::to_string),
        }
    }

    /// Create an InvalidQuantity error
    pub fn invalid_quantity(product: &str, quantity: Decimal) -> Self {
        PricingError::InvalidQuantity {
            product: product.to_string(),
            quantity,
        }
    }

    /// Create an InvalidLineItem error
    pub fn invalid_line_item(product: &str, reason: &str) -> Self {
        PricingError::InvalidLineItem {
            product: product.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an InsufficientStock error
    pub fn insufficient_stock(product: &str, available: Decimal, requested: Decimal) -> Self {
        PricingError::InsufficientStock {
            product: product.to_string(),
            available,
            requested,
        }
    }

    /// Create an ItemNotInCart error
    pub fn item_not_in_cart(product: &str) -> Self {
        PricingError::ItemNotInCart {
            product: product.to_string(),
        }
    }
}
