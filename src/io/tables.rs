//! Side tables loaded before pricing starts
//!
//! Promotions, product discounts and stock levels are small lookup tables
//! read completely into memory. Rows that fail to parse are logged and
//! skipped; a missing file is fatal.

use crate::core::StockTable;
use crate::io::csv_format::{
    convert_discount, convert_promotion, convert_stock, CsvDiscount, CsvPromotion, CsvStock,
};
use crate::io::sync_reader::{csv_reader, open_file};
use crate::types::{DiscountBook, OrderId, OrderPromotion, PricingError};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;

/// Read every valid row of a CSV file
///
/// # Arguments
///
/// * `path` - File to read
/// * `convert` - Conversion from the raw row to the domain value
///
/// # Returns
///
/// The converted rows in file order
///
/// # Errors
///
/// Returns an error only if the file cannot be opened
pub fn load_rows<Raw, T, F>(path: &Path, convert: F) -> Result<Vec<T>, PricingError>
where
    Raw: DeserializeOwned,
    F: Fn(Raw) -> Result<T, PricingError>,
{
    let mut reader = csv_reader(open_file(path)?);
    let mut rows = Vec::new();

    for (index, row) in reader.deserialize::<Raw>().enumerate() {
        match row.map_err(PricingError::from).and_then(&convert) {
            Ok(value) => rows.push(value),
            Err(e) => tracing::warn!(
                file = %path.display(),
                line = index + 2,
                error = %e,
                "skipping row"
            ),
        }
    }

    Ok(rows)
}

/// Load order promotions keyed by order
///
/// If an order appears more than once the last row wins.
pub fn load_promotions(path: &Path) -> Result<HashMap<OrderId, OrderPromotion>, PricingError> {
    let mut promotions = HashMap::new();
    for (order, promotion) in load_rows::<CsvPromotion, _, _>(path, convert_promotion)? {
        if promotions.insert(order.clone(), promotion).is_some() {
            tracing::warn!(order = %order, "duplicate promotion row, keeping the last one");
        }
    }
    Ok(promotions)
}

/// Load product discounts into a discount book
///
/// If a product appears more than once the last row wins.
pub fn load_discounts(path: &Path) -> Result<DiscountBook, PricingError> {
    let mut book = DiscountBook::new();
    for (product, discount) in load_rows::<CsvDiscount, _, _>(path, convert_discount)? {
        if book.insert(product.clone(), discount).is_some() {
            tracing::warn!(product = %product, "duplicate discount row, keeping the last one");
        }
    }
    Ok(book)
}

/// Load stock levels
pub fn load_stock(path: &Path) -> Result<StockTable, PricingError> {
    let mut table = StockTable::new();
    for (product, available) in load_rows::<CsvStock, _, _>(path, convert_stock)? {
        table.set(product, available);
    }
    Ok(table)
}
