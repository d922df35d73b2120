//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, ledger serialization)
//! - `sync_reader` - Synchronous cart reader with iterator interface
//! - `async_reader` - Asynchronous cart reader with batch reading interface
//! - `tables` - Promotion, discount and stock tables loaded up front

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;
pub mod tables;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_line_item, write_ledger_csv, CsvLineItem, LEDGER_HEADER};
pub use sync_reader::SyncReader;
pub use tables::{load_discounts, load_promotions, load_stock};
