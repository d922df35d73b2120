//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over cart lines from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! The SyncReader uses csv::Reader to read and deserialize rows one at a time,
//! delegating parsing and conversion to the csv_format module. Rows are not
//! grouped into orders here; that is the strategy's job.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<(OrderId, LineItem), PricingError>` for each CSV row:
//!
//! ```no_run
//! use pos_totals_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let mut reader = SyncReader::new(Path::new("items.csv")).unwrap();
//! while let Some(result) = reader.next() {
//!     match result {
//!         Ok((order, item)) => println!("{}: {:?}", order, item),
//!         Err(e) => eprintln!("line {}: {}", reader.line(), e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as Err variants in the iterator

use crate::io::csv_format::{convert_line_item, CsvLineItem};
use crate::types::{LineItem, OrderId, PricingError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Streaming reader over cart line rows
#[derive(Debug)]
pub struct SyncReader<R = File> {
    reader: csv::Reader<R>,
    line_num: u64,
}

impl SyncReader<File> {
    /// Open a cart CSV file
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the path does not exist, `IoError` if it
    /// cannot be opened.
    pub fn new(path: &Path) -> Result<Self, PricingError> {
        Ok(Self::from_reader(open_file(path)?))
    }
}

impl<R: Read> SyncReader<R> {
    /// Read cart rows from any byte source
    pub fn from_reader(source: R) -> Self {
        Self {
            reader: csv_reader(source),
            line_num: 1,
        }
    }

    /// File line number of the row most recently yielded (the header is line 1)
    pub fn line(&self) -> u64 {
        self.line_num
    }
}

impl<R: Read> Iterator for SyncReader<R> {
    type Item = Result<(OrderId, LineItem), PricingError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvLineItem>();

        let row = deserializer.next()?;
        self.line_num += 1;
        Some(row.map_err(PricingError::from).and_then(convert_line_item))
    }
}

/// CSV reader configured the same way for every input file
pub(crate) fn csv_reader<R: Read>(source: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .buffer_capacity(8 * 1024)
        .from_reader(source)
}

/// Open an input file, distinguishing a missing file from other I/O errors
pub(crate) fn open_file(path: &Path) -> Result<File, PricingError> {
    File::open(path).map_err(|e| open_error(path, e))
}

pub(crate) fn open_error(path: &Path, error: std::io::Error) -> PricingError {
    match error.kind() {
        ErrorKind::NotFound => PricingError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => PricingError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), error),
        },
    }
}
