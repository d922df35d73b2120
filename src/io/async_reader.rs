//! Asynchronous CSV reader with batch interface
//!
//! Provides a streaming interface over cart lines from a CSV file.
//! Supports batch reading for the async strategy.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - futures' `StreamExt` to pull deserialized rows
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of (OrderId, LineItem)
//!                  ↓
//!           csv_format module
//!           (CsvLineItem, convert_line_item)
//! ```

use crate::io::csv_format::{convert_line_item, CsvLineItem};
use crate::types::{LineItem, OrderId};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
        }
    }

    /// Read up to `batch_size` valid rows
    ///
    /// Malformed rows are logged and skipped and do not count towards the
    /// batch. An empty batch means the input is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<(OrderId, LineItem)> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvLineItem>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => {
                    self.line_num += 1;
                    match convert_line_item(csv_record) {
                        Ok(row) => batch.push(row),
                        Err(e) => {
                            tracing::warn!(line = self.line_num, error = %e, "skipping cart row")
                        }
                    }
                }
                Some(Err(e)) => {
                    self.line_num += 1;
                    tracing::warn!(line = self.line_num, error = %e, "CSV parse error");
                }
                None => break,
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    const HEADER: &str = "order,product,quantity,price,cgst,sgst,igst,price_type\n";

    fn reader(rows: &str) -> AsyncReader<Cursor<Vec<u8>>> {
        AsyncReader::new(Cursor::new(format!("{}{}", HEADER, rows).into_bytes()))
    }

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let mut async_reader = reader("A1,SKU-1,2,100,9,9,0,\nA1,SKU-2,1,50,9,9,0,\nA2,SKU-1,1,100,9,9,0,\n");

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].0, "A1");
        assert_eq!(batch[0].1.product_ref, "SKU-1");
        assert_eq!(batch[1].1.product_ref, "SKU-2");

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].0, "A2");

        assert!(async_reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut async_reader = reader("");
        assert!(async_reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_rows() {
        let mut async_reader = reader("A1,SKU-1,-2,100,9,9,0,\nA1,SKU-2,1,50,9,9,0,bundle\nA1,SKU-3,1,50,9,9,0,\n");

        let batch = async_reader.read_batch(10).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].1.product_ref, "SKU-3");
        assert_eq!(batch[0].1.catalog_price, Decimal::from(50));
    }
}
