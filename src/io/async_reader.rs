//! Asynchronous CSV reader with batch interface
//!
//! Provides batched reading of ledger records for the async strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of TransactionRecords
//!                  ↓
//!            io::record module
//!         (RawRecord, convert_record)
//! ```
//!
//! Rows that fail to parse or validate are logged and counted, never put in
//! a batch. The count is exposed through [`AsyncReader::rejected`] so the
//! pipeline can report it alongside the fold's own statistics.

use crate::io::csv_format::READ_BUFFER_CAPACITY;
use crate::io::record::{convert_record, RawRecord};
use crate::types::{LedgerError, TransactionRecord};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
    rejected: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .buffer_capacity(READ_BUFFER_CAPACITY)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
            rejected: 0,
        }
    }

    /// Read a batch of ledger records
    ///
    /// Reads up to `batch_size` valid records. Invalid rows are logged at
    /// `warn`, counted and skipped; they do not count toward the batch.
    ///
    /// # Returns
    ///
    /// A vector of converted records, empty once the input is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<TransactionRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut rows = self.csv_reader.deserialize::<RawRecord>();

        while batch.len() < batch_size {
            let Some(row) = rows.next().await else {
                break;
            };
            self.line_num += 1;

            match row.map_err(LedgerError::from).and_then(convert_record) {
                Ok(record) => batch.push(record),
                Err(e) => {
                    self.rejected += 1;
                    tracing::warn!(line = self.line_num, "Skipping ledger row: {}", e);
                }
            }
        }

        batch
    }

    /// Rows rejected so far
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}
