//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over ledger records from a CSV file.
//!
//! # Design
//!
//! The SyncReader uses csv::Reader to deserialize rows one at a time into
//! [`RawRecord`]s and hands each one to [`convert_record`]. It never loads
//! the entire file into memory.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<TransactionRecord, LedgerError>` for each CSV row:
//!
//! ```no_run
//! use treasury_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("ledger.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Processing transaction: {:?}", record),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record errors are yielded as Err variants in the iterator
//! - Line numbers are attached to every per-record error
//! - An I/O failure mid-file is yielded as-is and should end the read

use crate::io::csv_format::READ_BUFFER_CAPACITY;
use crate::io::record::{convert_record, RawRecord};
use crate::types::{LedgerError, TransactionRecord};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Provides an iterator interface over ledger records with constant
/// memory usage.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing optional columns may be absent)
    /// - Use an 8KB buffer
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if the file opened successfully
    /// * `Err(LedgerError::FileNotFound)` or `Err(LedgerError::IoError)` otherwise
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::open_failed(path, e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(READ_BUFFER_CAPACITY)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }

    /// Line of the most recently yielded row (the header is line 1)
    pub fn line(&self) -> u64 {
        self.line_num
    }
}

impl Iterator for SyncReader {
    type Item = Result<TransactionRecord, LedgerError>;

    /// Get the next ledger record from the CSV file
    ///
    /// # Returns
    ///
    /// * `Some(Ok(TransactionRecord))` - Successfully parsed record
    /// * `Some(Err(LedgerError::ParseError))` - Row failed to parse or validate
    /// * `Some(Err(LedgerError::IoError))` - The file could not be read further
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<RawRecord>();
        let row = deserializer.next()?;
        self.line_num += 1;

        let line = self.line_num;
        Some(
            row.map_err(LedgerError::from)
                .and_then(convert_record)
                .map_err(|e| match e {
                    LedgerError::ParseError { message, .. } => LedgerError::ParseError {
                        line: Some(line),
                        message,
                    },
                    other if other.is_record_level() => LedgerError::ParseError {
                        line: Some(line),
                        message: other.to_string(),
                    },
                    other => other,
                }),
        )
    }
}
