//! I/O module
//!
//! Handles ledger parsing and report output.
//!
//! # Components
//!
//! - `record` - Boundary validation shared by every input format
//! - `csv_format` - CSV layout constants and the summary writer
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface
//! - `envelope` - REST list envelope decoding (paginated or flat)
//! - `json_format` - JSON ledger and party list decoding, JSON report writer
//! - `output` - Output format dispatch

pub mod async_reader;
pub mod csv_format;
pub mod envelope;
pub mod json_format;
pub mod output;
pub mod record;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{write_summary_csv, SUMMARY_HEADER};
pub use envelope::{decode_envelope, ListEnvelope};
pub use json_format::{
    decode_customers, decode_suppliers, decode_transactions, read_customers, read_suppliers,
    read_transactions, write_report_json, DecodedLedger,
};
pub use output::write_report;
pub use record::{convert_record, parse_amount, parse_date, RawRecord};
pub use sync_reader::SyncReader;
