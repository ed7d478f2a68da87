//! Error types for the treasury ledger
//!
//! The aggregator itself never fails. These errors belong to the layers
//! around it: reading ledger exports, decoding REST envelopes, loading
//! settings and running the async runtime.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **Decode Errors**: Malformed CSV, malformed JSON, unexpected envelope shape
//! - **Record Errors**: Unknown enum values, bad amounts (recoverable, record skipped)
//! - **Arithmetic Errors**: Overflow while accumulating totals (record skipped)
//! - **Setup Errors**: Invalid settings, runtime construction failures

use std::path::Path;
use thiserror::Error;

/// Main error type for the treasury ledger
///
/// Record-level variants are recoverable: the offending record is
/// excluded from the fold and processing continues. File-level and setup
/// variants are fatal and surface from the CLI with exit code 1.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// File not found at the specified path
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
    /// Recoverable when raised for a single row.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// JSON document could not be decoded
    #[error("JSON decode error: {message}")]
    JsonError {
        /// Description of the decoding error
        message: String,
    },

    /// A REST list response was neither a paginated envelope nor a flat array
    #[error("Unexpected response shape: {message}")]
    UnexpectedShape {
        /// What was found instead
        message: String,
    },

    /// Invalid transaction type encountered
    #[error("Invalid transaction type '{tx_type}'{}", tx.as_ref().map(|t| format!(" for transaction {}", t)).unwrap_or_default())]
    InvalidTransactionType {
        /// The invalid transaction type string
        tx_type: String,
        /// Transaction ID (if available)
        tx: Option<String>,
    },

    /// Invalid payment method encountered
    #[error("Invalid payment method '{method}' for transaction {tx}")]
    InvalidPaymentMethod {
        /// The invalid payment method string
        method: String,
        /// Transaction ID
        tx: String,
    },

    /// Invalid approval status encountered
    #[error("Invalid status '{status}' for transaction {tx}")]
    InvalidStatus {
        /// The invalid status string
        status: String,
        /// Transaction ID
        tx: String,
    },

    /// Amount field is missing
    #[error("{tx_type} transaction {tx} requires an amount")]
    MissingAmount {
        /// Transaction type of the record
        tx_type: String,
        /// Transaction ID
        tx: String,
    },

    /// Invalid amount value (negative or malformed)
    #[error("Invalid amount '{amount}' for transaction {tx}")]
    InvalidAmount {
        /// The invalid amount string
        amount: String,
        /// Transaction ID
        tx: String,
    },

    /// Date could not be parsed
    #[error("Invalid date '{value}'")]
    InvalidDate {
        /// The unparseable date string
        value: String,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for transaction {tx}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Transaction ID
        tx: String,
    },

    /// Settings could not be loaded or deserialized
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Async runtime could not be created or a worker task failed
    #[error("Runtime error: {message}")]
    RuntimeError {
        /// Description of the runtime error
        message: String,
    },
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LedgerError
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return LedgerError::IoError {
                message: error.to_string(),
            };
        }

        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for LedgerError {
    fn from(error: csv_async::Error) -> Self {
        // csv-async already embeds the position in its message
        LedgerError::ParseError {
            line: None,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        LedgerError::JsonError {
            message: error.to_string(),
        }
    }
}

impl From<config::ConfigError> for LedgerError {
    fn from(error: config::ConfigError) -> Self {
        LedgerError::ConfigError {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Map a file-open failure, keeping "not found" distinct from other I/O errors
    pub fn open_failed(path: &Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            LedgerError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            LedgerError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), error),
            }
        }
    }

    /// Create an UnexpectedShape error
    pub fn unexpected_shape(message: &str) -> Self {
        LedgerError::UnexpectedShape {
            message: message.to_string(),
        }
    }

    /// Create an InvalidTransactionType error
    pub fn invalid_transaction_type(tx_type: &str, tx: Option<&str>) -> Self {
        LedgerError::InvalidTransactionType {
            tx_type: tx_type.to_string(),
            tx: tx.map(str::to_string),
        }
    }

    /// Create an InvalidPaymentMethod error
    pub fn invalid_payment_method(method: &str, tx: &str) -> Self {
        LedgerError::InvalidPaymentMethod {
            method: method.to_string(),
            tx: tx.to_string(),
        }
    }

    /// Create an InvalidStatus error
    pub fn invalid_status(status: &str, tx: &str) -> Self {
        LedgerError::InvalidStatus {
            status: status.to_string(),
            tx: tx.to_string(),
        }
    }

    /// Create a MissingAmount error
    pub fn missing_amount(tx_type: &str, tx: &str) -> Self {
        LedgerError::MissingAmount {
            tx_type: tx_type.to_string(),
            tx: tx.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str, tx: &str) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
            tx: tx.to_string(),
        }
    }

    /// Create an InvalidDate error
    pub fn invalid_date(value: &str) -> Self {
        LedgerError::InvalidDate {
            value: value.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, tx: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            tx: tx.to_string(),
        }
    }

    /// Create a RuntimeError
    pub fn runtime(message: impl Into<String>) -> Self {
        LedgerError::RuntimeError {
            message: message.into(),
        }
    }

    /// Whether the error only affects a single record
    ///
    /// Recoverable errors are logged and the record skipped; anything else
    /// aborts the run.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            LedgerError::ParseError { .. }
                | LedgerError::InvalidTransactionType { .. }
                | LedgerError::InvalidPaymentMethod { .. }
                | LedgerError::InvalidStatus { .. }
                | LedgerError::MissingAmount { .. }
                | LedgerError::InvalidAmount { .. }
                | LedgerError::ArithmeticOverflow { .. }
        )
    }
}
