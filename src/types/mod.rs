//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: Ledger entries and their enums
//! - `party`: Customers and suppliers
//! - `summary`: Aggregation outputs and partial totals
//! - `error`: Error types for the I/O and setup layers

pub mod error;
pub mod party;
pub mod summary;
pub mod transaction;

pub use error::LedgerError;
pub use party::{Customer, Supplier};
pub use summary::{LedgerReport, LedgerTotals, MethodTotals, ProcessingStats, TreasurySummary};
pub use transaction::{
    PartyId, PaymentMethod, TransactionId, TransactionRecord, TransactionStatus, TransactionType,
};
