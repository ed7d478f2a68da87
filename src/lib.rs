//! Treasury Ledger Library
//! # Overview
//!
//! This library computes the treasury position of a retail business from
//! its transaction ledger: the running cash balance and the income/expense
//! summary, with a sync and an async processing strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (TransactionRecord, TreasurySummary, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`settings`] - Settings file and environment overrides
//! - [`core`] - Business logic components:
//!   - [`core::aggregator`] - Cash classification and the treasury fold
//!   - [`core::party_directory`] - Customer/supplier lookup for returns
//!   - [`core::cache`] - Memo of the last aggregation
//!   - [`core::r#async`] - Chunked concurrent aggregation
//! - [`io`] - CSV and JSON input, summary output
//! - [`strategy`] - Complete sync and async pipelines
//!
//! # Cash Rules
//!
//! - **SALE, CAPITAL**: cash in
//! - **PURCHASE, EXPENSE, WITHDRAWAL**: cash out
//! - **RETURN**: cash out when it references a customer, cash in otherwise
//! - **ADJUSTMENT**: no cash effect
//!
//! DEFERRED payments and pending or rejected transactions never move cash.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use treasury_ledger::{aggregate, Customer, TransactionRecord, TransactionType};
//!
//! let ledger = vec![
//!     TransactionRecord::new("1", TransactionType::Sale, Decimal::new(1000, 0)),
//!     TransactionRecord::new("2", TransactionType::Return, Decimal::new(100, 0))
//!         .with_related_id("c1"),
//! ];
//! let customers = vec![Customer::new("c1", Decimal::ZERO)];
//!
//! let summary = aggregate(Decimal::new(50000, 0), &ledger, &customers, &[]);
//! assert_eq!(summary.balance, Decimal::new(50900, 0));
//! assert_eq!(summary.net_flow, Decimal::new(900, 0));
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod settings;
pub mod strategy;
pub mod types;

pub use core::{aggregate, AggregationContext, LedgerAggregator, PartyDirectory, SummaryCache};
pub use io::write_report;
pub use types::{
    Customer, LedgerError, LedgerReport, PaymentMethod, Supplier, TransactionRecord,
    TransactionStatus, TransactionType, TreasurySummary,
};
