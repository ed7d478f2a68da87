//! Core business logic module
//!
//! This module contains the treasury aggregation components:
//! - `aggregator` - The cash classification rule and the streaming fold
//! - `party_directory` - Customer/supplier id index for return classification
//! - `context` - Request-scoped inputs (opening balance, parties, period)
//! - `cache` - Memoization of the last aggregation
//! - `traits` - Party lookup abstraction
//! - `async` - Chunked concurrent aggregation

pub mod aggregator;
pub mod r#async;
pub mod cache;
pub mod context;
pub mod party_directory;
pub mod traits;

pub use aggregator::{aggregate, classify, CashEffect, LedgerAggregator, SkipReason};
pub use cache::SummaryCache;
pub use context::{AggregationContext, Period};
pub use party_directory::PartyDirectory;
pub use r#async::{BatchAggregator, ConcurrentTotals, PartialFold};
pub use traits::{PartyLookup, ReturnDirection};
