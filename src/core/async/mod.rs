//! Concurrent implementations of the treasury fold
//!
//! Because the fold is commutative, a ledger can be cut into chunks that
//! are aggregated independently and merged afterwards.
//!
//! - **ConcurrentTotals**: Thread-safe per-method totals using DashMap
//! - **BatchAggregator**: Splits batches into chunks folded on tokio tasks

pub mod batch_processor;
pub mod totals;

pub use batch_processor::BatchAggregator;
pub use totals::{ConcurrentTotals, PartialFold};
