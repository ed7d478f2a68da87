//! Chunked batch aggregation for async processing
//!
//! This module provides the `BatchAggregator` struct, which folds a batch of
//! ledger records across tokio worker tasks.
//!
//! # Design
//!
//! The treasury fold is a sum, so unlike per-account processing a batch can
//! be cut into contiguous chunks, each folded by its own `LedgerAggregator`
//! on a spawned task. The partials are absorbed into a shared
//! `ConcurrentTotals` in ledger order, which keeps the result identical to
//! the sequential fold even when records are excluded for overflow.
//!
//! # Architecture
//!
//! ```text
//! BatchAggregator
//!     ├── Arc<PartyDirectory>     (read-only return classification)
//!     ├── Period                  (date window applied per record)
//!     ├── chunk_size              (records per worker task)
//!     └── Arc<ConcurrentTotals>   (shared partial totals)
//! ```

use std::sync::Arc;

use super::totals::{ConcurrentTotals, PartialFold};
use crate::core::aggregator::LedgerAggregator;
use crate::core::context::{AggregationContext, Period};
use crate::core::party_directory::PartyDirectory;
use crate::types::{LedgerError, TransactionRecord};
use rust_decimal::Decimal;

/// Default number of records folded by one worker task
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Batch aggregator with chunk-based parallelism
///
/// Cloneable and cheap to share: all state is behind `Arc`.
#[derive(Debug, Clone)]
pub struct BatchAggregator {
    parties: Arc<PartyDirectory>,
    period: Period,
    chunk_size: usize,
    totals: Arc<ConcurrentTotals>,
}

impl BatchAggregator {
    /// Create a new BatchAggregator for a run context
    ///
    /// # Arguments
    ///
    /// * `context` - Opening balance, party directory and period of the run
    /// * `totals` - Shared totals the workers absorb into
    pub fn new(context: &AggregationContext, totals: Arc<ConcurrentTotals>) -> Self {
        Self {
            parties: Arc::clone(&context.parties),
            period: context.period,
            chunk_size: DEFAULT_CHUNK_SIZE,
            totals,
        }
    }

    /// Override the chunk size (zero is treated as one)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Fold one chunk synchronously from a zero opening balance
    ///
    /// Records the chunk cannot hold are collected in the partial, not
    /// propagated: the chunk's remaining records still apply.
    pub fn fold_chunk(&self, records: &[TransactionRecord]) -> PartialFold {
        let mut aggregator = LedgerAggregator::new(Decimal::ZERO, Arc::clone(&self.parties))
            .with_period(self.period);
        let mut excluded = Vec::new();

        for record in records {
            if let Err(e) = aggregator.process(record) {
                excluded.push(e);
            }
        }

        let (summary, by_method, stats) = aggregator.into_parts();
        PartialFold {
            totals: summary.totals(),
            by_method,
            stats,
            excluded,
        }
    }

    /// Fold a batch across worker tasks
    ///
    /// This method:
    /// 1. Splits the batch into chunks of `chunk_size` records
    /// 2. Spawns a tokio task per chunk that folds it
    /// 3. Absorbs the partials in ledger order, replaying a chunk record by
    ///    record when its partial cannot be merged in one step
    ///
    /// # Returns
    ///
    /// The number of chunks folded, or the first worker failure.
    pub async fn process_batch(&self, batch: Vec<TransactionRecord>) -> Result<usize, LedgerError> {
        let mut tasks = Vec::new();
        let mut batch = batch;

        while !batch.is_empty() {
            let tail = batch.split_off(self.chunk_size.min(batch.len()));
            let chunk = std::mem::replace(&mut batch, tail);
            let aggregator = self.clone();
            tasks.push(tokio::spawn(async move {
                let partial = aggregator.fold_chunk(&chunk);
                (chunk, partial)
            }));
        }

        let chunk_count = tasks.len();
        for task in tasks {
            let (chunk, partial) = task.await.map_err(|e| {
                tracing::error!("Batch worker failed: {}", e);
                LedgerError::runtime(format!("Task panicked: {:?}", e))
            })?;

            if !self.totals.try_absorb(&partial) {
                tracing::debug!(
                    records = chunk.len(),
                    "chunk nears the decimal range, replaying"
                );
                self.totals.replay(Arc::clone(&self.parties), self.period, &chunk);
            }
        }

        Ok(chunk_count)
    }

    pub fn totals(&self) -> &Arc<ConcurrentTotals> {
        &self.totals
    }
}
