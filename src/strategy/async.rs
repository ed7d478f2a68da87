//! Asynchronous batch processing strategy
//!
//! Multi-threaded implementation of the ProcessingStrategy trait. Records
//! are read in batches and each batch is folded in parallel chunks.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader / JSON decoder (batch input)
//!     └── BatchAggregator (chunking + tokio tasks)
//!         └── ConcurrentTotals (DashMap per payment method)
//! ```
//!
//! Chunks may finish in any order; their partials are absorbed in ledger
//! order, so the report equals the one the sync strategy produces.

use crate::cli::InputFormat;
use crate::core::{AggregationContext, BatchAggregator, ConcurrentTotals};
use crate::io::async_reader::AsyncReader;
use crate::io::json_format::decode_transactions;
use crate::strategy::{LedgerInput, ProcessingStrategy};
use crate::types::{LedgerError, LedgerReport};
use std::sync::Arc;
use tokio_util::compat::TokioAsyncReadCompatExt;

/// Configuration for batch processing
///
/// Controls how records are batched and the number of worker threads
/// folding each batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of records per batch
    pub batch_size: usize,
    /// Number of worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches,
                default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }

    /// Records per worker task, so one batch spreads over every worker
    pub fn chunk_size(&self) -> usize {
        self.batch_size.div_ceil(self.max_concurrent_batches).max(1)
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    async fn aggregate_csv(
        &self,
        input: &LedgerInput<'_>,
        aggregator: &BatchAggregator,
    ) -> Result<(), LedgerError> {
        let file = tokio::fs::File::open(input.path)
            .await
            .map_err(|e| LedgerError::open_failed(input.path, e))?;

        // csv-async reads futures::io, tokio files need the compat layer
        let mut reader = AsyncReader::new(file.compat());

        loop {
            let batch = reader.read_batch(self.config.batch_size).await;
            if batch.is_empty() {
                break;
            }
            aggregator.process_batch(batch).await?;
        }

        aggregator.totals().add_rejected(reader.rejected());
        Ok(())
    }

    async fn aggregate_json(
        &self,
        input: &LedgerInput<'_>,
        aggregator: &BatchAggregator,
    ) -> Result<(), LedgerError> {
        let bytes = tokio::fs::read(input.path)
            .await
            .map_err(|e| LedgerError::open_failed(input.path, e))?;
        let mut ledger = decode_transactions(&bytes, input.decode_mode)?;
        aggregator.totals().add_rejected(ledger.rejected);

        while !ledger.records.is_empty() {
            let take = self.config.batch_size.min(ledger.records.len());
            let batch: Vec<_> = ledger.records.drain(..take).collect();
            aggregator.process_batch(batch).await?;
        }

        Ok(())
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Aggregate the ledger on a tokio multi-threaded runtime
    ///
    /// Batches are read one after another; each batch is cut into chunks
    /// that are folded concurrently and absorbed into shared totals.
    fn aggregate(
        &self,
        input: &LedgerInput<'_>,
        context: &AggregationContext,
    ) -> Result<LedgerReport, LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| LedgerError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

        tracing::info!(
            path = %input.path.display(),
            format = ?input.format,
            batch_size = self.config.batch_size,
            workers = self.config.max_concurrent_batches,
            "Reading ledger"
        );

        runtime.block_on(async {
            let totals = Arc::new(ConcurrentTotals::new(context.opening_balance));
            let aggregator = BatchAggregator::new(context, Arc::clone(&totals))
                .with_chunk_size(self.config.chunk_size());

            match input.format {
                InputFormat::Csv => self.aggregate_csv(input, &aggregator).await?,
                InputFormat::Json => self.aggregate_json(input, &aggregator).await?,
            }

            Ok(totals.report())
        })
    }
}
