//! Synchronous processing strategy
//!
//! Single-threaded implementation of the ProcessingStrategy trait. It
//! coordinates the SyncReader (CSV input) or the JSON decoder with a
//! `LedgerAggregator`.
//!
//! # Memory Efficiency
//!
//! CSV ledgers are streamed one record at a time: memory usage is
//! O(parties), not O(transactions). JSON ledgers are REST responses and are
//! decoded whole before folding.

use crate::cli::InputFormat;
use crate::core::{AggregationContext, LedgerAggregator, PartyDirectory};
use crate::io::json_format::read_transactions;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{LedgerInput, ProcessingStrategy};
use crate::types::{LedgerError, LedgerReport, TransactionRecord};
use std::sync::Arc;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use treasury_ledger::core::{AggregationContext, PartyDirectory};
/// use treasury_ledger::cli::OutputFormat;
/// use treasury_ledger::strategy::{LedgerInput, ProcessingStrategy, SyncProcessingStrategy};
/// use rust_decimal::Decimal;
/// use std::path::Path;
///
/// let context = AggregationContext::new(Decimal::new(50000, 0), PartyDirectory::new());
/// let input = LedgerInput::new(Path::new("ledger.csv"));
///
/// SyncProcessingStrategy
///     .process(&input, &context, OutputFormat::Csv, &mut std::io::stdout())
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

fn fold(aggregator: &mut LedgerAggregator<Arc<PartyDirectory>>, record: &TransactionRecord) {
    if let Err(e) = aggregator.process(record) {
        tracing::warn!("Transaction excluded: {}", e);
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Aggregate the ledger on the calling thread
    ///
    /// Fatal errors (file not found, I/O errors, strict decode failures)
    /// are returned immediately. Record errors are logged, counted as
    /// rejected and processing continues.
    fn aggregate(
        &self,
        input: &LedgerInput<'_>,
        context: &AggregationContext,
    ) -> Result<LedgerReport, LedgerError> {
        let mut aggregator = LedgerAggregator::from_context(context);
        tracing::info!(path = %input.path.display(), format = ?input.format, "Reading ledger");

        match input.format {
            InputFormat::Csv => {
                let mut reader = SyncReader::new(input.path)?;
                while let Some(result) = reader.next() {
                    match result {
                        Ok(record) => fold(&mut aggregator, &record),
                        Err(e) if e.is_record_level() => {
                            aggregator.record_rejected(1);
                            tracing::warn!(line = reader.line(), "Skipping ledger row: {}", e);
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
            InputFormat::Json => {
                let ledger = read_transactions(input.path, input.decode_mode)?;
                aggregator.record_rejected(ledger.rejected);
                for record in &ledger.records {
                    fold(&mut aggregator, record);
                }
            }
        }

        Ok(aggregator.into_report())
    }
}
