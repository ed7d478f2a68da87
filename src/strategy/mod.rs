//! Processing strategy module for ledger aggregation
//!
//! This module defines the Strategy pattern for complete aggregation
//! pipelines, from reading the ledger export to writing the report. This
//! allows different processing implementations (synchronous, asynchronous
//! batch) to be selected at runtime.

use crate::cli::{DecodeMode, InputFormat, OutputFormat, StrategyType};
use crate::core::AggregationContext;
use crate::io::write_report;
use crate::types::{LedgerError, LedgerReport};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Where the ledger comes from and how to read it
#[derive(Debug, Clone, Copy)]
pub struct LedgerInput<'a> {
    pub path: &'a Path,
    pub format: InputFormat,
    pub decode_mode: DecodeMode,
}

impl<'a> LedgerInput<'a> {
    /// Input with the format detected from the file extension
    pub fn new(path: &'a Path) -> Self {
        Self {
            path,
            format: InputFormat::detect(path),
            decode_mode: DecodeMode::default(),
        }
    }

    pub fn with_format(mut self, format: InputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_decode_mode(mut self, decode_mode: DecodeMode) -> Self {
        self.decode_mode = decode_mode;
        self
    }
}

/// Processing strategy trait for complete aggregation pipelines
///
/// Each strategy reads ledger records from the input, folds them under the
/// given context and produces a [`LedgerReport`]. Strategies must agree:
/// for the same input and context every strategy returns the same report.
pub trait ProcessingStrategy: Send + Sync {
    /// Aggregate the ledger into a report
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened (file not found, permission denied)
    /// - A fatal I/O error occurs during reading
    /// - A JSON response has an unexpected shape in strict mode
    /// - The async runtime cannot be created
    ///
    /// Individual record errors are logged and counted in the report's
    /// statistics; they never abort the run.
    fn aggregate(
        &self,
        input: &LedgerInput<'_>,
        context: &AggregationContext,
    ) -> Result<LedgerReport, LedgerError>;

    /// Aggregate the ledger and write the report to output
    fn process(
        &self,
        input: &LedgerInput<'_>,
        context: &AggregationContext,
        format: OutputFormat,
        output: &mut dyn Write,
    ) -> Result<(), LedgerError> {
        let report = self.aggregate(input, context)?;
        tracing::info!(
            applied = report.stats.applied,
            rejected = report.stats.rejected_malformed,
            balance = %report.summary.balance,
            "Ledger aggregated"
        );
        write_report(&report, format, output)
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
