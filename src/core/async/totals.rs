//! Thread-safe accumulation of partial treasury totals
//!
//! Worker tasks each fold a chunk of the ledger with their own
//! `LedgerAggregator`; the results are then absorbed here in ledger order.
//! Per-method totals live in a `DashMap`, statistics are plain atomic
//! counters and the running position sits behind a mutex.
//!
//! A chunk is merged in one step only when no record of it can take the
//! position out of the decimal range. Otherwise its records are replayed
//! one by one against the current position, exactly as the sequential
//! fold would apply them.

use crate::core::aggregator::LedgerAggregator;
use crate::core::context::Period;
use crate::core::traits::PartyLookup;
use crate::types::{
    LedgerError, LedgerReport, LedgerTotals, PaymentMethod, ProcessingStats, TransactionRecord,
    TreasurySummary,
};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Partial result of folding one chunk from a zero opening balance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialFold {
    pub totals: LedgerTotals,
    pub by_method: BTreeMap<PaymentMethod, LedgerTotals>,
    pub stats: ProcessingStats,
    /// Records the chunk itself had to exclude
    pub excluded: Vec<LedgerError>,
}

#[derive(Debug, Default)]
struct AtomicStats {
    applied: AtomicU64,
    skipped_deferred: AtomicU64,
    skipped_status: AtomicU64,
    no_cash_effect: AtomicU64,
    outside_period: AtomicU64,
    rejected_malformed: AtomicU64,
}

impl AtomicStats {
    fn add(&self, stats: &ProcessingStats) {
        self.applied.fetch_add(stats.applied, Ordering::Relaxed);
        self.skipped_deferred
            .fetch_add(stats.skipped_deferred, Ordering::Relaxed);
        self.skipped_status
            .fetch_add(stats.skipped_status, Ordering::Relaxed);
        self.no_cash_effect
            .fetch_add(stats.no_cash_effect, Ordering::Relaxed);
        self.outside_period
            .fetch_add(stats.outside_period, Ordering::Relaxed);
        self.rejected_malformed
            .fetch_add(stats.rejected_malformed, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ProcessingStats {
        ProcessingStats {
            applied: self.applied.load(Ordering::Relaxed),
            skipped_deferred: self.skipped_deferred.load(Ordering::Relaxed),
            skipped_status: self.skipped_status.load(Ordering::Relaxed),
            no_cash_effect: self.no_cash_effect.load(Ordering::Relaxed),
            outside_period: self.outside_period.load(Ordering::Relaxed),
            rejected_malformed: self.rejected_malformed.load(Ordering::Relaxed),
        }
    }
}

/// Thread-safe totals shared by the batch workers
#[derive(Debug)]
pub struct ConcurrentTotals {
    opening_balance: Decimal,
    position: Mutex<TreasurySummary>,
    by_method: DashMap<PaymentMethod, LedgerTotals>,
    stats: AtomicStats,
}

impl ConcurrentTotals {
    pub fn new(opening_balance: Decimal) -> Self {
        Self {
            opening_balance,
            position: Mutex::new(TreasurySummary::opening(opening_balance)),
            by_method: DashMap::new(),
            stats: AtomicStats::default(),
        }
    }

    fn position(&self) -> MutexGuard<'_, TreasurySummary> {
        self.position.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merge one chunk's partial totals in a single step
    ///
    /// Returns `false` and changes nothing when some record of the chunk
    /// could take an accumulator or the closing balance out of range; the
    /// chunk must then go through [`ConcurrentTotals::replay`].
    pub fn try_absorb(&self, partial: &PartialFold) -> bool {
        let mut position = self.position();

        let Some((summary, methods)) = self.merged(&position, partial) else {
            return false;
        };

        for (method, totals) in methods {
            self.by_method.insert(method, totals);
        }
        *position = summary;
        self.stats.add(&partial.stats);

        for e in &partial.excluded {
            tracing::warn!("Transaction excluded: {}", e);
        }

        true
    }

    /// Position and method totals after `partial`, if every intermediate is representable
    fn merged(
        &self,
        position: &TreasurySummary,
        partial: &PartialFold,
    ) -> Option<(TreasurySummary, Vec<(PaymentMethod, LedgerTotals)>)> {
        let methods = partial
            .by_method
            .iter()
            .map(|(method, totals)| {
                let current = self
                    .by_method
                    .get(method)
                    .map(|entry| *entry.value())
                    .unwrap_or_default();
                Some((*method, current.merge(totals)?))
            })
            .collect::<Option<Vec<_>>>()?;

        let before = position.totals();
        let after = before.merge(&partial.totals)?;

        // Accumulators only grow, so every balance the chunk passes through
        // lies between these two corners.
        let lowest = LedgerTotals {
            income: before.income,
            expenses: after.expenses,
        };
        let highest = LedgerTotals {
            income: after.income,
            expenses: before.expenses,
        };
        lowest.summarize(self.opening_balance)?;
        highest.summarize(self.opening_balance)?;

        Some((after.summarize(self.opening_balance)?, methods))
    }

    /// Fold `records` one at a time against the current position
    pub fn replay<P: PartyLookup>(
        &self,
        parties: P,
        period: Period,
        records: &[TransactionRecord],
    ) {
        let mut position = self.position();

        let mut aggregator = LedgerAggregator::resume(
            self.opening_balance,
            parties,
            *position,
            self.method_totals(),
        )
        .with_period(period);
        for record in records {
            if let Err(e) = aggregator.process(record) {
                tracing::warn!("Transaction excluded: {}", e);
            }
        }

        let (summary, by_method, stats) = aggregator.into_parts();
        for (method, totals) in by_method {
            self.by_method.insert(method, totals);
        }
        *position = summary;
        self.stats.add(&stats);
    }

    /// Count records rejected before they reached a worker
    pub fn add_rejected(&self, count: u64) {
        self.stats
            .rejected_malformed
            .fetch_add(count, Ordering::Relaxed);
    }

    /// Snapshot of the per-method totals
    pub fn method_totals(&self) -> BTreeMap<PaymentMethod, LedgerTotals> {
        self.by_method
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }

    pub fn stats(&self) -> ProcessingStats {
        self.stats.snapshot()
    }

    pub fn summary(&self) -> TreasurySummary {
        *self.position()
    }

    /// Build the full report
    pub fn report(&self) -> LedgerReport {
        LedgerReport::new(
            self.opening_balance,
            self.summary(),
            self.method_totals(),
            self.stats(),
        )
    }
}
