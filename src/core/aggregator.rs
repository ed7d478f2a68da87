//! Treasury ledger aggregation
//!
//! This module provides the fold that turns an opening balance and a ledger
//! into the treasury position. The classification rule lives in one place,
//! [`classify`], and both the running balance and the income/expense
//! summary are driven from its result so the two can never disagree.
//!
//! The rules:
//! - DEFERRED payments are skipped (they move party balances, not cash)
//! - pending and rejected transactions are skipped
//! - SALE and CAPITAL are inflows
//! - PURCHASE, EXPENSE and WITHDRAWAL are outflows
//! - RETURN is an outflow when it references a customer, an inflow otherwise
//! - ADJUSTMENT has no cash effect
//!
//! The fold is a sum, so record order only matters for ledgers that reach
//! the edge of the decimal range.

use crate::core::context::{AggregationContext, Period};
use crate::core::party_directory::PartyDirectory;
use crate::core::traits::{PartyLookup, ReturnDirection};
use crate::types::{
    Customer, LedgerError, LedgerReport, LedgerTotals, PaymentMethod, ProcessingStats, Supplier,
    TransactionRecord, TransactionStatus, TransactionType, TreasurySummary,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Why a record was left out of the totals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Paid on credit
    Deferred,
    /// Awaiting approval or rejected
    NotCompleted(TransactionStatus),
    /// Stock-only transaction type
    NoCashEffect,
    /// Dated outside the requested window
    OutsidePeriod,
}

/// Effect of a single record on the treasury
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashEffect {
    Inflow(Decimal),
    Outflow(Decimal),
    Skipped(SkipReason),
}

/// Decide what a record does to cash
///
/// Pure: reads the record and the party lookup, nothing else.
pub fn classify<P: PartyLookup + ?Sized>(record: &TransactionRecord, parties: &P) -> CashEffect {
    if record.payment_method == PaymentMethod::Deferred {
        return CashEffect::Skipped(SkipReason::Deferred);
    }

    if record.status != TransactionStatus::Completed {
        return CashEffect::Skipped(SkipReason::NotCompleted(record.status));
    }

    match record.tx_type {
        TransactionType::Sale | TransactionType::Capital => CashEffect::Inflow(record.amount),
        TransactionType::Purchase | TransactionType::Expense | TransactionType::Withdrawal => {
            CashEffect::Outflow(record.amount)
        }
        TransactionType::Return => match parties.return_direction(record.related_id.as_deref()) {
            ReturnDirection::SalesReturn => CashEffect::Outflow(record.amount),
            ReturnDirection::PurchaseReturn => CashEffect::Inflow(record.amount),
        },
        TransactionType::Adjustment => CashEffect::Skipped(SkipReason::NoCashEffect),
    }
}

/// Streaming treasury fold
///
/// Feed records with [`LedgerAggregator::process`], then read the result
/// with [`LedgerAggregator::summary`] or [`LedgerAggregator::into_report`].
/// Records are only borrowed.
///
/// A record is applied only if the accumulators, its method's totals and
/// the closing balance all stay representable afterwards, so
/// `balance == opening + income - expenses` holds after every record.
#[derive(Debug, Clone)]
pub struct LedgerAggregator<P: PartyLookup> {
    opening_balance: Decimal,
    parties: P,
    period: Period,
    summary: TreasurySummary,
    by_method: BTreeMap<PaymentMethod, LedgerTotals>,
    stats: ProcessingStats,
}

impl<P: PartyLookup> LedgerAggregator<P> {
    /// Create an aggregator with no period restriction
    pub fn new(opening_balance: Decimal, parties: P) -> Self {
        LedgerAggregator {
            opening_balance,
            parties,
            period: Period::unbounded(),
            summary: TreasurySummary::opening(opening_balance),
            by_method: BTreeMap::new(),
            stats: ProcessingStats::default(),
        }
    }

    /// Continue a fold from an already reached position
    ///
    /// `summary` must have been closed against `opening_balance`. Stats
    /// start from zero, so they count only the records fed from here on.
    pub fn resume(
        opening_balance: Decimal,
        parties: P,
        summary: TreasurySummary,
        by_method: BTreeMap<PaymentMethod, LedgerTotals>,
    ) -> Self {
        LedgerAggregator {
            summary,
            by_method,
            ..LedgerAggregator::new(opening_balance, parties)
        }
    }

    /// Restrict the fold to records dated inside `period`
    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    /// Apply one record
    ///
    /// Returns the effect the record had. An `Err` means the record would
    /// push an accumulator or the closing balance out of the decimal range;
    /// it is counted as malformed and the position is left exactly as it was.
    pub fn process(&mut self, record: &TransactionRecord) -> Result<CashEffect, LedgerError> {
        if !self.period.contains(record.date) {
            self.stats.outside_period += 1;
            return Ok(CashEffect::Skipped(SkipReason::OutsidePeriod));
        }

        let effect = classify(record, &self.parties);
        let method_totals = self
            .by_method
            .get(&record.payment_method)
            .copied()
            .unwrap_or_default();
        let totals = self.summary.totals();

        let updated = match effect {
            CashEffect::Inflow(amount) => totals
                .checked_add_income(amount)
                .zip(method_totals.checked_add_income(amount))
                .ok_or("income"),
            CashEffect::Outflow(amount) => totals
                .checked_add_expense(amount)
                .zip(method_totals.checked_add_expense(amount))
                .ok_or("expenses"),
            CashEffect::Skipped(reason) => {
                match reason {
                    SkipReason::Deferred => self.stats.skipped_deferred += 1,
                    SkipReason::NotCompleted(_) => self.stats.skipped_status += 1,
                    SkipReason::NoCashEffect => self.stats.no_cash_effect += 1,
                    SkipReason::OutsidePeriod => self.stats.outside_period += 1,
                }
                tracing::debug!(tx = %record.id, ?reason, "transaction skipped");
                return Ok(effect);
            }
        };

        let closed = updated.and_then(|(totals, method_totals)| {
            totals
                .summarize(self.opening_balance)
                .map(|summary| (summary, method_totals))
                .ok_or("balance")
        });

        let (summary, method_totals) = match closed {
            Ok(closed) => closed,
            Err(operation) => {
                self.stats.rejected_malformed += 1;
                return Err(LedgerError::arithmetic_overflow(operation, &record.id));
            }
        };

        self.summary = summary;
        self.by_method.insert(record.payment_method, method_totals);
        self.stats.applied += 1;
        tracing::debug!(tx = %record.id, ?effect, "transaction applied");

        Ok(effect)
    }

    /// Count records that failed boundary validation before reaching the fold
    pub fn record_rejected(&mut self, count: u64) {
        self.stats.rejected_malformed += count;
    }

    pub fn totals(&self) -> LedgerTotals {
        self.summary.totals()
    }

    pub fn stats(&self) -> ProcessingStats {
        self.stats
    }

    /// Per-method totals accumulated so far
    pub fn method_totals(&self) -> &BTreeMap<PaymentMethod, LedgerTotals> {
        &self.by_method
    }

    /// Current treasury position
    pub fn summary(&self) -> TreasurySummary {
        self.summary
    }

    /// Consume the aggregator into a full report
    pub fn into_report(self) -> LedgerReport {
        LedgerReport::new(self.opening_balance, self.summary, self.by_method, self.stats)
    }

    /// Split into the mergeable parts, dropping the party lookup
    pub fn into_parts(
        self,
    ) -> (
        TreasurySummary,
        BTreeMap<PaymentMethod, LedgerTotals>,
        ProcessingStats,
    ) {
        (self.summary, self.by_method, self.stats)
    }
}

impl LedgerAggregator<std::sync::Arc<PartyDirectory>> {
    /// Create an aggregator from a run context
    pub fn from_context(context: &AggregationContext) -> Self {
        LedgerAggregator::new(context.opening_balance, std::sync::Arc::clone(&context.parties))
            .with_period(context.period)
    }
}

/// Compute the treasury position from party list snapshots
///
/// Total over its inputs: overflowing records are dropped with a warning,
/// everything else follows [`classify`].
pub fn aggregate(
    opening_balance: Decimal,
    transactions: &[TransactionRecord],
    customers: &[Customer],
    suppliers: &[Supplier],
) -> TreasurySummary {
    let directory = PartyDirectory::from_parties(customers, suppliers);
    let mut aggregator = LedgerAggregator::new(opening_balance, &directory);

    for record in transactions {
        if let Err(e) = aggregator.process(record) {
            tracing::warn!("Transaction excluded: {}", e);
        }
    }

    aggregator.summary()
}
