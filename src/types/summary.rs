//! Aggregation outputs
//!
//! `TreasurySummary` is the aggregator's contract output. `LedgerTotals`
//! is the mergeable partial the fold accumulates into, and `LedgerReport`
//! is what the CLI pipelines write out.

use super::transaction::PaymentMethod;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Treasury position derived from an opening balance and a ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasurySummary {
    /// Opening balance plus all applied inflows minus all applied outflows
    pub balance: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// Always `total_income - total_expenses`
    pub net_flow: Decimal,
}

impl TreasurySummary {
    /// Position before any record is applied
    pub fn opening(balance: Decimal) -> Self {
        TreasurySummary {
            balance,
            total_income: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            net_flow: Decimal::ZERO,
        }
    }

    /// Accumulators behind this position
    pub fn totals(&self) -> LedgerTotals {
        LedgerTotals {
            income: self.total_income,
            expenses: self.total_expenses,
        }
    }
}

/// Income and expense accumulators
///
/// Partial totals are order independent, so two partials folded over
/// disjoint slices of a ledger can be merged with [`LedgerTotals::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    pub income: Decimal,
    pub expenses: Decimal,
}

impl LedgerTotals {
    /// Net movement of cash
    pub fn net_flow(&self) -> Decimal {
        self.income - self.expenses
    }

    /// Add an inflow, `None` if the sum would overflow
    pub fn checked_add_income(&self, amount: Decimal) -> Option<Self> {
        Some(LedgerTotals {
            income: self.income.checked_add(amount)?,
            expenses: self.expenses,
        })
    }

    /// Add an outflow, `None` if the sum would overflow
    pub fn checked_add_expense(&self, amount: Decimal) -> Option<Self> {
        Some(LedgerTotals {
            income: self.income,
            expenses: self.expenses.checked_add(amount)?,
        })
    }

    /// Combine two partials, `None` if either accumulator would overflow
    pub fn merge(&self, other: &LedgerTotals) -> Option<Self> {
        Some(LedgerTotals {
            income: self.income.checked_add(other.income)?,
            expenses: self.expenses.checked_add(other.expenses)?,
        })
    }

    /// Close the totals against an opening balance
    ///
    /// Returns `None` only when the closing balance is not representable.
    pub fn summarize(&self, opening_balance: Decimal) -> Option<TreasurySummary> {
        let balance = opening_balance
            .checked_add(self.income)?
            .checked_sub(self.expenses)?;
        Some(TreasurySummary {
            balance,
            total_income: self.income,
            total_expenses: self.expenses,
            net_flow: self.income.checked_sub(self.expenses)?,
        })
    }
}

/// Per-method line of the report breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodTotals {
    pub payment_method: PaymentMethod,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net_flow: Decimal,
}

/// Why a record did or did not reach the accumulators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    /// Moved cash
    pub applied: u64,
    /// Paid on credit
    pub skipped_deferred: u64,
    /// Pending or rejected
    pub skipped_status: u64,
    /// Adjustments
    pub no_cash_effect: u64,
    /// Outside the requested date window
    pub outside_period: u64,
    /// Failed boundary validation or would overflow
    pub rejected_malformed: u64,
}

impl ProcessingStats {
    pub fn merge(&mut self, other: &ProcessingStats) {
        self.applied += other.applied;
        self.skipped_deferred += other.skipped_deferred;
        self.skipped_status += other.skipped_status;
        self.no_cash_effect += other.no_cash_effect;
        self.outside_period += other.outside_period;
        self.rejected_malformed += other.rejected_malformed;
    }

    /// Every record seen, applied or not
    pub fn total(&self) -> u64 {
        self.applied
            + self.skipped_deferred
            + self.skipped_status
            + self.no_cash_effect
            + self.outside_period
            + self.rejected_malformed
    }
}

/// Full output of a processing run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReport {
    pub opening_balance: Decimal,
    #[serde(flatten)]
    pub summary: TreasurySummary,
    pub by_method: Vec<MethodTotals>,
    pub stats: ProcessingStats,
}

impl LedgerReport {
    /// Build a report from per-method totals
    ///
    /// Methods are emitted in their declaration order so output is stable.
    pub fn new(
        opening_balance: Decimal,
        summary: TreasurySummary,
        by_method: BTreeMap<PaymentMethod, LedgerTotals>,
        stats: ProcessingStats,
    ) -> Self {
        let by_method = by_method
            .into_iter()
            .map(|(payment_method, totals)| MethodTotals {
                payment_method,
                income: totals.income,
                expenses: totals.expenses,
                net_flow: totals.net_flow(),
            })
            .collect();

        LedgerReport {
            opening_balance,
            summary,
            by_method,
            stats,
        }
    }
}
