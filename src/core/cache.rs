//! Memoization of the last aggregation
//!
//! Dashboards recompute the treasury position on every data refresh, most
//! of the time over an unchanged snapshot. `SummaryCache` keeps the inputs
//! and result of the previous call and hands the result back when the
//! inputs compare equal. A different snapshot simply replaces the memo:
//! there is no merging across snapshots.

use crate::core::aggregator::aggregate;
use crate::types::{Customer, Supplier, TransactionRecord, TreasurySummary};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
struct Snapshot {
    opening_balance: Decimal,
    transactions: Vec<TransactionRecord>,
    customers: Vec<Customer>,
    suppliers: Vec<Supplier>,
}

impl Snapshot {
    /// Equality that also tells `50000` from `50000.00`, since scale shows in the output
    fn matches(
        &self,
        opening_balance: Decimal,
        transactions: &[TransactionRecord],
        customers: &[Customer],
        suppliers: &[Supplier],
    ) -> bool {
        same_decimal(&self.opening_balance, &opening_balance)
            && same_items(&self.transactions, transactions, |a, b| {
                a == b && same_decimal(&a.amount, &b.amount)
            })
            && same_items(&self.customers, customers, |a, b| {
                a == b && same_decimal(&a.balance, &b.balance)
            })
            && same_items(&self.suppliers, suppliers, |a, b| {
                a == b && same_decimal(&a.balance, &b.balance)
            })
    }
}

fn same_decimal(a: &Decimal, b: &Decimal) -> bool {
    a.serialize() == b.serialize()
}

fn same_items<T>(stored: &[T], current: &[T], same: impl Fn(&T, &T) -> bool) -> bool {
    stored.len() == current.len() && stored.iter().zip(current).all(|(a, b)| same(a, b))
}

/// Single-entry memo in front of [`aggregate`]
#[derive(Debug, Default)]
pub struct SummaryCache {
    last: Option<(Snapshot, TreasurySummary)>,
    hits: u64,
    misses: u64,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the treasury position for these inputs
    ///
    /// Identical inputs return the memoized result; anything else is
    /// recomputed and replaces the memo.
    pub fn summary(
        &mut self,
        opening_balance: Decimal,
        transactions: &[TransactionRecord],
        customers: &[Customer],
        suppliers: &[Supplier],
    ) -> TreasurySummary {
        if let Some((snapshot, summary)) = &self.last {
            if snapshot.matches(opening_balance, transactions, customers, suppliers) {
                self.hits += 1;
                return *summary;
            }
        }

        self.misses += 1;
        let summary = aggregate(opening_balance, transactions, customers, suppliers);
        self.last = Some((
            Snapshot {
                opening_balance,
                transactions: transactions.to_vec(),
                customers: customers.to_vec(),
                suppliers: suppliers.to_vec(),
            },
            summary,
        ));
        summary
    }

    /// Drop the memo
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TransactionStatus, TransactionType};
    use rstest::rstest;

    fn ledger() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new("1", TransactionType::Sale, Decimal::new(1000, 0)),
            TransactionRecord::new("2", TransactionType::Expense, Decimal::new(2000, 0))
                .with_status(TransactionStatus::Pending),
        ]
    }

    #[test]
    fn test_identical_inputs_hit_the_memo() {
        let mut cache = SummaryCache::new();
        let opening = Decimal::new(50000, 0);

        let first = cache.summary(opening, &ledger(), &[], &[]);
        let second = cache.summary(opening, &ledger(), &[], &[]);

        assert_eq!(first, second);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_changed_snapshot_recomputes() {
        let mut cache = SummaryCache::new();
        let opening = Decimal::new(50000, 0);

        let before = cache.summary(opening, &ledger(), &[], &[]);

        // The pending expense gets approved
        let mut approved = ledger();
        approved[1].status = TransactionStatus::Completed;
        let after = cache.summary(opening, &approved, &[], &[]);

        assert_eq!(before.balance, Decimal::new(51000, 0));
        assert_eq!(after.balance, Decimal::new(49000, 0));
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn test_opening_balance_change_recomputes() {
        let mut cache = SummaryCache::new();

        cache.summary(Decimal::new(50000, 0), &ledger(), &[], &[]);
        let result = cache.summary(Decimal::new(10000, 0), &ledger(), &[], &[]);

        assert_eq!(result.balance, Decimal::new(11000, 0));
        assert_eq!(cache.misses(), 2);
    }

    #[rstest]
    #[case::opening_balance_scale(Decimal::new(5000000, 2), ledger())]
    #[case::amount_scale(Decimal::new(50000, 0), vec![
        TransactionRecord::new("1", TransactionType::Sale, Decimal::new(100000, 2)),
        ledger()[1].clone(),
    ])]
    fn test_rescaled_input_recomputes(
        #[case] opening: Decimal,
        #[case] transactions: Vec<TransactionRecord>,
    ) {
        let mut cache = SummaryCache::new();
        cache.summary(Decimal::new(50000, 0), &ledger(), &[], &[]);

        let cached = cache.summary(opening, &transactions, &[], &[]);
        let fresh = aggregate(opening, &transactions, &[], &[]);

        assert_eq!(cached.balance.to_string(), fresh.balance.to_string());
        assert_eq!(cached.balance.to_string(), "51000.00");
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let mut cache = SummaryCache::new();
        let opening = Decimal::ZERO;

        cache.summary(opening, &ledger(), &[], &[]);
        cache.invalidate();
        cache.summary(opening, &ledger(), &[], &[]);

        assert_eq!(cache.misses(), 2);
    }
}
