//! Request-scoped aggregation context
//!
//! Everything a run depends on besides the ledger itself is passed in
//! through an `AggregationContext`: the opening balance from settings, the
//! party directory snapshot and the optional reporting window. Nothing is
//! read from ambient state.

use crate::core::party_directory::PartyDirectory;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Inclusive date window
///
/// An open bound on either side accepts everything on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Period {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Period {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Period { from, to }
    }

    /// A period with neither bound set
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether a transaction dated `date` falls inside the window
    ///
    /// Undated transactions only pass an unbounded period.
    pub fn contains(&self, date: Option<NaiveDateTime>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(day) = date.map(|d| d.date()) else {
            return false;
        };
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

/// Inputs shared by every record of one aggregation run
#[derive(Debug, Clone)]
pub struct AggregationContext {
    /// Opening treasury balance, passed through verbatim
    pub opening_balance: Decimal,
    pub parties: Arc<PartyDirectory>,
    pub period: Period,
}

impl AggregationContext {
    pub fn new(opening_balance: Decimal, parties: PartyDirectory) -> Self {
        AggregationContext {
            opening_balance,
            parties: Arc::new(parties),
            period: Period::unbounded(),
        }
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> Option<NaiveDateTime> {
        day(y, m, d).and_hms_opt(13, 30, 0)
    }

    fn since(y: i32, m: u32, d: u32) -> Period {
        Period::new(Some(day(y, m, d)), None)
    }

    fn until(y: i32, m: u32, d: u32) -> Period {
        Period::new(None, Some(day(y, m, d)))
    }

    fn january() -> Period {
        Period::new(Some(day(2024, 1, 1)), Some(day(2024, 1, 31)))
    }

    #[rstest]
    #[case::unbounded_accepts_undated(Period::unbounded(), None, true)]
    #[case::bounded_rejects_undated(since(2024, 1, 1), None, false)]
    #[case::inside(january(), at(2024, 1, 15), true)]
    #[case::from_is_inclusive(since(2024, 1, 1), at(2024, 1, 1), true)]
    #[case::to_is_inclusive(until(2024, 1, 31), at(2024, 1, 31), true)]
    #[case::before(since(2024, 1, 1), at(2023, 12, 31), false)]
    #[case::after(until(2024, 1, 31), at(2024, 2, 1), false)]
    fn test_period_contains(
        #[case] period: Period,
        #[case] date: Option<NaiveDateTime>,
        #[case] expected: bool,
    ) {
        assert_eq!(period.contains(date), expected);
    }
}
