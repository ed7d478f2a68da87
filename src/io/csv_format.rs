//! CSV format handling for ledger records and summary output
//!
//! This module centralizes the CSV format concerns:
//! - Reader configuration shared by the sync and async readers
//! - Summary serialization (one header, one row, two decimal places)
//!
//! Record validation lives in [`crate::io::record`] so the CSV and JSON
//! inputs stay in lockstep.

use crate::types::{LedgerError, LedgerReport};
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;

/// Columns of the summary output
pub const SUMMARY_HEADER: [&str; 5] = [
    "opening_balance",
    "total_income",
    "total_expenses",
    "net_flow",
    "balance",
];

/// Read buffer shared by both CSV readers
pub(crate) const READ_BUFFER_CAPACITY: usize = 8 * 1024;

/// Cents, half away from zero
fn money(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Write the treasury summary in CSV format
///
/// Writes a header and a single row with columns
/// `opening_balance,total_income,total_expenses,net_flow,balance`.
///
/// # Arguments
///
/// * `report` - The report whose summary is written
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(LedgerError)` if a write error occurred
pub fn write_summary_csv(report: &LedgerReport, output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(SUMMARY_HEADER)?;
    writer.write_record(&[
        money(report.opening_balance),
        money(report.summary.total_income),
        money(report.summary.total_expenses),
        money(report.summary.net_flow),
        money(report.summary.balance),
    ])?;

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProcessingStats, TreasurySummary};
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn report(opening: Decimal, income: Decimal, expenses: Decimal) -> LedgerReport {
        let summary = TreasurySummary {
            balance: opening + income - expenses,
            total_income: income,
            total_expenses: expenses,
            net_flow: income - expenses,
        };
        LedgerReport::new(opening, summary, BTreeMap::new(), ProcessingStats::default())
    }

    #[rstest]
    #[case::empty_ledger(
        report(Decimal::new(50000, 0), Decimal::ZERO, Decimal::ZERO),
        "opening_balance,total_income,total_expenses,net_flow,balance\n50000.00,0.00,0.00,0.00,50000.00\n"
    )]
    #[case::positive_flow(
        report(Decimal::new(50000, 0), Decimal::new(1000, 0), Decimal::new(250, 0)),
        "opening_balance,total_income,total_expenses,net_flow,balance\n50000.00,1000.00,250.00,750.00,50750.00\n"
    )]
    #[case::negative_flow(
        report(Decimal::ZERO, Decimal::new(100, 0), Decimal::new(300, 0)),
        "opening_balance,total_income,total_expenses,net_flow,balance\n0.00,100.00,300.00,-200.00,-200.00\n"
    )]
    #[case::rounds_to_cents(
        report(Decimal::new(1, 3), Decimal::new(12345, 3), Decimal::ZERO),
        "opening_balance,total_income,total_expenses,net_flow,balance\n0.00,12.35,0.00,12.35,12.35\n"
    )]
    fn test_write_summary_csv(#[case] report: LedgerReport, #[case] expected_output: &str) {
        let mut output = Vec::new();
        write_summary_csv(&report, &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, expected_output);
    }
}
