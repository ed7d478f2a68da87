use crate::cli::OutputFormat;
use crate::io::csv_format::write_summary_csv;
use crate::io::json_format::write_report_json;
use crate::types::{LedgerError, LedgerReport};
use std::io::Write;

/// Write a report in the requested format
pub fn write_report(
    report: &LedgerReport,
    format: OutputFormat,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    match format {
        OutputFormat::Csv => write_summary_csv(report, output),
        OutputFormat::Json => write_report_json(report, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProcessingStats, TreasurySummary};
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    #[rstest]
    #[case::csv(OutputFormat::Csv, "opening_balance,")]
    #[case::json(OutputFormat::Json, "{")]
    fn test_write_report_dispatches_on_format(
        #[case] format: OutputFormat,
        #[case] expected_prefix: &str,
    ) {
        let report = LedgerReport::new(
            Decimal::ZERO,
            TreasurySummary {
                balance: Decimal::ZERO,
                total_income: Decimal::ZERO,
                total_expenses: Decimal::ZERO,
                net_flow: Decimal::ZERO,
            },
            BTreeMap::new(),
            ProcessingStats::default(),
        );

        let mut output = Vec::new();
        write_report(&report, format, &mut output).unwrap();

        assert!(String::from_utf8(output).unwrap().starts_with(expected_prefix));
    }
}
