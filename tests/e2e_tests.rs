//! End-to-end integration tests
//!
//! These tests validate the complete aggregation pipeline using predefined
//! fixtures. Each test:
//! 1. Reads input.csv or input.json from a fixture directory
//! 2. Loads customers.json and suppliers.json when present
//! 3. Aggregates the ledger with an opening balance of 50000
//! 4. Compares the summary CSV with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - The reference scenarios (cash sale, expense, deferred sale, pending
//!   expense, customer return, supplier return)
//! - A mixed ledger touching every rule
//! - Malformed rows and period filtering
//! - Paginated and flat REST dumps, and lenient shape drift
//!
//! Each test is run twice: once with the sync strategy and once with the async strategy.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::fs;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use tempfile::NamedTempFile;
    use treasury_ledger::cli::{DecodeMode, OutputFormat, StrategyType};
    use treasury_ledger::core::{AggregationContext, PartyDirectory, Period};
    use treasury_ledger::io::{read_customers, read_suppliers};
    use treasury_ledger::strategy::{create_strategy, BatchConfig, LedgerInput};
    use treasury_ledger::types::LedgerError;

    const OPENING_BALANCE: Decimal = Decimal::from_parts(50000, 0, 0, false, 0);

    fn fixture_dir(fixture_name: &str) -> PathBuf {
        Path::new("tests/fixtures").join(fixture_name)
    }

    fn input_path(dir: &Path) -> PathBuf {
        let json = dir.join("input.json");
        if json.exists() {
            json
        } else {
            dir.join("input.csv")
        }
    }

    fn context(dir: &Path, period: Period) -> AggregationContext {
        let customers_path = dir.join("customers.json");
        let suppliers_path = dir.join("suppliers.json");

        let customers = if customers_path.exists() {
            read_customers(&customers_path, DecodeMode::Strict)
                .unwrap_or_else(|e| panic!("Failed to read customers: {}", e))
        } else {
            Vec::new()
        };
        let suppliers = if suppliers_path.exists() {
            read_suppliers(&suppliers_path, DecodeMode::Strict)
                .unwrap_or_else(|e| panic!("Failed to read suppliers: {}", e))
        } else {
            Vec::new()
        };

        AggregationContext::new(
            OPENING_BALANCE,
            PartyDirectory::from_parties(&customers, &suppliers),
        )
        .with_period(period)
    }

    fn batch_config(strategy_type: &StrategyType) -> Option<BatchConfig> {
        // Tiny batches so multi-row fixtures span several batches and chunks
        matches!(strategy_type, StrategyType::Async).then(|| BatchConfig::new(2, 2))
    }

    /// Run a test fixture by aggregating its input and comparing with expected.csv
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Input or expected files cannot be read
    /// - Output doesn't match expected
    fn run_test_fixture(fixture_name: &str, period: Period, strategy_type: StrategyType) {
        let dir = fixture_dir(fixture_name);
        let input = input_path(&dir);
        let expected_path = dir.join("expected.csv");

        assert!(input.exists(), "Input file not found: {}", input.display());
        assert!(
            expected_path.exists(),
            "Expected file not found: {}",
            expected_path.display()
        );

        let strategy = create_strategy(strategy_type.clone(), batch_config(&strategy_type));
        let context = context(&dir, period);

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        strategy
            .process(
                &LedgerInput::new(&input),
                &context,
                OutputFormat::Csv,
                &mut temp_output,
            )
            .unwrap_or_else(|e| panic!("Failed to process ledger: {}", e));

        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));

        let expected_output = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
            panic!(
                "Failed to read expected file {}: {}",
                expected_path.display(),
                e
            )
        });

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );
    }

    fn day(value: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    }

    /// End-to-end test for all fixtures with both strategies
    #[rstest]
    #[case("scenario_a_cash_sale", Period::unbounded())]
    #[case("scenario_b_cash_expense", Period::unbounded())]
    #[case("scenario_c_deferred_sale", Period::unbounded())]
    #[case("scenario_d_pending_expense", Period::unbounded())]
    #[case("scenario_e_customer_return", Period::unbounded())]
    #[case("scenario_f_supplier_return", Period::unbounded())]
    #[case("mixed_ledger", Period::unbounded())]
    #[case("malformed_data", Period::unbounded())]
    #[case("period_filter", Period::new(day("2024-01-05"), day("2024-01-09")))]
    #[case("paginated_json", Period::unbounded())]
    #[case("flat_json", Period::unbounded())]
    #[case("lenient_shape_drift", Period::unbounded())]
    #[case("empty_ledger", Period::unbounded())]
    fn test_fixtures(
        #[case] fixture: &str,
        #[case] period: Period,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, period, strategy);
    }

    #[rstest]
    fn test_strict_decode_rejects_shape_drift(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy_type: StrategyType,
    ) {
        let dir = fixture_dir("lenient_shape_drift");
        let input = input_path(&dir);
        let strategy = create_strategy(strategy_type.clone(), batch_config(&strategy_type));

        let result = strategy.aggregate(
            &LedgerInput::new(&input).with_decode_mode(DecodeMode::Strict),
            &context(&dir, Period::unbounded()),
        );

        assert!(matches!(result, Err(LedgerError::UnexpectedShape { .. })));
    }

    #[rstest]
    fn test_json_report_statistics(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy_type: StrategyType,
    ) {
        let dir = fixture_dir("mixed_ledger");
        let strategy = create_strategy(strategy_type.clone(), batch_config(&strategy_type));

        let mut output = Vec::new();
        strategy
            .process(
                &LedgerInput::new(&input_path(&dir)),
                &context(&dir, Period::unbounded()),
                OutputFormat::Json,
                &mut output,
            )
            .unwrap();

        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(report["balance"], "57955.25");
        assert_eq!(report["stats"]["applied"], 10);
        assert_eq!(report["stats"]["skippedDeferred"], 1);
        assert_eq!(report["stats"]["skippedStatus"], 2);
        assert_eq!(report["stats"]["noCashEffect"], 1);

        let methods: Vec<&str> = report["byMethod"]
            .as_array()
            .unwrap()
            .iter()
            .map(|line| line["paymentMethod"].as_str().unwrap())
            .collect();
        assert_eq!(methods, vec!["CASH", "WALLET", "INSTAPAY"]);
    }

    #[rstest]
    fn test_strategies_agree_on_reversed_ledger(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy_type: StrategyType,
    ) {
        let dir = fixture_dir("mixed_ledger");
        let original = fs::read_to_string(input_path(&dir)).unwrap();
        let mut lines: Vec<&str> = original.lines().collect();
        let header = lines.remove(0);
        lines.reverse();

        let mut reversed = NamedTempFile::new().unwrap();
        writeln!(reversed, "{}", header).unwrap();
        for line in lines {
            writeln!(reversed, "{}", line).unwrap();
        }
        reversed.flush().unwrap();

        let strategy = create_strategy(strategy_type.clone(), batch_config(&strategy_type));
        let context = context(&dir, Period::unbounded());

        let forward = strategy
            .aggregate(&LedgerInput::new(&input_path(&dir)), &context)
            .unwrap();
        let backward = strategy
            .aggregate(&LedgerInput::new(reversed.path()), &context)
            .unwrap();

        assert_eq!(forward.summary, backward.summary);
        assert_eq!(forward.stats, backward.stats);
    }
}
