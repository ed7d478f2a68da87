use crate::io::record::parse_date;
use crate::strategy::BatchConfig;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Compute the treasury balance and income/expense summary of a ledger
#[derive(Parser, Debug)]
#[command(name = "treasury")]
#[command(about = "Compute the treasury balance and income/expense summary of a ledger", long_about = None)]
pub struct CliArgs {
    /// Ledger export (CSV or JSON REST dump)
    #[arg(value_name = "LEDGER", help = "Path to the ledger export")]
    pub input_file: PathBuf,

    /// Customers list (JSON), used to classify returns
    #[arg(long = "customers", value_name = "FILE")]
    pub customers_file: Option<PathBuf>,

    /// Suppliers list (JSON), used to classify returns
    #[arg(long = "suppliers", value_name = "FILE")]
    pub suppliers_file: Option<PathBuf>,

    /// Opening treasury balance, overrides the settings file
    #[arg(long = "opening-balance", value_name = "DECIMAL", value_parser = parse_decimal, allow_hyphen_values = true)]
    pub opening_balance: Option<Decimal>,

    /// First day of the reporting window (inclusive)
    #[arg(long = "from", value_name = "DATE", value_parser = parse_day)]
    pub from: Option<NaiveDate>,

    /// Last day of the reporting window (inclusive)
    #[arg(long = "to", value_name = "DATE", value_parser = parse_day)]
    pub to: Option<NaiveDate>,

    /// Input format, detected from the file extension when omitted
    #[arg(long = "input-format", value_name = "FORMAT")]
    pub input_format: Option<InputFormat>,

    /// Output format
    #[arg(long = "output-format", value_name = "FORMAT", default_value = "csv")]
    pub output_format: OutputFormat,

    /// How to treat JSON responses of unexpected shape
    #[arg(
        long = "decode-mode",
        value_name = "MODE",
        default_value = "lenient",
        help = "'strict' fails on unexpected JSON shapes, 'lenient' treats them as empty lists"
    )]
    pub decode_mode: DecodeMode,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for streaming single-threaded or 'async' for batched parallel"
    )]
    pub strategy: StrategyType,

    /// Number of transactions per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of transactions per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads for batch folding (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Settings file
    #[arg(long = "config", value_name = "FILE", env = "TREASURY_CONFIG")]
    pub config_file: Option<PathBuf>,
}

/// Available processing strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Ledger input formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Pick a format from the file extension, CSV when unknown
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Csv,
        }
    }
}

/// Report output formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Decoding posture for REST list responses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DecodeMode {
    /// Unexpected shapes are errors
    Strict,
    /// Unexpected shapes degrade to an empty list
    #[default]
    Lenient,
}

fn parse_decimal(value: &str) -> Result<Decimal, String> {
    Decimal::from_str(value.trim()).map_err(|e| format!("invalid decimal '{}': {}", value, e))
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    parse_date(value)
        .map(|date_time| date_time.date())
        .map_err(|e| e.to_string())
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// CLI values win over the settings file, which wins over the defaults.
    pub fn to_batch_config(&self, settings: &BatchConfig) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            BatchConfig::new(
                self.batch_size.unwrap_or(settings.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(settings.max_concurrent_batches),
            )
        } else {
            settings.clone()
        }
    }

    /// Input format, explicit or detected
    pub fn input_format(&self) -> InputFormat {
        self.input_format
            .unwrap_or_else(|| InputFormat::detect(&self.input_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // Strategy parsing tests
    #[rstest]
    #[case::default_strategy(&["program", "ledger.csv"], StrategyType::Sync)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "ledger.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "ledger.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::csv_extension(&["program", "ledger.csv"], InputFormat::Csv)]
    #[case::json_extension(&["program", "export.JSON"], InputFormat::Json)]
    #[case::no_extension(&["program", "ledger"], InputFormat::Csv)]
    #[case::explicit_overrides_extension(&["program", "--input-format", "json", "ledger.csv"], InputFormat::Json)]
    fn test_input_format(#[case] args: &[&str], #[case] expected: InputFormat) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.input_format(), expected);
    }

    #[test]
    fn test_full_argument_set() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--customers",
            "customers.json",
            "--suppliers",
            "suppliers.json",
            "--opening-balance",
            "50000.50",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
            "--output-format",
            "json",
            "--decode-mode",
            "strict",
            "ledger.json",
        ])
        .unwrap();

        assert_eq!(parsed.opening_balance, Some(Decimal::new(5000050, 2)));
        assert_eq!(parsed.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(parsed.to, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(parsed.output_format, OutputFormat::Json);
        assert_eq!(parsed.decode_mode, DecodeMode::Strict);
        assert_eq!(parsed.customers_file, Some(PathBuf::from("customers.json")));
    }

    #[test]
    fn test_negative_opening_balance() {
        let parsed =
            CliArgs::try_parse_from(["program", "--opening-balance", "-250", "ledger.csv"])
                .unwrap();
        assert_eq!(parsed.opening_balance, Some(Decimal::new(-250, 0)));
    }

    // BatchConfig conversion tests
    #[rstest]
    #[case::settings_only(&["program", "ledger.csv"], 500, 3)]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "ledger.csv"], 2000, 3)]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "ledger.csv"], 500, 8)]
    #[case::zero_falls_back_to_default(&["program", "--batch-size", "0", "ledger.csv"], 1000, 3)]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let settings = BatchConfig::new(500, 3);
        let config = parsed.to_batch_config(&settings);

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
    }

    // Error handling tests
    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "ledger.csv"])]
    #[case::invalid_opening_balance(&["program", "--opening-balance", "lots", "ledger.csv"])]
    #[case::invalid_date(&["program", "--from", "01/02/2024", "ledger.csv"])]
    #[case::invalid_decode_mode(&["program", "--decode-mode", "yolo", "ledger.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
