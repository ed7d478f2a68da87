//! Treasury ledger CLI
//!
//! Computes the treasury balance and income/expense summary of a ledger
//! export.
//!
//! # Usage
//!
//! ```bash
//! treasury ledger.csv > summary.csv
//! treasury --customers customers.json --suppliers suppliers.json ledger.csv
//! treasury --opening-balance 50000 --from 2024-01-01 --to 2024-01-31 transactions.json
//! treasury --strategy async --batch-size 2000 --max-concurrent 8 ledger.csv
//! treasury --output-format json --decode-mode strict transactions.json
//! ```
//!
//! The report goes to stdout, logs go to stderr. `RUST_LOG` overrides the
//! `log_level` setting.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing file, unreadable input, invalid settings, strict decode failure)

use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;
use treasury_ledger::cli::{self, CliArgs, DecodeMode, StrategyType};
use treasury_ledger::core::{AggregationContext, PartyDirectory, Period};
use treasury_ledger::io::{read_customers, read_suppliers};
use treasury_ledger::settings::Settings;
use treasury_ledger::strategy::{self, LedgerInput};
use treasury_ledger::types::LedgerError;

const DEFAULT_LOG_LEVEL: &str = "warn";

fn init_logging(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.unwrap_or(DEFAULT_LOG_LEVEL)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_parties(
    customers: Option<&Path>,
    suppliers: Option<&Path>,
    mode: DecodeMode,
) -> Result<PartyDirectory, LedgerError> {
    let customers = match customers {
        Some(path) => read_customers(path, mode)?,
        None => Vec::new(),
    };
    let suppliers = match suppliers {
        Some(path) => read_suppliers(path, mode)?,
        None => Vec::new(),
    };

    let directory = PartyDirectory::from_parties(&customers, &suppliers);
    tracing::info!(
        customers = directory.customer_count(),
        suppliers = directory.supplier_count(),
        "Loaded parties"
    );
    Ok(directory)
}

fn run(args: &CliArgs, settings: &Settings) -> Result<(), LedgerError> {
    let parties = load_parties(
        args.customers_file.as_deref(),
        args.suppliers_file.as_deref(),
        args.decode_mode,
    )?;

    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            tracing::warn!(%from, %to, "Period is empty, no transaction will be applied");
        }
    }

    let opening_balance = args.opening_balance.unwrap_or(settings.opening_balance);
    let context = AggregationContext::new(opening_balance, parties)
        .with_period(Period::new(args.from, args.to));

    let strategy = {
        let config = if matches!(args.strategy, StrategyType::Async) {
            Some(args.to_batch_config(&settings.batch_config()))
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), config)
    };

    let input = LedgerInput::new(&args.input_file)
        .with_format(args.input_format())
        .with_decode_mode(args.decode_mode);

    let mut output = std::io::stdout().lock();
    strategy.process(&input, &context, args.output_format, &mut output)
}

fn main() {
    let args = cli::parse_args();

    let settings = match Settings::load(args.config_file.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    init_logging(settings.log_level.as_deref());

    if let Err(e) = run(&args, &settings) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
