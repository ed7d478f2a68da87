//! Handles settings for the application. Configuration is read from an
//! optional `treasury.toml` and `TREASURY_*` environment variables, the
//! latter taking precedence (`TREASURY_BATCH__SIZE` sets `batch.size`).
//!
//! ```toml
//! opening_balance = "50000.00"
//! log_level = "info"
//!
//! [batch]
//! size = 1000
//! max_concurrent = 4
//! ```

use crate::strategy::BatchConfig;
use crate::types::LedgerError;
use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Settings file looked up in the working directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "treasury";

const ENV_PREFIX: &str = "TREASURY";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub size: usize,
    pub max_concurrent: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        let config = BatchConfig::default();
        Self {
            size: config.batch_size,
            max_concurrent: config.max_concurrent_batches,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Treasury balance before the first ledger entry
    pub opening_balance: Decimal,
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: Option<String>,
    pub batch: BatchSettings,
}

/// `TREASURY_` prefix, `__` between nested keys
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

impl Settings {
    /// Load settings from `path` (required) or `treasury.*` (optional)
    pub fn load(path: Option<&Path>) -> Result<Self, LedgerError> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, LedgerError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig::new(self.batch.size, self.batch.max_concurrent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn settings_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(vars))
    }

    #[test]
    fn test_defaults_without_sources() {
        let settings = Settings::load_with_env(None, env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.opening_balance, Decimal::ZERO);
        assert_eq!(settings.batch.size, 1000);
    }

    #[test]
    fn test_load_from_file() {
        let file = settings_file(
            "opening_balance = \"50000.50\"\n\
             log_level = \"debug\"\n\
             [batch]\n\
             size = 250\n",
        );

        let settings = Settings::load_with_env(Some(file.path()), env(&[])).unwrap();

        assert_eq!(settings.opening_balance, Decimal::new(5000050, 2));
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        assert_eq!(settings.batch.size, 250);
        assert_eq!(settings.batch.max_concurrent, num_cpus::get());
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = settings_file("opening_balance = \"100\"\n");

        let settings = Settings::load_with_env(
            Some(file.path()),
            env(&[
                ("TREASURY_OPENING_BALANCE", "-20.75"),
                ("TREASURY_BATCH__MAX_CONCURRENT", "3"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.opening_balance, Decimal::new(-2075, 2));
        assert_eq!(settings.batch.max_concurrent, 3);
    }

    #[test]
    fn test_environment_without_file() {
        let settings = Settings::load_with_env(
            None,
            env(&[
                ("TREASURY_OPENING_BALANCE", "1200.50"),
                ("TREASURY_LOG_LEVEL", "debug"),
                ("TREASURY_BATCH__SIZE", "64"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.opening_balance, Decimal::new(120050, 2));
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        assert_eq!(settings.batch.size, 64);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result =
            Settings::load_with_env(Some(Path::new("/nonexistent/treasury.toml")), env(&[]));
        assert!(matches!(result, Err(LedgerError::ConfigError { .. })));
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let file = settings_file("opening_balance = \"plenty\"\n");
        let result = Settings::load_with_env(Some(file.path()), env(&[]));
        assert!(matches!(result, Err(LedgerError::ConfigError { .. })));
    }

    #[test]
    fn test_batch_config_from_settings() {
        let settings = Settings {
            batch: BatchSettings {
                size: 0,
                max_concurrent: 2,
            },
            ..Default::default()
        };

        let config = settings.batch_config();
        assert_eq!(config, BatchConfig::new(1000, 2));
    }
}
