use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

use crate::i18n::Locale;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_CURRENCY: &str = "SAR";
const DEFAULT_REMINDER_DAYS: u32 = 7;

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Application environment
    #[serde(default = "default_environment")]
    #[validate(length(min = 1))]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Language used when the caller does not pick one
    #[serde(default)]
    pub default_locale: Locale,

    /// Artificial delay applied by the in-memory repositories, standing in
    /// for a future backend round trip
    #[serde(default)]
    #[validate(range(min = 0, max = 10000))]
    pub simulated_latency_ms: u64,

    /// Currency code shown next to money amounts
    #[serde(default = "default_currency")]
    #[validate(length(min = 3, max = 3))]
    pub currency: String,

    /// Load the sample farm records on startup
    #[serde(default)]
    pub seed_sample_data: bool,

    /// How many days ahead a vaccine due date raises a reminder
    #[serde(default = "default_reminder_days")]
    #[validate(range(min = 1, max = 90))]
    pub vaccination_reminder_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            default_locale: Locale::default(),
            simulated_latency_ms: 0,
            currency: default_currency(),
            seed_sample_data: false,
            vaccination_reminder_days: default_reminder_days(),
        }
    }
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}
fn default_reminder_days() -> u32 {
    DEFAULT_REMINDER_DAYS
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::fmt;

    let default_directive = format!("poultry_ledger={level},poultry_cli={level}");
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    // try_init: a second call (tests, embedding) keeps the first subscriber
    if json {
        let _ = fmt()
            .with_env_filter(filter_directive)
            .with_writer(std::io::stderr)
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter_directive)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let builder = base_builder(Path::new(CONFIG_DIR), &run_env)?
        .add_source(Environment::with_prefix("APP").separator("__"));

    finish(builder.build()?)
}

/// Loads configuration from an explicit directory, without the
/// environment-variable layer.
pub fn load_config_from(dir: &Path, run_env: &str) -> Result<AppConfig, AppConfigError> {
    finish(base_builder(dir, run_env)?.build()?)
}

fn base_builder(
    dir: &Path,
    run_env: &str,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    let builder = Config::builder()
        .set_default("environment", run_env)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::from(dir.join("default")).required(false))
        .add_source(File::from(dir.join(run_env)).required(false));
    Ok(builder)
}

fn finish(config: Config) -> Result<AppConfig, AppConfigError> {
    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_config(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).unwrap();
        }
        temp_dir
    }

    #[test]
    fn defaults_apply_without_files() {
        let dir = setup_test_config(&[]);
        let config = load_config_from(dir.path(), "development").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.default_locale, Locale::Ar);
        assert_eq!(config.vaccination_reminder_days, 7);
        assert_eq!(config.simulated_latency(), Duration::ZERO);
        assert!(config.is_development());
    }

    #[test]
    fn environment_file_overrides_default_file() {
        let dir = setup_test_config(&[
            (
                "default.toml",
                "default_locale = \"en\"\nsimulated_latency_ms = 500\ncurrency = \"USD\"\n",
            ),
            ("production.toml", "simulated_latency_ms = 0\nlog_json = true\n"),
        ]);
        let config = load_config_from(dir.path(), "production").unwrap();
        assert_eq!(config.default_locale, Locale::En);
        assert_eq!(config.currency, "USD");
        assert_eq!(config.simulated_latency_ms, 0);
        assert!(config.log_json);
        assert!(config.is_production());
    }

    #[test]
    fn validation_failure_names_fields() {
        let dir = setup_test_config(&[(
            "default.toml",
            "log_level = \"loud\"\nvaccination_reminder_days = 365\n",
        )]);
        let result = load_config_from(dir.path(), "development");
        match result {
            Err(AppConfigError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("log_level"));
                assert!(errors.field_errors().contains_key("vaccination_reminder_days"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = setup_test_config(&[("default.toml", "database_url = \"x\"\n")]);
        assert!(matches!(
            load_config_from(dir.path(), "development"),
            Err(AppConfigError::Load(_))
        ));
    }
}
