//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Trial balance report configuration.
    pub report: ReportConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// What to do when a node's ending balance does not equal beginning plus midterm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationPolicy {
    /// Log at high severity, record a warning and still return the report.
    #[default]
    Warn,
    /// Fail the request.
    Strict,
}

/// Trial balance report configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Largest page size a caller may request.
    pub max_page_size: u32,
    /// Length of the default filing window in calendar months.
    pub filing_window_months: u32,
    /// IANA time zone the default filing window is computed in.
    pub timezone: String,
    /// Label appended to a parent's name for its synthetic "other" sub-account.
    pub virtual_account_label: String,
    /// Reconciliation failure policy.
    pub reconciliation: ReconciliationPolicy,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_page_size: 200,
            filing_window_months: 2,
            timezone: "UTC".to_string(),
            virtual_account_label: "Other".to_string(),
            reconciliation: ReconciliationPolicy::Warn,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `LEDGERTREE__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("LEDGERTREE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        tracing::debug!(
            run_mode = %run_mode,
            timezone = %config.report.timezone,
            max_page_size = config.report.max_page_size,
            "configuration loaded"
        );
        Ok(config)
    }
}
