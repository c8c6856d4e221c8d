//! Tracing subscriber setup for hosts embedding the report engine.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::error::{AppError, AppResult};

/// Builds the log filter: `RUST_LOG` when set, otherwise the configured directives.
///
/// # Errors
///
/// Returns `AppError::Configuration` if the configured directives do not parse.
pub fn build_filter(config: &LoggingConfig) -> AppResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter)
        .map_err(|e| AppError::Configuration(format!("invalid log filter '{}': {e}", config.filter)))
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber is already set.
pub fn init(config: &LoggingConfig) -> AppResult<()> {
    let filter = build_filter(config)?;

    let json_layer = config.json.then(|| fmt::layer().json());
    let text_layer = (!config.json).then(fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| AppError::Internal(format!("tracing subscriber already installed: {e}")))?;

    tracing::info!(filter = %config.filter, json = config.json, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_rejects_garbage() {
        temp_env::with_var_unset("RUST_LOG", || {
            let config = LoggingConfig {
                filter: "ledgertree=notalevel".to_string(),
                json: false,
            };
            assert!(matches!(
                build_filter(&config),
                Err(AppError::Configuration(_))
            ));
        });
    }

    #[test]
    fn test_build_filter_accepts_directives() {
        temp_env::with_var_unset("RUST_LOG", || {
            let config = LoggingConfig {
                filter: "ledgertree_core=debug,warn".to_string(),
                json: true,
            };
            assert!(build_filter(&config).is_ok());
        });
    }

    #[test]
    fn test_init_twice_fails_second_time() {
        temp_env::with_var_unset("RUST_LOG", || {
            let config = LoggingConfig::default();
            let _ = init(&config);
            assert!(matches!(init(&config), Err(AppError::Internal(_))));
        });
    }
}
