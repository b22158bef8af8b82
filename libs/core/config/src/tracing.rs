use crate::{env_or_default, env_parse, ConfigError, Environment, FromEnv};
use strum::{Display, EnumString};
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Output format of the fmt layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, for log aggregation
    Json,
    /// Multi-line human readable output
    Pretty,
}

/// Tracing subscriber configuration
#[derive(Clone, Debug)]
pub struct TracingConfig {
    pub environment: Environment,
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl TracingConfig {
    /// Defaults for the given environment: JSON at `info` in production,
    /// pretty at `debug` otherwise.
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_production() {
            Self {
                environment,
                format: LogFormat::Json,
                default_filter: "info".to_string(),
            }
        } else {
            Self {
                environment,
                format: LogFormat::Pretty,
                default_filter: "debug".to_string(),
            }
        }
    }
}

impl FromEnv for TracingConfig {
    /// Reads from environment variables:
    /// - APP_ENV: selects the defaults (see [`TracingConfig::for_environment`])
    /// - LOG_FORMAT: `json` or `pretty`
    /// - LOG_LEVEL: default filter directive
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::for_environment(Environment::from_env());

        let format = env_parse::<LogFormat>("LOG_FORMAT")?.unwrap_or(defaults.format);
        let default_filter = env_or_default("LOG_LEVEL", &defaults.default_filter);

        Ok(Self {
            format,
            default_filter,
            ..defaults
        })
    }
}

/// Initialize tracing with error span capture.
///
/// `RUST_LOG` overrides `config.default_filter` when set. Calling this more
/// than once is fine: later calls leave the first subscriber in place, which
/// is what tests rely on.
pub fn init_tracing(config: &TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
    };

    match result {
        Ok(_) => info!(
            environment = ?config.environment,
            format = %config.format,
            "Tracing initialized"
        ),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_environment() {
        temp_env::with_vars(
            [
                ("APP_ENV", Some("production")),
                ("LOG_FORMAT", None),
                ("LOG_LEVEL", None),
            ],
            || {
                let config = TracingConfig::from_env().unwrap();
                assert_eq!(config.environment, Environment::Production);
                assert_eq!(config.format, LogFormat::Json);
                assert_eq!(config.default_filter, "info");
            },
        );

        temp_env::with_vars(
            [
                ("APP_ENV", None::<&str>),
                ("LOG_FORMAT", None),
                ("LOG_LEVEL", None),
            ],
            || {
                let config = TracingConfig::from_env().unwrap();
                assert_eq!(config.environment, Environment::Development);
                assert_eq!(config.format, LogFormat::Pretty);
                assert_eq!(config.default_filter, "debug");
            },
        );
    }

    #[test]
    fn test_overrides_from_env() {
        temp_env::with_vars(
            [
                ("APP_ENV", Some("production")),
                ("LOG_FORMAT", Some("Pretty")),
                ("LOG_LEVEL", Some("domain_items=trace")),
            ],
            || {
                let config = TracingConfig::from_env().unwrap();
                assert_eq!(config.format, LogFormat::Pretty);
                assert_eq!(config.default_filter, "domain_items=trace");
            },
        );
    }

    #[test]
    fn test_invalid_log_format() {
        temp_env::with_var("LOG_FORMAT", Some("xml"), || {
            let err = TracingConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("LOG_FORMAT"));
        });
    }

    #[test]
    fn test_init_tracing_multiple_calls() {
        let config = TracingConfig::for_environment(Environment::Development);
        init_tracing(&config);
        init_tracing(&config);
        init_tracing(&TracingConfig::for_environment(Environment::Production));
    }
}
