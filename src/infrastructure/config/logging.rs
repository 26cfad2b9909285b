//! Logging configuration and initialization.

use std::str::FromStr;

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::ConfigError;

/// Tracing target of this crate's own events.
const CRATE_TARGET: &str = "rugby_ingest";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidConfiguration {
                key: "LOG_FORMAT",
                reason: format!("unknown format '{other}', expected pretty or json"),
            }),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Filter directive after applying `-v` flags on top of the configured level.
    ///
    /// `debug` and `trace` only reach this crate; dependencies stay at `info`
    /// because HTTP request URLs carry the API key.
    #[must_use]
    pub fn directive(&self, verbosity: u8) -> String {
        let level = match verbosity {
            0 => self.level.trim(),
            1 => "debug",
            _ => "trace",
        };
        if level.eq_ignore_ascii_case("debug") || level.eq_ignore_ascii_case("trace") {
            format!("info,{CRATE_TARGET}={}", level.to_ascii_lowercase())
        } else {
            level.to_string()
        }
    }

    /// Initialize the tracing subscriber. Logs go to stderr so stdout stays
    /// reserved for command output.
    pub fn init(&self, verbosity: u8) {
        let directive = self.directive(verbosity);
        let filter = if verbosity > 0 {
            EnvFilter::new(directive)
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
        };

        match self.format {
            LogFormat::Json => {
                fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .init();
            }
            LogFormat::Pretty => {
                fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn verbosity_raises_level_for_this_crate_only() {
        let config = LoggingConfig::default();
        assert_eq!(config.directive(0), "info");
        assert_eq!(config.directive(1), "info,rugby_ingest=debug");
        assert_eq!(config.directive(3), "info,rugby_ingest=trace");
    }

    #[test]
    fn configured_debug_keeps_dependencies_at_info() {
        let config = LoggingConfig {
            level: "DEBUG".into(),
            format: LogFormat::Pretty,
        };
        assert_eq!(config.directive(0), "info,rugby_ingest=debug");

        let quiet = LoggingConfig {
            level: "warn".into(),
            format: LogFormat::Pretty,
        };
        assert_eq!(quiet.directive(0), "warn");
    }
}
