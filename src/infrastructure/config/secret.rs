//! Redacting wrappers for credentials held in configuration.

use std::fmt;

use url::Url;

use crate::error::{ConfigError, Result};

/// An opaque credential. Never rendered by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw credential, for handing to a client that needs it.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// A validated Postgres connection string.
///
/// Displays as `postgres://***@host:port/database`; credentials and query
/// parameters are never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseUrl {
    raw: Secret,
    parsed: Url,
}

impl DatabaseUrl {
    /// Parse and validate a connection string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] when the value is not a URL,
    /// uses a scheme other than `postgres`/`postgresql`, or names no host.
    pub fn parse(key: &'static str, value: &str) -> Result<Self> {
        let parsed = Url::parse(value).map_err(|e| ConfigError::InvalidConfiguration {
            key,
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "postgres" | "postgresql" => {}
            other => {
                return Err(ConfigError::InvalidConfiguration {
                    key,
                    reason: format!("unsupported scheme '{other}', expected postgres"),
                }
                .into())
            }
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::InvalidConfiguration {
                key,
                reason: "missing host".to_string(),
            }
            .into());
        }

        Ok(Self {
            raw: Secret::new(value),
            parsed,
        })
    }

    /// The full connection string, for the database driver only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.raw.expose()
    }

    #[must_use]
    pub fn host(&self) -> &str {
        self.parsed.host_str().unwrap_or_default()
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.parsed.port().unwrap_or(5432)
    }

    #[must_use]
    pub fn database(&self) -> &str {
        self.parsed.path().trim_start_matches('/')
    }

    /// Loggable form of the URL.
    #[must_use]
    pub fn redacted(&self) -> String {
        format!(
            "{}://***@{}:{}/{}",
            self.parsed.scheme(),
            self.host(),
            self.port(),
            self.database()
        )
    }
}

impl fmt::Debug for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DatabaseUrl").field(&self.redacted()).finish()
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}
