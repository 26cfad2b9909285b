use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required configuration: {key}")]
    MissingConfiguration { key: &'static str },

    #[error("invalid value for {key}: {reason}")]
    InvalidConfiguration { key: &'static str, reason: String },

    #[error("failed to read environment file {path}: {reason}")]
    ReadFile { path: String, reason: String },
}

/// A non-success response from the upstream time-series API.
///
/// Only the endpoint name is kept; the request URL embeds the API key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("upstream {endpoint} returned HTTP {status}")]
pub struct UpstreamError {
    pub endpoint: String,
    pub status: u16,
    pub retryable: bool,
}

impl UpstreamError {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, status: u16) -> Self {
        Self {
            endpoint: endpoint.into(),
            status,
            retryable: is_retryable_status(status),
        }
    }
}

/// 429 and the 5xx gateway family are worth another attempt.
#[must_use]
pub const fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(#[from] diesel::result::Error),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key in its path.
        Error::Http(err.without_url())
    }
}

impl From<diesel::r2d2::PoolError> for Error {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Error::Connection(err.to_string())
    }
}

impl Error {
    /// Process exit code for a command that failed with this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,
            _ => 1,
        }
    }

    /// True when retrying the same upstream call may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Upstream(err) => err.retryable,
            Error::Http(err) => err.is_timeout() || err.is_connect(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_statuses() {
        for status in [429, 500, 502, 503, 504] {
            assert!(is_retryable_status(status), "{status} should be retryable");
        }
        for status in [400, 401, 403, 404, 501] {
            assert!(!is_retryable_status(status), "{status} should not be retryable");
        }
    }

    #[test]
    fn upstream_error_carries_status_and_flag() {
        let err = UpstreamError::new("eventsseason.php", 429);
        assert_eq!(err.status, 429);
        assert!(err.retryable);
        assert_eq!(err.to_string(), "upstream eventsseason.php returned HTTP 429");

        let err = UpstreamError::new("lookupteam.php", 404);
        assert!(!err.retryable);
    }

    #[test]
    fn config_errors_exit_with_two() {
        let err: Error = ConfigError::MissingConfiguration {
            key: "DATABASE_URL",
        }
        .into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(Error::NotFound("season".into()).exit_code(), 1);
    }

    #[test]
    fn upstream_retryability_propagates() {
        let err: Error = UpstreamError::new("lookupleague.php", 503).into();
        assert!(err.is_retryable());
        let err: Error = UpstreamError::new("lookupleague.php", 401).into();
        assert!(!err.is_retryable());
        assert!(!Error::NotFound("x".into()).is_retryable());
    }
}
