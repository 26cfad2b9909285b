//! TheSportsDB v1 HTTP client.
//!
//! Requests go to `{base_url}/{api_key}/{endpoint}`. The key is part of the
//! path, so request URLs are never logged and transport errors are stripped
//! of their URL before they leave this module.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::settings::{TsdbSettings, USER_AGENT};
use crate::error::{Error, Result, UpstreamError};
use crate::infrastructure::config::Secret;
use crate::port::outbound::source::{RecordSource, SourceQuery};

/// HTTP record source for TheSportsDB.
pub struct TsdbClient {
    http: HttpClient,
    api_key: Secret,
    settings: TsdbSettings,
}

impl TsdbClient {
    /// Build a client with the configured timeouts and user agent.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_key: Secret, settings: TsdbSettings) -> Result<Self> {
        let http = HttpClient::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key,
            settings,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            self.api_key.expose(),
            endpoint.trim_start_matches('/')
        )
    }

    async fn get_once(&self, query: &SourceQuery) -> Result<Value> {
        let response = self
            .http
            .get(self.url(&query.endpoint))
            .query(&query.params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::new(query.endpoint.clone(), status.as_u16()).into());
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            debug!(endpoint = %query.endpoint, "Empty response body");
            return Ok(Value::Null);
        }
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(
                    endpoint = %query.endpoint,
                    error = %err,
                    "Response is not JSON, treating as empty"
                );
                Ok(Value::Null)
            }
        }
    }

    async fn get_with_retry(&self, query: &SourceQuery) -> Result<Value> {
        let policy = &self.settings.retry;
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.get_once(query).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < max_attempts && err.is_retryable() => {
                    self.backoff(query, attempt, max_attempts, &err).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn backoff(&self, query: &SourceQuery, attempt: u32, max_attempts: u32, err: &Error) {
        let delay = self.settings.retry.delay_after(attempt);
        warn!(
            endpoint = %query.endpoint,
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Upstream request failed, retrying"
        );
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}

#[async_trait]
impl RecordSource for TsdbClient {
    async fn fetch(&self, query: &SourceQuery) -> Result<Value> {
        debug!(endpoint = %query.endpoint, params = ?query.params, "TSDB request");
        self.get_with_retry(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_key_and_endpoint() {
        let settings = TsdbSettings {
            base_url: "http://localhost:9000/api/v1/json/".into(),
            ..TsdbSettings::default()
        };
        let client = TsdbClient::new(Secret::new("abc123"), settings).unwrap();
        assert_eq!(
            client.url("/lookupleague.php"),
            "http://localhost:9000/api/v1/json/abc123/lookupleague.php"
        );
    }
}
