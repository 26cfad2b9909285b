//! Remote record source port.
//!
//! A [`RecordSource`] turns a [`SourceQuery`] into a lazy stream of JSON
//! records. Implementations only provide [`RecordSource::fetch`]; the stream
//! wrapper defers that call until the stream is first polled.

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use serde_json::Value;

use crate::error::Result;

/// One upstream record: a JSON object as returned by the API.
pub type Record = serde_json::Map<String, Value>;

/// A single request against a record source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceQuery {
    /// Endpoint path relative to the source root, e.g. `lookupleague.php`.
    pub endpoint: String,
    /// Query string parameters, sent in order.
    pub params: Vec<(String, String)>,
    /// Response keys that may hold the record array; the first non-empty one wins.
    pub collections: Vec<String>,
}

impl SourceQuery {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, collections: &[&str]) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: Vec::new(),
            collections: collections.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Value of a query parameter, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Produces records from a remote time-series API.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Perform one request and return the decoded response body.
    ///
    /// # Errors
    /// Returns [`UpstreamError`](crate::error::UpstreamError) on a non-success
    /// status, or a transport error.
    async fn fetch(&self, query: &SourceQuery) -> Result<Value>;

    /// Lazy record stream for `query`. Nothing is requested until polled.
    fn records(&self, query: SourceQuery) -> BoxStream<'_, Result<Record>> {
        stream::once(async move {
            self.fetch(&query)
                .await
                .map(|body| extract_records(&body, &query.collections))
        })
        .flat_map(|outcome| {
            let items: Vec<Result<Record>> = match outcome {
                Ok(records) => records.into_iter().map(Ok).collect(),
                Err(e) => vec![Err(e)],
            };
            stream::iter(items)
        })
        .boxed()
    }
}

/// Pull the record array out of a response body.
///
/// Collection keys are tried in order and the first non-empty array wins. A
/// bare object under a key counts as one record. `null`, missing keys, and
/// non-object bodies yield nothing; array entries that are not objects are
/// dropped.
#[must_use]
pub fn extract_records(body: &Value, collections: &[String]) -> Vec<Record> {
    for key in collections {
        match body.get(key) {
            Some(Value::Array(items)) if !items.is_empty() => {
                return items
                    .iter()
                    .filter_map(|item| item.as_object().cloned())
                    .collect();
            }
            Some(Value::Object(single)) => return vec![single.clone()],
            _ => {}
        }
    }
    Vec::new()
}
