//! Scripted [`RecordSource`] for testing.
//!
//! Responses are keyed by endpoint and query parameters. Queued failures are
//! returned first, then the sticky response; unknown queries answer with an
//! empty body.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::port::outbound::source::{RecordSource, SourceQuery};

fn key(endpoint: &str, params: &[(String, String)]) -> String {
    let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{endpoint}?{}", query.join("&"))
}

fn owned(params: &[(&str, &str)]) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[derive(Default)]
pub struct ScriptedSource {
    responses: HashMap<String, Value>,
    failures: Mutex<HashMap<String, VecDeque<Error>>>,
    calls: Arc<AtomicU32>,
    log: Mutex<Vec<SourceQuery>>,
}

impl ScriptedSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `endpoint?params` with `body` on every call.
    #[must_use]
    pub fn with_response(mut self, endpoint: &str, params: &[(&str, &str)], body: Value) -> Self {
        self.responses.insert(key(endpoint, &owned(params)), body);
        self
    }

    /// Fail the next calls to `endpoint?params` with `errors`, in order.
    #[must_use]
    pub fn with_failures(
        self,
        endpoint: &str,
        params: &[(&str, &str)],
        errors: Vec<Error>,
    ) -> Self {
        if let Ok(mut failures) = self.failures.lock() {
            failures
                .entry(key(endpoint, &owned(params)))
                .or_default()
                .extend(errors);
        }
        self
    }

    /// Shared counter of `fetch` calls.
    #[must_use]
    pub fn calls(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }

    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Queries received so far, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<SourceQuery> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RecordSource for ScriptedSource {
    async fn fetch(&self, query: &SourceQuery) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut log) = self.log.lock() {
            log.push(query.clone());
        }

        let key = key(&query.endpoint, &query.params);
        let failure = self
            .failures
            .lock()
            .ok()
            .and_then(|mut failures| failures.get_mut(&key).and_then(VecDeque::pop_front));
        if let Some(err) = failure {
            return Err(err);
        }

        Ok(self.responses.get(&key).cloned().unwrap_or(Value::Null))
    }
}
