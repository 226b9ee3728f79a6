use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{effective_query, Hit, SearchBackend, SearchResult};
use crate::error::EngineError;

/// A query the backend received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
    pub query: String,
    pub offset: u64,
    pub limit: u64,
}

/// In-process backend with a fixed, pre-ordered hit list.
///
/// It does not evaluate queries: every call pages through the same hits.
/// Queued failures are returned first, one per call. Every call is recorded.
pub struct InMemoryBackend {
    hits: Vec<Hit>,
    failures: Mutex<VecDeque<EngineError>>,
    calls: Mutex<Vec<RecordedQuery>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::with_hits(Vec::new())
    }

    #[must_use]
    pub fn with_hits(hits: Vec<Hit>) -> Self {
        Self {
            hits,
            failures: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail the next call with `error`.
    pub fn push_failure(&self, error: EngineError) {
        self.failures.lock().push_back(error);
    }

    /// Queries received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedQuery> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn execute(&self, query: &str, offset: u64, limit: u64) -> Result<SearchResult, EngineError> {
        self.calls.lock().push(RecordedQuery {
            query: effective_query(query).to_string(),
            offset,
            limit,
        });

        if let Some(error) = self.failures.lock().pop_front() {
            return Err(error);
        }

        let window = self
            .hits
            .iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(SearchResult::new(window, self.hits.len() as u64))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
