// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search engine backends.
//!
//! A [`SearchBackend`] performs exactly one round trip per call: it sends a
//! compiled query plus a LIMIT window and returns the raw hits with the
//! total match count. Backends never retry; that is the caller's policy.
//!
//! - [`redis::RedisSearchBackend`]: FT.SEARCH against Redis Stack
//! - [`memory::InMemoryBackend`]: scripted replies for tests and demos

pub mod memory;
pub mod redis;

use async_trait::async_trait;

use crate::error::EngineError;

/// Query string the engine treats as "match everything".
pub const MATCH_ALL: &str = "*";

/// One raw record returned by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// Document key
    pub id: String,
    /// Serialized JSON record
    pub payload: String,
}

impl Hit {
    pub fn new(id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }
}

/// Raw hits for one window plus the match count across all windows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResult {
    /// Hits in engine order, truncated to the requested window
    pub hits: Vec<Hit>,
    /// Total matches, at least `hits.len()`
    pub total_matches: u64,
}

impl SearchResult {
    pub fn new(hits: Vec<Hit>, total_matches: u64) -> Self {
        // An engine that under-reports its total still returned these hits
        let total_matches = total_matches.max(hits.len() as u64);
        Self { hits, total_matches }
    }
}

/// The query-and-paginate protocol of the search engine.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run `query` and return hits `offset..offset + limit`.
    ///
    /// An empty `query` means match everything.
    async fn execute(&self, query: &str, offset: u64, limit: u64) -> Result<SearchResult, EngineError>;

    /// Short label used in logs and metrics.
    fn name(&self) -> &'static str;
}

/// The query string actually sent for a compiled query.
pub fn effective_query(query: &str) -> &str {
    if query.trim().is_empty() {
        MATCH_ALL
    } else {
        query
    }
}
