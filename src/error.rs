// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error types for query compilation, search execution and materialization.

use std::time::Duration;
use thiserror::Error;

use crate::search::FieldKind;

/// Everything that can go wrong between a [`FilterCriteria`](crate::search::FilterCriteria)
/// and a [`PageResult`](crate::search::PageResult).
#[derive(Error, Debug)]
pub enum SearchError {
    /// A criterion names an attribute the field registry does not know.
    #[error("Unknown search field '{0}'")]
    UnknownField(String),

    /// A criterion targets a field whose index type cannot express it
    /// (set filter on a numeric field, range filter on a tag or text field).
    #[error("Field '{field}' is indexed as {kind} and cannot take this criterion")]
    FieldKindMismatch { field: String, kind: FieldKind },

    /// The search engine failed the round trip.
    #[error("Search engine error: {0}")]
    Engine(#[from] EngineError),

    /// A hit payload does not match the target record shape.
    #[error("Failed to deserialize hit '{hit_id}': {source}")]
    Deserialization {
        hit_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// Page index is negative or the resulting offset does not fit.
    #[error("Invalid pagination: page {page_index}, size {page_size}")]
    InvalidPagination { page_index: i64, page_size: i64 },

    /// Configuration cannot produce a working backend.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure of a single round trip to the search engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Connection refused, dropped, or any other I/O failure.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The round trip did not finish before the deadline.
    #[error("query timed out after {0:?}")]
    Timeout(Duration),
    /// The engine refused the query (syntax error, unknown index, ...).
    #[error("query rejected: {0}")]
    Rejected(String),
    /// The engine answered with something that is not a search reply.
    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

impl EngineError {
    /// Whether repeating the same request could succeed.
    ///
    /// A rejected query will be rejected again, so only transport
    /// failures and timeouts count.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::Transport(_) | EngineError::Timeout(_))
    }
}

impl From<redis::RedisError> for EngineError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_timeout() {
            EngineError::Timeout(Duration::ZERO)
        } else if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() {
            EngineError::Transport(e.to_string())
        } else if e.kind() == redis::ErrorKind::TypeError {
            EngineError::MalformedReply(e.to_string())
        } else {
            EngineError::Rejected(e.to_string())
        }
    }
}
