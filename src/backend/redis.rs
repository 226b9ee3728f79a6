// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! RediSearch backend.
//!
//! Issues one `FT.SEARCH` per call:
//!
//! ```text
//! FT.SEARCH idx:movies "@genre:{Action|Drama}" LIMIT 40 20
//! ```
//!
//! and decodes the RESP2 reply
//!
//! ```text
//! 1) (integer) 523                     total matches
//! 2) "movie:01H..."                    key
//! 3) 1) "$"                            attributes (JSON index)
//!    2) "{\"title\":\"Avengers\",...}"
//! 4) "movie:01J..."
//! 5) ...
//! ```
//!
//! JSON indexes return the whole document under the `$` attribute, which
//! becomes the hit payload as-is. Hash indexes return flat attribute pairs,
//! which are folded into a JSON object. Only attributes the field registry
//! declares NUMERIC become JSON numbers; everything else stays a string, so
//! a title like `1917` is still a string.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{cmd, Client, Cmd, RedisError, Value};
use tracing::{debug, warn};

use super::{effective_query, Hit, SearchBackend, SearchResult};
use crate::config::SearchConfig;
use crate::error::{EngineError, SearchError};
use crate::resilience::retry::{retry, RetryConfig};
use crate::search::{FieldKind, FieldRegistry};

/// Attribute under which JSON indexes return the full document.
const JSON_ROOT: &str = "$";

/// FT.SEARCH client bound to one index.
#[derive(Clone)]
pub struct RedisSearchBackend {
    connection: ConnectionManager,
    index: String,
    timeout: Option<Duration>,
    registry: Arc<FieldRegistry>,
}

impl RedisSearchBackend {
    /// Connect using `redis_url`, index name and deadline from `config`.
    ///
    /// The initial connection is retried with the startup policy so a
    /// misconfigured URL fails within seconds instead of hanging.
    pub async fn connect(config: &SearchConfig) -> Result<Self, SearchError> {
        let url = config
            .redis_url
            .as_deref()
            .ok_or_else(|| SearchError::Config("redis_url is required for the Redis backend".into()))?;

        let client = Client::open(url).map_err(|e| SearchError::Config(e.to_string()))?;

        let connection = retry("redis_connect", &RetryConfig::startup(), || async {
            ConnectionManager::new(client.clone()).await
        })
        .await
        .map_err(|e: RedisError| SearchError::Engine(EngineError::from(e)))?;

        Ok(Self::with_connection(
            connection,
            config.full_index_name(),
            config.query_timeout(),
            Arc::new(config.field_registry()),
        ))
    }

    /// Wrap an existing connection. `registry` types hash index attributes.
    pub fn with_connection(
        connection: ConnectionManager,
        index: impl Into<String>,
        timeout: Option<Duration>,
        registry: Arc<FieldRegistry>,
    ) -> Self {
        Self {
            connection,
            index: index.into(),
            timeout,
            registry,
        }
    }

    /// Index the backend queries.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Get a clone of the connection manager
    pub fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }

    fn search_command(&self, query: &str, offset: u64, limit: u64) -> Cmd {
        let mut command = cmd("FT.SEARCH");
        command
            .arg(&self.index)
            .arg(effective_query(query))
            .arg("LIMIT")
            .arg(offset)
            .arg(limit);
        command
    }
}

#[async_trait]
impl SearchBackend for RedisSearchBackend {
    async fn execute(&self, query: &str, offset: u64, limit: u64) -> Result<SearchResult, EngineError> {
        let command = self.search_command(query, offset, limit);
        let mut connection = self.connection.clone();
        let start = Instant::now();

        debug!(index = %self.index, query = %effective_query(query), offset, limit, "FT.SEARCH");

        let reply = with_deadline(self.timeout, async {
            command.query_async::<Value>(&mut connection).await.map_err(EngineError::from)
        })
        .await?;

        let result = parse_search_reply(reply, &self.registry).map_err(|e| {
            warn!(index = %self.index, error = %e, "Undecodable FT.SEARCH reply");
            e
        })?;

        debug!(
            index = %self.index,
            hits = result.hits.len(),
            total = result.total_matches,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "FT.SEARCH reply"
        );
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// Run `fut` under an optional deadline.
///
/// Dropping the in-flight future on deadline discards any partial reply.
pub(crate) async fn with_deadline<F, T>(
    deadline: Option<Duration>,
    fut: F,
) -> Result<T, EngineError>
where
    F: Future<Output = Result<T, EngineError>>,
{
    match deadline {
        Some(deadline) => tokio::time::timeout(deadline, fut)
            .await
            .map_err(|_| EngineError::Timeout(deadline))?,
        None => fut.await,
    }
}

/// Decode an FT.SEARCH reply (RESP2 layout, with attributes).
///
/// `registry` decides which hash attributes are numeric.
pub fn parse_search_reply(
    reply: Value,
    registry: &FieldRegistry,
) -> Result<SearchResult, EngineError> {
    let items = match reply {
        Value::Array(items) => items,
        other => {
            return Err(EngineError::MalformedReply(format!(
                "expected array reply, got {:?}",
                other
            )))
        }
    };

    let mut items = items.into_iter();
    let total = match items.next() {
        Some(Value::Int(n)) if n >= 0 => n as u64,
        other => {
            return Err(EngineError::MalformedReply(format!(
                "expected total count, got {:?}",
                other
            )))
        }
    };

    let mut hits = Vec::new();
    while let Some(key) = items.next() {
        let id = value_to_string(key)?;
        let attributes = match items.next() {
            Some(Value::Array(attributes)) => attributes,
            other => {
                return Err(EngineError::MalformedReply(format!(
                    "hit '{}' has no attribute list, got {:?}",
                    id, other
                )))
            }
        };
        let payload = payload_from_attributes(&id, attributes, registry)?;
        hits.push(Hit { id, payload });
    }

    Ok(SearchResult::new(hits, total))
}

fn payload_from_attributes(
    id: &str,
    attributes: Vec<Value>,
    registry: &FieldRegistry,
) -> Result<String, EngineError> {
    if attributes.len() % 2 != 0 {
        return Err(EngineError::MalformedReply(format!(
            "hit '{}' has an odd number of attribute entries",
            id
        )));
    }

    let mut object = serde_json::Map::new();
    let mut attributes = attributes.into_iter();
    while let (Some(name), Some(value)) = (attributes.next(), attributes.next()) {
        let name = value_to_string(name)?;
        let value = value_to_string(value)?;
        if name == JSON_ROOT {
            return Ok(value);
        }
        let numeric = registry
            .descriptor_of(&name)
            .is_ok_and(|d| d.kind == FieldKind::Numeric);
        let value = if numeric {
            serde_json::from_str::<serde_json::Value>(&value)
                .ok()
                .filter(serde_json::Value::is_number)
                .unwrap_or(serde_json::Value::String(value))
        } else {
            serde_json::Value::String(value)
        };
        object.insert(name, value);
    }

    Ok(serde_json::Value::Object(object).to_string())
}

fn value_to_string(value: Value) -> Result<String, EngineError> {
    match value {
        Value::BulkString(bytes) => String::from_utf8(bytes)
            .map_err(|e| EngineError::MalformedReply(format!("non UTF-8 string: {}", e))),
        Value::SimpleString(s) => Ok(s),
        Value::Int(n) => Ok(n.to_string()),
        other => Err(EngineError::MalformedReply(format!(
            "expected string, got {:?}",
            other
        ))),
    }
}
