// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search service.
//!
//! The [`SearchService`] wires the pipeline together:
//!
//! ```text
//! search(criteria, page, size)
//!       │
//!       ├─→ Pager::request        → offset/limit  (InvalidPagination)
//!       ├─→ QueryCompiler::compile → query string (UnknownField)
//!       ├─→ SearchBackend::execute → hits + total (Engine)
//!       │        └─→ retried only while the error is transient
//!       ├─→ materialize           → Vec<T>        (Deserialization)
//!       └─→ PageResult<T>
//! ```
//!
//! The service holds no mutable state. Clones share the registry and the
//! backend, so any number of searches can run concurrently.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use movie_search::{FilterCriteria, Movie, Operator, SearchService};
//! use movie_search::backend::{memory::InMemoryBackend, Hit};
//! use movie_search::search::FieldRegistry;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), movie_search::SearchError> {
//! let backend = Arc::new(InMemoryBackend::with_hits(vec![
//!     Hit::new("movie:1", r#"{"title": "The Avengers", "year": 2012}"#),
//! ]));
//! let service = SearchService::new(Arc::new(FieldRegistry::movies()), backend.clone());
//!
//! let criteria = FilterCriteria::new()
//!     .set("actors", ["Chris Evans", "Scarlett Johansson"], Operator::And);
//! let page = service.search::<Movie>(&criteria, 0, 20).await?;
//!
//! assert_eq!(page.items[0].title, "The Avengers");
//! assert_eq!(
//!     backend.calls()[0].query,
//!     "@actors:{Chris Evans} @actors:{Scarlett Johansson}"
//! );
//! # Ok(())
//! # }
//! ```

mod movie_api;

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::backend::SearchBackend;
use crate::config::SearchConfig;
use crate::error::{EngineError, SearchError};
use crate::metrics;
use crate::resilience::retry::{retry_when, RetryConfig};
use crate::search::{materialize, FieldRegistry, FilterCriteria, PageRequest, PageResult, Pager, QueryCompiler};

/// Compiles, executes and materializes searches against one backend.
pub struct SearchService<B> {
    compiler: QueryCompiler,
    pager: Pager,
    backend: Arc<B>,
    retry: RetryConfig,
}

impl<B> Clone for SearchService<B> {
    fn clone(&self) -> Self {
        Self {
            compiler: self.compiler.clone(),
            pager: self.pager,
            backend: Arc::clone(&self.backend),
            retry: self.retry.clone(),
        }
    }
}

impl<B: SearchBackend> SearchService<B> {
    /// Default pager (size 20) and a single attempt per search.
    pub fn new(registry: Arc<FieldRegistry>, backend: Arc<B>) -> Self {
        Self {
            compiler: QueryCompiler::new(registry),
            pager: Pager::default(),
            backend,
            retry: RetryConfig::search(0),
        }
    }

    /// Registry, page size and retry policy taken from `config`.
    pub fn from_config(config: &SearchConfig, backend: Arc<B>) -> Self {
        Self {
            compiler: QueryCompiler::new(Arc::new(config.field_registry())),
            pager: config.pager(),
            backend,
            retry: config.retry_config(),
        }
    }

    #[must_use]
    pub fn with_pager(mut self, pager: Pager) -> Self {
        self.pager = pager;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn compiler(&self) -> &QueryCompiler {
        &self.compiler
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Search one page. `page_size <= 0` uses the default size.
    pub async fn search<T: DeserializeOwned>(
        &self,
        criteria: &FilterCriteria,
        page_index: i64,
        page_size: i64,
    ) -> Result<PageResult<T>, SearchError> {
        let request = self.pager.request(page_index, page_size)?;
        self.search_page(criteria, request).await
    }

    /// Search with an already validated page request.
    pub async fn search_page<T: DeserializeOwned>(
        &self,
        criteria: &FilterCriteria,
        request: PageRequest,
    ) -> Result<PageResult<T>, SearchError> {
        let query = self.compiler.compile(criteria).map_err(|e| {
            metrics::record_compile_error(match e {
                SearchError::UnknownField(_) => "unknown_field",
                SearchError::FieldKindMismatch { .. } => "kind_mismatch",
                _ => "other",
            });
            e
        })?;

        self.execute_query(&query, request).await
    }

    /// Run a query string as-is. The string is not validated; the engine
    /// rejects what it cannot parse.
    pub async fn execute_query<T: DeserializeOwned>(
        &self,
        query: &str,
        request: PageRequest,
    ) -> Result<PageResult<T>, SearchError> {
        let backend = self.backend.name();
        info!(
            query = %query,
            page = request.page_index(),
            size = request.page_size(),
            "Using query string"
        );

        let start = Instant::now();
        let result = retry_when("search", &self.retry, EngineError::is_transient, || {
            self.backend.execute(query, request.offset(), request.limit())
        })
        .await;

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                let status = if e.is_transient() { "error" } else { "rejected" };
                metrics::record_search_query(backend, status);
                warn!(backend, query = %query, error = %e, "Search failed");
                return Err(e.into());
            }
        };

        let elapsed = start.elapsed();
        metrics::record_search_latency(backend, elapsed);
        metrics::record_search_query(backend, if result.hits.is_empty() { "empty" } else { "success" });
        info!(
            backend,
            total = result.total_matches,
            hits = result.hits.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Search took {}ms",
            elapsed.as_millis()
        );

        let items = materialize(&result.hits).map_err(|e| {
            metrics::record_materialize_error();
            warn!(error = %e, "Discarding page with malformed hit");
            e
        })?;

        debug!(items = items.len(), "Materialized page");
        metrics::record_search_results(items.len());
        Ok(PageResult::new(items, request, result.total_matches))
    }
}
