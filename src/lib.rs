// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # Movie Search
//!
//! Structured search over a movie catalogue stored in a RediSearch index.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Request Layer                          │
//! │  • MovieQueryFilter / FilterCriteria                        │
//! │  • Page index + page size (validated by Pager)              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Query Compiler                          │
//! │  • FieldRegistry: TEXT ( ) / TAG { } / NUMERIC [ ]          │
//! │  • Escaping of query metacharacters                         │
//! │  • Deterministic clause order (sorted set values)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                    (query string, offset, limit)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Search Backend                           │
//! │  • RedisSearchBackend: FT.SEARCH with LIMIT + deadline      │
//! │  • InMemoryBackend: recorded queries for tests              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                    (hits + total matches)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Materializer                            │
//! │  • JSON payload → typed record (fail-fast)                  │
//! │  • PageResult<T> with total / has_next                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use movie_search::{SearchConfig, SearchService, MovieQueryFilter};
//! use movie_search::backend::redis::RedisSearchBackend;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SearchConfig {
//!         redis_url: Some("redis://localhost:6379".into()),
//!         ..Default::default()
//!     };
//!
//!     let backend = Arc::new(RedisSearchBackend::connect(&config).await?);
//!     let service = SearchService::from_config(&config, backend);
//!
//!     let filter = MovieQueryFilter {
//!         actors: Some("Chris Evans,Scarlett Johansson".into()),
//!         release_year_gte: Some(2010.0),
//!         ..Default::default()
//!     };
//!
//!     let page = service.search_advanced(&filter, 0, 20).await?;
//!     for movie in &page.items {
//!         println!("{} ({})", movie.title, movie.year);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`search`]: field registry, criteria, query compiler, pager, materializer
//! - [`backend`]: the [`SearchBackend`](backend::SearchBackend) seam (Redis, memory)
//! - [`service`]: the [`SearchService`] pipeline and movie searches
//! - [`movie`]: [`Movie`] record and [`MovieQueryFilter`] request
//! - [`resilience`]: caller-side retry for transient engine failures

pub mod backend;
pub mod config;
pub mod error;
pub mod metrics;
pub mod movie;
pub mod resilience;
pub mod search;
pub mod service;

pub use backend::{Hit, SearchBackend, SearchResult};
pub use config::SearchConfig;
pub use error::{EngineError, SearchError};
pub use movie::{Movie, MovieQueryFilter};
pub use resilience::retry::RetryConfig;
pub use search::{
    FieldKind, FieldRegistry, FilterCriteria, Operator, PageRequest, PageResult, Pager, QueryCompiler,
};
pub use service::SearchService;
