// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for movie-search.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The embedding process is responsible for choosing the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `movie_search_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `backend`: redis, memory
//! - `status`: success, empty, error, rejected

use std::time::Duration;

use metrics::{counter, histogram};

/// Record a search query execution
pub fn record_search_query(backend: &str, status: &str) {
    counter!(
        "movie_search_queries_total",
        "backend" => backend.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record search round-trip latency
pub fn record_search_latency(backend: &str, duration: Duration) {
    histogram!(
        "movie_search_seconds",
        "backend" => backend.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record number of records returned in one page
pub fn record_search_results(count: usize) {
    histogram!("movie_search_results").record(count as f64);
}

/// Record a compile failure (unknown field, kind mismatch)
pub fn record_compile_error(reason: &str) {
    counter!(
        "movie_search_compile_errors_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record a page that failed materialization
pub fn record_materialize_error() {
    counter!("movie_search_materialize_errors_total").increment(1);
}
