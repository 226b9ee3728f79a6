//! Chaos Testing for Movie Search
//!
//! This module tests failure scenarios using:
//! 1. **FailingBackend wrapper** - precise error injection at specific call counts
//! 2. **Corrupted payloads** - garbage records inside an otherwise valid page
//! 3. **Container killing** - abrupt Redis death between searches
//!
//! # Running Chaos Tests
//! ```bash
//! cargo test --test chaos -- --ignored --nocapture
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use movie_search::backend::memory::InMemoryBackend;
use movie_search::backend::redis::RedisSearchBackend;
use movie_search::{
    EngineError, FieldRegistry, FilterCriteria, Hit, Movie, Operator, PageResult, RetryConfig,
    SearchBackend, SearchConfig, SearchError, SearchResult, SearchService,
};

use testcontainers::{clients::Cli, core::WaitFor, Container, GenericImage};

// =============================================================================
// Failing Backend Wrapper - Precise Error Injection
// =============================================================================

/// When the wrapper injects its error.
enum FailureSchedule {
    /// Fail on these call numbers (1-indexed, counted across all queries)
    Calls(Vec<u64>),
    /// Fail the first call for each distinct query string
    FirstPerQuery(Mutex<HashSet<String>>),
}

/// A wrapper that injects failures on a fixed schedule.
pub struct FailingBackend<B: SearchBackend> {
    inner: B,
    call_count: AtomicU64,
    schedule: FailureSchedule,
    /// Error to return
    error: EngineError,
}

impl<B: SearchBackend> FailingBackend<B> {
    pub fn new(inner: B, fail_on_calls: Vec<u64>, error: EngineError) -> Self {
        Self::with_schedule(inner, FailureSchedule::Calls(fail_on_calls), error)
    }

    /// Each query's first attempt fails, its retry goes through
    pub fn first_call_per_query(inner: B, error: EngineError) -> Self {
        let seen = Mutex::new(HashSet::new());
        Self::with_schedule(inner, FailureSchedule::FirstPerQuery(seen), error)
    }

    fn with_schedule(inner: B, schedule: FailureSchedule, error: EngineError) -> Self {
        Self {
            inner,
            call_count: AtomicU64::new(0),
            schedule,
            error,
        }
    }

    /// Every call fails
    pub fn always(inner: B, error: EngineError) -> Self {
        Self::new(inner, (1..=1000).collect(), error)
    }

    pub fn calls(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    fn maybe_fail(&self, query: &str) -> Result<(), EngineError> {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        let fail = match &self.schedule {
            FailureSchedule::Calls(calls) => calls.contains(&count),
            FailureSchedule::FirstPerQuery(seen) => seen.lock().insert(query.to_string()),
        };
        if fail {
            Err(self.error.clone())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl<B: SearchBackend> SearchBackend for FailingBackend<B> {
    async fn execute(&self, query: &str, offset: u64, limit: u64) -> Result<SearchResult, EngineError> {
        self.maybe_fail(query)?;
        self.inner.execute(query, offset, limit).await
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn movie_hits(n: usize) -> Vec<Hit> {
    (1..=n)
        .map(|i| {
            Hit::new(
                format!("movie:{}", i),
                format!(r#"{{"rank":{},"title":"Movie {}","year":2016}}"#, i, i),
            )
        })
        .collect()
}

/// Millisecond backoff so retried tests finish quickly
fn fast_retry(attempts: usize) -> RetryConfig {
    RetryConfig {
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        factor: 2.0,
        max_retries: Some(attempts),
    }
}

fn service_over<B: SearchBackend>(backend: Arc<B>) -> SearchService<B> {
    SearchService::new(Arc::new(FieldRegistry::movies()), backend)
}

fn redis_stack_container(docker: &Cli) -> Container<'_, GenericImage> {
    let image = GenericImage::new("redis/redis-stack-server", "latest")
        .with_exposed_port(6379)
        .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"));
    docker.run(image)
}

// =============================================================================
// Chaos Tests - Injected Engine Failures
// =============================================================================

#[tokio::test]
async fn chaos_transient_failures_recovered_by_retry() {
    let backend = Arc::new(FailingBackend::new(
        InMemoryBackend::with_hits(movie_hits(3)),
        vec![1, 2],
        EngineError::Transport("connection reset by peer".into()),
    ));
    let service = service_over(backend.clone()).with_retry(fast_retry(3));

    let page: PageResult<Movie> = service.search(&FilterCriteria::new(), 0, 10).await.unwrap();

    assert_eq!(page.items.len(), 3);
    assert_eq!(backend.calls(), 3);
    assert_eq!(backend.inner.call_count(), 1);
}

#[tokio::test]
async fn chaos_timeouts_are_retried() {
    let backend = Arc::new(FailingBackend::new(
        InMemoryBackend::with_hits(movie_hits(1)),
        vec![1],
        EngineError::Timeout(Duration::from_millis(250)),
    ));
    let service = service_over(backend.clone()).with_retry(fast_retry(2));

    let page: PageResult<Movie> = service.search_by_year(2016, 0, 10).await.unwrap();
    assert_eq!(page.items[0].title, "Movie 1");
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn chaos_retries_exhausted_surface_last_error() {
    let backend = Arc::new(FailingBackend::always(
        InMemoryBackend::with_hits(movie_hits(1)),
        EngineError::Transport("connection refused".into()),
    ));
    let service = service_over(backend.clone()).with_retry(fast_retry(4));

    let result = service.search_text("Avengers", 0, 10).await;

    match result {
        Err(SearchError::Engine(e)) => assert!(e.is_transient()),
        other => panic!("expected transient engine error, got {:?}", other),
    }
    assert_eq!(backend.calls(), 4);
}

#[tokio::test]
async fn chaos_rejected_query_never_retried() {
    let backend = Arc::new(FailingBackend::always(
        InMemoryBackend::with_hits(movie_hits(1)),
        EngineError::Rejected("Syntax error at offset 3 near 'Sci'".into()),
    ));
    let service = service_over(backend.clone()).with_retry(fast_retry(5));

    let result = service
        .search_collection("genre", ["Sci-Fi"], Operator::Or, 0, 10)
        .await;

    assert!(matches!(result, Err(SearchError::Engine(EngineError::Rejected(_)))));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn chaos_malformed_reply_is_not_retried() {
    let backend = Arc::new(FailingBackend::always(
        InMemoryBackend::new(),
        EngineError::MalformedReply("expected array reply".into()),
    ));
    let service = service_over(backend.clone()).with_retry(fast_retry(3));

    let result = service.search_text("Alien", 0, 10).await;
    assert!(matches!(result, Err(SearchError::Engine(EngineError::MalformedReply(_)))));
    assert_eq!(backend.calls(), 1);
}

// =============================================================================
// Chaos Tests - Data Corruption
// =============================================================================

#[tokio::test]
async fn chaos_corrupted_hit_fails_whole_page() {
    let mut hits = movie_hits(3);
    hits[1].payload = r#"{"rank":2,"title":"Broken","year":"twenty sixteen"}"#.into();
    let service = service_over(Arc::new(InMemoryBackend::with_hits(hits)));

    let result = service.search_text("Movie", 0, 10).await;

    match result {
        Err(SearchError::Deserialization { hit_id, .. }) => assert_eq!(hit_id, "movie:2"),
        other => panic!("expected deserialization error, got {:?}", other),
    }
}

#[tokio::test]
async fn chaos_truncated_payload_fails_cleanly() {
    let mut hits = movie_hits(2);
    hits[0].payload.truncate(10);
    let service = service_over(Arc::new(InMemoryBackend::with_hits(hits)));

    let result = service.search_text("Movie", 0, 10).await;
    assert!(matches!(result, Err(SearchError::Deserialization { .. })));
}

#[tokio::test]
async fn chaos_corruption_outside_window_is_ignored() {
    let mut hits = movie_hits(25);
    hits[24].payload = "not json".into();
    let service = service_over(Arc::new(InMemoryBackend::with_hits(hits)));

    // First page of 20 never sees the bad record
    let page = service.search_text("Movie", 0, 20).await.unwrap();
    assert_eq!(page.items.len(), 20);
    assert_eq!(page.total_matches, 25);
    assert!(page.has_next());

    assert!(service.search_text("Movie", 1, 20).await.is_err());
}

// =============================================================================
// Chaos Tests - Concurrency
// =============================================================================

#[tokio::test]
async fn chaos_concurrent_searches_with_intermittent_failures() {
    // Every query's first attempt fails transiently, however the tasks interleave
    let backend = Arc::new(FailingBackend::first_call_per_query(
        InMemoryBackend::with_hits(movie_hits(5)),
        EngineError::Transport("broken pipe".into()),
    ));
    let service = service_over(backend.clone()).with_retry(fast_retry(2));

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .search_collection("actors", [format!("Actor {}", i)], Operator::And, 0, 10)
                    .await
            })
        })
        .collect();

    for handle in handles {
        let page = handle.await.unwrap().unwrap();
        assert_eq!(page.items.len(), 5);
    }
    assert_eq!(backend.inner.call_count(), 50);
    assert_eq!(backend.calls(), 100);
}

// =============================================================================
// Chaos Tests - Unreachable / Killed Redis
// =============================================================================

#[tokio::test]
async fn chaos_unreachable_redis_fails_connect() {
    let config = SearchConfig {
        redis_url: Some("redis://127.0.0.1:1".into()),
        ..Default::default()
    };

    let result = RedisSearchBackend::connect(&config).await;
    match result {
        Err(SearchError::Engine(e)) => assert!(e.is_transient(), "unexpected error {:?}", e),
        Err(other) => panic!("expected engine error, got {:?}", other),
        Ok(_) => panic!("connected to a closed port"),
    }
}

#[tokio::test]
async fn chaos_missing_redis_url_is_config_error() {
    let result = RedisSearchBackend::connect(&SearchConfig::default()).await;
    assert!(matches!(result, Err(SearchError::Config(_))));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn chaos_redis_killed_between_searches() {
    // Test: Redis dies after a successful search
    // Expected: next search fails with a transient engine error, no panic

    let docker = Cli::default();
    let redis = redis_stack_container(&docker);
    let redis_port = redis.get_host_port_ipv4(6379);

    let config = SearchConfig {
        redis_url: Some(format!("redis://127.0.0.1:{}", redis_port)),
        query_timeout_ms: 1_000,
        ..Default::default()
    };
    let backend = Arc::new(RedisSearchBackend::connect(&config).await.expect("Failed to connect"));

    let mut conn = backend.connection();
    let _: () = redis::cmd("FT.CREATE")
        .arg("idx:movies")
        .arg("ON").arg("JSON")
        .arg("PREFIX").arg(1).arg("movie:")
        .arg("SCHEMA")
        .arg("$.title").arg("AS").arg("title").arg("TEXT")
        .query_async(&mut conn)
        .await
        .expect("FT.CREATE failed");

    let service = SearchService::from_config(&config, backend);
    let page = service.search_text("anything", 0, 10).await.expect("search failed");
    assert_eq!(page.total_matches, 0);

    drop(redis);
    println!("Redis killed!");

    let result = service.search_text("anything", 0, 10).await;
    match result {
        Err(SearchError::Engine(e)) => assert!(e.is_transient(), "unexpected error {:?}", e),
        other => panic!("expected engine error, got {:?}", other),
    }
}
