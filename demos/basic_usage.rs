// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic movie-search usage example.
//!
//! Demonstrates:
//! 1. Building a search service (in-memory, or Redis Stack when `REDIS_URL` is set)
//! 2. Free-text, collection, year and advanced searches
//! 3. Paging through results
//! 4. Displaying metrics
//!
//! # Prerequisites (Redis mode only)
//!
//! A Redis Stack instance with an `idx:movies` JSON index:
//! ```bash
//! docker run -d -p 6379:6379 redis/redis-stack-server:latest
//! ```
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! REDIS_URL=redis://localhost:6379 cargo run --example basic_usage
//! ```

use std::sync::Arc;

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use movie_search::backend::memory::InMemoryBackend;
use movie_search::backend::redis::RedisSearchBackend;
use movie_search::{
    Hit, Movie, MovieQueryFilter, Operator, PageResult, SearchBackend, SearchConfig, SearchService,
};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().expect("failed to install metrics recorder");

    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║            movie-search: Basic Usage Example                  ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    let config = SearchConfig {
        redis_url: std::env::var("REDIS_URL").ok(),
        default_page_size: 2,
        max_retries: 2,
        ..Default::default()
    };

    match config.redis_url {
        Some(ref url) => {
            println!("📦 Connecting to Redis Stack at {} (index {})...", url, config.full_index_name());
            let backend = RedisSearchBackend::connect(&config).await?;
            run(SearchService::from_config(&config, Arc::new(backend))).await?;
        }
        None => {
            println!("📦 No REDIS_URL set, using the in-memory backend");
            println!("   (it pages through a fixed list and records each query)");
            let backend = Arc::new(InMemoryBackend::with_hits(sample_hits()));
            run(SearchService::from_config(&config, backend.clone())).await?;

            println!("\n🧾 Queries sent to the backend:");
            for call in backend.calls() {
                println!("   └─ {:<60} LIMIT {} {}", call.query, call.offset, call.limit);
            }
        }
    }

    println!("\n📈 Metrics:");
    dump_metrics(&snapshotter);

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║                    Example complete!                          ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    Ok(())
}

async fn run<B: SearchBackend>(service: SearchService<B>) -> Result<(), Box<dyn std::error::Error>> {
    // ─────────────────────────────────────────────────────────────────────────
    // 1. Free text
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🔍 search_text(\"Guardians Galaxy\")");
    print_page(&service.search_text("Guardians Galaxy", 0, 0).await?);

    // ─────────────────────────────────────────────────────────────────────────
    // 2. Collections under each operator
    // ─────────────────────────────────────────────────────────────────────────
    for operator in [Operator::And, Operator::Or, Operator::Not] {
        println!("\n🔍 search_collection(\"genre\", [Sci-Fi, Adventure], {})", operator);
        print_page(
            &service
                .search_collection("genre", ["Sci-Fi", "Adventure"], operator, 0, 0)
                .await?,
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Exact year
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🔍 search_by_year(2016)");
    print_page(&service.search_by_year(2016, 0, 0).await?);

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Advanced filter, paged
    // ─────────────────────────────────────────────────────────────────────────
    let filter: MovieQueryFilter = serde_json::from_value(json!({
        "genericCriteria": "Avengers",
        "actors": "Chris Evans,Scarlett Johansson",
        "actorOperator": "AND",
        "directors": "Joss Whedon,Anthony Russo",
        "releaseYearGTE": 2010,
        "metaRatingGTE": 60
    }))?;
    println!("\n🔍 search_advanced({:?})", filter);

    let mut page_index = 0;
    loop {
        let page = service.search_advanced(&filter, page_index, 0).await?;
        print_page(&page);
        if !page.has_next() {
            break;
        }
        page_index += 1;
    }

    Ok(())
}

fn print_page(page: &PageResult<Movie>) {
    println!(
        "   page {} of {} ({} total)",
        page.page_request.page_index() + 1,
        page.total_pages().max(1),
        page.total_matches
    );
    for movie in &page.items {
        println!("   └─ {} ({}) dir. {} ★ {:.1}", movie.title, movie.year, movie.director, movie.rating);
    }
}

fn sample_hits() -> Vec<Hit> {
    [
        json!({"rank": 1, "title": "Guardians of the Galaxy", "genre": ["Action", "Adventure", "Sci-Fi"],
               "director": "James Gunn", "actors": ["Chris Pratt", "Vin Diesel"], "year": 2014,
               "runtime": 121, "rating": 8.1, "votes": 757074, "revenue": 333.13, "metascore": 76}),
        json!({"Rank": 2, "Title": "Prometheus", "Genre": ["Adventure", "Mystery", "Sci-Fi"],
               "Director": "Ridley Scott", "Actors": ["Noomi Rapace", "Michael Fassbender"], "Year": 2012,
               "Runtime (Minutes)": 124, "Rating": 7.0, "Votes": 485820, "Revenue (Millions)": 126.46,
               "Metascore": 65}),
        json!({"rank": 3, "title": "The Avengers", "genre": ["Action", "Sci-Fi"],
               "director": "Joss Whedon", "actors": ["Robert Downey Jr.", "Chris Evans", "Scarlett Johansson"],
               "year": 2012, "runtime": 143, "rating": 8.1, "votes": 1045588, "revenue": 623.28, "metascore": 69}),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, movie)| Hit::new(format!("movie:{}", i + 1), movie.to_string()))
    .collect()
}

/// Dump all captured metrics
fn dump_metrics(snapshotter: &Snapshotter) {
    let mut lines: Vec<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, value)| {
            let (_, key) = composite_key.into_parts();
            let labels: Vec<_> = key.labels().map(|l| format!("{}={}", l.key(), l.value())).collect();
            let label_str = if labels.is_empty() { String::new() } else { format!("{{{}}}", labels.join(",")) };
            match value {
                DebugValue::Counter(v) => format!("{}{} = {}", key.name(), label_str, v),
                DebugValue::Gauge(v) => format!("{}{} = {:.2}", key.name(), label_str, v.into_inner()),
                DebugValue::Histogram(samples) => {
                    let sum: f64 = samples.iter().map(|v| v.into_inner()).sum();
                    format!("{}{} count={} sum={:.4}", key.name(), label_str, samples.len(), sum)
                }
            }
        })
        .collect();
    lines.sort();

    if lines.is_empty() {
        println!("   └─ (no metrics recorded)");
    }
    for line in lines {
        println!("   └─ {}", line);
    }
}
