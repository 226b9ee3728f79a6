// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Movie catalogue searches built on [`SearchService`].
//!
//! ```text
//! search_text("Guardians Galaxy")              → Guardians Galaxy
//! search_collection("genre", [A, B], Or)       → @genre:{A|B}
//! search_collection("actors", [A, B], And)     → @actors:{A} @actors:{B}
//! search_collection("genre", [A, B], Not)      → -@genre:{A|B}
//! search_by_year(2016)                         → @year:[(2016]
//! search_advanced(&filter)                     → see MovieQueryFilter
//! ```

use tracing::info;

use super::SearchService;
use crate::backend::SearchBackend;
use crate::error::SearchError;
use crate::movie::{Movie, MovieQueryFilter};
use crate::search::{FilterCriteria, Operator, PageResult};

impl<B: SearchBackend> SearchService<B> {
    /// Free-text relevance search.
    pub async fn search_text(
        &self,
        query: &str,
        page_index: i64,
        page_size: i64,
    ) -> Result<PageResult<Movie>, SearchError> {
        info!(query = %query, "Searching for movies by generic criteria");
        let page = self.search(&FilterCriteria::new().text(query), page_index, page_size).await?;
        info!(total = page.total_matches, query = %query, "Found movies for search criteria");
        Ok(page)
    }

    /// Movies whose tag or text `field` matches `values` under `operator`.
    pub async fn search_collection<I, S>(
        &self,
        field: &str,
        values: I,
        operator: Operator,
        page_index: i64,
        page_size: i64,
    ) -> Result<PageResult<Movie>, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let criteria = FilterCriteria::new().set(field, values, operator);
        info!(field, operator = %operator, criteria = ?criteria.sets(), "Searching for movies by collection");
        self.search(&criteria, page_index, page_size).await
    }

    /// Movies released in exactly `year`.
    pub async fn search_by_year(
        &self,
        year: i64,
        page_index: i64,
        page_size: i64,
    ) -> Result<PageResult<Movie>, SearchError> {
        info!(year, "Searching for movies by year");
        let year = year as f64;
        let criteria = FilterCriteria::new().range("year", Some(year), Some(year));
        self.search(&criteria, page_index, page_size).await
    }

    /// The advanced search request.
    pub async fn search_advanced(
        &self,
        filter: &MovieQueryFilter,
        page_index: i64,
        page_size: i64,
    ) -> Result<PageResult<Movie>, SearchError> {
        info!(filter = ?filter, "Using movie filter");
        self.search(&filter.to_criteria(), page_index, page_size).await
    }
}
