// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Pagination: page/size validation, offset/limit arithmetic, page assembly.
//!
//! ```
//! use movie_search::search::Pager;
//!
//! let pager = Pager::default();
//! // Non-positive sizes fall back to the default of 20
//! assert_eq!(pager.normalize(2, 0).unwrap(), (40, 20));
//! assert!(pager.normalize(-1, 20).is_err());
//! ```

use serde::Serialize;

use crate::error::SearchError;

/// Size used when the caller asks for a non-positive page size.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page_index: u64,
    page_size: u64,
    #[serde(skip)]
    offset: u64,
}

impl PageRequest {
    /// Zero-based page number.
    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    /// Items per page, always > 0.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of hits to skip.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Maximum hits to return.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

/// Validates page parameters against a default page size.
#[derive(Debug, Clone, Copy)]
pub struct Pager {
    default_page_size: u64,
}

impl Pager {
    /// A zero default falls back to [`DEFAULT_PAGE_SIZE`].
    pub fn new(default_page_size: usize) -> Self {
        let default_page_size = match default_page_size as u64 {
            0 => DEFAULT_PAGE_SIZE,
            n => n,
        };
        Self { default_page_size }
    }

    pub fn default_page_size(&self) -> u64 {
        self.default_page_size
    }

    /// Validate and normalize. `page_size <= 0` becomes the default;
    /// `page_index < 0` is an error, as is an offset beyond `u64`.
    pub fn request(&self, page_index: i64, page_size: i64) -> Result<PageRequest, SearchError> {
        let invalid = || SearchError::InvalidPagination { page_index, page_size };

        let index = u64::try_from(page_index).map_err(|_| invalid())?;
        let size = if page_size <= 0 {
            self.default_page_size
        } else {
            page_size as u64
        };
        let offset = index.checked_mul(size).ok_or_else(invalid)?;

        Ok(PageRequest {
            page_index: index,
            page_size: size,
            offset,
        })
    }

    /// `(offset, limit)` for a page.
    pub fn normalize(&self, page_index: i64, page_size: i64) -> Result<(u64, u64), SearchError> {
        let request = self.request(page_index, page_size)?;
        Ok((request.offset(), request.limit()))
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE as usize)
    }
}

/// One page of materialized records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    /// Records in engine order
    pub items: Vec<T>,
    /// The page that was asked for
    pub page_request: PageRequest,
    /// Matches across all pages
    pub total_matches: u64,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, page_request: PageRequest, total_matches: u64) -> Self {
        Self {
            items,
            page_request,
            total_matches,
        }
    }

    /// An empty page reporting no matches.
    pub fn empty(page_request: PageRequest) -> Self {
        Self::new(Vec::new(), page_request, 0)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pages needed for all matches at this page size.
    pub fn total_pages(&self) -> u64 {
        self.total_matches.div_ceil(self.page_request.page_size)
    }

    /// Whether a page after this one holds matches.
    pub fn has_next(&self) -> bool {
        self.page_request.page_index + 1 < self.total_pages()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Transform every item, keeping paging metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            page_request: self.page_request,
            total_matches: self.total_matches,
        }
    }
}
