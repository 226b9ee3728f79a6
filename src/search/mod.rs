// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query compilation and result handling.
//!
//! # Architecture
//!
//! ```text
//! FilterCriteria
//!     │
//!     ├─→ QueryCompiler (FieldRegistry + escape) → FT.SEARCH query string
//!     ├─→ Pager → (offset, limit)
//!     │
//!     │   SearchBackend::execute → hits + total
//!     │
//!     ├─→ materialize → Vec<T>
//!     └─→ PageResult<T>
//! ```
//!
//! # Query Language
//!
//! ```text
//! @genre:{Action|Drama}            - tag OR
//! @actors:{A} @actors:{B}          - tag AND (adjacent clauses intersect)
//! -@genre:{Horror}                 - negation
//! @director:(Joss Whedon)          - text field
//! @year:[2005 inf] @year:[(2014]   - numeric range / exact
//! Avengers                         - free text
//! ```

mod compiler;
mod criteria;
mod escape;
mod field_registry;
mod materializer;
mod pager;

pub use compiler::QueryCompiler;
pub use criteria::{FilterCriteria, Operator, RangeCriterion, RangeShape, SetCriterion};
pub use escape::{escape, META_CHARACTERS};
pub use field_registry::{FieldDescriptor, FieldKind, FieldRegistry, FieldRegistryBuilder, FieldSpec};
pub use materializer::{materialize, materialize_one};
pub use pager::{PageRequest, PageResult, Pager, DEFAULT_PAGE_SIZE};
