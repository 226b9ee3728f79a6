// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Compiler
//!
//! Turns [`FilterCriteria`] into one FT.SEARCH query string.
//!
//! # Emitted syntax
//!
//! ```text
//! Avengers                              - free text, verbatim
//! @genre:{Action|Drama}                 - OR (and single-value AND)
//! @actors:{Chris Evans} @actors:{Hugo Weaving}
//!                                       - AND, one clause per value
//! -@genre:{Action|Adventure}            - NOT
//! @director:(Anthony Russo|Joss Whedon) - text field, same rules
//! @year:[(2014]                         - exact
//! @runtime:[-inf (160]                  - upper bound only
//! @rating:[4 inf]                       - lower bound only
//! @rating:[9 2]                         - both bounds, upper first
//! ```
//!
//! Segments are joined by single spaces: free text first, then set
//! criteria, then range criteria, each in declaration order. Set values are
//! escaped and emitted in sorted order so the same set always compiles to
//! the same string. Empty criteria compile to the empty string.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use super::criteria::{FilterCriteria, Operator, RangeCriterion, RangeShape, SetCriterion};
use super::escape::escape;
use super::field_registry::{FieldDescriptor, FieldKind, FieldRegistry};
use crate::error::SearchError;

/// Compiles criteria against a shared field registry.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    registry: Arc<FieldRegistry>,
}

impl QueryCompiler {
    pub fn new(registry: Arc<FieldRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Compile `criteria` into a query string.
    pub fn compile(&self, criteria: &FilterCriteria) -> Result<String, SearchError> {
        let mut segments: Vec<String> = Vec::new();

        if let Some(text) = criteria.free_text() {
            segments.push(text.to_string());
        }

        for set in criteria.sets() {
            let field = self.registry.descriptor_of(&set.field)?;
            segments.push(Self::compile_set(field, set)?);
        }

        for range in criteria.ranges() {
            let field = self.registry.descriptor_of(&range.field)?;
            if let Some(clause) = Self::compile_range(field, range)? {
                segments.push(clause);
            }
        }

        let query = segments.join(" ");
        debug!(query = %query, segments = segments.len(), "Compiled filter criteria");
        Ok(query)
    }

    fn compile_set(field: &FieldDescriptor, set: &SetCriterion) -> Result<String, SearchError> {
        if field.kind == FieldKind::Numeric {
            return Err(SearchError::FieldKindMismatch {
                field: field.name.clone(),
                kind: field.kind,
            });
        }

        let (start, end) = field.delimiters();
        let values = set.values();

        let clause = match set.operator {
            Operator::Not => format!("-@{}:{}{}{}", field.name, start, Self::join_values(values), end),
            Operator::Or => format!("@{}:{}{}{}", field.name, start, Self::join_values(values), end),
            Operator::And => values
                .iter()
                .map(|v| format!("@{}:{}{}{}", field.name, start, escape(v), end))
                .collect::<Vec<_>>()
                .join(" "),
        };

        debug!(field = %field.name, operator = %set.operator, clause = %clause, "Set clause");
        Ok(clause)
    }

    fn compile_range(
        field: &FieldDescriptor,
        range: &RangeCriterion,
    ) -> Result<Option<String>, SearchError> {
        if field.kind != FieldKind::Numeric {
            return Err(SearchError::FieldKindMismatch {
                field: field.name.clone(),
                kind: field.kind,
            });
        }

        let (start, end) = field.delimiters();
        let name = &field.name;

        let clause = match range.shape() {
            RangeShape::Exact(value) => format!("@{}:{}({}{}", name, start, value, end),
            RangeShape::UpperOnly(upper) => format!("@{}:{}-inf ({}{}", name, start, upper, end),
            RangeShape::LowerOnly(lower) => format!("@{}:{}{} inf{}", name, start, lower, end),
            // Upper bound is emitted first; existing queries depend on this order
            RangeShape::Bounded { lower, upper } => {
                format!("@{}:{}{} {}{}", name, start, upper, lower, end)
            }
            RangeShape::Absent => return Ok(None),
        };

        debug!(field = %name, shape = ?range.shape(), clause = %clause, "Range clause");
        Ok(Some(clause))
    }

    /// Escaped values joined with `|`, in sorted order.
    fn join_values(values: &BTreeSet<String>) -> String {
        values.iter().map(|v| escape(v)).collect::<Vec<_>>().join("|")
    }
}
