// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Field Registry
//!
//! Maps a domain attribute name to how the search index stores it. Built
//! once at startup, then shared read-only (`Arc<FieldRegistry>`) by every
//! compiler invocation.
//!
//! ```text
//! title        TEXT     WEIGHT 3.0   @title:(...)
//! genre        TAG                   @genre:{...}
//! year         NUMERIC               @year:[...]
//! ```
//!
//! # Example
//!
//! ```
//! use movie_search::search::{FieldKind, FieldRegistry};
//!
//! let registry = FieldRegistry::builder()
//!     .text("title", 3.0)
//!     .tag("genre")
//!     .numeric("year")
//!     .build();
//!
//! let genre = registry.descriptor_of("genre").unwrap();
//! assert_eq!(genre.kind, FieldKind::Tag);
//! assert_eq!(genre.delimiters(), ("{", "}"));
//! assert!(registry.descriptor_of("budget").is_err());
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::SearchError;

/// Index type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldKind {
    /// Relevance-weighted full text
    Text,
    /// Set of exact-match tokens
    Tag,
    /// Range and exact numeric comparison
    Numeric,
}

impl FieldKind {
    /// Opening and closing delimiters of a clause on this kind of field.
    pub fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            FieldKind::Text => ("(", ")"),
            FieldKind::Tag => ("{", "}"),
            FieldKind::Numeric => ("[", "]"),
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Text => write!(f, "TEXT"),
            FieldKind::Tag => write!(f, "TAG"),
            FieldKind::Numeric => write!(f, "NUMERIC"),
        }
    }
}

/// How one attribute is indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Attribute name as used after `@` in queries
    pub name: String,
    /// Index type
    pub kind: FieldKind,
    /// Relevance weight, text fields only
    pub weight: Option<f64>,
}

impl FieldDescriptor {
    /// Clause delimiters for this field.
    pub fn delimiters(&self) -> (&'static str, &'static str) {
        self.kind.delimiters()
    }

    pub fn delimiter_start(&self) -> &'static str {
        self.kind.delimiters().0
    }

    pub fn delimiter_end(&self) -> &'static str {
        self.kind.delimiters().1
    }
}

/// One row of a field table, as read from configuration.
///
/// ```json
/// { "name": "title", "kind": "TEXT", "weight": 3.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Immutable attribute → descriptor table.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: HashMap<String, FieldDescriptor>,
}

impl FieldRegistry {
    /// Start an empty table.
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder::default()
    }

    /// The movie catalogue table.
    pub fn movies() -> Self {
        Self::builder()
            .text("title", 3.0)
            .text("description", 1.0)
            .text("director", 3.0)
            .tag("genre")
            .tag("actors")
            .numeric("year")
            .numeric("runtime")
            .numeric("rating")
            .numeric("votes")
            .numeric("revenue")
            .numeric("metascore")
            .build()
    }

    /// Build from configured rows. Text fields without a weight get 1.0;
    /// a weight on any other kind is ignored.
    pub fn from_specs(specs: &[FieldSpec]) -> Self {
        specs
            .iter()
            .fold(Self::builder(), |builder, spec| match spec.kind {
                FieldKind::Text => builder.text(&spec.name, spec.weight.unwrap_or(1.0)),
                FieldKind::Tag => builder.tag(&spec.name),
                FieldKind::Numeric => builder.numeric(&spec.name),
            })
            .build()
    }

    /// Look up an attribute.
    pub fn descriptor_of(&self, attribute: &str) -> Result<&FieldDescriptor, SearchError> {
        self.fields
            .get(attribute)
            .ok_or_else(|| SearchError::UnknownField(attribute.to_string()))
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.fields.contains_key(attribute)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All descriptors, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::movies()
    }
}

/// Accumulates descriptors; a later registration of the same name replaces
/// the earlier one.
#[derive(Debug, Default)]
pub struct FieldRegistryBuilder {
    fields: HashMap<String, FieldDescriptor>,
}

impl FieldRegistryBuilder {
    /// Add a weighted full-text field
    pub fn text(self, name: impl Into<String>, weight: f64) -> Self {
        self.with(name.into(), FieldKind::Text, Some(weight))
    }

    /// Add a tag field
    pub fn tag(self, name: impl Into<String>) -> Self {
        self.with(name.into(), FieldKind::Tag, None)
    }

    /// Add a numeric field
    pub fn numeric(self, name: impl Into<String>) -> Self {
        self.with(name.into(), FieldKind::Numeric, None)
    }

    fn with(mut self, name: String, kind: FieldKind, weight: Option<f64>) -> Self {
        self.fields.insert(name.clone(), FieldDescriptor { name, kind, weight });
        self
    }

    pub fn build(self) -> FieldRegistry {
        FieldRegistry { fields: self.fields }
    }
}
