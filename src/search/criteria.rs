// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Filter criteria - the flat, typed input of the query compiler.
//!
//! A [`FilterCriteria`] holds at most one free-text token, then set filters
//! and range filters in the order they were added. Criteria refer to fields
//! by attribute name; the compiler resolves names against the registry.
//!
//! # Example
//!
//! ```rust
//! use movie_search::search::{FilterCriteria, Operator};
//!
//! let criteria = FilterCriteria::new()
//!     .text("Avengers")
//!     .set("actors", ["Chris Evans", "Scarlett Johansson"], Operator::And)
//!     .set("genre", ["Action", "Sci-Fi"], Operator::Or)
//!     .range("year", Some(2005.0), None);
//!
//! assert_eq!(criteria.sets().len(), 2);
//! assert_eq!(criteria.ranges().len(), 1);
//! ```

use std::collections::BTreeSet;
use std::str::FromStr;

/// How the values of a set filter combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    /// Every value must match: one clause per value
    #[default]
    And,
    /// Any value may match: `v1|v2` inside one clause
    Or,
    /// No value may match: negated `v1|v2` clause
    Not,
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Operator::And),
            "OR" => Ok(Operator::Or),
            "NOT" => Ok(Operator::Not),
            other => Err(format!("unknown operator '{}'", other)),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::And => write!(f, "AND"),
            Operator::Or => write!(f, "OR"),
            Operator::Not => write!(f, "NOT"),
        }
    }
}

/// A categorical or text filter over a non-empty set of values.
#[derive(Debug, Clone, PartialEq)]
pub struct SetCriterion {
    /// Attribute name
    pub field: String,
    /// Combination rule
    pub operator: Operator,
    values: BTreeSet<String>,
}

impl SetCriterion {
    /// Values are trimmed and blanks dropped. Returns `None` when nothing
    /// is left, since an empty set filter is the same as no filter.
    pub fn new<I, S>(field: impl Into<String>, values: I, operator: Operator) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();

        if values.is_empty() {
            return None;
        }

        Some(Self {
            field: field.into(),
            operator,
            values,
        })
    }

    /// Values in sorted order.
    pub fn values(&self) -> &BTreeSet<String> {
        &self.values
    }
}

/// A numeric filter with optional bounds. Absence means unbounded; zero is
/// an ordinary bound.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeCriterion {
    /// Attribute name
    pub field: String,
    lower: Option<f64>,
    upper: Option<f64>,
}

/// The shape a range takes once its bounds are known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeShape {
    /// Both bounds set and equal
    Exact(f64),
    /// Only the upper bound set
    UpperOnly(f64),
    /// Only the lower bound set
    LowerOnly(f64),
    /// Both bounds set and different
    Bounded { lower: f64, upper: f64 },
    /// No bound set
    Absent,
}

impl RangeCriterion {
    /// Non-finite bounds are treated as unset.
    pub fn new(field: impl Into<String>, lower: Option<f64>, upper: Option<f64>) -> Self {
        Self {
            field: field.into(),
            lower: lower.filter(|v| v.is_finite()),
            upper: upper.filter(|v| v.is_finite()),
        }
    }

    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    /// Classify the bounds.
    pub fn shape(&self) -> RangeShape {
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) if lower == upper => RangeShape::Exact(lower),
            (Some(lower), Some(upper)) => RangeShape::Bounded { lower, upper },
            (None, Some(upper)) => RangeShape::UpperOnly(upper),
            (Some(lower), None) => RangeShape::LowerOnly(lower),
            (None, None) => RangeShape::Absent,
        }
    }
}

/// Request-scoped filter input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    text: Option<String>,
    sets: Vec<SetCriterion>,
    ranges: Vec<RangeCriterion>,
}

impl FilterCriteria {
    /// Criteria matching everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text token. Blank text clears it.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        self.text = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Add a set filter; skipped if no non-blank value remains.
    pub fn set<I, S>(mut self, field: impl Into<String>, values: I, operator: Operator) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(criterion) = SetCriterion::new(field, values, operator) {
            self.sets.push(criterion);
        }
        self
    }

    /// Add a range filter; skipped if neither bound is set.
    pub fn range(mut self, field: impl Into<String>, lower: Option<f64>, upper: Option<f64>) -> Self {
        let criterion = RangeCriterion::new(field, lower, upper);
        if criterion.shape() != RangeShape::Absent {
            self.ranges.push(criterion);
        }
        self
    }

    /// Append an already-built set criterion.
    pub fn with_set(mut self, criterion: SetCriterion) -> Self {
        self.sets.push(criterion);
        self
    }

    /// Append an already-built range criterion, even an absent one.
    pub fn with_range(mut self, criterion: RangeCriterion) -> Self {
        self.ranges.push(criterion);
        self
    }

    pub fn free_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn sets(&self) -> &[SetCriterion] {
        &self.sets
    }

    pub fn ranges(&self) -> &[RangeCriterion] {
        &self.ranges
    }

    /// True when no criterion is present.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.sets.is_empty() && self.ranges.is_empty()
    }
}
