//! Predicate composition for the filter and search endpoints.
//!
//! Filters AND together whichever optional bounds the request supplied;
//! search ORs a substring match across a resource's text columns.

use sea_orm::{
    ColumnTrait, Condition, Value,
    sea_query::{LikeExpr, SimpleExpr},
};

use crate::errors::ApiError;

/// Accumulates optional predicates into a single AND condition.
///
/// A `None` bound adds nothing, so a composer fed only absent parameters
/// matches the whole collection.
#[derive(Debug, Clone)]
#[must_use]
pub struct PredicateComposer {
    condition: Condition,
    applied: usize,
}

impl Default for PredicateComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl PredicateComposer {
    pub fn new() -> Self {
        Self {
            condition: Condition::all(),
            applied: 0,
        }
    }

    /// `column >= bound`
    pub fn at_least<C, V>(self, column: C, bound: Option<V>) -> Self
    where
        C: ColumnTrait,
        V: Into<Value>,
    {
        self.push(bound.map(|v| column.gte(v)))
    }

    /// `column <= bound`
    pub fn at_most<C, V>(self, column: C, bound: Option<V>) -> Self
    where
        C: ColumnTrait,
        V: Into<Value>,
    {
        self.push(bound.map(|v| column.lte(v)))
    }

    /// Inclusive range; either end may be open.
    pub fn between<C, V>(self, column: C, lower: Option<V>, upper: Option<V>) -> Self
    where
        C: ColumnTrait,
        V: Into<Value>,
    {
        self.at_least(column, lower).at_most(column, upper)
    }

    /// `column = value`
    pub fn equals<C, V>(self, column: C, value: Option<V>) -> Self
    where
        C: ColumnTrait,
        V: Into<Value>,
    {
        self.push(value.map(|v| column.eq(v)))
    }

    /// Number of predicates actually added.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.applied
    }

    #[must_use]
    pub fn build(self) -> Condition {
        self.condition
    }

    fn push(mut self, expr: Option<SimpleExpr>) -> Self {
        if let Some(expr) = expr {
            self.condition = self.condition.add(expr);
            self.applied += 1;
        }
        self
    }
}

/// Escape LIKE wildcards so `%`, `_` and `\` in a keyword match literally.
fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Rejects a missing, empty or whitespace-only keyword with `key`.
///
/// # Errors
/// `ApiError::BadRequest` carrying the resource's keyword message key.
pub fn require_keyword<'a>(keyword: Option<&'a str>, key: &'static str) -> Result<&'a str, ApiError> {
    match keyword {
        Some(k) if !k.trim().is_empty() => Ok(k),
        _ => Err(ApiError::bad_request(key)),
    }
}

/// `col1 LIKE '%kw%' OR col2 LIKE '%kw%' ...`
#[must_use]
pub fn keyword_condition<C: ColumnTrait>(columns: &[C], keyword: &str) -> Condition {
    let pattern = format!("%{}%", escape_like_wildcards(keyword));
    columns.iter().fold(Condition::any(), |condition, column| {
        condition.add(column.like(LikeExpr::new(pattern.clone()).escape('\\')))
    })
}
