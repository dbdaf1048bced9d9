//! Typed cell values
//!
//! A cell is the value of one row field, as delivered by the venue. Query
//! predicates compare cells; comparison is only defined between cells of the
//! same type, and an unset cell (`None` at the field level) never matches.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One typed cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Cell {
    /// Money, rate, and amount cells
    Decimal(Decimal),
    /// Count and code cells
    Int(i64),
    /// Free-text and venue-code cells
    Text(String),
    /// Timestamp cells (venue clock, UTC)
    Time(DateTime<Utc>),
    /// Flag cells
    Bool(bool),
}

impl Cell {
    /// Compare two cells of the same type.
    ///
    /// Returns `None` when the types differ; relational predicates treat
    /// that as "no match" rather than an error.
    pub fn compare(&self, other: &Cell) -> Option<Ordering> {
        match (self, other) {
            (Cell::Decimal(a), Cell::Decimal(b)) => Some(a.cmp(b)),
            (Cell::Int(a), Cell::Int(b)) => Some(a.cmp(b)),
            (Cell::Text(a), Cell::Text(b)) => Some(a.cmp(b)),
            (Cell::Time(a), Cell::Time(b)) => Some(a.cmp(b)),
            (Cell::Bool(a), Cell::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Short label for logging
    pub fn type_label(&self) -> &'static str {
        match self {
            Cell::Decimal(_) => "decimal",
            Cell::Int(_) => "int",
            Cell::Text(_) => "text",
            Cell::Time(_) => "time",
            Cell::Bool(_) => "bool",
        }
    }
}

impl From<Decimal> for Cell {
    fn from(v: Decimal) -> Self {
        Cell::Decimal(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<i32> for Cell {
    fn from(v: i32) -> Self {
        Cell::Int(v as i64)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

impl From<DateTime<Utc>> for Cell {
    fn from(v: DateTime<Utc>) -> Self {
        Cell::Time(v)
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Cell::Bool(v)
    }
}
