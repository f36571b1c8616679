//! Schema model extracted from CREATE TABLE statements.
//!
//! This module provides:
//! - Data models for tables and columns
//! - Grammar-aware DDL extraction that skips anything it cannot use

mod ddl;

pub use ddl::*;

use serde::Serialize;
use std::fmt;

/// Column definition within a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Column name, unquoted
    pub name: String,
    /// Lower-cased base type token (`int`, `varchar`, `decimal`, ...)
    pub type_name: String,
    /// First declared numeric type parameter, e.g. 5 in `VARCHAR(5)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Second declared numeric type parameter, e.g. 2 in `DECIMAL(10,2)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

impl Column {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            length: None,
            scale: None,
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.length, self.scale) {
            (Some(l), Some(s)) => write!(f, "{}({},{})", self.type_name, l, s),
            (Some(l), None) => write!(f, "{}({})", self.type_name, l),
            _ => write!(f, "{}", self.type_name),
        }
    }
}

/// Table schema definition. Columns are kept in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Get a column by name (case-insensitive)
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Result of extracting schemas from a DDL document.
#[derive(Debug, Default, Serialize)]
pub struct Extraction {
    /// Tables in declaration order; repeated names are kept as-is
    pub tables: Vec<TableSchema>,
    /// One entry per statement that was skipped
    pub warnings: Vec<String>,
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.iter()
    }
}
