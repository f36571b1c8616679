//! INSERT statement rendering and batching.
//!
//! Literal formatting is driven by a per-dialect [`LiteralStyle`] table, so a
//! new dialect only needs a new table entry.

use crate::parser::SqlDialect;
use crate::synth::{Row, SqlValue};
use std::fmt::Write;

/// Default number of rows per INSERT statement
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Upper bound on rows preallocated per batch; larger batches grow on demand
const INITIAL_BATCH_CAPACITY: usize = 1024;

/// Literal formatting rules for one dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralStyle {
    /// Quote character around string and timestamp literals
    pub quote: char,
    /// Replacement for a quote character inside a string literal
    pub escaped_quote: &'static str,
    /// `chrono` format string for timestamps
    pub timestamp_format: &'static str,
    pub true_literal: &'static str,
    pub false_literal: &'static str,
}

const MYSQL_STYLE: LiteralStyle = LiteralStyle {
    quote: '\'',
    escaped_quote: "''",
    timestamp_format: "%Y-%m-%d %H:%M:%S",
    true_literal: "1",
    false_literal: "0",
};

impl SqlDialect {
    pub fn literal_style(&self) -> &'static LiteralStyle {
        match self {
            SqlDialect::MySql => &MYSQL_STYLE,
        }
    }
}

impl LiteralStyle {
    /// Append the literal form of `value` to `out`
    pub fn write_value(&self, out: &mut String, value: &SqlValue) {
        match value {
            SqlValue::String(s) => self.write_quoted(out, s),
            SqlValue::Timestamp(ts) => {
                out.push(self.quote);
                let _ = write!(out, "{}", ts.format(self.timestamp_format));
                out.push(self.quote);
            }
            SqlValue::Int(n) => {
                let _ = write!(out, "{}", n);
            }
            SqlValue::Float(f) => {
                let _ = write!(out, "{}", f);
            }
            SqlValue::Bool(b) => out.push_str(if *b {
                self.true_literal
            } else {
                self.false_literal
            }),
        }
    }

    pub fn format_value(&self, value: &SqlValue) -> String {
        let mut out = String::new();
        self.write_value(&mut out, value);
        out
    }

    fn write_quoted(&self, out: &mut String, s: &str) {
        out.push(self.quote);
        for ch in s.chars() {
            if ch == self.quote {
                out.push_str(self.escaped_quote);
            } else {
                out.push(ch);
            }
        }
        out.push(self.quote);
    }
}

/// Render `rows` as one multi-row INSERT for `table`.
///
/// The column list follows the first row's order. Returns an empty string
/// when there are no rows; callers must not emit it.
pub fn render_insert(dialect: SqlDialect, table: &str, rows: &[Row<'_>]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };

    let style = dialect.literal_style();
    let columns: Vec<&str> = first.columns().collect();

    let mut sql = String::with_capacity(64 + rows.len() * columns.len() * 12);
    let _ = write!(sql, "INSERT INTO {} ({}) VALUES ", table, columns.join(", "));

    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for (j, value) in row.values().enumerate() {
            if j > 0 {
                sql.push_str(", ");
            }
            style.write_value(&mut sql, value);
        }
        sql.push(')');
    }

    sql.push(';');
    sql
}

/// Accumulates rows for a single table and renders a statement every
/// `batch_size` rows.
///
/// Holds at most `batch_size` rows; the buffer is cleared after each render
/// and keeps its capacity.
pub struct InsertBatcher<'a> {
    dialect: SqlDialect,
    table: &'a str,
    batch_size: usize,
    rows: Vec<Row<'a>>,
    statements_rendered: usize,
}

impl<'a> InsertBatcher<'a> {
    /// `batch_size` of zero is treated as one.
    pub fn new(dialect: SqlDialect, table: &'a str, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            dialect,
            table,
            batch_size,
            rows: Vec::with_capacity(batch_size.min(INITIAL_BATCH_CAPACITY)),
            statements_rendered: 0,
        }
    }

    /// Add a row; returns the rendered statement when the batch fills up.
    pub fn push(&mut self, row: Row<'a>) -> Option<String> {
        self.rows.push(row);
        if self.rows.len() >= self.batch_size {
            Some(self.flush())
        } else {
            None
        }
    }

    /// Render whatever is left over.
    pub fn finish(&mut self) -> Option<String> {
        if self.rows.is_empty() {
            None
        } else {
            Some(self.flush())
        }
    }

    pub fn pending(&self) -> usize {
        self.rows.len()
    }

    pub fn statements_rendered(&self) -> usize {
        self.statements_rendered
    }

    fn flush(&mut self) -> String {
        let sql = render_insert(self.dialect, self.table, &self.rows);
        self.rows.clear();
        self.statements_rendered += 1;
        sql
    }
}
