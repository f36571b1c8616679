//! Value synthesis: one fake value per column.
//!
//! Columns are dispatched through an ordered rule table keyed on substrings of
//! the column's type token. Order is significant because tokens overlap
//! (`bigint` and `tinyint` both contain `int`, `datetime` contains `time`), so
//! the first matching rule wins.

mod policy;
mod value;

pub use policy::{GenerationPolicy, TimeWindow};
pub use value::{Row, SqlValue};

use crate::schema::{Column, TableSchema};
use chrono::Local;
use rand::{Rng, RngCore};

/// Alphabet for generated strings
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generated strings never exceed this length, whatever the declared length
pub const MAX_STRING_LEN: usize = 10;

pub const TINYINT_UPPER: i64 = 128;
pub const INT_UPPER: i64 = 1000;
pub const FRACTIONAL_UPPER: f64 = 1000.0;

/// MySQL's largest DECIMAL scale; larger declared scales are clamped to it
pub const MAX_DECIMAL_SCALE: u32 = 30;

/// Which generation rule a column falls under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Random instant inside the policy window
    Audit,
    TinyInt,
    Int,
    Text,
    Bool,
    /// Current wall-clock time
    DateTime,
    Fractional,
    /// `val_<column>` for anything unrecognized
    Placeholder,
}

/// Type-token rules, in priority order
const TYPE_RULES: &[(ValueKind, &[&str])] = &[
    (ValueKind::TinyInt, &["tinyint"]),
    (ValueKind::Int, &["int"]),
    (ValueKind::Text, &["char", "text"]),
    (ValueKind::Bool, &["bool"]),
    (ValueKind::DateTime, &["time", "date"]),
    (ValueKind::Fractional, &["float", "double", "decimal"]),
];

/// Decide which rule applies to `column`. The audit column outranks every
/// type rule.
pub fn classify(column: &Column, policy: &GenerationPolicy) -> ValueKind {
    if policy.is_audit_column(&column.name) {
        return ValueKind::Audit;
    }

    TYPE_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| column.type_name.contains(n)))
        .map(|(kind, _)| *kind)
        .unwrap_or(ValueKind::Placeholder)
}

/// Produce one value for `column`. Never fails.
pub fn synthesize(column: &Column, policy: &GenerationPolicy, rng: &mut dyn RngCore) -> SqlValue {
    match classify(column, policy) {
        ValueKind::Audit => SqlValue::Timestamp(policy.window.random_instant(rng)),
        ValueKind::TinyInt => SqlValue::Int(rng.random_range(0..TINYINT_UPPER)),
        ValueKind::Int => SqlValue::Int(rng.random_range(0..INT_UPPER)),
        ValueKind::Text => SqlValue::String(random_string(rng, string_length(column))),
        ValueKind::Bool => SqlValue::Bool(rng.random()),
        ValueKind::DateTime => SqlValue::Timestamp(Local::now().naive_local()),
        ValueKind::Fractional => SqlValue::Float(random_fraction(column, rng)),
        ValueKind::Placeholder => SqlValue::String(format!("val_{}", column.name)),
    }
}

/// Synthesize a full row for `table`, in column declaration order.
pub fn generate_row<'a>(
    table: &'a TableSchema,
    policy: &GenerationPolicy,
    rng: &mut dyn RngCore,
) -> Row<'a> {
    let mut row = Row::with_capacity(table.columns.len());
    for column in &table.columns {
        row.push(&column.name, synthesize(column, policy, rng));
    }
    row
}

/// Declared length when `0 < length < MAX_STRING_LEN`, otherwise the cap
fn string_length(column: &Column) -> usize {
    match column.length {
        Some(len) if len > 0 && (len as usize) < MAX_STRING_LEN => len as usize,
        _ => MAX_STRING_LEN,
    }
}

fn random_string(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

fn random_fraction(column: &Column, rng: &mut dyn RngCore) -> f64 {
    let value = rng.random::<f64>() * FRACTIONAL_UPPER;
    match column.scale {
        Some(scale) if column.type_name.contains("decimal") => {
            let pow = 10f64.powi(scale.min(MAX_DECIMAL_SCALE) as i32);
            (value * pow).round() / pow
        }
        _ => value,
    }
}
