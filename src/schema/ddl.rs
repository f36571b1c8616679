//! DDL parsing for schema extraction.
//!
//! Each `;`-terminated statement is handed to `sqlparser`. Only CREATE TABLE
//! statements contribute a schema; everything else (parse failures, indexes,
//! drops, comments) is recorded as a warning and skipped.

use super::{Column, Extraction, TableSchema};
use crate::parser::{split_statements, SqlDialect};
use once_cell::sync::Lazy;
use regex::Regex;
use sqlparser::ast::{ColumnDef, CreateTable, ObjectName, ObjectNamePart, Statement};
use sqlparser::parser::{Parser, ParserError};

/// Leading numeric parameter list of a rendered data type: `(5)` or `(10,2)`
static TYPE_PARAMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\s*(\d+)\s*(?:,\s*(\d+)\s*)?\)").unwrap());

/// Longest statement excerpt quoted in a warning
const WARNING_EXCERPT_LEN: usize = 120;

/// Extracts table schemas from DDL text for one dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaExtractor {
    dialect: SqlDialect,
}

impl SchemaExtractor {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }

    /// Extract every CREATE TABLE in `ddl`, in declaration order.
    ///
    /// Never fails: unusable statements only add a warning. An empty result
    /// is left for the caller to judge.
    pub fn extract(&self, ddl: &str) -> Extraction {
        let mut extraction = Extraction::default();

        for stmt in split_statements(ddl) {
            match self.parse_create_table(&stmt) {
                Ok(Some(table)) => extraction.tables.push(table),
                Ok(None) => extraction.warnings.push(format!(
                    "skipping statement that is not CREATE TABLE: {}",
                    excerpt(&stmt)
                )),
                Err(e) => extraction.warnings.push(format!(
                    "skipping statement due to parse error: {}\nSQL: {}",
                    e,
                    excerpt(&stmt)
                )),
            }
        }

        extraction
    }

    /// Parse a single statement. `Ok(None)` means it parsed but is not a
    /// CREATE TABLE (or held no statement at all).
    pub fn parse_create_table(&self, stmt: &str) -> Result<Option<TableSchema>, ParserError> {
        let mut statements = Parser::parse_sql(self.dialect.grammar(), stmt)?;
        if statements.len() != 1 {
            return Ok(None);
        }

        match statements.remove(0) {
            Statement::CreateTable(create) => Ok(Some(table_from_create(&create))),
            _ => Ok(None),
        }
    }
}

/// Extract schemas using the default (MySQL) grammar.
pub fn extract_schemas(ddl: &str) -> Extraction {
    SchemaExtractor::default().extract(ddl)
}

fn table_from_create(create: &CreateTable) -> TableSchema {
    let mut table = TableSchema::new(table_name(&create.name));
    table.columns = create.columns.iter().map(column_from_def).collect();
    table
}

/// Last identifier of a possibly schema-qualified name, without quotes
fn table_name(name: &ObjectName) -> String {
    name.0
        .iter()
        .rev()
        .find_map(|part| match part {
            ObjectNamePart::Identifier(ident) => Some(ident.value.clone()),
            _ => None,
        })
        .unwrap_or_else(|| name.to_string())
}

fn column_from_def(def: &ColumnDef) -> Column {
    parse_column_type(&def.name.value, &def.data_type.to_string())
}

/// Build a column from its name and declared type text.
///
/// The type token is the lower-cased text before any parameter list, cut at
/// the first whitespace: `INT(11) UNSIGNED` gives `int`, `DOUBLE PRECISION`
/// gives `double`. Length and scale come from a leading numeric parameter
/// list and stay unset when there is none.
pub fn parse_column_type(name: &str, type_str: &str) -> Column {
    let lower = type_str.trim().to_lowercase();
    let (base, params) = match lower.find('(') {
        Some(i) => (&lower[..i], &lower[i..]),
        None => (lower.as_str(), ""),
    };

    let type_name = match base.split_whitespace().next() {
        Some(token) => token.to_string(),
        None => "unspecified".to_string(),
    };

    let mut column = Column::new(name, type_name);

    if let Some(caps) = TYPE_PARAMS_RE.captures(params) {
        column.length = caps.get(1).and_then(|m| m.as_str().parse().ok());
        column.scale = caps.get(2).and_then(|m| m.as_str().parse().ok());
    }

    column
}

fn excerpt(stmt: &str) -> String {
    let flat = stmt.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= WARNING_EXCERPT_LEN {
        return flat;
    }
    let cut: String = flat.chars().take(WARNING_EXCERPT_LEN).collect();
    format!("{}...", cut)
}
