//! Unit tests for INSERT rendering and batching.

use chrono::NaiveDateTime;
use sql_dummy_gen::parser::SqlDialect;
use sql_dummy_gen::render::{render_insert, InsertBatcher, DEFAULT_BATCH_SIZE};
use sql_dummy_gen::synth::{Row, SqlValue};

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn user_row(id: i64, name: &str) -> Row<'static> {
    let mut row = Row::with_capacity(2);
    row.push("id", SqlValue::Int(id));
    row.push("name", SqlValue::String(name.to_string()));
    row
}

mod literal_tests {
    use super::*;

    fn literal(value: SqlValue) -> String {
        SqlDialect::MySql.literal_style().format_value(&value)
    }

    #[test]
    fn test_string_quotes_are_doubled() {
        assert_eq!(literal(SqlValue::String("O'Brien".into())), "'O''Brien'");
        assert_eq!(literal(SqlValue::String("''".into())), "''''''");
        assert_eq!(literal(SqlValue::String(String::new())), "''");
    }

    #[test]
    fn test_backslashes_pass_through() {
        assert_eq!(literal(SqlValue::String(r"a\b".into())), r"'a\b'");
    }

    #[test]
    fn test_timestamp_literal() {
        assert_eq!(
            literal(SqlValue::Timestamp(at("2024-01-05 13:04:09"))),
            "'2024-01-05 13:04:09'"
        );
    }

    #[test]
    fn test_timestamp_drops_fractional_seconds() {
        let ts = NaiveDateTime::parse_from_str("2024-01-05 13:04:09.987", "%Y-%m-%d %H:%M:%S%.f")
            .unwrap();
        assert_eq!(literal(SqlValue::Timestamp(ts)), "'2024-01-05 13:04:09'");
    }

    #[test]
    fn test_numeric_and_bool_literals() {
        assert_eq!(literal(SqlValue::Int(42)), "42");
        assert_eq!(literal(SqlValue::Int(0)), "0");
        assert_eq!(literal(SqlValue::Float(12.5)), "12.5");
        assert_eq!(literal(SqlValue::Float(3.0)), "3");
        assert_eq!(literal(SqlValue::Bool(true)), "1");
        assert_eq!(literal(SqlValue::Bool(false)), "0");
    }
}

mod insert_tests {
    use super::*;

    #[test]
    fn test_render_single_row() {
        let sql = render_insert(SqlDialect::MySql, "users", &[user_row(1, "O'Brien")]);
        assert_eq!(sql, "INSERT INTO users (id, name) VALUES (1, 'O''Brien');");
    }

    #[test]
    fn test_render_multiple_rows() {
        let rows = vec![user_row(1, "a"), user_row(2, "b"), user_row(3, "c")];
        let sql = render_insert(SqlDialect::MySql, "users", &rows);
        assert_eq!(
            sql,
            "INSERT INTO users (id, name) VALUES (1, 'a'), (2, 'b'), (3, 'c');"
        );
    }

    #[test]
    fn test_render_keeps_column_order() {
        let mut row = Row::with_capacity(4);
        row.push("zeta", SqlValue::Bool(true));
        row.push("alpha", SqlValue::Float(1.25));
        row.push("created_at", SqlValue::Timestamp(at("2024-01-01 00:00:00")));
        row.push("blob", SqlValue::String("val_blob".into()));

        let sql = render_insert(SqlDialect::MySql, "t", &[row]);
        assert_eq!(
            sql,
            "INSERT INTO t (zeta, alpha, created_at, blob) VALUES (1, 1.25, '2024-01-01 00:00:00', 'val_blob');"
        );
    }

    #[test]
    fn test_render_empty_rows() {
        assert_eq!(render_insert(SqlDialect::MySql, "users", &[]), "");
    }
}

mod batcher_tests {
    use super::*;

    fn count_tuples(sql: &str) -> usize {
        sql.matches("), (").count() + 1
    }

    #[test]
    fn test_batches_of_default_size() {
        let mut batcher = InsertBatcher::new(SqlDialect::MySql, "users", DEFAULT_BATCH_SIZE);
        let mut statements = Vec::new();

        for i in 0..2500 {
            if let Some(sql) = batcher.push(user_row(i, "x")) {
                statements.push(sql);
            }
        }
        assert_eq!(batcher.pending(), 500);
        if let Some(sql) = batcher.finish() {
            statements.push(sql);
        }

        let sizes: Vec<usize> = statements.iter().map(|s| count_tuples(s)).collect();
        assert_eq!(sizes, vec![1000, 1000, 500]);
        assert_eq!(batcher.statements_rendered(), 3);
        assert_eq!(batcher.pending(), 0);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_statement() {
        let mut batcher = InsertBatcher::new(SqlDialect::MySql, "users", 2);
        assert!(batcher.push(user_row(1, "a")).is_none());
        assert!(batcher.push(user_row(2, "b")).is_some());
        assert!(batcher.finish().is_none());
        assert_eq!(batcher.statements_rendered(), 1);
    }

    #[test]
    fn test_batch_size_larger_than_rows() {
        let mut batcher = InsertBatcher::new(SqlDialect::MySql, "users", 10);
        for i in 0..3 {
            assert!(batcher.push(user_row(i, "a")).is_none());
        }
        let sql = batcher.finish().unwrap();
        assert_eq!(count_tuples(&sql), 3);
    }

    #[test]
    fn test_zero_batch_size_renders_every_row() {
        let mut batcher = InsertBatcher::new(SqlDialect::MySql, "users", 0);
        let sql = batcher.push(user_row(7, "z")).unwrap();
        assert_eq!(sql, "INSERT INTO users (id, name) VALUES (7, 'z');");
    }

    #[test]
    fn test_huge_batch_size_does_not_preallocate() {
        let mut batcher = InsertBatcher::new(SqlDialect::MySql, "users", usize::MAX / 8);
        assert!(batcher.push(user_row(1, "a")).is_none());
        assert!(batcher.push(user_row(2, "b")).is_none());
        let sql = batcher.finish().unwrap();
        assert_eq!(sql, "INSERT INTO users (id, name) VALUES (1, 'a'), (2, 'b');");
    }

    #[test]
    fn test_no_rows_no_statement() {
        let mut batcher = InsertBatcher::new(SqlDialect::MySql, "users", 10);
        assert!(batcher.finish().is_none());
        assert_eq!(batcher.statements_rendered(), 0);
    }
}
