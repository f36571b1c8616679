//! Benchmarks for the generate pipeline.
//!
//! Tests:
//! - Schema extraction from MySQL dump-style DDL
//! - Row synthesis per table width
//! - INSERT rendering for full batches

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sql_dummy_gen::generate::Generator;
use sql_dummy_gen::parser::SqlDialect;
use sql_dummy_gen::render::render_insert;
use sql_dummy_gen::schema::{extract_schemas, TableSchema};
use sql_dummy_gen::synth::{generate_row, GenerationPolicy, TimeWindow};
use std::hint::black_box;
use std::io;

/// Generate MySQL DDL with `tables` tables of mixed column types
fn generate_ddl(tables: usize) -> String {
    let mut ddl = String::new();
    ddl.push_str("-- MySQL dump 10.13\n\n");

    for t in 0..tables {
        ddl.push_str(&format!(
            "CREATE TABLE `table_{}` (\n  `id` INT AUTO_INCREMENT PRIMARY KEY,\n  `flag` TINYINT(1) NOT NULL DEFAULT 0,\n  `name` VARCHAR(255),\n  `price` DECIMAL(10,2),\n  `created_at` DATETIME DEFAULT CURRENT_TIMESTAMP\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;\n\n",
            t
        ));
    }

    ddl
}

fn sample_table() -> TableSchema {
    let extraction = extract_schemas(&generate_ddl(1));
    extraction.tables.into_iter().next().unwrap_or_else(|| TableSchema::new("empty"))
}

fn policy() -> GenerationPolicy {
    GenerationPolicy::new(Some("created_at".to_string()), TimeWindow::today())
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_schemas");

    for tables in [10, 100] {
        let ddl = generate_ddl(tables);
        group.throughput(Throughput::Bytes(ddl.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(tables), &ddl, |b, ddl| {
            b.iter(|| black_box(extract_schemas(ddl)))
        });
    }

    group.finish();
}

fn bench_generate_row(c: &mut Criterion) {
    let table = sample_table();
    let policy = policy();
    let mut rng = StdRng::seed_from_u64(42);

    c.bench_function("generate_row", |b| {
        b.iter(|| black_box(generate_row(&table, &policy, &mut rng)))
    });
}

fn bench_render_insert(c: &mut Criterion) {
    let table = sample_table();
    let policy = policy();
    let mut rng = StdRng::seed_from_u64(42);

    let mut group = c.benchmark_group("render_insert");

    for batch in [100, 1000] {
        let rows: Vec<_> = (0..batch)
            .map(|_| generate_row(&table, &policy, &mut rng))
            .collect();
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch), &rows, |b, rows| {
            b.iter(|| black_box(render_insert(SqlDialect::MySql, &table.name, rows)))
        });
    }

    group.finish();
}

fn bench_generate_table(c: &mut Criterion) {
    let table = sample_table();
    let policy = policy();

    let mut group = c.benchmark_group("generate_table");
    group.sample_size(20);

    for rows in [1_000u64, 10_000] {
        group.throughput(Throughput::Elements(rows));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(42);
                let mut generator = Generator::new(io::sink(), SqlDialect::MySql, 1000);
                let stats = generator
                    .generate_table(&table, rows, &policy, &mut rng)
                    .unwrap();
                black_box(stats)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_extract,
    bench_generate_row,
    bench_render_insert,
    bench_generate_table
);
criterion_main!(benches);
