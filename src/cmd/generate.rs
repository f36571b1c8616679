//! Generate command CLI handler.

use super::split_list;
use sql_dummy_gen::generate::{self, GenerateConfig};
use sql_dummy_gen::parser::SqlDialect;
use std::path::PathBuf;
use std::time::Instant;

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    dialect: String,
    audit_column: Option<String>,
    time_range: Option<String>,
    rows: Option<u64>,
    batch_size: Option<usize>,
    seed: Option<u64>,
    tables: Option<String>,
    exclude: Option<String>,
    config: Option<PathBuf>,
    progress: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let dialect = dialect
        .parse::<SqlDialect>()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    if batch_size == Some(0) {
        anyhow::bail!("--batch-size must be greater than 0");
    }

    let tables_filter = tables.map(|t| split_list(Some(t)));
    let exclude = split_list(exclude);

    // Generate random seed if not provided
    let seed = seed.unwrap_or_else(rand::random);

    if progress {
        eprintln!("Parsing DDL file: {}", file.display());
    }

    let generate_config = GenerateConfig {
        input: file,
        output,
        dialect,
        rows,
        batch_size,
        audit_column,
        time_range,
        seed,
        tables_filter,
        exclude,
        config_file: config,
        progress,
        dry_run,
    };

    let start = Instant::now();
    let stats = generate::run(generate_config)?;
    let elapsed = start.elapsed();

    for warning in &stats.warnings {
        eprintln!("Warning: {}", warning);
    }

    if progress || dry_run {
        eprintln!();
        eprintln!("Generate Statistics:");
        eprintln!("  Seed: {}", stats.seed);
        eprintln!("  Tables generated: {}", stats.tables_generated);
        eprintln!("  Tables skipped: {}", stats.tables_skipped);
        eprintln!("  Rows: {}", stats.total_rows);
        eprintln!("  INSERT statements: {}", stats.statements_written);

        if dry_run {
            eprintln!();
            eprintln!("Per-table breakdown:");
            for table_stat in &stats.table_stats {
                eprintln!(
                    "  {}: {} rows in {} statements",
                    table_stat.name, table_stat.rows_generated, table_stat.statements_written
                );
            }
        }
    }

    match stats.output {
        Some(ref path) => eprintln!(
            "Generated {} rows across {} tables to {} in {:.2?}",
            stats.total_rows,
            stats.tables_generated,
            path.display(),
            elapsed
        ),
        None => eprintln!(
            "Dry run: {} rows across {} tables ({} bytes) in {:.2?}",
            stats.total_rows, stats.tables_generated, stats.bytes_written, elapsed
        ),
    }

    Ok(())
}
