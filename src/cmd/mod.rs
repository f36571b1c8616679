mod generate;
mod schema;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sql-dummy-gen")]
#[command(version)]
#[command(about = "Generate dummy INSERT statements from CREATE TABLE definitions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate batched INSERT statements for every table in a DDL file
    Generate {
        /// DDL file containing CREATE TABLE statements
        /// Supports .gz, .bz2, .xz, .zst compression
        file: PathBuf,

        /// Output SQL file (default: output-<ddl file name>.sql)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target SQL dialect: mysql
        #[arg(short, long, default_value = "mysql")]
        dialect: String,

        /// Audit column to fill with random timestamps inside --time-range
        #[arg(long, visible_alias = "created-col")]
        audit_column: Option<String>,

        /// Window for the audit column: YYYY-MM-DD,YYYY-MM-DD (default: today)
        #[arg(long)]
        time_range: Option<String>,

        /// Rows to generate per table (default: 1)
        #[arg(short = 'n', long, visible_alias = "num")]
        rows: Option<u64>,

        /// Rows per INSERT statement (default: 1000)
        #[arg(long)]
        batch_size: Option<usize>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Only generate specific tables (comma-separated)
        #[arg(short, long)]
        tables: Option<String>,

        /// Exclude specific tables (comma-separated)
        #[arg(short, long)]
        exclude: Option<String>,

        /// YAML config file for defaults and per-table settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,

        /// Generate without writing the output file
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the table schemas extracted from a DDL file
    Schema {
        /// DDL file containing CREATE TABLE statements
        /// Supports .gz, .bz2, .xz, .zst compression
        file: PathBuf,

        /// SQL dialect of the DDL: mysql
        #[arg(short, long, default_value = "mysql")]
        dialect: String,

        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            file,
            output,
            dialect,
            audit_column,
            time_range,
            rows,
            batch_size,
            seed,
            tables,
            exclude,
            config,
            progress,
            dry_run,
        } => generate::run(
            file,
            output,
            dialect,
            audit_column,
            time_range,
            rows,
            batch_size,
            seed,
            tables,
            exclude,
            config,
            progress,
            dry_run,
        ),
        Commands::Schema {
            file,
            dialect,
            json,
        } => schema::run(file, dialect, json),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "sql-dummy-gen",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

/// Split a comma-separated flag value into trimmed, non-empty names
fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
