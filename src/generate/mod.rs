//! Generate command: read DDL, synthesize rows for every table and write
//! batched INSERT statements.
//!
//! Tables are processed one at a time in discovery order; rows are rendered
//! as soon as a batch fills up, so memory stays bounded by the batch size.

mod config;

pub use config::{DefaultConfig, GenerateYamlConfig, TableConfig};

use crate::parser::{read_ddl_file, Compression, SqlDialect};
use crate::render::{InsertBatcher, DEFAULT_BATCH_SIZE};
use crate::schema::{SchemaExtractor, TableSchema};
use crate::synth::{generate_row, GenerationPolicy, TimeWindow};
use crate::writer::StatementWriter;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Rows per table when neither flags nor config say otherwise
pub const DEFAULT_ROWS: u64 = 1;

/// Rows between progress callbacks
const PROGRESS_INTERVAL: u64 = 1000;

/// Configuration for a generate run
#[derive(Debug)]
pub struct GenerateConfig {
    /// DDL file (optionally compressed)
    pub input: PathBuf,
    /// Output file; `output-<stem>.sql` when unset
    pub output: Option<PathBuf>,
    pub dialect: SqlDialect,
    /// Rows per table (flag value, overrides config default)
    pub rows: Option<u64>,
    /// Rows per INSERT statement
    pub batch_size: Option<usize>,
    pub audit_column: Option<String>,
    /// `START,END` window for the audit column
    pub time_range: Option<String>,
    pub seed: u64,
    /// Only generate these tables
    pub tables_filter: Option<Vec<String>>,
    /// Never generate these tables
    pub exclude: Vec<String>,
    /// YAML config file
    pub config_file: Option<PathBuf>,
    pub progress: bool,
    /// Generate without writing any file
    pub dry_run: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            dialect: SqlDialect::default(),
            rows: None,
            batch_size: None,
            audit_column: None,
            time_range: None,
            seed: rand::random(),
            tables_filter: None,
            exclude: Vec::new(),
            config_file: None,
            progress: false,
            dry_run: false,
        }
    }
}

/// Per-table statistics
#[derive(Debug, Default, Clone)]
pub struct TableStats {
    pub name: String,
    pub rows_generated: u64,
    pub statements_written: u64,
}

/// Statistics from a generate run
#[derive(Debug, Default)]
pub struct GenerateStats {
    pub tables_generated: usize,
    pub tables_skipped: usize,
    pub total_rows: u64,
    pub statements_written: u64,
    pub bytes_written: u64,
    /// File written, `None` for dry runs
    pub output: Option<PathBuf>,
    pub seed: u64,
    /// Skipped statements and skipped tables
    pub warnings: Vec<String>,
    pub table_stats: Vec<TableStats>,
}

/// Writes INSERT statements for one table after another into a single sink.
pub struct Generator<W: Write> {
    writer: StatementWriter<W>,
    dialect: SqlDialect,
    batch_size: usize,
    rows_generated: u64,
    progress_fn: Option<Box<dyn Fn(u64)>>,
}

impl<W: Write> Generator<W> {
    pub fn new(inner: W, dialect: SqlDialect, batch_size: usize) -> Self {
        Self {
            writer: StatementWriter::new(inner),
            dialect,
            batch_size,
            rows_generated: 0,
            progress_fn: None,
        }
    }

    /// Called with the running total of rows generated across all tables
    pub fn with_progress<F: Fn(u64) + 'static>(mut self, f: F) -> Self {
        self.progress_fn = Some(Box::new(f));
        self
    }

    /// Generate `rows` rows for `table` and write them out in batches.
    pub fn generate_table(
        &mut self,
        table: &TableSchema,
        rows: u64,
        policy: &GenerationPolicy,
        rng: &mut dyn RngCore,
    ) -> io::Result<TableStats> {
        let mut batcher = InsertBatcher::new(self.dialect, &table.name, self.batch_size);
        let mut stats = TableStats {
            name: table.name.clone(),
            ..Default::default()
        };

        for i in 0..rows {
            let row = generate_row(table, policy, rng);
            if let Some(sql) = batcher.push(row) {
                self.writer.write_statement(&sql)?;
                stats.statements_written += 1;
            }

            stats.rows_generated += 1;
            self.rows_generated += 1;

            if (i + 1) % PROGRESS_INTERVAL == 0 || i + 1 == rows {
                if let Some(ref cb) = self.progress_fn {
                    cb(self.rows_generated);
                }
            }
        }

        if let Some(sql) = batcher.finish() {
            self.writer.write_statement(&sql)?;
            stats.statements_written += 1;
        }

        Ok(stats)
    }

    pub fn rows_generated(&self) -> u64 {
        self.rows_generated
    }

    pub fn bytes_written(&self) -> u64 {
        self.writer.bytes_written()
    }

    /// Flush all pending output and return the underlying writer
    pub fn finish(self) -> io::Result<W> {
        self.writer.into_inner()
    }
}

/// Effective settings after merging flags, YAML defaults and built-ins.
struct Plan {
    rows: u64,
    batch_size: usize,
    window: TimeWindow,
    audit_column: Option<String>,
    yaml: Option<GenerateYamlConfig>,
}

impl Plan {
    fn resolve(config: &GenerateConfig, yaml: Option<GenerateYamlConfig>) -> anyhow::Result<Self> {
        let defaults = yaml.as_ref().map(|y| &y.default);

        let rows = config
            .rows
            .or_else(|| defaults.and_then(|d| d.rows))
            .unwrap_or(DEFAULT_ROWS);

        let batch_size = config
            .batch_size
            .or_else(|| defaults.and_then(|d| d.batch_size))
            .unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            anyhow::bail!("--batch-size must be greater than 0");
        }

        let time_range = config
            .time_range
            .clone()
            .or_else(|| defaults.and_then(|d| d.time_range.clone()));
        let window = match time_range {
            Some(range) => range
                .parse::<TimeWindow>()
                .map_err(|e| anyhow::anyhow!("{}", e))?,
            None => TimeWindow::today(),
        };

        let audit_column = config
            .audit_column
            .clone()
            .or_else(|| defaults.and_then(|d| d.audit_column.clone()));

        Ok(Self {
            rows,
            batch_size,
            window,
            audit_column,
            yaml,
        })
    }

    fn should_skip(&self, config: &GenerateConfig, table: &str) -> bool {
        if let Some(ref filter) = config.tables_filter {
            if !filter.iter().any(|t| t.eq_ignore_ascii_case(table)) {
                return true;
            }
        }
        if config.exclude.iter().any(|t| t.eq_ignore_ascii_case(table)) {
            return true;
        }
        self.yaml
            .as_ref()
            .map(|y| y.should_skip(table))
            .unwrap_or(false)
    }

    fn rows_for(&self, table: &str) -> u64 {
        self.yaml
            .as_ref()
            .and_then(|y| y.table_rows(table))
            .unwrap_or(self.rows)
    }

    fn policy_for(&self, table: &str) -> GenerationPolicy {
        let audit_column = self
            .yaml
            .as_ref()
            .and_then(|y| y.table_audit_column(table))
            .map(str::to_string)
            .or_else(|| self.audit_column.clone());
        GenerationPolicy::new(audit_column, self.window)
    }
}

/// Default output path: `output-<input stem>.sql` in the working directory.
/// Compression extensions are ignored when taking the stem.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = PathBuf::from(input.file_name().unwrap_or_default());
    if Compression::from_path(&name) != Compression::None {
        name.set_extension("");
    }
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ddl".to_string());
    PathBuf::from(format!("output-{}.sql", stem))
}

/// Run a full generation pass.
///
/// Configuration problems (bad time range, zero batch size, unreadable config
/// file) and a DDL file without any usable table are reported before the
/// output file is created.
pub fn run(config: GenerateConfig) -> anyhow::Result<GenerateStats> {
    let yaml_config = match config.config_file {
        Some(ref path) => Some(GenerateYamlConfig::load(path)?),
        None => None,
    };
    let plan = Plan::resolve(&config, yaml_config)?;

    let ddl = read_ddl_file(&config.input)?;
    let extraction = SchemaExtractor::new(config.dialect).extract(&ddl);

    let mut stats = GenerateStats {
        seed: config.seed,
        warnings: extraction.warnings.clone(),
        ..Default::default()
    };

    if extraction.is_empty() {
        let mut msg = format!(
            "No CREATE TABLE statements found in {}",
            config.input.display()
        );
        for warning in &extraction.warnings {
            msg.push_str("\n  ");
            msg.push_str(warning);
        }
        anyhow::bail!(msg);
    }

    let mut jobs = Vec::with_capacity(extraction.len());
    for table in extraction.iter() {
        if plan.should_skip(&config, &table.name) {
            stats.tables_skipped += 1;
            continue;
        }
        if table.columns.is_empty() {
            stats
                .warnings
                .push(format!("skipping table {}: no columns declared", table.name));
            stats.tables_skipped += 1;
            continue;
        }
        jobs.push((table, plan.rows_for(&table.name), plan.policy_for(&table.name)));
    }

    let output_path = if config.dry_run {
        None
    } else {
        Some(
            config
                .output
                .clone()
                .unwrap_or_else(|| default_output_path(&config.input)),
        )
    };

    let sink: Box<dyn Write> = match output_path {
        Some(ref path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        ),
        None => Box::new(io::sink()),
    };

    let total_rows: u64 = jobs.iter().map(|(_, rows, _)| *rows).sum();
    let progress_bar = if config.progress {
        let pb = ProgressBar::new(total_rows);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}",
            )?
            .progress_chars("█▓▒░  ")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let mut generator = Generator::new(sink, config.dialect, plan.batch_size);
    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        generator = generator.with_progress(move |rows| pb_clone.set_position(rows));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);

    for (table, rows, policy) in jobs {
        if let Some(ref pb) = progress_bar {
            pb.set_message(format!("Generating data for table: {}", table.name));
        }

        let table_stats = generator
            .generate_table(table, rows, &policy, &mut rng)
            .with_context(|| format!("Failed to write INSERT statements for table {}", table.name))?;

        stats.tables_generated += 1;
        stats.total_rows += table_stats.rows_generated;
        stats.statements_written += table_stats.statements_written;
        stats.table_stats.push(table_stats);
    }

    stats.bytes_written = generator.bytes_written();
    generator.finish().context("Failed to flush output")?;

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    stats.output = output_path;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("ddl/schema.sql")),
            PathBuf::from("output-schema.sql")
        );
        assert_eq!(
            default_output_path(Path::new("schema.sql.gz")),
            PathBuf::from("output-schema.sql")
        );
        assert_eq!(
            default_output_path(Path::new("tables")),
            PathBuf::from("output-tables.sql")
        );
    }

    #[test]
    fn test_plan_flags_override_yaml_defaults() {
        let yaml: GenerateYamlConfig = serde_yaml_ng::from_str(
            r#"
default:
  rows: 50
  batch_size: 10
  audit_column: created_at
tables:
  users:
    rows: 5
    audit_column: joined_at
"#,
        )
        .unwrap();

        let config = GenerateConfig {
            rows: Some(7),
            ..Default::default()
        };
        let plan = Plan::resolve(&config, Some(yaml)).unwrap();

        assert_eq!(plan.batch_size, 10);
        assert_eq!(plan.rows_for("orders"), 7);
        assert_eq!(plan.rows_for("users"), 5);
        assert_eq!(
            plan.policy_for("orders").audit_column.as_deref(),
            Some("created_at")
        );
        assert_eq!(
            plan.policy_for("users").audit_column.as_deref(),
            Some("joined_at")
        );
    }

    #[test]
    fn test_plan_rejects_zero_batch_size() {
        let config = GenerateConfig {
            batch_size: Some(0),
            ..Default::default()
        };
        assert!(Plan::resolve(&config, None).is_err());
    }

    #[test]
    fn test_plan_rejects_bad_time_range() {
        let config = GenerateConfig {
            time_range: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert!(Plan::resolve(&config, None).is_err());
    }

    #[test]
    fn test_table_filters() {
        let config = GenerateConfig {
            tables_filter: Some(vec!["Users".to_string(), "orders".to_string()]),
            exclude: vec!["orders".to_string()],
            ..Default::default()
        };
        let plan = Plan::resolve(&config, None).unwrap();

        assert!(!plan.should_skip(&config, "users"));
        assert!(plan.should_skip(&config, "orders"));
        assert!(plan.should_skip(&config, "sessions"));
    }
}
