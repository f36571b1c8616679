//! Schema command CLI handler.

use sql_dummy_gen::parser::{read_ddl_file, SqlDialect};
use sql_dummy_gen::schema::SchemaExtractor;
use std::path::PathBuf;

pub fn run(file: PathBuf, dialect: String, json: bool) -> anyhow::Result<()> {
    let dialect = dialect
        .parse::<SqlDialect>()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let ddl = read_ddl_file(&file)?;
    let extraction = SchemaExtractor::new(dialect).extract(&ddl);

    if json {
        println!("{}", serde_json::to_string_pretty(&extraction)?);
        return Ok(());
    }

    for warning in &extraction.warnings {
        eprintln!("Warning: {}", warning);
    }

    if extraction.is_empty() {
        println!("No CREATE TABLE statements found in {}", file.display());
        return Ok(());
    }

    for table in extraction.iter() {
        println!("{} ({} columns)", table.name, table.columns.len());
        let width = table
            .columns
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0);
        for column in &table.columns {
            println!("  {:<width$}  {}", column.name, column, width = width);
        }
        println!();
    }

    println!("Tables: {}", extraction.len());
    Ok(())
}
