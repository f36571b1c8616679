use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;
pub const STMT_BUFFER_COUNT: usize = 100;

/// Buffered sink for rendered statements. Each statement is followed by a
/// blank line.
pub struct StatementWriter<W: Write> {
    writer: BufWriter<W>,
    write_count: usize,
    max_stmt_buffer: usize,
    statements_written: u64,
    bytes_written: u64,
}

impl StatementWriter<File> {
    pub fn create(filename: &Path) -> std::io::Result<Self> {
        let file = File::create(filename)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> StatementWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(WRITER_BUFFER_SIZE, inner),
            write_count: 0,
            max_stmt_buffer: STMT_BUFFER_COUNT,
            statements_written: 0,
            bytes_written: 0,
        }
    }

    pub fn write_statement(&mut self, stmt: &str) -> std::io::Result<()> {
        self.writer.write_all(stmt.as_bytes())?;
        self.writer.write_all(b"\n\n")?;

        self.statements_written += 1;
        self.bytes_written += stmt.len() as u64 + 2;

        self.write_count += 1;
        if self.write_count >= self.max_stmt_buffer {
            self.write_count = 0;
            self.writer.flush()?;
        }

        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.write_count = 0;
        self.writer.flush()
    }

    pub fn statements_written(&self) -> u64 {
        self.statements_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> std::io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}
