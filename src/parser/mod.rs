//! DDL input handling: statement splitting, dialect selection and
//! transparent decompression of input files.

use anyhow::Context;
use sqlparser::dialect::{Dialect, MySqlDialect};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

pub const READ_BUFFER_SIZE: usize = 64 * 1024;

static MYSQL_GRAMMAR: MySqlDialect = MySqlDialect {};

/// Target SQL dialect for both DDL parsing and INSERT rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlDialect {
    #[default]
    MySql,
}

impl SqlDialect {
    /// Grammar used to parse CREATE TABLE statements written for this dialect.
    pub fn grammar(&self) -> &'static dyn Dialect {
        match self {
            SqlDialect::MySql => &MYSQL_GRAMMAR,
        }
    }
}

impl std::str::FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(SqlDialect::MySql),
            _ => Err(format!("Unsupported dialect: {}. Supported: mysql", s)),
        }
    }
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlDialect::MySql => write!(f, "mysql"),
        }
    }
}

/// Splits a byte stream into `;`-terminated statements.
///
/// Terminators inside quoted spans (single, double, backtick) and inside
/// comments (`-- `, `#`, `/* */`) are ignored, and backslash escapes are
/// honored inside string literals. Comments stay in the statement text. The
/// returned statement never includes the terminator itself.
pub struct StatementReader<R: Read> {
    reader: BufReader<R>,
    stmt_buffer: Vec<u8>,
}

impl<R: Read> StatementReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::with_capacity(READ_BUFFER_SIZE, reader),
            stmt_buffer: Vec::with_capacity(4 * 1024),
        }
    }

    pub fn read_statement(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        self.stmt_buffer.clear();

        let mut inside_single_quote = false;
        let mut inside_double_quote = false;
        let mut inside_backtick = false;
        let mut inside_line_comment = false;
        let mut inside_block_comment = false;
        let mut escaped = false;
        let mut prev = 0u8;

        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                if self.stmt_buffer.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(std::mem::take(&mut self.stmt_buffer)));
            }

            let mut terminator_at = None;

            for (i, &b) in buf.iter().enumerate() {
                let last = std::mem::replace(&mut prev, b);

                if inside_line_comment {
                    inside_line_comment = b != b'\n';
                    continue;
                }

                if inside_block_comment {
                    if last == b'*' && b == b'/' {
                        inside_block_comment = false;
                        prev = 0;
                    }
                    continue;
                }

                let inside_string = inside_single_quote || inside_double_quote;

                if escaped {
                    escaped = false;
                    prev = 0;
                    continue;
                }

                if b == b'\\' && inside_string {
                    escaped = true;
                    continue;
                }

                if !inside_string && !inside_backtick {
                    if b == b'#' || (last == b'-' && b == b'-') {
                        inside_line_comment = true;
                        continue;
                    }
                    if last == b'/' && b == b'*' {
                        inside_block_comment = true;
                        prev = 0;
                        continue;
                    }
                }

                match b {
                    b'\'' if !inside_double_quote && !inside_backtick => {
                        inside_single_quote = !inside_single_quote
                    }
                    b'"' if !inside_single_quote && !inside_backtick => {
                        inside_double_quote = !inside_double_quote
                    }
                    b'`' if !inside_string => inside_backtick = !inside_backtick,
                    b';' if !inside_string && !inside_backtick => {
                        terminator_at = Some(i);
                        break;
                    }
                    _ => {}
                }
            }

            if let Some(i) = terminator_at {
                self.stmt_buffer.extend_from_slice(&buf[..i]);
                self.reader.consume(i + 1);
                return Ok(Some(std::mem::take(&mut self.stmt_buffer)));
            }

            self.stmt_buffer.extend_from_slice(buf);
            let len = buf.len();
            self.reader.consume(len);
        }
    }
}

/// Split DDL text into trimmed, non-empty candidate statements.
pub fn split_statements(text: &str) -> Vec<String> {
    let mut reader = StatementReader::new(text.as_bytes());
    let mut statements = Vec::new();

    // Reading from an in-memory slice cannot fail.
    while let Ok(Some(stmt)) = reader.read_statement() {
        let stmt = String::from_utf8_lossy(&stmt);
        let trimmed = stmt.trim();
        if !trimmed.is_empty() {
            statements.push(trimmed.to_string());
        }
    }

    statements
}

/// Compression format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl Compression {
    /// Detect compression format from file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("gz" | "gzip") => Compression::Gzip,
            Some("bz2" | "bzip2") => Compression::Bzip2,
            Some("xz" | "lzma") => Compression::Xz,
            Some("zst" | "zstd") => Compression::Zstd,
            _ => Compression::None,
        }
    }

    /// Wrap a reader with the appropriate decompressor
    pub fn wrap_reader<'a>(&self, reader: Box<dyn Read + 'a>) -> std::io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => reader,
            Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            Compression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Compression::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        })
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Gzip => write!(f, "gzip"),
            Compression::Bzip2 => write!(f, "bzip2"),
            Compression::Xz => write!(f, "xz"),
            Compression::Zstd => write!(f, "zstd"),
        }
    }
}

/// Read a whole DDL file as text, decompressing by extension.
pub fn read_ddl_file(path: &Path) -> anyhow::Result<String> {
    let file =
        File::open(path).with_context(|| format!("Failed to open DDL file {}", path.display()))?;
    let compression = Compression::from_path(path);
    let mut reader = compression.wrap_reader(Box::new(file))?;

    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read DDL file {} ({})", path.display(), compression))?;

    String::from_utf8(bytes).with_context(|| format!("DDL file {} is not valid UTF-8", path.display()))
}
