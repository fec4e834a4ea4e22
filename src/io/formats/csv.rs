//! Semicolon-delimited format adapter.
//!
//! Reads the headerless source table and writes per-row units files.

use crate::io::traits::UnitsSink;
use crate::models::{FIELD_SEPARATOR, ParsedUnits, Row, SanitizedName, SourceTable};
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Field delimiter of the source table.
pub const DELIMITER: u8 = b';';

/// Builds the reader shared by file and in-memory sources.
fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(DELIMITER)
        .has_headers(false) // Row 0 is data
        .flexible(true); // Ragged rows are accepted
    builder
}

/// Loads the source table at `path`.
///
/// # Errors
///
/// Returns [`Error::SourceUnreadable`] if the file cannot be opened and
/// [`Error::MalformedSource`] if its content is not `;`-delimited text.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<SourceTable> {
    let file = File::open(path).map_err(|e| Error::SourceUnreadable {
        path: path.to_path_buf(),
        cause: e.to_string(),
    })?;
    load_from_reader(file, path)
}

/// Loads a source table from any reader.
///
/// `origin` labels the source in errors.
///
/// # Errors
///
/// Returns [`Error::MalformedSource`] on undecodable content or a quoted
/// field left open across lines, and
/// [`Error::SourceUnreadable`] if the reader fails.
pub fn load_from_reader<R: Read>(reader: R, origin: &Path) -> Result<SourceTable> {
    let mut csv_reader = reader_builder().from_reader(reader);
    let mut table = SourceTable::default();
    let mut record = csv::StringRecord::new();

    loop {
        let has_record = csv_reader
            .read_record(&mut record)
            .map_err(|e| source_error(&e, origin))?;
        if !has_record {
            break;
        }
        // One record per line; a field spanning lines means an unclosed quote
        if record.iter().any(|f| f.contains(['\n', '\r'])) {
            return Err(Error::MalformedSource {
                path: origin.to_path_buf(),
                line: record.position().map(csv::Position::line),
                cause: "unterminated quoted field spans multiple lines".to_string(),
            });
        }
        table.push(record.iter().collect::<Row>());
    }

    debug!(origin = %origin.display(), rows = table.len(), "Source table loaded");
    Ok(table)
}

fn source_error(err: &csv::Error, origin: &Path) -> Error {
    match err.kind() {
        csv::ErrorKind::Io(io) => Error::SourceUnreadable {
            path: origin.to_path_buf(),
            cause: io.to_string(),
        },
        csv::ErrorKind::Utf8 { pos, err } => Error::MalformedSource {
            path: origin.to_path_buf(),
            line: pos.as_ref().map(csv::Position::line),
            cause: err.to_string(),
        },
        _ => Error::MalformedSource {
            path: origin.to_path_buf(),
            line: err.position().map(csv::Position::line),
            cause: err.to_string(),
        },
    }
}

/// Writes units files into a directory.
///
/// Each file holds one tuple per line, sub-fields joined by `;`, every line
/// terminated by `\n`. Existing files are truncated.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the destination directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl UnitsSink for DirectorySink {
    fn prepare(&mut self) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Error::OperationFailed {
            operation: "create_output_dir".to_string(),
            cause: format!("{}: {e}", self.dir.display()),
        })
    }

    fn target(&self, name: &SanitizedName) -> PathBuf {
        name.output_path(&self.dir)
    }

    fn write(&mut self, target: &Path, units: &ParsedUnits) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(target)?);
        write_units(&mut writer, units)?;
        writer.flush()
    }
}

/// Serializes units as `;`-joined lines, each terminated by `\n`.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn write_units<W: Write>(writer: &mut W, units: &ParsedUnits) -> std::io::Result<()> {
    let separator = FIELD_SEPARATOR.to_string();
    for tuple in units {
        writer.write_all(tuple.fields().join(&separator).as_bytes())?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
