//! Core traits for the export pipeline.
//!
//! Defines the [`UnitsSink`] trait the exporter writes each row through.

use crate::Result;
use crate::models::{ParsedUnits, SanitizedName};
use std::path::{Path, PathBuf};

/// Destination for per-row units files.
///
/// # Lifecycle
///
/// 1. Call `prepare()` once before the first row
/// 2. For each row, resolve `target()` and call `write()`
///
/// Each `write()` must leave its file complete and flushed before returning.
/// I/O errors are returned raw; the exporter attaches row context.
///
/// # Example Implementation
///
/// ```rust,ignore
/// impl UnitsSink for MemorySink {
///     fn prepare(&mut self) -> Result<()> {
///         Ok(())
///     }
///
///     fn target(&self, name: &SanitizedName) -> PathBuf {
///         PathBuf::from(name.file_name())
///     }
///
///     fn write(&mut self, target: &Path, units: &ParsedUnits) -> std::io::Result<()> {
///         self.files.insert(target.to_path_buf(), units.clone());
///         Ok(())
///     }
/// }
/// ```
pub trait UnitsSink {
    /// Creates whatever the destination needs before any row is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be created.
    fn prepare(&mut self) -> Result<()>;

    /// Resolves the output path for a sanitized name.
    fn target(&self, name: &SanitizedName) -> PathBuf;

    /// Writes (or replaces) the units file at `target`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn write(&mut self, target: &Path, units: &ParsedUnits) -> std::io::Result<()>;
}
