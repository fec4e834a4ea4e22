//! # unitsplit
//!
//! Splits a receivable-units remittance file into one units file per row.
//!
//! The input is a `;`-delimited table without a header. Column 0 carries a
//! reference identifier and column 12 a nested units blob of the form
//! `"a;b|c;d"`: a `|`-separated list of `;`-separated tuples. Every row
//! produces `<reference>_unidades_recebiveis.csv` holding one tuple per line.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tokio_util::sync::CancellationToken;
//! use unitsplit::ExportProgress;
//! use unitsplit::io::{ExportService, load};
//!
//! let table = load("remessa/file.csv".as_ref())?;
//! let outcome = ExportService::new("unidades_recebiveis").export(
//!     &table,
//!     Some(Box::new(|p: &ExportProgress| println!("{}/{} {}", p.index, p.total, p.filename))),
//!     &CancellationToken::new(),
//! );
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod io;
pub mod models;
pub mod observability;

// Re-exports for convenience
pub use config::UnitsplitConfig;
pub use io::{ExportHandle, ExportService, load, spawn_export};
pub use models::{
    ExportEvent, ExportOutcome, ExportProgress, ExportState, ExportSummary, ParsedUnits, Row,
    SanitizedName, SourceTable, Tuple,
};

/// Error type for unitsplit operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Bad CLI arguments, unknown config values |
/// | `OperationFailed` | Output directory creation, logging setup, worker join |
/// | `SourceUnreadable` | Input path missing or cannot be opened |
/// | `MalformedSource` | Input is not decodable as `;`-delimited text |
/// | `RowWriteFailed` | Writing one row's output file fails |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The source table could not be opened.
    ///
    /// Fatal: no row is processed.
    #[error("cannot read source '{}': {cause}", path.display())]
    SourceUnreadable {
        /// Path that was requested.
        path: PathBuf,
        /// The underlying cause.
        cause: String,
    },

    /// The source table could not be parsed as `;`-delimited rows.
    ///
    /// Fatal: no row is processed.
    #[error("malformed source '{}'{}: {cause}", path.display(), line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    MalformedSource {
        /// Path (or origin label) of the source.
        path: PathBuf,
        /// 1-based line where parsing stopped, when known.
        line: Option<u64>,
        /// The underlying cause.
        cause: String,
    },

    /// Writing the output file of a single row failed.
    ///
    /// Files of the rows before `row_index` are complete and stay on disk.
    #[error("row {row_index} (reference '{reference}'): cannot write '{}': {cause}", path.display())]
    RowWriteFailed {
        /// 0-based index of the failing row.
        row_index: usize,
        /// Raw reference identifier of the row.
        reference: String,
        /// Output path that could not be written.
        path: PathBuf,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Returns the 0-based row index for row-level failures.
    #[must_use]
    pub const fn row_index(&self) -> Option<usize> {
        match self {
            Self::RowWriteFailed { row_index, .. } => Some(*row_index),
            _ => None,
        }
    }

    /// Returns the raw reference identifier for row-level failures.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::RowWriteFailed { reference, .. } => Some(reference),
            _ => None,
        }
    }
}

/// Result type alias for unitsplit operations.
pub type Result<T> = std::result::Result<T, Error>;
