//! Data models for unitsplit.
//!
//! This module contains the source table, the parsed units, the sanitized
//! output name and the types describing an export run.

mod export;
mod name;
mod table;
mod units;

pub use export::{ExportEvent, ExportOutcome, ExportProgress, ExportState, ExportSummary};
pub use name::{OUTPUT_SUFFIX, SanitizedName, sanitize};
pub use table::{REFERENCE_FIELD, Row, SourceTable, UNITS_FIELD};
pub use units::{
    FIELD_SEPARATOR, MISSING_MARKERS, ParsedUnits, TUPLE_SEPARATOR, Tuple, is_missing_marker,
    strip_outer_quotes,
};
