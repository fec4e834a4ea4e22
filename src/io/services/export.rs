//! Units export service.
//!
//! Walks the source table row by row and writes one units file per row.

use crate::Error;
use crate::io::formats::DirectorySink;
use crate::io::traits::UnitsSink;
use crate::models::{
    ExportOutcome, ExportProgress, ExportSummary, ParsedUnits, SanitizedName, SourceTable,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Progress callback for export operations.
pub type ProgressCallback = Box<dyn Fn(&ExportProgress) + Send>;

/// Service for splitting a source table into units files.
#[derive(Debug, Clone)]
pub struct ExportService {
    /// Destination directory.
    output_dir: PathBuf,
}

impl ExportService {
    /// Creates a new export service writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Returns the destination directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Exports every row of `table` into the output directory.
    ///
    /// The directory is created if absent. Never returns an `Err`: failures
    /// are reported through [`ExportOutcome::Failed`] together with the work
    /// done so far.
    pub fn export(
        &self,
        table: &SourceTable,
        progress: Option<ProgressCallback>,
        cancel: &CancellationToken,
    ) -> ExportOutcome {
        let mut sink = DirectorySink::new(&self.output_dir);
        self.export_to_sink(table, &mut sink, progress, cancel)
    }

    /// Exports every row of `table` through `sink`.
    ///
    /// Rows are processed strictly in order. The cancel token is checked
    /// before each row, so a row is either fully written or not started.
    #[instrument(
        skip_all,
        fields(output_dir = %self.output_dir.display(), rows = table.len())
    )]
    pub fn export_to_sink(
        &self,
        table: &SourceTable,
        sink: &mut dyn UnitsSink,
        progress: Option<ProgressCallback>,
        cancel: &CancellationToken,
    ) -> ExportOutcome {
        let total = table.len();
        let mut summary = ExportSummary::new(&self.output_dir, total);

        if let Err(error) = sink.prepare() {
            metrics::counter!("unitsplit_export_failures_total", "stage" => "prepare").increment(1);
            warn!(%error, "Cannot prepare output directory");
            return ExportOutcome::Failed { summary, error };
        }

        let mut seen: HashSet<PathBuf> = HashSet::with_capacity(total);

        for (row_index, row) in table.iter().enumerate() {
            if cancel.is_cancelled() {
                return cancelled(summary);
            }

            let reference = row.reference();
            let name = SanitizedName::new(reference);
            if name.is_empty() {
                warn!(row_index, "Empty reference; file named by suffix only");
            }

            let units = ParsedUnits::parse(row.units_raw());
            let target = sink.target(&name);

            if let Err(e) = sink.write(&target, &units) {
                metrics::counter!("unitsplit_export_failures_total", "stage" => "write").increment(1);
                let error = Error::RowWriteFailed {
                    row_index,
                    reference: reference.to_string(),
                    path: target,
                    cause: e.to_string(),
                };
                warn!(%error, "Export stopped");
                return ExportOutcome::Failed { summary, error };
            }

            if !seen.insert(target.clone()) {
                summary.overwritten += 1;
                warn!(
                    row_index,
                    reference,
                    file = %target.display(),
                    "Output file replaced by a later row"
                );
            }

            summary.files_written += 1;
            metrics::counter!("unitsplit_rows_exported_total").increment(1);
            debug!(row_index, tuples = units.len(), file = %target.display(), "Created file");
            summary.written.push(target);

            if let Some(ref cb) = progress {
                cb(&ExportProgress {
                    index: row_index + 1,
                    total,
                    filename: name.file_name(),
                });
            }

            if cancel.is_cancelled() {
                return cancelled(summary);
            }
        }

        info!(
            files_written = summary.files_written,
            overwritten = summary.overwritten,
            "Export completed"
        );
        ExportOutcome::Completed(summary)
    }
}

fn cancelled(summary: ExportSummary) -> ExportOutcome {
    metrics::counter!("unitsplit_exports_cancelled_total").increment(1);
    info!(
        completed = summary.files_written,
        total = summary.total_rows,
        "Export cancelled at row boundary"
    );
    ExportOutcome::Cancelled(summary)
}
