//! Export run types: progress, summary, outcome, events and state.

use crate::Error;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Progress of an export run, reported once per completed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportProgress {
    /// Rows completed so far (1-based).
    pub index: usize,
    /// Total rows in the run.
    pub total: usize,
    /// Filename written for the current row.
    pub filename: String,
}

impl ExportProgress {
    /// Returns the percentage complete (0-100).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_complete(&self) -> f32 {
        if self.total == 0 {
            100.0
        } else {
            (self.index as f32 / self.total as f32) * 100.0
        }
    }
}

/// Counters and paths accumulated by an export run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Rows in the source table.
    pub total_rows: usize,
    /// Output files written (one per processed row).
    pub files_written: usize,
    /// Writes that replaced a file produced earlier in the same run.
    pub overwritten: usize,
    /// Destination directory.
    pub output_dir: PathBuf,
    /// Paths written, in row order (repeats on collision).
    pub written: Vec<PathBuf>,
}

impl ExportSummary {
    /// Creates an empty summary for a run over `total_rows` rows.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, total_rows: usize) -> Self {
        Self {
            total_rows,
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Distinct files left on disk by this run.
    #[must_use]
    pub const fn distinct_files(&self) -> usize {
        self.files_written.saturating_sub(self.overwritten)
    }
}

/// Terminal result of an export run.
#[derive(Debug)]
pub enum ExportOutcome {
    /// Every row was processed.
    Completed(ExportSummary),
    /// The cancel token was observed at a row boundary.
    Cancelled(ExportSummary),
    /// Processing stopped at a failing step.
    Failed {
        /// Work done before the failure.
        summary: ExportSummary,
        /// The cause.
        error: Error,
    },
}

impl ExportOutcome {
    /// Returns the summary regardless of outcome.
    #[must_use]
    pub const fn summary(&self) -> &ExportSummary {
        match self {
            Self::Completed(summary) | Self::Cancelled(summary) | Self::Failed { summary, .. } => {
                summary
            },
        }
    }

    /// Returns the error of a failed run.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns true when every row was processed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Terminal state matching this outcome.
    #[must_use]
    pub const fn state(&self) -> ExportState {
        match self {
            Self::Completed(_) => ExportState::Completed,
            Self::Cancelled(_) => ExportState::Cancelled,
            Self::Failed { .. } => ExportState::Failed,
        }
    }
}

/// Event published by a background export job.
///
/// A job emits `Loaded` once the source is read, one `Progress` per row,
/// then exactly one terminal event. A load failure skips straight to
/// `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExportEvent {
    /// The source table was read.
    Loaded {
        /// Number of rows to export.
        total: usize,
    },
    /// A row's output file was written.
    Progress(ExportProgress),
    /// All rows were exported.
    Completed(ExportSummary),
    /// The run stopped at a row boundary on request.
    Cancelled(ExportSummary),
    /// The run stopped on an error.
    Failed {
        /// Human-readable error.
        message: String,
        /// 0-based failing row, for row-level failures.
        #[serde(skip_serializing_if = "Option::is_none")]
        row_index: Option<usize>,
        /// Raw reference of the failing row, for row-level failures.
        #[serde(skip_serializing_if = "Option::is_none")]
        reference: Option<String>,
    },
}

impl ExportEvent {
    /// Builds a failure event from an error.
    #[must_use]
    pub fn failed(error: &Error) -> Self {
        Self::Failed {
            message: error.to_string(),
            row_index: error.row_index(),
            reference: error.reference().map(String::from),
        }
    }

    /// Builds the terminal event for an outcome.
    #[must_use]
    pub fn terminal(outcome: &ExportOutcome) -> Self {
        match outcome {
            ExportOutcome::Completed(summary) => Self::Completed(summary.clone()),
            ExportOutcome::Cancelled(summary) => Self::Cancelled(summary.clone()),
            ExportOutcome::Failed { error, .. } => Self::failed(error),
        }
    }

    /// Returns true for `Completed`, `Cancelled` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed(_) | Self::Cancelled(_) | Self::Failed { .. }
        )
    }
}

/// Lifecycle of an export run.
///
/// `Idle -> Running -> {Completed | Cancelled | Failed}`. Terminal states
/// accept no further transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportState {
    /// Not started.
    #[default]
    Idle,
    /// Loading or exporting.
    Running,
    /// All rows processed.
    Completed,
    /// Stopped at a row boundary on request.
    Cancelled,
    /// Stopped on an error.
    Failed,
}

impl ExportState {
    /// Returns the state as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }

    /// Returns true if moving from `self` to `next` is allowed.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        match self {
            Self::Idle => matches!(next, Self::Running),
            Self::Running => next.is_terminal(),
            Self::Completed | Self::Cancelled | Self::Failed => false,
        }
    }
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
