//! Background export jobs.
//!
//! Runs load and export on a blocking worker and publishes progress as
//! [`ExportEvent`]s on an unbounded channel, so a slow consumer never stalls
//! the worker.

use super::export::{ExportService, ProgressCallback};
use crate::io::formats::load;
use crate::models::{ExportEvent, ExportOutcome, ExportProgress, ExportState, ExportSummary};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{instrument, warn};

/// Handle to a running export job.
///
/// Events arrive in order: `Loaded`, one `Progress` per row, then exactly
/// one terminal event. The event stream ends when the worker finishes.
#[derive(Debug)]
pub struct ExportHandle {
    events: mpsc::UnboundedReceiver<ExportEvent>,
    state: watch::Receiver<ExportState>,
    cancel: CancellationToken,
    task: JoinHandle<ExportOutcome>,
}

impl ExportHandle {
    /// Receives the next event, or `None` once the job has finished.
    pub async fn next_event(&mut self) -> Option<ExportEvent> {
        self.events.recv().await
    }

    /// Requests cancellation at the next row boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns a clone of the job's cancel token.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> ExportState {
        *self.state.borrow()
    }

    /// Returns a receiver notified on every state change.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<ExportState> {
        self.state.clone()
    }

    /// Waits for the worker and returns its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the worker panicked or was
    /// aborted.
    pub async fn join(self) -> Result<ExportOutcome> {
        self.task.await.map_err(|e| Error::OperationFailed {
            operation: "join_export_worker".to_string(),
            cause: e.to_string(),
        })
    }
}

/// Starts an export job on a blocking worker.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_export(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> ExportHandle {
    spawn_export_with_token(input, output_dir, CancellationToken::new())
}

/// Starts an export job observing an existing cancel token.
pub fn spawn_export_with_token(
    input: impl Into<PathBuf>,
    output_dir: impl Into<PathBuf>,
    cancel: CancellationToken,
) -> ExportHandle {
    let input = input.into();
    let output_dir = output_dir.into();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(ExportState::Idle);
    let token = cancel.clone();

    let task = tokio::task::spawn_blocking(move || {
        run_job(&input, &output_dir, &events_tx, &state_tx, &token)
    });

    ExportHandle {
        events: events_rx,
        state: state_rx,
        cancel,
        task,
    }
}

#[instrument(skip_all, fields(input = %input.display(), output_dir = %output_dir.display()))]
fn run_job(
    input: &Path,
    output_dir: &Path,
    events: &mpsc::UnboundedSender<ExportEvent>,
    state: &watch::Sender<ExportState>,
    cancel: &CancellationToken,
) -> ExportOutcome {
    advance(state, ExportState::Running);

    let table = match load(input) {
        Ok(table) => table,
        Err(error) => {
            metrics::counter!("unitsplit_export_failures_total", "stage" => "load").increment(1);
            warn!(%error, "Cannot load source table");
            let outcome = ExportOutcome::Failed {
                summary: ExportSummary::new(output_dir, 0),
                error,
            };
            finish(&outcome, events, state);
            return outcome;
        },
    };

    publish(events, ExportEvent::Loaded { total: table.len() });

    let progress_tx = events.clone();
    let progress: ProgressCallback = Box::new(move |p: &ExportProgress| {
        publish(&progress_tx, ExportEvent::Progress(p.clone()));
    });

    let outcome = ExportService::new(output_dir).export(&table, Some(progress), cancel);
    finish(&outcome, events, state);
    outcome
}

/// Publishes the terminal state, then the terminal event.
fn finish(
    outcome: &ExportOutcome,
    events: &mpsc::UnboundedSender<ExportEvent>,
    state: &watch::Sender<ExportState>,
) {
    advance(state, outcome.state());
    publish(events, ExportEvent::terminal(outcome));
}

fn publish(events: &mpsc::UnboundedSender<ExportEvent>, event: ExportEvent) {
    // A dropped receiver only means nobody is listening
    let _ = events.send(event);
}

fn advance(state: &watch::Sender<ExportState>, next: ExportState) {
    state.send_if_modified(|current| {
        if current.can_transition_to(next) {
            *current = next;
            true
        } else {
            warn!(from = %current, to = %next, "Ignoring invalid state transition");
            false
        }
    });
}
