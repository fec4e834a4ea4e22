//! Split command handler.
//!
//! Runs an export job in the background and renders its events as status
//! lines (or NDJSON with `--json`). Ctrl-C cancels at the next row boundary.

use anyhow::{Context, bail};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use unitsplit::config::UnitsplitConfig;
use unitsplit::io::spawn_export_with_token;
use unitsplit::{ExportEvent, ExportOutcome};

/// Exit code reported when the run was interrupted.
const EXIT_CANCELLED: u8 = 130;

/// Arguments of the split command.
pub struct SplitArgs {
    /// Source table override.
    pub input: Option<PathBuf>,
    /// Destination directory override.
    pub output_dir: Option<PathBuf>,
    /// Open the destination after success.
    pub open: bool,
    /// Emit NDJSON events.
    pub json: bool,
}

/// Split command.
pub async fn cmd_split(config: &UnitsplitConfig, args: SplitArgs) -> anyhow::Result<ExitCode> {
    let input = args.input.unwrap_or_else(|| config.input.clone());
    let output_dir = args.output_dir.unwrap_or_else(|| config.output_dir.clone());

    let token = CancellationToken::new();
    let ctrlc_token = token.clone();
    ctrlc::set_handler(move || ctrlc_token.cancel()).context("installing Ctrl-C handler")?;

    if !args.json {
        println!(
            "Reading file: {}",
            input.file_name().map_or_else(
                || input.display().to_string(),
                |n| n.to_string_lossy().into_owned()
            )
        );
    }

    let mut handle = spawn_export_with_token(&input, &output_dir, token);

    while let Some(event) = handle.next_event().await {
        if args.json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            render_event(&event);
        }
    }

    let outcome = handle.join().await?;
    match outcome {
        ExportOutcome::Completed(summary) => {
            if !args.json {
                println!("Output directory: {}", summary.output_dir.display());
            }
            if args.open || config.open_output_dir {
                open_in_file_browser(&summary.output_dir);
            }
            Ok(ExitCode::SUCCESS)
        },
        ExportOutcome::Cancelled(_) => Ok(ExitCode::from(EXIT_CANCELLED)),
        ExportOutcome::Failed { error, .. } => bail!(error),
    }
}

/// Renders one event as a status line.
fn render_event(event: &ExportEvent) {
    match event {
        ExportEvent::Loaded { total } => {
            println!("Rows to process: {total}");
        },
        ExportEvent::Progress(p) => {
            print!(
                "\r[{}/{}] ({:.1}%) Created file: {}",
                p.index,
                p.total,
                p.percent_complete(),
                p.filename
            );
            let _ = std::io::stdout().flush();
        },
        ExportEvent::Completed(summary) => {
            println!();
            println!("Processing completed successfully!");
            println!("  Files written:    {}", summary.files_written);
            if summary.overwritten > 0 {
                println!("  Overwritten:      {}", summary.overwritten);
            }
        },
        ExportEvent::Cancelled(summary) => {
            println!();
            println!(
                "Processing cancelled after {} of {} rows.",
                summary.files_written, summary.total_rows
            );
        },
        ExportEvent::Failed { .. } => {
            println!();
            println!("Processing failed.");
        },
    }
}

/// Opens `path` in the platform file browser without waiting for it.
///
/// The child is not reaped. Failures are logged and otherwise ignored.
fn open_in_file_browser(path: &Path) {
    let program = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    match std::process::Command::new(program).arg(path).spawn() {
        // Not awaited; the browser outlives the run
        Ok(_child) => tracing::debug!(program, path = %path.display(), "Opened output directory"),
        Err(e) => {
            tracing::warn!(program, path = %path.display(), error = %e, "Cannot open output directory");
        },
    }
}
