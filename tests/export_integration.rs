//! Integration tests for loading and exporting against the filesystem.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use unitsplit::io::{ExportService, load};
use unitsplit::{Error, ExportOutcome, ExportProgress};

/// Builds a source line with `reference` in field 0 and `units` in field 12.
fn line(reference: &str, units: &str) -> String {
    let filler: Vec<String> = (1..12).map(|i| format!("c{i}")).collect();
    format!("{reference};{};{units}\n", filler.join(";"))
}

fn write_source(dir: &TempDir, lines: &[String]) -> PathBuf {
    let path = dir.path().join("remessa.csv");
    fs::write(&path, lines.concat()).unwrap();
    path
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

fn export(input: &Path, out: &Path) -> ExportOutcome {
    let table = load(input).unwrap();
    ExportService::new(out).export(&table, None, &CancellationToken::new())
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_reference_with_space_and_quoted_units() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, &[line("REF 01", "\"A;B|C;D\"")]);
    let out = dir.path().join("out");

    let outcome = export(&input, &out);

    assert!(outcome.is_completed());
    assert_eq!(read(&out, "REF 01_unidades_recebiveis.csv"), "A;B\nC;D\n");
}

#[test]
fn test_missing_units_yield_empty_file() {
    let dir = TempDir::new().unwrap();
    let input = write_source(
        &dir,
        &[
            line("EMPTY", ""),
            line("NAN", "NaN"),
            "SHORT;only;three\n".to_string(),
        ],
    );
    let out = dir.path().join("out");

    let outcome = export(&input, &out);

    assert_eq!(outcome.summary().files_written, 3);
    for name in ["EMPTY", "NAN", "SHORT"] {
        let path = out.join(format!("{name}_unidades_recebiveis.csv"));
        assert!(path.exists(), "{} missing", path.display());
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }
}

#[test]
fn test_same_sanitized_name_keeps_last_row() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, &[line("R/1", "first;1"), line("R:1", "second;2")]);
    let out = dir.path().join("out");

    let outcome = export(&input, &out);

    assert_eq!(outcome.summary().overwritten, 1);
    assert_eq!(read(&out, "R_1_unidades_recebiveis.csv"), "second;2\n");
    assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
}

#[test]
fn test_overwrites_output_of_previous_run() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("X_unidades_recebiveis.csv"), "stale content\nmore\n").unwrap();

    let input = write_source(&dir, &[line("X", "fresh")]);
    export(&input, &out);

    assert_eq!(read(&out, "X_unidades_recebiveis.csv"), "fresh\n");
}

#[test]
fn test_output_dir_is_created_recursively() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, &[line("A", "1")]);
    let out = dir.path().join("a/b/c");

    assert!(export(&input, &out).is_completed());
    assert!(out.join("A_unidades_recebiveis.csv").exists());
}

#[test]
fn test_progress_count_and_order() {
    let dir = TempDir::new().unwrap();
    let lines: Vec<String> = (0..5).map(|i| line(&format!("R{i}"), "x")).collect();
    let input = write_source(&dir, &lines);
    let table = load(&input).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_cb = Arc::clone(&seen);
    let outcome = ExportService::new(dir.path().join("out")).export(
        &table,
        Some(Box::new(move |p: &ExportProgress| seen_cb.lock().unwrap().push(p.index))),
        &CancellationToken::new(),
    );

    assert!(outcome.is_completed());
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_cancel_after_i_rows_leaves_i_files() {
    let dir = TempDir::new().unwrap();
    let lines: Vec<String> = (0..6).map(|i| line(&format!("R{i}"), "a;b|c")).collect();
    let input = write_source(&dir, &lines);
    let table = load(&input).unwrap();
    let out = dir.path().join("out");

    let token = CancellationToken::new();
    let cancel = token.clone();
    let outcome = ExportService::new(&out).export(
        &table,
        Some(Box::new(move |p: &ExportProgress| {
            if p.index == 2 {
                cancel.cancel();
            }
        })),
        &token,
    );

    let ExportOutcome::Cancelled(summary) = outcome else {
        panic!("expected cancellation");
    };
    assert_eq!(summary.files_written, 2);
    assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
    assert!(!out.join("R2_unidades_recebiveis.csv").exists());
}

#[test]
fn test_write_failure_stops_at_row() {
    let dir = TempDir::new().unwrap();
    let input = write_source(
        &dir,
        &[line("ok", "1"), line("blocked", "2"), line("after", "3")],
    );
    let out = dir.path().join("out");
    // A directory squatting on the target path makes the file create fail.
    fs::create_dir_all(out.join("blocked_unidades_recebiveis.csv")).unwrap();

    let outcome = export(&input, &out);

    let ExportOutcome::Failed { summary, error } = outcome else {
        panic!("expected failure");
    };
    match error {
        Error::RowWriteFailed {
            row_index,
            reference,
            path,
            ..
        } => {
            assert_eq!(row_index, 1);
            assert_eq!(reference, "blocked");
            assert_eq!(path, out.join("blocked_unidades_recebiveis.csv"));
        },
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(summary.files_written, 1);
    assert!(out.join("ok_unidades_recebiveis.csv").exists());
    assert!(!out.join("after_unidades_recebiveis.csv").exists());
}

#[test]
fn test_output_dir_blocked_by_file_fails_before_rows() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, &[line("A", "1")]);
    let out = dir.path().join("not_a_dir");
    fs::write(&out, "").unwrap();

    let outcome = export(&input, &out);

    assert!(matches!(
        outcome.error(),
        Some(Error::OperationFailed { .. })
    ));
    assert_eq!(outcome.summary().files_written, 0);
}

#[test]
fn test_empty_source_completes_without_files() {
    let dir = TempDir::new().unwrap();
    let input = write_source(&dir, &[]);
    let out = dir.path().join("out");

    let outcome = export(&input, &out);

    assert!(outcome.is_completed());
    assert_eq!(outcome.summary().total_rows, 0);
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}
