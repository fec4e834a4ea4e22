//! Integration tests for background export jobs.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::fs;
use tempfile::TempDir;
use unitsplit::io::spawn_export;
use unitsplit::{ExportEvent, ExportOutcome, ExportState};

fn source(rows: usize) -> String {
    (0..rows)
        .map(|i| format!("REF{i};a;b;c;d;e;f;g;h;i;j;k;\"u{i};1|u{i};2\"\n"))
        .collect()
}

async fn drain(handle: &mut unitsplit::ExportHandle) -> Vec<ExportEvent> {
    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_events_arrive_in_order() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("file.csv");
    fs::write(&input, source(4)).unwrap();
    let out = dir.path().join("out");

    let mut handle = spawn_export(&input, &out);
    let events = drain(&mut handle).await;

    assert_eq!(events.len(), 6);
    assert_eq!(events[0], ExportEvent::Loaded { total: 4 });
    for (i, event) in events[1..5].iter().enumerate() {
        let ExportEvent::Progress(p) = event else {
            panic!("expected progress at {i}");
        };
        assert_eq!(p.index, i + 1);
        assert_eq!(p.total, 4);
        assert_eq!(p.filename, format!("REF{i}_unidades_recebiveis.csv"));
    }
    assert!(matches!(events[5], ExportEvent::Completed(_)));
    assert_eq!(handle.state(), ExportState::Completed);

    let outcome = handle.join().await.unwrap();
    assert_eq!(outcome.summary().files_written, 4);
    assert_eq!(
        fs::read_to_string(out.join("REF2_unidades_recebiveis.csv")).unwrap(),
        "u2;1\nu2;2\n"
    );
}

#[tokio::test]
async fn test_cancel_before_start_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("file.csv");
    fs::write(&input, source(3)).unwrap();
    let out = dir.path().join("out");

    let token = tokio_util::sync::CancellationToken::new();
    token.cancel();
    let mut handle = unitsplit::io::spawn_export_with_token(&input, &out, token);
    let events = drain(&mut handle).await;

    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], ExportEvent::Cancelled(_)));

    let outcome = handle.join().await.unwrap();
    assert!(matches!(outcome, ExportOutcome::Cancelled(_)));
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[tokio::test]
async fn test_state_watch_reaches_terminal_state() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("file.csv");
    fs::write(&input, source(2)).unwrap();

    let handle = spawn_export(&input, dir.path().join("out"));
    let mut state = handle.subscribe_state();
    let terminal = state.wait_for(ExportState::is_terminal).await.map(|s| *s).unwrap();

    assert_eq!(terminal, ExportState::Completed);
    assert!(handle.join().await.unwrap().is_completed());
}

#[tokio::test]
async fn test_malformed_source_reports_failure() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("file.csv");
    fs::write(&input, b"ok;row\nbad;\xff\n").unwrap();

    let mut handle = spawn_export(&input, dir.path().join("out"));
    let events = drain(&mut handle).await;

    let [ExportEvent::Failed { message, row_index, .. }] = events.as_slice() else {
        panic!("expected a single failure event");
    };
    assert!(message.contains("malformed source"));
    assert_eq!(*row_index, None);
    assert_eq!(handle.state(), ExportState::Failed);
}
