//! Session behaviour: trigger state, statuses and alerts.

use pdfjoin::config::{CompressionLevel, Locale, Presets};
use pdfjoin::io::{MemorySink, SelectedFile};
use pdfjoin::merge::{LopdfEngine, MergeExecutor, MergeStatus};
use pdfjoin::output::{Status, StatusLog, StatusTone};
use pdfjoin::session::{MergePhase, Session};
use tempfile::TempDir;

use crate::common::{corrupt_file, page_markers, pdf_file, write_pdf};

fn session(locale: Locale) -> Session<LopdfEngine, StatusLog> {
    let executor =
        MergeExecutor::new(LopdfEngine::new()).with_compression(CompressionLevel::None);
    Session::new(executor, StatusLog::new(), locale)
}

#[test]
fn test_trigger_follows_list() {
    let mut session = session(Locale::Ja);
    assert!(!session.merge_enabled());

    session.add_files([pdf_file("a", 1)]);
    assert!(session.merge_enabled());
    assert!(session.view().merge_enabled);

    session.remove(0);
    assert!(!session.merge_enabled());
    assert!(!session.view().merge_enabled);
}

#[test]
fn test_non_pdf_warning_only_when_rejected() {
    let mut session = session(Locale::En);

    session.add_files([
        SelectedFile::from_bytes("a.txt", Some("text/plain"), vec![1u8]),
        SelectedFile::from_bytes("b.doc", None, vec![1u8]),
    ]);
    assert_eq!(
        session.status().current(),
        Status::new(StatusTone::Warning, "Ignored 2 non-PDF file(s)")
    );
    assert!(session.files().is_empty());

    session.add_files([pdf_file("a", 1)]);
    assert_eq!(session.status().current(), Status::clear());
}

#[tokio::test]
async fn test_reorder_then_merge() {
    let mut session = session(Locale::Ja);
    session.add_files([pdf_file("a", 1), pdf_file("b", 1), pdf_file("c", 1)]);
    session.move_up(2);
    session.move_down(0);
    session.apply_preset(&Presets::builtin(Locale::Ja), "report");

    let mut sink = MemorySink::new();
    let outcome = session.merge(&mut sink).await.unwrap();

    assert_eq!(outcome.status, MergeStatus::Success);
    let (name, bytes) = sink.last().unwrap();
    assert_eq!(name, "報告書.pdf");
    assert_eq!(page_markers(bytes), vec!["c-p1", "a-p1", "b-p1"]);
    assert_eq!(session.status().current(), Status::new(StatusTone::Success, "完了"));
}

#[tokio::test]
async fn test_partial_failure_reports_and_alerts() {
    let mut session = session(Locale::Ja);
    session.add_files([pdf_file("a", 1), corrupt_file("bad.pdf"), corrupt_file("worse.pdf")]);

    let mut sink = MemorySink::new();
    let outcome = session.merge(&mut sink).await.unwrap();

    assert_eq!(outcome.status, MergeStatus::PartialSuccess);
    assert_eq!(
        session.status().current(),
        Status::new(StatusTone::Warning, "完了（一部スキップ: 2 件）")
    );
    assert_eq!(
        session.status().alerts(),
        ["読み込みに失敗したファイル:\nbad.pdf\nworse.pdf".to_string()]
    );
    assert_eq!(sink.deliveries().len(), 1);
}

#[tokio::test]
async fn test_total_failure_reports_and_alerts() {
    let mut session = session(Locale::Ja);
    session.add_files([corrupt_file("bad.pdf")]);

    let mut sink = MemorySink::new();
    let outcome = session.merge(&mut sink).await.unwrap();

    assert_eq!(outcome.status, MergeStatus::TotalFailure);
    assert_eq!(
        session.status().current(),
        Status::new(StatusTone::Error, "失敗しました")
    );
    assert_eq!(
        session.status().alerts(),
        ["すべてのPDFの読み込みに失敗しました（暗号化/破損/サイズ過大など）".to_string()]
    );
    assert!(sink.deliveries().is_empty());
    assert_eq!(
        session.phase(),
        MergePhase::Finished(MergeStatus::TotalFailure)
    );
    assert!(session.merge_enabled());
}

#[tokio::test]
async fn test_running_status_precedes_result() {
    let mut session = session(Locale::En);
    session.add_files([pdf_file("a", 1)]);
    session.merge(&mut MemorySink::new()).await.unwrap();

    let history: Vec<(StatusTone, &str)> = session
        .status()
        .history()
        .iter()
        .map(|s| (s.tone, s.text.as_str()))
        .collect();
    assert_eq!(
        history,
        vec![
            (StatusTone::Neutral, ""),
            (StatusTone::Neutral, "Merging…"),
            (StatusTone::Success, "Done"),
        ]
    );
}

#[tokio::test]
async fn test_add_paths_from_disk() {
    let dir = TempDir::new().unwrap();
    write_pdf(dir.path(), "b", 1);
    write_pdf(dir.path(), "a", 2);
    std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

    let mut session = session(Locale::En);
    let pattern = format!("{}/*", dir.path().display());
    let report = session.add_paths([pattern]).await.unwrap();

    assert_eq!(report.admitted, 2);
    assert_eq!(report.rejected, 1);
    let names: Vec<&str> = session.files().iter().map(SelectedFile::name).collect();
    assert_eq!(names, vec!["a.pdf", "b.pdf"]);

    let mut sink = MemorySink::new();
    session.merge(&mut sink).await.unwrap();
    assert_eq!(page_markers(sink.last().unwrap().1), vec!["a-p1", "a-p2", "b-p1"]);
}

#[tokio::test]
async fn test_add_missing_path_fails_without_change() {
    let dir = TempDir::new().unwrap();
    let existing = write_pdf(dir.path(), "a", 1);
    let missing = dir.path().join("missing.pdf");

    let mut session = session(Locale::En);
    let result = session
        .add_paths([
            existing.to_string_lossy().into_owned(),
            missing.to_string_lossy().into_owned(),
        ])
        .await;

    assert!(matches!(
        result,
        Err(pdfjoin::PdfJoinError::FileNotFound { .. })
    ));
    assert!(session.files().is_empty());
}
