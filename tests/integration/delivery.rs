//! Delivering merged output to a directory.

use pdfjoin::config::{Locale, OverwriteMode};
use pdfjoin::io::DirectorySink;
use pdfjoin::merge::{LopdfEngine, MergeExecutor, MergeStatus};
use pdfjoin::output::StatusLog;
use pdfjoin::session::{MergePhase, Session};
use pdfjoin::PdfJoinError;
use tempfile::TempDir;

use crate::common::pdf_file;

fn session() -> Session<LopdfEngine, StatusLog> {
    Session::new(
        MergeExecutor::new(LopdfEngine::new()),
        StatusLog::new(),
        Locale::Ja,
    )
}

#[tokio::test]
async fn test_writes_into_directory() {
    let dir = TempDir::new().unwrap();
    let mut sink = DirectorySink::new(dir.path().join("out"), OverwriteMode::NoClobber);

    let mut session = session();
    session.add_files([pdf_file("a", 2)]);
    session.set_name_hint("請求書");
    let outcome = session.merge(&mut sink).await.unwrap();

    assert_eq!(outcome.status, MergeStatus::Success);
    let written = std::fs::read(dir.path().join("out").join("請求書.pdf")).unwrap();
    assert_eq!(Some(written), outcome.bytes);
    assert!(lopdf::Document::load_mem(&outcome.bytes.unwrap()).is_ok());
}

#[tokio::test]
async fn test_existing_output_is_fatal_with_no_clobber() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("結合済み.pdf"), b"keep me").unwrap();
    let mut sink = DirectorySink::new(dir.path(), OverwriteMode::NoClobber);

    let mut session = session();
    session.add_files([pdf_file("a", 1)]);
    let result = session.merge(&mut sink).await;

    assert!(matches!(result, Err(PdfJoinError::OutputExists { .. })));
    assert_eq!(
        std::fs::read(dir.path().join("結合済み.pdf")).unwrap(),
        b"keep me"
    );
    assert_eq!(
        session.status().alerts(),
        ["結合に失敗しました（暗号化/破損/サイズ過大など）".to_string()]
    );
    assert_eq!(session.phase(), MergePhase::Finished(MergeStatus::FatalError));
    assert!(session.merge_enabled());
}

#[tokio::test]
async fn test_force_overwrites() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("x.pdf"), b"old").unwrap();
    let mut sink = DirectorySink::new(dir.path(), OverwriteMode::Force);

    let mut session = session();
    session.add_files([pdf_file("a", 1)]);
    session.set_name_hint("x");
    session.merge(&mut sink).await.unwrap();

    let written = std::fs::read(dir.path().join("x.pdf")).unwrap();
    assert!(written.starts_with(b"%PDF"));
}
