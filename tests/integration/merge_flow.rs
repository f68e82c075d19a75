//! End-to-end merges with in-memory inputs.

use pdfjoin::config::{CompressionLevel, Locale};
use pdfjoin::io::MemorySink;
use pdfjoin::merge::{LopdfEngine, MergeExecutor, MergeStatus};
use rstest::rstest;

use crate::common::{corrupt_file, page_markers, pdf_file};

fn executor() -> MergeExecutor<LopdfEngine> {
    MergeExecutor::new(LopdfEngine::new()).with_compression(CompressionLevel::None)
}

#[tokio::test]
async fn test_pages_follow_list_order() {
    let files = vec![pdf_file("a", 2), pdf_file("b", 1), pdf_file("c", 3)];
    let mut sink = MemorySink::new();

    let outcome = executor().merge(&files, "book", &mut sink).await.unwrap();

    assert_eq!(outcome.status, MergeStatus::Success);
    assert_eq!(outcome.pages_merged, 6);
    assert_eq!(outcome.files_merged, 3);
    assert!(outcome.failed.is_empty());

    let (name, bytes) = sink.last().unwrap();
    assert_eq!(name, "book.pdf");
    assert_eq!(
        page_markers(bytes),
        vec!["a-p1", "a-p2", "b-p1", "c-p1", "c-p2", "c-p3"]
    );
}

#[tokio::test]
async fn test_corrupt_middle_file_is_skipped() {
    let files = vec![pdf_file("a", 1), corrupt_file("b.pdf"), pdf_file("c", 1)];
    let mut sink = MemorySink::new();

    let outcome = executor().merge(&files, "", &mut sink).await.unwrap();

    assert_eq!(outcome.status, MergeStatus::PartialSuccess);
    assert_eq!(outcome.failed_names(), vec!["b.pdf"]);
    assert_eq!(outcome.pages_merged, 2);

    let (name, bytes) = sink.last().unwrap();
    assert_eq!(name, "結合済み.pdf");
    assert_eq!(page_markers(bytes), vec!["a-p1", "c-p1"]);
}

#[tokio::test]
async fn test_all_corrupt_produces_nothing() {
    let files = vec![corrupt_file("x.pdf"), corrupt_file("y.pdf")];
    let mut sink = MemorySink::new();

    let outcome = executor().merge(&files, "out", &mut sink).await.unwrap();

    assert_eq!(outcome.status, MergeStatus::TotalFailure);
    assert_eq!(outcome.failed_names(), vec!["x.pdf", "y.pdf"]);
    assert!(outcome.bytes.is_none());
    assert!(sink.deliveries().is_empty());
}

#[tokio::test]
async fn test_same_file_twice() {
    let file = pdf_file("a", 1);
    let files = vec![file.clone(), file];
    let mut sink = MemorySink::new();

    let outcome = executor().merge(&files, "dup", &mut sink).await.unwrap();

    assert_eq!(outcome.pages_merged, 2);
    assert_eq!(page_markers(sink.last().unwrap().1), vec!["a-p1", "a-p1"]);
}

#[rstest]
#[case("", Locale::Ja, "結合済み.pdf")]
#[case("  ", Locale::En, "merged.pdf")]
#[case("a/b:c", Locale::Ja, "a_b_c.pdf")]
#[case("Report.PDF", Locale::En, "Report.PDF")]
#[tokio::test]
async fn test_output_name(#[case] hint: &str, #[case] locale: Locale, #[case] expected: &str) {
    let mut sink = MemorySink::new();

    let outcome = executor()
        .with_locale(locale)
        .merge(&[pdf_file("a", 1)], hint, &mut sink)
        .await
        .unwrap();

    assert_eq!(outcome.file_name.as_deref(), Some(expected));
    assert_eq!(sink.last().unwrap().0, expected);
}

#[tokio::test]
async fn test_identical_input_gives_identical_output() {
    let files = vec![pdf_file("a", 2), pdf_file("b", 1)];
    let mut first = MemorySink::new();
    let mut second = MemorySink::new();

    executor().merge(&files, "x", &mut first).await.unwrap();
    executor().merge(&files, "x", &mut second).await.unwrap();

    assert_eq!(first.last().unwrap().1, second.last().unwrap().1);
}
