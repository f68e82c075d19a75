//! Best-effort merge of an ordered list of files.
//!
//! Files are processed one after another, in list order, so the output page
//! order never depends on how long an individual file takes to load. A file
//! that cannot be read or parsed is recorded and skipped; only a missing
//! engine or a failure to serialize or deliver the result aborts the merge.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::pin::pin;
use std::time::{Duration, Instant};

use crate::config::{CompressionLevel, Locale};
use crate::error::{PdfJoinError, Result};
use crate::io::{Delivery, DownloadSink, SelectedFile};
use crate::merge::engine::{PdfEngine, SaveOptions};
use crate::utils::sanitize_output_name;

/// Terminal state of one merge invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeStatus {
    /// Nothing to merge; the call did nothing.
    Skipped,
    /// Every file contributed its pages.
    Success,
    /// At least one file was merged and at least one was skipped.
    PartialSuccess,
    /// No file could be merged and nothing was produced.
    TotalFailure,
    /// The merge was aborted by a fatal error.
    FatalError,
}

/// A file that was skipped during a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedFile {
    /// Display name of the file.
    pub name: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Result of processing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file's pages were appended to the output.
    Merged {
        /// Display name of the file.
        name: String,
        /// Number of pages appended.
        pages: usize,
    },
    /// The file was skipped.
    Failed(FailedFile),
}

/// Everything one merge invocation produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    /// Terminal state.
    pub status: MergeStatus,

    /// Serialized output, absent unless at least one page was merged.
    #[serde(skip)]
    pub bytes: Option<Vec<u8>>,

    /// Sanitized name the output was delivered under.
    pub file_name: Option<String>,

    /// Files that were skipped, in list order.
    pub failed: Vec<FailedFile>,

    /// Total number of pages in the output.
    pub pages_merged: usize,

    /// Number of files that contributed pages.
    pub files_merged: usize,

    /// Wall-clock time of the whole merge.
    #[serde(skip)]
    pub elapsed: Duration,
}

impl MergeOutcome {
    fn empty(status: MergeStatus) -> Self {
        Self {
            status,
            bytes: None,
            file_name: None,
            failed: Vec::new(),
            pages_merged: 0,
            files_merged: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Outcome of a merge that had nothing to do.
    pub fn skipped() -> Self {
        Self::empty(MergeStatus::Skipped)
    }

    /// Names of the skipped files.
    pub fn failed_names(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Runs merges with a given PDF engine.
#[derive(Debug, Clone)]
pub struct MergeExecutor<E> {
    engine: E,
    locale: Locale,
    save_options: SaveOptions,
}

impl<E: PdfEngine> MergeExecutor<E> {
    /// Create an executor. Output is compressed and field appearances are
    /// left untouched.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            locale: Locale::default(),
            save_options: SaveOptions::default(),
        }
    }

    /// Set the locale that supplies the default output name.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set the compression level of the output.
    pub fn with_compression(mut self, compression: CompressionLevel) -> Self {
        self.save_options.compress = compression != CompressionLevel::None;
        self
    }

    /// Merge `files` in order and deliver the result to `sink`.
    ///
    /// Per-file read and parse failures are collected in
    /// [`MergeOutcome::failed`]; a fatal error for one file aborts the merge. When no page could be merged the outcome is
    /// [`MergeStatus::TotalFailure`] and `sink` is never called.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is unavailable
    /// - The merged document cannot be serialized
    /// - The sink fails to deliver the document
    pub async fn merge<S: DownloadSink>(
        &self,
        files: &[SelectedFile],
        name_hint: &str,
        sink: &mut S,
    ) -> Result<MergeOutcome> {
        if files.is_empty() {
            return Ok(MergeOutcome::skipped());
        }

        let start = Instant::now();
        self.engine.check_available()?;

        let mut accumulator = self.engine.create()?;
        let mut outcome = MergeOutcome::empty(MergeStatus::Success);
        let total = files.len();

        // Reads run one at a time; the next file is not touched until the
        // previous one has been appended.
        let mut reads = pin!(stream::iter(files.iter().enumerate()).then(
            move |(idx, file)| async move {
                tracing::debug!("[{}/{}] reading {}", idx + 1, total, file.name());
                let bytes = file.read_bytes().await;
                tokio::task::yield_now().await;
                (file, bytes)
            }
        ));

        while let Some((file, bytes)) = reads.next().await {
            let result =
                bytes.and_then(|b| self.copy_all_pages(file.name(), &b, &mut accumulator));
            let result = match result {
                // Engine failures are not tied to the file.
                Err(e) if e.is_fatal() => return Err(e),
                result => result,
            };

            match file_outcome(file, result) {
                FileOutcome::Merged { pages, .. } => {
                    outcome.files_merged += 1;
                    outcome.pages_merged += pages;
                }
                FileOutcome::Failed(failed) => outcome.failed.push(failed),
            }
        }

        let page_count = self.engine.page_count(&accumulator);
        if page_count == 0 {
            tracing::warn!(files = total, "no input could be merged");
            outcome.status = MergeStatus::TotalFailure;
            outcome.elapsed = start.elapsed();
            return Ok(outcome);
        }
        outcome.pages_merged = page_count;

        let bytes = self
            .engine
            .save(accumulator, &self.save_options)
            .map_err(|e| match e {
                PdfJoinError::SerializationFailed { .. } => e,
                other => PdfJoinError::serialization_failed(other.to_string()),
            })?;

        let file_name = sanitize_output_name(name_hint, self.locale.default_output_name());
        let Delivery { size, .. } = sink.deliver(bytes.clone(), &file_name).await?;
        tracing::debug!(file_name = %file_name, size, "delivered merged PDF");

        outcome.status = if outcome.failed.is_empty() {
            MergeStatus::Success
        } else {
            MergeStatus::PartialSuccess
        };
        outcome.bytes = Some(bytes);
        outcome.file_name = Some(file_name);
        outcome.elapsed = start.elapsed();

        Ok(outcome)
    }

    fn copy_all_pages(
        &self,
        name: &str,
        bytes: &[u8],
        accumulator: &mut E::Document,
    ) -> Result<usize> {
        let source = self.engine.load(name, bytes)?;
        let indices = self.engine.page_indices(&source);
        let pages = self.engine.copy_pages(accumulator, source, &indices)?;
        let count = pages.len();

        for page in pages {
            self.engine.add_page(accumulator, page)?;
        }

        Ok(count)
    }
}

/// Classify the result of appending one file.
fn file_outcome(file: &SelectedFile, result: Result<usize>) -> FileOutcome {
    match result {
        Ok(pages) => FileOutcome::Merged {
            name: file.name().to_string(),
            pages,
        },
        Err(e) => {
            tracing::warn!(file = file.name(), error = %e, "skipping file");
            FileOutcome::Failed(FailedFile {
                name: file.name().to_string(),
                reason: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySink;
    use crate::merge::engine::LopdfEngine;
    use crate::merge::engine::tests::{encrypted_pdf, pdf_with_inherited_attributes};

    /// Engine that is never available.
    struct MissingEngine;

    impl PdfEngine for MissingEngine {
        type Document = ();
        type Page = ();

        fn name(&self) -> &str {
            "missing"
        }
        fn check_available(&self) -> Result<()> {
            Err(PdfJoinError::dependency_missing(self.name()))
        }
        fn create(&self) -> Result<()> {
            unreachable!("create called on missing engine")
        }
        fn load(&self, _name: &str, _bytes: &[u8]) -> Result<()> {
            unreachable!("load called on missing engine")
        }
        fn page_indices(&self, _doc: &()) -> Vec<usize> {
            Vec::new()
        }
        fn copy_pages(&self, _t: &mut (), _s: (), _i: &[usize]) -> Result<Vec<()>> {
            Ok(Vec::new())
        }
        fn add_page(&self, _t: &mut (), _p: ()) -> Result<()> {
            Ok(())
        }
        fn page_count(&self, _doc: &()) -> usize {
            0
        }
        fn save(&self, _doc: (), _o: &SaveOptions) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    /// Lopdf engine with injected failures.
    #[derive(Default)]
    struct FaultyEngine {
        inner: LopdfEngine,
        /// The engine disappears when this file is loaded.
        lost_at: Option<&'static str>,
        unsavable: bool,
    }

    impl PdfEngine for FaultyEngine {
        type Document = <LopdfEngine as PdfEngine>::Document;
        type Page = <LopdfEngine as PdfEngine>::Page;

        fn name(&self) -> &str {
            "faulty"
        }
        fn check_available(&self) -> Result<()> {
            Ok(())
        }
        fn create(&self) -> Result<Self::Document> {
            self.inner.create()
        }
        fn load(&self, name: &str, bytes: &[u8]) -> Result<Self::Document> {
            if self.lost_at == Some(name) {
                return Err(PdfJoinError::dependency_missing(self.name()));
            }
            self.inner.load(name, bytes)
        }
        fn page_indices(&self, doc: &Self::Document) -> Vec<usize> {
            self.inner.page_indices(doc)
        }
        fn copy_pages(
            &self,
            target: &mut Self::Document,
            source: Self::Document,
            indices: &[usize],
        ) -> Result<Vec<Self::Page>> {
            self.inner.copy_pages(target, source, indices)
        }
        fn add_page(&self, target: &mut Self::Document, page: Self::Page) -> Result<()> {
            self.inner.add_page(target, page)
        }
        fn page_count(&self, doc: &Self::Document) -> usize {
            self.inner.page_count(doc)
        }
        fn save(&self, doc: Self::Document, options: &SaveOptions) -> Result<Vec<u8>> {
            if self.unsavable {
                return Err(PdfJoinError::other("disk on fire"));
            }
            self.inner.save(doc, options)
        }
    }

    fn pdf(name: &str, pages: usize) -> SelectedFile {
        SelectedFile::from_bytes(name, None, pdf_with_inherited_attributes(pages))
    }

    fn not_a_pdf(name: &str) -> SelectedFile {
        SelectedFile::from_bytes(name, None, b"garbage".to_vec())
    }

    #[tokio::test]
    async fn test_empty_input_is_noop() {
        let executor = MergeExecutor::new(MissingEngine);
        let mut sink = MemorySink::new();

        let outcome = executor.merge(&[], "", &mut sink).await.unwrap();

        assert_eq!(outcome.status, MergeStatus::Skipped);
        assert!(outcome.bytes.is_none());
        assert!(sink.deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_missing_engine_is_fatal() {
        let executor = MergeExecutor::new(MissingEngine);
        let mut sink = MemorySink::new();

        let result = executor
            .merge(&[not_a_pdf("a.pdf")], "out", &mut sink)
            .await;

        assert!(matches!(
            result,
            Err(PdfJoinError::DependencyMissing { .. })
        ));
        assert!(sink.deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_all_corrupt_is_total_failure() {
        let executor = MergeExecutor::new(LopdfEngine::new());
        let mut sink = MemorySink::new();
        let files = vec![not_a_pdf("a.pdf"), not_a_pdf("b.pdf")];

        let outcome = executor.merge(&files, "out", &mut sink).await.unwrap();

        assert_eq!(outcome.status, MergeStatus::TotalFailure);
        assert_eq!(outcome.failed_names(), vec!["a.pdf", "b.pdf"]);
        assert_eq!(outcome.pages_merged, 0);
        assert!(outcome.bytes.is_none());
        assert!(sink.deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_partial_success_keeps_order() {
        let executor = MergeExecutor::new(LopdfEngine::new()).with_locale(Locale::En);
        let mut sink = MemorySink::new();
        let files = vec![pdf("a.pdf", 2), not_a_pdf("b.pdf"), pdf("c.pdf", 1)];

        let outcome = executor.merge(&files, "", &mut sink).await.unwrap();

        assert_eq!(outcome.status, MergeStatus::PartialSuccess);
        assert_eq!(outcome.pages_merged, 3);
        assert_eq!(outcome.files_merged, 2);
        assert_eq!(outcome.failed_names(), vec!["b.pdf"]);
        assert_eq!(outcome.file_name.as_deref(), Some("merged.pdf"));
        assert_eq!(sink.deliveries().len(), 1);
        assert_eq!(sink.last().map(|(name, _)| name), Some("merged.pdf"));
    }

    #[tokio::test]
    async fn test_encrypted_file_is_skipped() {
        let executor = MergeExecutor::new(LopdfEngine::new());
        let mut sink = MemorySink::new();
        let locked = SelectedFile::from_bytes("locked.pdf", None, encrypted_pdf(3, "secret"));
        let files = vec![pdf("a.pdf", 1), locked, pdf("c.pdf", 1)];

        let outcome = executor.merge(&files, "out", &mut sink).await.unwrap();

        assert_eq!(outcome.status, MergeStatus::PartialSuccess);
        assert_eq!(outcome.pages_merged, 2);
        assert_eq!(outcome.failed_names(), vec!["locked.pdf"]);
        assert!(outcome.failed[0].reason.contains("encrypted"));
        assert_eq!(sink.deliveries().len(), 1);
    }

    #[tokio::test]
    async fn test_fatal_error_mid_merge_aborts() {
        let executor = MergeExecutor::new(FaultyEngine {
            lost_at: Some("b.pdf"),
            ..Default::default()
        });
        let mut sink = MemorySink::new();
        let files = vec![pdf("a.pdf", 1), pdf("b.pdf", 1), pdf("c.pdf", 1)];

        let result = executor.merge(&files, "out", &mut sink).await;

        assert!(matches!(
            result,
            Err(PdfJoinError::DependencyMissing { .. })
        ));
        assert!(sink.deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_is_serialization_error() {
        let executor = MergeExecutor::new(FaultyEngine {
            unsavable: true,
            ..Default::default()
        });
        let mut sink = MemorySink::new();

        let result = executor.merge(&[pdf("a.pdf", 1)], "out", &mut sink).await;

        assert!(matches!(
            result,
            Err(PdfJoinError::SerializationFailed { .. })
        ));
        assert!(sink.deliveries().is_empty());
    }

    #[test]
    fn test_outcome_serializes_without_bytes() {
        let mut outcome = MergeOutcome::empty(MergeStatus::PartialSuccess);
        outcome.bytes = Some(vec![1, 2, 3]);
        outcome.failed.push(FailedFile {
            name: "b.pdf".into(),
            reason: "bad".into(),
        });

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "partialSuccess");
        assert_eq!(json["failed"][0]["name"], "b.pdf");
        assert!(json.get("bytes").is_none());
    }
}
