//! The merge session.
//!
//! A [`Session`] owns the file list, the name hint, the merge trigger state
//! and the status sink. Every list mutation re-renders the [`ListView`].
//! [`Session::merge`] runs the merge state machine:
//!
//! ```text
//! Idle ──merge()──▶ Running ──▶ Finished(status) ──list change──▶ Idle
//! ```
//!
//! `merge` takes `&mut self` for its whole duration, so the list cannot be
//! changed while a merge runs. The executor still works on a snapshot.

use crate::config::{Locale, Presets};
use crate::error::{PdfJoinError, Result};
use crate::io::{DownloadSink, SelectedFile};
use crate::list::{AddReport, FileList, ListView};
use crate::merge::{MergeExecutor, MergeOutcome, MergeStatus, PdfEngine};
use crate::output::{Messages, Status, StatusSink, StatusTone};
use crate::utils::collect_paths_for_patterns;

/// Where the session is in the merge lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePhase {
    /// No merge has run since the list last changed.
    #[default]
    Idle,
    /// A merge is in progress.
    Running,
    /// The last merge ended with this status.
    Finished(MergeStatus),
}

/// A file list plus everything needed to merge it.
pub struct Session<E, S> {
    executor: MergeExecutor<E>,
    status: S,
    messages: Messages,
    list: FileList,
    view: ListView,
    name_hint: String,
    phase: MergePhase,
}

impl<E: PdfEngine, S: StatusSink> Session<E, S> {
    /// Create an empty session.
    pub fn new(executor: MergeExecutor<E>, status: S, locale: Locale) -> Self {
        let list = FileList::new();
        let view = ListView::render(&list, false);

        Self {
            executor: executor.with_locale(locale),
            status,
            messages: Messages::new(locale),
            list,
            view,
            name_hint: String::new(),
            phase: MergePhase::Idle,
        }
    }

    /// Offer `candidates` to the list.
    ///
    /// Non-PDF candidates are counted and reported through a warning status.
    pub fn add_files<I>(&mut self, candidates: I) -> AddReport
    where
        I: IntoIterator<Item = SelectedFile>,
    {
        let report = self.list.add(candidates);
        self.list_changed();

        let status = if report.rejected > 0 {
            Status::new(
                StatusTone::Warning,
                self.messages.non_pdf_ignored(report.rejected),
            )
        } else {
            Status::clear()
        };
        self.status.show(status);

        report
    }

    /// Resolve `patterns` to files on disk and offer them to the list.
    ///
    /// # Errors
    ///
    /// Fails without changing the list if a pattern is invalid or a resolved
    /// path is missing or not a regular file.
    pub async fn add_paths<T>(&mut self, patterns: T) -> Result<AddReport>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let paths = collect_paths_for_patterns(patterns)?;

        let mut candidates = Vec::with_capacity(paths.len());
        for path in &paths {
            candidates.push(SelectedFile::from_path(path).await?);
        }

        Ok(self.add_files(candidates))
    }

    /// Remove the file at `index`.
    pub fn remove(&mut self, index: usize) -> Option<SelectedFile> {
        let removed = self.list.remove(index);
        if removed.is_some() {
            self.list_changed();
        }
        removed
    }

    /// Move the file at `index` one position up.
    pub fn move_up(&mut self, index: usize) -> bool {
        let moved = self.list.move_up(index);
        if moved {
            self.list_changed();
        }
        moved
    }

    /// Move the file at `index` one position down.
    pub fn move_down(&mut self, index: usize) -> bool {
        let moved = self.list.move_down(index);
        if moved {
            self.list_changed();
        }
        moved
    }

    /// Set the output name hint.
    pub fn set_name_hint(&mut self, hint: impl Into<String>) {
        self.name_hint = hint.into();
    }

    /// Fill the name hint from the preset `key`. Returns `false` for an
    /// unknown key.
    pub fn apply_preset(&mut self, presets: &Presets, key: &str) -> bool {
        match presets.get(key) {
            Some(name) => {
                self.name_hint = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Current name hint.
    pub fn name_hint(&self) -> &str {
        &self.name_hint
    }

    /// Current list.
    pub fn files(&self) -> &[SelectedFile] {
        self.list.files()
    }

    /// Most recent render of the list.
    pub fn view(&self) -> &ListView {
        &self.view
    }

    /// Whether the merge trigger is enabled.
    pub fn merge_enabled(&self) -> bool {
        !self.list.is_empty() && self.phase != MergePhase::Running
    }

    /// Current phase.
    pub fn phase(&self) -> MergePhase {
        self.phase
    }

    /// The status sink.
    pub fn status(&self) -> &S {
        &self.status
    }

    /// Localised texts in use.
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Merge the current list and deliver the result to `sink`.
    ///
    /// Does nothing and returns a [`MergeStatus::Skipped`] outcome when the
    /// trigger is disabled. Per-file failures and total failure are reported
    /// through the status sink and the returned outcome.
    ///
    /// # Errors
    ///
    /// Returns the fatal error that aborted the merge, after reporting it
    /// through the status sink.
    pub async fn merge<D: DownloadSink>(&mut self, sink: &mut D) -> Result<MergeOutcome> {
        if !self.merge_enabled() {
            return Ok(MergeOutcome::skipped());
        }

        let snapshot = self.list.snapshot();
        self.set_phase(MergePhase::Running);
        self.status
            .show(Status::new(StatusTone::Neutral, self.messages.merging()));

        let result = self
            .executor
            .merge(&snapshot, &self.name_hint, sink)
            .await;

        let status = match &result {
            Ok(outcome) => {
                self.report_outcome(outcome);
                outcome.status
            }
            Err(err) => {
                self.report_fatal(err);
                MergeStatus::FatalError
            }
        };

        self.set_phase(MergePhase::Finished(status));
        result
    }

    fn report_outcome(&mut self, outcome: &MergeOutcome) {
        match outcome.status {
            MergeStatus::Success => {
                self.status
                    .show(Status::new(StatusTone::Success, self.messages.done()));
            }
            MergeStatus::PartialSuccess => {
                self.status.show(Status::new(
                    StatusTone::Warning,
                    self.messages.done_with_skips(outcome.failed.len()),
                ));
                let alert = self.messages.skipped_files_alert(&outcome.failed_names());
                self.status.alert(&alert);
            }
            MergeStatus::TotalFailure => {
                self.status
                    .show(Status::new(StatusTone::Error, self.messages.failed()));
                self.status.alert(self.messages.all_failed_alert());
            }
            MergeStatus::Skipped | MergeStatus::FatalError => {}
        }
    }

    fn report_fatal(&mut self, err: &PdfJoinError) {
        tracing::error!(error = %err, "merge aborted");

        let text = match err {
            PdfJoinError::DependencyMissing { .. } => self.messages.engine_missing(),
            _ => self.messages.failed(),
        };
        self.status.show(Status::new(StatusTone::Error, text));
        self.status.alert(self.messages.fatal_alert());
    }

    fn set_phase(&mut self, phase: MergePhase) {
        self.phase = phase;
        self.view = ListView::render(&self.list, phase == MergePhase::Running);
    }

    fn list_changed(&mut self) {
        if self.phase != MergePhase::Running {
            self.phase = MergePhase::Idle;
        }
        self.view = ListView::render(&self.list, self.phase == MergePhase::Running);
    }
}
