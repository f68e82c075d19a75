//! The ordered list of files to merge.
//!
//! Insertion order is merge order. Only PDF candidates are admitted, and
//! duplicates are allowed. Mutations that fall outside the list are no-ops.

pub mod view;

pub use view::{ListRow, ListView};

use crate::io::{PDF_MIME_TYPE, SelectedFile};

/// Whether a file should be treated as a PDF.
///
/// A file is admitted when its MIME type is exactly `application/pdf`, or
/// when its name ends in `.pdf` in any letter case.
pub fn is_pdf_candidate(name: &str, mime_type: Option<&str>) -> bool {
    if mime_type == Some(PDF_MIME_TYPE) {
        return true;
    }

    let name = name.as_bytes();
    name.len() >= 4 && name[name.len() - 4..].eq_ignore_ascii_case(b".pdf")
}

/// Outcome of an [`FileList::add`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddReport {
    /// Number of files appended to the list.
    pub admitted: usize,
    /// Number of files ignored because they are not PDFs.
    pub rejected: usize,
}

/// Ordered collection of selected files.
#[derive(Debug, Clone, Default)]
pub struct FileList {
    files: Vec<SelectedFile>,
    revision: u64,
}

impl FileList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every PDF candidate, in the order given, and count the rest.
    pub fn add<I>(&mut self, candidates: I) -> AddReport
    where
        I: IntoIterator<Item = SelectedFile>,
    {
        let mut report = AddReport::default();

        for file in candidates {
            if is_pdf_candidate(file.name(), file.mime_type()) {
                self.files.push(file);
                report.admitted += 1;
            } else {
                tracing::debug!(name = file.name(), "ignoring non-PDF file");
                report.rejected += 1;
            }
        }

        self.touch();
        report
    }

    /// Remove the file at `index`, shifting later files up.
    ///
    /// Returns `None` and leaves the list untouched when `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Option<SelectedFile> {
        if index >= self.files.len() {
            return None;
        }

        let removed = self.files.remove(index);
        self.touch();
        Some(removed)
    }

    /// Swap the file at `index` with the one before it.
    ///
    /// Returns `false` if there is no previous file.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.files.len() {
            return false;
        }

        self.files.swap(index, index - 1);
        self.touch();
        true
    }

    /// Swap the file at `index` with the one after it.
    ///
    /// Returns `false` if there is no next file.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.files.len().saturating_sub(1) {
            return false;
        }

        self.files.swap(index, index + 1);
        self.touch();
        true
    }

    /// Current files in merge order.
    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    /// Owned copy of the current order.
    ///
    /// Cloning is cheap: in-memory contents are shared and paths are read lazily.
    pub fn snapshot(&self) -> Vec<SelectedFile> {
        self.files.clone()
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Counter bumped on every mutating call. Views compare it to decide
    /// whether they are stale.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
