//! PDF merging.
//!
//! [`engine`] wraps the PDF library behind the [`PdfEngine`] trait and
//! [`executor`] drives a best-effort merge of an ordered file list.

pub mod engine;
pub mod executor;

pub use engine::{LopdfDocument, LopdfEngine, LopdfPage, PdfEngine, SaveOptions};
pub use executor::{FailedFile, FileOutcome, MergeExecutor, MergeOutcome, MergeStatus};
