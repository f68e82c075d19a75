//! Input and output for pdfjoin.
//!
//! - [`prompt`]: line input shared by the shell and interactive prompts
//! - [`source`]: files selected by the user and lazy access to their bytes
//! - [`writer`]: delivery of merged documents

pub mod prompt;
pub mod source;
pub mod writer;

pub use prompt::{LineInput, is_yes};
pub use source::{FileSource, PDF_MIME_TYPE, SelectedFile};
pub use writer::{
    Delivery, DirectorySink, DownloadSink, MemorySink, PdfWriter, WriteOptions, WriteStatistics,
};
