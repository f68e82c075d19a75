//! Error types for pdfjoin.
//!
//! Errors fall into two groups. Per-file errors (unreadable, unparsable,
//! encrypted) are recoverable: the merge records the file as skipped and moves
//! on. Fatal errors (missing PDF engine, serialization or write failures)
//! abort the current merge.
//!
//! Rejecting a non-PDF file when it is added to the list is not an error at
//! all; it is reported as a count.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfjoin operations.
pub type Result<T> = std::result::Result<T, PdfJoinError>;

/// Main error type for pdfjoin operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfJoinError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// The contents of a selected file could not be read.
    #[error("Failed to read {name}\n  Reason: {source}")]
    FailedToRead {
        /// Display name of the file.
        name: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The bytes of a selected file could not be parsed as a PDF.
    #[error("Failed to load PDF: {name}\n  Reason: {reason}")]
    FailedToLoadPdf {
        /// Display name of the file.
        name: String,
        /// Reason reported by the PDF engine.
        reason: String,
    },

    /// The PDF is password protected.
    #[error(
        "PDF is encrypted and cannot be processed: {name}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    EncryptedPdf {
        /// Display name of the file.
        name: String,
    },

    /// The PDF parsed but its structure is unusable.
    #[error("Corrupted or invalid PDF: {name}\n  Details: {details}")]
    CorruptedPdf {
        /// Display name of the file.
        name: String,
        /// What is wrong with it.
        details: String,
    },

    /// No files were provided for merging.
    #[error("No input files specified for merging")]
    NoFilesToMerge,

    /// Every input failed to load, so nothing was produced.
    #[error("All {} input file(s) failed to load", failed.len())]
    AllFilesFailed {
        /// Names of the files that failed.
        failed: Vec<String>,
    },

    /// The PDF engine is not usable.
    #[error("PDF engine is not available: {engine}")]
    DependencyMissing {
        /// Name of the missing engine.
        engine: String,
    },

    /// The merged document could not be serialized.
    #[error("Failed to serialize merged PDF: {reason}")]
    SerializationFailed {
        /// Reason reported by the PDF engine.
        reason: String,
    },

    /// Output already exists and overwriting is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different name",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create the output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write the output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfJoinError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for PdfJoinError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(format!("{err:#}"))
    }
}

impl PdfJoinError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a FailedToRead error.
    pub fn failed_to_read(name: impl Into<String>, source: io::Error) -> Self {
        Self::FailedToRead {
            name: name.into(),
            source,
        }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(name: impl Into<String>) -> Self {
        Self::EncryptedPdf { name: name.into() }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            name: name.into(),
            details: details.into(),
        }
    }

    /// Create a DependencyMissing error.
    pub fn dependency_missing(engine: impl Into<String>) -> Self {
        Self::DependencyMissing {
            engine: engine.into(),
        }
    }

    /// Create a SerializationFailed error.
    pub fn serialization_failed(reason: impl Into<String>) -> Self {
        Self::SerializationFailed {
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error only concerns a single input file.
    ///
    /// Recoverable errors are recorded against the file and the merge continues.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::NotAFile { .. }
                | Self::FailedToRead { .. }
                | Self::FailedToLoadPdf { .. }
                | Self::EncryptedPdf { .. }
                | Self::CorruptedPdf { .. }
        )
    }

    /// Check if this error aborts the whole merge.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DependencyMissing { .. }
                | Self::SerializationFailed { .. }
                | Self::FailedToCreateOutput { .. }
                | Self::FailedToWrite { .. }
                | Self::OutputExists { .. }
                | Self::Cancelled
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToRead { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::CorruptedPdf { .. } => 3,
            Self::AllFilesFailed { .. } => 3,
            Self::NoFilesToMerge => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::DependencyMissing { .. } => 6,
            Self::SerializationFailed { .. } => 6,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
