//! User-selected input files.
//!
//! A [`SelectedFile`] carries the name, size and MIME type the admission
//! filter looks at, plus a handle to its content. Content is only read when a
//! merge asks for it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{PdfJoinError, Result};

/// MIME type of PDF documents.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Where the bytes of a selected file live.
#[derive(Clone)]
pub enum FileSource {
    /// A file on disk, read lazily.
    Path(PathBuf),
    /// Bytes already in memory, shared between clones.
    Memory(Arc<[u8]>),
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
        }
    }
}

/// A file the user picked or dropped.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    size: u64,
    mime_type: Option<String>,
    source: FileSource,
}

impl SelectedFile {
    /// Create a file backed by in-memory bytes.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: Option<&str>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime_type: mime_type.map(str::to_owned),
            source: FileSource::Memory(bytes),
        }
    }

    /// Create a file backed by a path on disk.
    ///
    /// The size is taken from the file's metadata and the MIME type is
    /// guessed from its extension. Content is not read.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or is not a regular file.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let metadata = tokio::fs::metadata(path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                PdfJoinError::file_not_found(path.to_path_buf())
            } else {
                PdfJoinError::failed_to_read(path.display().to_string(), err)
            }
        })?;

        if !metadata.is_file() {
            return Err(PdfJoinError::not_a_file(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            mime_type: mime_type_for_path(path).map(str::to_owned),
            name,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Declared MIME type, if any.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Content handle.
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Read the full content.
    ///
    /// # Errors
    ///
    /// Returns [`PdfJoinError::FailedToRead`] if a path-backed file can no
    /// longer be read.
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
            FileSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|err| PdfJoinError::failed_to_read(&self.name, err)),
        }
    }
}

/// Guess a MIME type from a file extension. Only PDFs are recognised.
fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.eq_ignore_ascii_case("pdf"))
        .map(|_| PDF_MIME_TYPE)
}
