//! Delivering merged PDFs.
//!
//! A [`DownloadSink`] receives the serialized bytes and the sanitized file
//! name and hands them to the host environment. The CLI uses a
//! [`DirectorySink`], which writes the file atomically (write to a temp file,
//! then rename) into an output directory. [`MemorySink`] keeps deliveries in
//! memory.
//!
//! # Examples
//!
//! ```no_run
//! use pdfjoin::io::{DirectorySink, DownloadSink};
//! use pdfjoin::config::OverwriteMode;
//!
//! # async fn example(bytes: Vec<u8>) -> pdfjoin::Result<()> {
//! let mut sink = DirectorySink::new("out", OverwriteMode::Force);
//! let delivery = sink.deliver(bytes, "merged.pdf").await?;
//! println!("Saved {} bytes", delivery.size);
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::config::OverwriteMode;
use crate::error::{PdfJoinError, Result};

/// Record of one delivered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// File name the document was offered under.
    pub file_name: String,

    /// Where it ended up, when the sink stores files on disk.
    pub location: Option<PathBuf>,

    /// Number of bytes delivered.
    pub size: u64,
}

/// Destination for a merged document.
pub trait DownloadSink {
    /// Hand `bytes` to the host under `file_name`.
    fn deliver(&mut self, bytes: Vec<u8>, file_name: &str)
    -> impl Future<Output = Result<Delivery>>;
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            buffer_size: 8192,
        }
    }
}

/// Writes serialized PDF bytes to disk.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Write `bytes` to `path`, creating parent directories as needed.
    ///
    /// With atomic writes enabled the bytes go to a hidden sibling
    /// (`.<name>.tmp`) that is renamed over `path` once flushed, so a failed
    /// write never leaves a truncated PDF behind.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent directory cannot be created
    /// - The file cannot be created or written
    /// - The final rename fails
    pub async fn write_bytes(&self, bytes: Vec<u8>, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();

        task::spawn_blocking(move || {
            let start = Instant::now();

            if let Some(parent) = path_buf.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PdfJoinError::FailedToCreateOutput {
                        path: parent.to_path_buf(),
                        source: e,
                    }
                })?;
            }

            let write_path = if options.atomic {
                temp_path(&path_buf)
            } else {
                path_buf.clone()
            };

            let file = std::fs::File::create(&write_path).map_err(|e| {
                PdfJoinError::FailedToCreateOutput {
                    path: write_path.clone(),
                    source: e,
                }
            })?;

            let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, file);

            writer
                .write_all(&bytes)
                .and_then(|_| writer.flush())
                .map_err(|e| PdfJoinError::FailedToWrite {
                    path: write_path.clone(),
                    source: e,
                })?;
            drop(writer);

            if options.atomic
                && let Err(e) = std::fs::rename(&write_path, &path_buf)
            {
                let _ = std::fs::remove_file(&write_path);
                return Err(PdfJoinError::FailedToWrite {
                    path: path_buf.clone(),
                    source: e,
                });
            }

            Ok::<_, PdfJoinError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size: bytes.len() as u64,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| PdfJoinError::other(format!("Write task failed: {e}")))?
    }
}

/// Sibling of `path` used while writing it atomically.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

type ConfirmFn = Box<dyn FnMut(&Path) -> bool + Send>;

/// Saves deliveries as files in a directory.
pub struct DirectorySink {
    dir: PathBuf,
    overwrite_mode: OverwriteMode,
    writer: PdfWriter,
    confirm: Option<ConfirmFn>,
}

impl DirectorySink {
    /// Create a sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>, overwrite_mode: OverwriteMode) -> Self {
        Self {
            dir: dir.into(),
            overwrite_mode,
            writer: PdfWriter::new(),
            confirm: None,
        }
    }

    /// Set the callback asked before replacing an existing file in
    /// [`OverwriteMode::Prompt`]. Without one, prompting behaves like
    /// [`OverwriteMode::NoClobber`].
    pub fn with_confirm(mut self, confirm: impl FnMut(&Path) -> bool + Send + 'static) -> Self {
        self.confirm = Some(Box::new(confirm));
        self
    }

    /// Directory deliveries are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn check_overwrite(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        match self.overwrite_mode {
            OverwriteMode::Force => Ok(()),
            OverwriteMode::NoClobber => Err(PdfJoinError::output_exists(path.to_path_buf())),
            OverwriteMode::Prompt => match self.confirm.as_mut() {
                Some(confirm) => {
                    if confirm(path) {
                        Ok(())
                    } else {
                        Err(PdfJoinError::Cancelled)
                    }
                }
                None => Err(PdfJoinError::output_exists(path.to_path_buf())),
            },
        }
    }
}

impl DownloadSink for DirectorySink {
    async fn deliver(&mut self, bytes: Vec<u8>, file_name: &str) -> Result<Delivery> {
        let path = self.dir.join(file_name);
        self.check_overwrite(&path)?;

        let stats = self.writer.write_bytes(bytes, &path).await?;
        tracing::debug!(
            path = %stats.output_path.display(),
            size = stats.file_size,
            elapsed_ms = stats.write_time.as_millis() as u64,
            "wrote merged PDF"
        );

        Ok(Delivery {
            file_name: file_name.to_string(),
            location: Some(stats.output_path),
            size: stats.file_size,
        })
    }
}

/// Keeps delivered documents in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    deliveries: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(file_name, bytes)` pairs delivered so far, oldest first.
    pub fn deliveries(&self) -> &[(String, Vec<u8>)] {
        &self.deliveries
    }

    /// The most recent delivery.
    pub fn last(&self) -> Option<(&str, &[u8])> {
        self.deliveries
            .last()
            .map(|(name, bytes)| (name.as_str(), bytes.as_slice()))
    }
}

impl DownloadSink for MemorySink {
    async fn deliver(&mut self, bytes: Vec<u8>, file_name: &str) -> Result<Delivery> {
        let size = bytes.len() as u64;
        self.deliveries.push((file_name.to_string(), bytes));
        Ok(Delivery {
            file_name: file_name.to_string(),
            location: None,
            size,
        })
    }
}
