//! pdfjoin - Merge an ordered list of PDF files into one document.
//!
//! The library keeps the list of selected files, merges them in list order
//! and reports files it could not read instead of failing the whole merge:
//!
//! - Admission of PDF candidates by MIME type or `.pdf` extension
//! - Reordering and removal with a positional view for display
//! - Best-effort, strictly ordered merging with per-file failure reporting
//! - Safe output names with localised defaults and presets
//! - Pluggable delivery and status reporting
//!
//! # Examples
//!
//! ## One-shot merge
//!
//! ```no_run
//! use pdfjoin::io::{MemorySink, SelectedFile};
//! use pdfjoin::merge::{LopdfEngine, MergeExecutor};
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> pdfjoin::Result<()> {
//! let files = vec![
//!     SelectedFile::from_bytes("a.pdf", None, a),
//!     SelectedFile::from_bytes("b.pdf", None, b),
//! ];
//!
//! let mut sink = MemorySink::new();
//! let outcome = MergeExecutor::new(LopdfEngine::new())
//!     .merge(&files, "report", &mut sink)
//!     .await?;
//! println!("{} pages, {} skipped", outcome.pages_merged, outcome.failed.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Session
//!
//! ```no_run
//! use pdfjoin::config::{Locale, OverwriteMode};
//! use pdfjoin::io::DirectorySink;
//! use pdfjoin::merge::{LopdfEngine, MergeExecutor};
//! use pdfjoin::output::StatusLog;
//! use pdfjoin::session::Session;
//!
//! # async fn example() -> pdfjoin::Result<()> {
//! let executor = MergeExecutor::new(LopdfEngine::new());
//! let mut session = Session::new(executor, StatusLog::new(), Locale::En);
//! session.add_paths(["chapters/*.pdf"]).await?;
//! session.move_up(2);
//! session.set_name_hint("book");
//!
//! let mut sink = DirectorySink::new("out", OverwriteMode::Force);
//! session.merge(&mut sink).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod list;
pub mod merge;
pub mod output;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{PdfJoinError, Result};
pub use session::Session;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
