//! Line input shared by the interactive shell and the prompts raised while a
//! command runs.
//!
//! Buffered input belongs to one reader. Alert acknowledgments and overwrite
//! confirmations read from the same [`LineInput`] as the shell, so lines
//! piped ahead of time are consumed in order.

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::Mutex;

use crate::error::{PdfJoinError, Result};

/// A cloneable handle to one line-oriented reader.
pub struct LineInput<R> {
    lines: Arc<Mutex<Lines<R>>>,
}

impl<R> Clone for LineInput<R> {
    fn clone(&self) -> Self {
        Self {
            lines: Arc::clone(&self.lines),
        }
    }
}

impl<R: AsyncBufRead + Unpin> LineInput<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: Arc::new(Mutex::new(reader.lines())),
        }
    }

    /// Next line without its terminator, or `None` at end of input.
    pub async fn next_line(&self) -> Result<Option<String>> {
        let mut lines = self.lines.lock().await;
        Ok(lines.next_line().await?)
    }

    /// Blocking variant of [`next_line`](Self::next_line) for synchronous
    /// callbacks.
    ///
    /// Inside a runtime this needs the multi-thread flavor; the worker thread
    /// is handed over with `block_in_place` while the line is read.
    ///
    /// # Errors
    ///
    /// Fails on a current-thread runtime, or when reading fails.
    pub fn next_line_blocking(&self) -> Result<Option<String>> {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(self.next_line()))
            }
            Ok(_) => Err(PdfJoinError::other(
                "Blocking prompts need a multi-thread runtime",
            )),
            Err(_) => futures::executor::block_on(self.next_line()),
        }
    }
}

/// Whether an answer to a `[y/N]` question means yes.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
