//! User-facing output for pdfjoin.
//!
//! - [`formatter`]: tone-prefixed console lines, quiet and verbose modes
//! - [`status`]: the status line and alerts a session reports through
//! - [`messages`]: localised texts
//!
//! # Examples
//!
//! ```no_run
//! use pdfjoin::config::Config;
//! use pdfjoin::output::{ConsoleStatus, OutputFormatter, Status, StatusSink, StatusTone};
//!
//! # fn example(config: Config) {
//! let mut status = ConsoleStatus::new(OutputFormatter::from_config(&config));
//! status.show(Status::new(StatusTone::Success, "Done"));
//! # }
//! ```

pub mod formatter;
pub mod messages;
pub mod status;

pub use formatter::{MessageLevel, OutputFormatter};
pub use messages::Messages;
pub use status::{ConsoleStatus, Status, StatusLog, StatusSink, StatusTone};

use crate::list::ListView;
use crate::merge::MergeOutcome;
use crate::utils::format_file_size;

/// Print the list the way it is displayed to the user.
pub fn display_list(formatter: &OutputFormatter, view: &ListView, messages: &Messages) {
    if view.rows.is_empty() {
        formatter.info(messages.empty_list());
        return;
    }

    for row in &view.rows {
        formatter.list_line(&row.to_string());
    }
}

/// Print a summary of a finished merge.
pub fn display_merge_summary(formatter: &OutputFormatter, outcome: &MergeOutcome) {
    formatter.detail("Files merged", &outcome.files_merged.to_string());
    formatter.detail("Files skipped", &outcome.failed.len().to_string());
    formatter.detail("Pages", &outcome.pages_merged.to_string());
    if let Some(bytes) = &outcome.bytes {
        formatter.detail("Size", &format_file_size(bytes.len() as u64));
    }
    formatter.detail("Time", &format!("{:.2}s", outcome.elapsed.as_secs_f64()));

    for failed in &outcome.failed {
        formatter.debug(&format!("{}: {}", failed.name, failed.reason));
    }
}
