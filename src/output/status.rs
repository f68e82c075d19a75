//! Status line and alerts.
//!
//! The session reports progress through a [`StatusSink`]: a single status
//! line with a tone, replaced on every update, and blocking alerts that the
//! user has to acknowledge.

use serde::Serialize;
use std::fmt;

use crate::output::formatter::OutputFormatter;

/// Visual tone of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    /// No emphasis.
    #[default]
    Neutral,
    /// Something was skipped or ignored.
    Warning,
    /// The operation finished.
    Success,
    /// The operation failed.
    Error,
}

/// Current status line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    /// Tone.
    pub tone: StatusTone,
    /// Text, possibly empty.
    pub text: String,
}

impl Status {
    /// Build a status.
    pub fn new(tone: StatusTone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }

    /// Empty neutral status.
    pub fn clear() -> Self {
        Self::default()
    }
}

/// Receives status updates and alerts.
pub trait StatusSink {
    /// Replace the status line.
    fn show(&mut self, status: Status);

    /// Show `message` and wait until the user acknowledges it.
    fn alert(&mut self, message: &str);
}

/// Records every update. Useful for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StatusLog {
    history: Vec<Status>,
    alerts: Vec<String>,
}

impl StatusLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent status, or an empty one.
    pub fn current(&self) -> Status {
        self.history.last().cloned().unwrap_or_default()
    }

    /// Every status shown so far, oldest first.
    pub fn history(&self) -> &[Status] {
        &self.history
    }

    /// Every alert raised so far, oldest first.
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }
}

impl StatusSink for StatusLog {
    fn show(&mut self, status: Status) {
        self.history.push(status);
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

type AcknowledgeFn = Box<dyn FnMut() + Send>;

/// Prints statuses through an [`OutputFormatter`].
pub struct ConsoleStatus {
    formatter: OutputFormatter,
    acknowledge: Option<AcknowledgeFn>,
}

impl ConsoleStatus {
    /// Create a console sink. Alerts are printed and do not wait.
    pub fn new(formatter: OutputFormatter) -> Self {
        Self {
            formatter,
            acknowledge: None,
        }
    }

    /// Call `acknowledge` after printing each alert. It should block until
    /// the user confirms, typically by reading a line.
    pub fn with_acknowledge(mut self, acknowledge: impl FnMut() + Send + 'static) -> Self {
        self.acknowledge = Some(Box::new(acknowledge));
        self
    }

    /// The formatter used for output.
    pub fn formatter(&self) -> &OutputFormatter {
        &self.formatter
    }
}

impl fmt::Debug for ConsoleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleStatus")
            .field("formatter", &self.formatter)
            .field("acknowledge", &self.acknowledge.is_some())
            .finish()
    }
}

impl StatusSink for ConsoleStatus {
    fn show(&mut self, status: Status) {
        if status.text.is_empty() {
            return;
        }

        match status.tone {
            StatusTone::Neutral => self.formatter.info(&status.text),
            StatusTone::Warning => self.formatter.warning(&status.text),
            StatusTone::Success => self.formatter.success(&status.text),
            StatusTone::Error => self.formatter.error(&status.text),
        }
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
        if let Some(acknowledge) = self.acknowledge.as_mut() {
            acknowledge();
        }
    }
}
