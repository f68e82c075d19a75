//! Message formatting and display.
//!
//! Prints tone-prefixed lines with support for quiet and verbose modes.
//! When the merge report is printed as JSON, everything else goes to stderr
//! so stdout stays machine-readable.
//!
//! # Examples
//!
//! ```
//! use pdfjoin::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("3 files queued");
//! formatter.success("Done");
//! ```

use crate::config::Config;
use std::io::{self, IsTerminal};

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn prefix(self) -> &'static str {
        match self {
            MessageLevel::Info => "",
            MessageLevel::Success => "✓ ",
            MessageLevel::Warning => "⚠ ",
            MessageLevel::Error => "✗ ",
            MessageLevel::Debug => "→ ",
        }
    }

    fn color(self) -> Option<&'static str> {
        match self {
            MessageLevel::Info => None,
            MessageLevel::Success => Some("\x1b[32m"),
            MessageLevel::Warning => Some("\x1b[33m"),
            MessageLevel::Error => Some("\x1b[31m"),
            MessageLevel::Debug => Some("\x1b[36m"),
        }
    }
}

/// Output formatter with configurable verbosity.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
    to_stderr: bool,
}

impl OutputFormatter {
    /// Create a new output formatter printing to stdout.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: io::stdout().is_terminal() && std::env::var_os("TERM").is_some(),
            to_stderr: false,
        }
    }

    /// Create a formatter from configuration.
    pub fn from_config(config: &Config) -> Self {
        let formatter = Self::new(config.quiet, config.verbose);
        if config.json {
            formatter.on_stderr()
        } else {
            formatter
        }
    }

    /// Send all output to stderr.
    pub fn on_stderr(mut self) -> Self {
        self.to_stderr = true;
        self.colored = io::stderr().is_terminal() && std::env::var_os("TERM").is_some();
        self
    }

    /// Disable ANSI colors.
    pub fn plain(mut self) -> Self {
        self.colored = false;
        self
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message. Always displayed.
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message. Always displayed.
    pub fn error(&self, message: &str) {
        self.print_message(MessageLevel::Error, message);
    }

    /// Print a debug message. Only displayed in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    /// Render `message` the way it would be printed at `level`.
    pub fn format(&self, level: MessageLevel, message: &str) -> String {
        let prefix = level.prefix();
        match level.color() {
            Some(color) if self.colored => format!("{color}{prefix}{message}\x1b[0m"),
            _ => format!("{prefix}{message}"),
        }
    }

    fn print_message(&self, level: MessageLevel, message: &str) {
        let line = self.format(level, message);
        if self.to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// Print a section header. Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, &format!("\n{title}"));
        }
    }

    /// Print a labelled value. Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Info, &format!("  {label}: {value}"));
        }
    }

    /// Print an indented list line. Suppressed in quiet mode.
    pub fn list_line(&self, line: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, &format!("  {line}"));
        }
    }

    /// Whether non-error output is shown.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Whether verbose output is shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Whether quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}
