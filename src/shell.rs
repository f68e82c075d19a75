//! Interactive shell.
//!
//! Builds the file list one command at a time, the way files are dropped
//! onto and rearranged in a list view, then merges on request.

use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};

use pdfjoin::config::Presets;
use pdfjoin::error::Result;
use pdfjoin::io::{DownloadSink, LineInput};
use pdfjoin::merge::PdfEngine;
use pdfjoin::output::{OutputFormatter, StatusSink, display_list, display_merge_summary};
use pdfjoin::session::Session;

const HELP: &str = "\
Commands:
  add <pattern>...   add files (globs allowed)
  rm <n>             remove file n
  up <n>             move file n up
  down <n>           move file n down
  list               show the list
  name <text>        set the output name
  preset <key>       use a preset as the output name
  presets            show presets
  merge              merge the list
  help               show this help
  quit               leave the shell";

/// One shell command. Positions are 1-based as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add files matching the patterns.
    Add(Vec<String>),
    /// Remove the file at a position.
    Remove(usize),
    /// Move the file at a position up.
    Up(usize),
    /// Move the file at a position down.
    Down(usize),
    /// Show the list.
    List,
    /// Set the output name hint (may be empty).
    Name(String),
    /// Use a preset as the output name.
    Preset(String),
    /// Show the presets.
    Presets,
    /// Merge the list.
    Merge,
    /// Show help.
    Help,
    /// Leave the shell.
    Quit,
}

/// Errors from parsing a command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    /// The line was empty.
    #[error("Empty command")]
    Empty,

    /// The command word is not known.
    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),

    /// A required argument is missing.
    #[error("'{command}' needs {what}")]
    MissingArgument {
        /// Command word.
        command: &'static str,
        /// Description of the argument.
        what: &'static str,
    },

    /// The position is not a number of at least 1.
    #[error("Invalid position: {0}")]
    InvalidPosition(String),
}

fn parse_position(
    command: &'static str,
    arg: Option<&str>,
) -> std::result::Result<usize, ParseCommandError> {
    let arg = arg.ok_or(ParseCommandError::MissingArgument {
        command,
        what: "a position",
    })?;

    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(ParseCommandError::InvalidPosition(arg.to_string())),
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let first_arg = rest.split_whitespace().next();

        match word.to_lowercase().as_str() {
            "" => Err(ParseCommandError::Empty),
            "add" | "a" => {
                if rest.is_empty() {
                    return Err(ParseCommandError::MissingArgument {
                        command: "add",
                        what: "at least one pattern",
                    });
                }
                Ok(Command::Add(
                    rest.split_whitespace().map(str::to_string).collect(),
                ))
            }
            "rm" | "remove" => parse_position("rm", first_arg).map(Command::Remove),
            "up" => parse_position("up", first_arg).map(Command::Up),
            "down" => parse_position("down", first_arg).map(Command::Down),
            "list" | "ls" => Ok(Command::List),
            "name" => Ok(Command::Name(rest.to_string())),
            "preset" => first_arg
                .map(|key| Command::Preset(key.to_string()))
                .ok_or(ParseCommandError::MissingArgument {
                    command: "preset",
                    what: "a key",
                }),
            "presets" => Ok(Command::Presets),
            "merge" | "m" => Ok(Command::Merge),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

/// Whether the shell keeps reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// Stop.
    Quit,
}

/// The interactive shell around a session.
pub struct Shell<E, S, D> {
    session: Session<E, S>,
    sink: D,
    presets: Presets,
    formatter: OutputFormatter,
}

impl<E: PdfEngine, S: StatusSink, D: DownloadSink> Shell<E, S, D> {
    /// Create a shell.
    pub fn new(
        session: Session<E, S>,
        sink: D,
        presets: Presets,
        formatter: OutputFormatter,
    ) -> Self {
        Self {
            session,
            sink,
            presets,
            formatter,
        }
    }

    /// Read commands from `input` until `quit` or end of input.
    ///
    /// Prompts raised while a command runs may read from clones of the same
    /// `input`.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading `input` or writing the prompt fails.
    /// Command failures are printed and the shell continues.
    pub async fn run<R, W>(&mut self, input: &LineInput<R>, mut prompt: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            prompt.write_all(b"pdfjoin> ").await?;
            prompt.flush().await?;

            let Some(line) = input.next_line().await? else {
                break;
            };

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(ParseCommandError::Empty) => continue,
                Err(err) => {
                    self.formatter.error(&err.to_string());
                    continue;
                }
            };

            if self.execute(command).await == Flow::Quit {
                break;
            }
        }

        Ok(())
    }

    /// Run one command. Failures are printed, never returned.
    pub async fn execute(&mut self, command: Command) -> Flow {
        tracing::debug!(?command, "shell command");

        match command {
            Command::Add(patterns) => {
                if let Err(err) = self.session.add_paths(&patterns).await {
                    self.formatter.error(&err.to_string());
                } else {
                    self.show_list();
                }
            }
            Command::Remove(index) => {
                if self.session.remove(index).is_some() {
                    self.show_list();
                } else {
                    self.no_such_position(index);
                }
            }
            Command::Up(index) => {
                if self.session.move_up(index) {
                    self.show_list();
                } else {
                    self.cannot_move(index);
                }
            }
            Command::Down(index) => {
                if self.session.move_down(index) {
                    self.show_list();
                } else {
                    self.cannot_move(index);
                }
            }
            Command::List => self.show_list(),
            Command::Name(name) => self.session.set_name_hint(name),
            Command::Preset(key) => {
                if self.session.apply_preset(&self.presets, &key) {
                    self.formatter
                        .info(&format!("name: {}", self.session.name_hint()));
                } else {
                    self.formatter.error(&format!("Unknown preset: {key}"));
                }
            }
            Command::Presets => {
                for (key, value) in self.presets.iter() {
                    self.formatter.list_line(&format!("{key}: {value}"));
                }
            }
            Command::Merge => self.merge().await,
            Command::Help => self.formatter.info(HELP),
            Command::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    async fn merge(&mut self) {
        if !self.session.merge_enabled() {
            self.formatter
                .warning(self.session.messages().empty_list());
            return;
        }

        // Failures are already reported through the status sink.
        if let Ok(outcome) = self.session.merge(&mut self.sink).await
            && let Some(file_name) = &outcome.file_name
        {
            self.formatter
                .info(&self.session.messages().saved(file_name));
            display_merge_summary(&self.formatter, &outcome);
        }
    }

    fn show_list(&self) {
        display_list(&self.formatter, self.session.view(), self.session.messages());
    }

    fn no_such_position(&self, index: usize) {
        self.formatter
            .error(&format!("No file at position {}", index + 1));
    }

    fn cannot_move(&self, index: usize) {
        self.formatter
            .warning(&format!("Cannot move file at position {}", index + 1));
    }
}
