//! pdfjoin - Merge PDF files into a single document.
//!
//! Files that cannot be read are skipped and reported; the rest are merged
//! in the order given.

mod cli;
mod shell;

use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::shell::Shell;
use pdfjoin::config::{Config, OverwriteMode};
use pdfjoin::error::PdfJoinError;
use pdfjoin::io::{DirectorySink, LineInput, is_yes};
use pdfjoin::merge::{LopdfEngine, MergeExecutor, MergeStatus};
use pdfjoin::output::{ConsoleStatus, OutputFormatter, display_list, display_merge_summary};
use pdfjoin::session::Session;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Diagnostics go to stderr; stdout is reserved for output and `--json`.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Standard input, shared by the shell and every prompt.
type StdinLines = LineInput<tokio::io::BufReader<tokio::io::Stdin>>;

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfJoinError> {
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);
    let input: StdinLines = LineInput::new(tokio::io::BufReader::new(tokio::io::stdin()));

    let executor = MergeExecutor::new(LopdfEngine::new()).with_compression(config.compression);
    let mut status = ConsoleStatus::new(formatter.clone());
    if config.acknowledge_alerts {
        let input = input.clone();
        status = status.with_acknowledge(move || wait_for_enter(&input));
    }
    let mut session = Session::new(executor, status, config.locale);
    session.set_name_hint(config.name.as_str());

    let mut sink = DirectorySink::new(&config.out_dir, config.overwrite_mode);
    if config.overwrite_mode == OverwriteMode::Prompt {
        let input = input.clone();
        sink = sink.with_confirm(move |path| confirm_overwrite(&input, path));
    }

    if !config.inputs.is_empty() {
        session.add_paths(&config.inputs).await?;
    }

    if config.interactive {
        formatter.section(&format!("{} v{}", pdfjoin::NAME, pdfjoin::VERSION));
        formatter.info("Type 'help' for commands.");

        let mut shell = Shell::new(session, sink, config.presets.clone(), formatter);
        return shell.run(&input, tokio::io::stderr()).await;
    }

    merge_once(&config, &formatter, &mut session, &mut sink).await
}

/// Merge the inputs given on the command line.
async fn merge_once(
    config: &Config,
    formatter: &OutputFormatter,
    session: &mut Session<LopdfEngine, ConsoleStatus>,
    sink: &mut DirectorySink,
) -> Result<(), PdfJoinError> {
    display_list(formatter, session.view(), session.messages());

    let outcome = session.merge(sink).await?;

    if config.json {
        let report = serde_json::to_string_pretty(&outcome)
            .map_err(|e| PdfJoinError::other(format!("Failed to encode report: {e}")))?;
        println!("{report}");
    }

    match outcome.status {
        MergeStatus::Skipped => Err(PdfJoinError::NoFilesToMerge),
        MergeStatus::TotalFailure => Err(PdfJoinError::AllFilesFailed {
            failed: outcome.failed.iter().map(|f| f.name.clone()).collect(),
        }),
        _ => {
            if let Some(file_name) = &outcome.file_name {
                let location = config.out_dir.join(file_name);
                formatter.info(&session.messages().saved(&location.display().to_string()));
            }
            display_merge_summary(formatter, &outcome);
            Ok(())
        }
    }
}

/// Block until the user presses Enter.
fn wait_for_enter(input: &StdinLines) {
    eprint!("[Enter] ");
    io::stderr().flush().ok();

    if let Err(err) = input.next_line_blocking() {
        tracing::debug!(error = %err, "could not read acknowledgment");
    }
}

/// Ask on the terminal before replacing an existing file.
fn confirm_overwrite(input: &StdinLines, path: &Path) -> bool {
    eprint!("File '{}' already exists. Overwrite? [y/N] ", path.display());
    io::stderr().flush().ok();

    match input.next_line_blocking() {
        Ok(Some(answer)) => is_yes(&answer),
        Ok(None) => false,
        Err(err) => {
            tracing::debug!(error = %err, "could not read answer");
            false
        }
    }
}
