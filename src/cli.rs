//! CLI argument parsing for pdfjoin.
//!
//! Defines the command-line interface with `clap` and turns it into a
//! validated [`Config`].

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use pdfjoin::config::{CompressionLevel, Config, Locale, OverwriteMode, Presets};
use pdfjoin::error::{PdfJoinError, Result};

/// Merge PDF files, in the order given, into a single document.
///
/// Files that cannot be read (encrypted, corrupted, ...) are skipped and
/// reported; the rest are still merged.
#[derive(Parser, Debug)]
#[command(name = "pdfjoin")]
#[command(version)]
#[command(about = "Merge PDF files into a single document", long_about = None)]
#[command(author)]
pub struct Cli {
    /// Input files or glob patterns, merged in the order given
    ///
    /// Non-PDF files are ignored with a warning.
    ///
    /// Examples:
    ///   pdfjoin a.pdf b.pdf -n report
    ///   pdfjoin 'scans/*.pdf' --preset invoice
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Directory the merged PDF is saved into
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Output file name
    ///
    /// Characters that are not allowed in file names are replaced with '_'
    /// and '.pdf' is appended when missing. Defaults to a localised name.
    #[arg(short = 'n', long, value_name = "NAME")]
    pub name: Option<String>,

    /// Use a named preset as the output file name
    #[arg(long, value_name = "KEY", conflicts_with = "name")]
    pub preset: Option<String>,

    /// JSON file with additional presets ({"key": "name", ...})
    #[arg(long, value_name = "FILE")]
    pub presets: Option<PathBuf>,

    /// Message language
    #[arg(long, value_name = "LANG", default_value = "ja", env = "PDFJOIN_LANG")]
    #[arg(value_parser = ["ja", "en"])]
    pub lang: String,

    /// Overwrite an existing output file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Compression level for the output PDF
    #[arg(long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard"])]
    pub compression: String,

    /// Start an interactive shell to build the list step by step
    #[arg(short, long)]
    pub interactive: bool,

    /// Wait for Enter after failure alerts
    #[arg(long)]
    pub ack: bool,

    /// Print the merge report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Show detailed progress and diagnostics
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The language or compression level is invalid
    /// - The presets file cannot be read or parsed
    /// - The preset key is unknown
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let locale = Locale::from_str(&self.lang)?;
        let compression = CompressionLevel::from_str(&self.compression)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let mut presets = Presets::builtin(locale);
        if let Some(path) = &self.presets {
            presets.extend(Presets::load(path)?);
        }

        let name = match (&self.preset, &self.name) {
            (Some(key), _) => presets
                .get(key)
                .map(str::to_string)
                .ok_or_else(|| PdfJoinError::invalid_config(format!("Unknown preset: {key}")))?,
            (None, Some(name)) => name.clone(),
            (None, None) => String::new(),
        };

        let config = Config {
            inputs: self.inputs.clone(),
            out_dir: self.out_dir.clone(),
            name,
            locale,
            overwrite_mode,
            compression,
            presets,
            interactive: self.interactive,
            acknowledge_alerts: self.ack,
            json: self.json,
            verbose: self.verbose,
            quiet: self.quiet,
        };

        config.validate()?;
        Ok(config)
    }
}
