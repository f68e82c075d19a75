//! Configuration module for pdfjoin.
//!
//! This module holds the validated, normalized settings that drive a session:
//! - Output directory and name hint
//! - Display language for status messages and the default output name
//! - Overwrite and compression behaviour
//! - Named output-name presets

use anyhow::{Context, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{PdfJoinError, Result};

/// Language used for user-facing messages and the default output name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// Japanese, the tool's original language.
    #[default]
    Ja,
    /// English.
    En,
}

impl Locale {
    /// Base name used when the user leaves the output name empty.
    pub fn default_output_name(&self) -> &'static str {
        match self {
            Self::Ja => "結合済み",
            Self::En => "merged",
        }
    }
}

impl FromStr for Locale {
    type Err = PdfJoinError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ja" | "jp" | "japanese" => Ok(Self::Ja),
            "en" | "english" => Ok(Self::En),
            _ => Err(PdfJoinError::invalid_config(format!(
                "Invalid language: {s}. Must be one of: ja, en"
            ))),
        }
    }
}

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// Write streams as they were merged.
    None,
    /// Flate-compress uncompressed streams before writing.
    #[default]
    Standard,
}

impl FromStr for CompressionLevel {
    type Err = PdfJoinError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            _ => Err(PdfJoinError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard"
            ))),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Named output-name presets.
///
/// Selecting a preset copies its value into the output name hint. Keys are
/// kept sorted so listings are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Presets {
    entries: BTreeMap<String, String>,
}

impl Presets {
    /// Built-in presets for a locale.
    pub fn builtin(locale: Locale) -> Self {
        let pairs: &[(&str, &str)] = match locale {
            Locale::Ja => &[
                ("estimate", "見積書"),
                ("invoice", "請求書"),
                ("minutes", "議事録"),
                ("report", "報告書"),
            ],
            Locale::En => &[
                ("estimate", "estimate"),
                ("invoice", "invoice"),
                ("minutes", "minutes"),
                ("report", "report"),
            ],
        };

        Self {
            entries: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Load presets from a JSON file containing an object of `key: name` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// contains an empty key.
    pub fn load(path: &Path) -> Result<Self> {
        let presets = Self::load_inner(path)?;
        Ok(presets)
    }

    fn load_inner(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read presets file: {}", path.display()))?;
        let presets: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid presets file: {}", path.display()))?;

        if presets.entries.keys().any(|k| k.trim().is_empty()) {
            bail!("Preset keys must not be empty: {}", path.display());
        }

        Ok(presets)
    }

    /// Merge another set of presets over this one.
    pub fn extend(&mut self, other: Presets) {
        self.entries.extend(other.entries);
    }

    /// Look up a preset value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no presets.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Complete configuration for a pdfjoin session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input paths or glob patterns, in merge order.
    pub inputs: Vec<String>,

    /// Directory the merged PDF is delivered into.
    pub out_dir: PathBuf,

    /// Output name hint as typed by the user (may be empty).
    pub name: String,

    /// Message language.
    pub locale: Locale,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Output-name presets.
    pub presets: Presets,

    /// Run the interactive shell instead of a one-shot merge.
    pub interactive: bool,

    /// Wait for Enter after failure alerts.
    pub acknowledge_alerts: bool,

    /// Print the merge report as JSON.
    pub json: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            out_dir: PathBuf::from("."),
            name: String::new(),
            locale: Locale::default(),
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            presets: Presets::builtin(Locale::default()),
            interactive: false,
            acknowledge_alerts: false,
            json: false,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No inputs are given outside interactive mode
    /// - Verbose and quiet modes are both enabled
    /// - The output directory exists but is not a directory
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && !self.interactive {
            return Err(PdfJoinError::NoFilesToMerge);
        }

        if self.verbose && self.quiet {
            return Err(PdfJoinError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if self.out_dir.exists() && !self.out_dir.is_dir() {
            return Err(PdfJoinError::invalid_config(format!(
                "Output directory is not a directory: {}",
                self.out_dir.display()
            )));
        }

        Ok(())
    }
}
