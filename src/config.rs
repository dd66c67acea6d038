//! Runtime settings of a run.

use std::path::PathBuf;

use crate::export::ExportFormat;
use crate::extract::ctags::DEFAULT_CTAGS;
use crate::universe::DiscoveryOptions;

/// Terminal width assumed when it cannot be queried.
pub const FALLBACK_COLUMNS: usize = 80;

/// Every setting that shapes a run, gathered from the command line.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Debug logging, and the extractor's stderr forwarded to the log.
    pub verbose: bool,
    /// ctags binary to run per header.
    pub ctags: String,
    /// Pre-generated tags file used instead of running ctags.
    pub tags_file: Option<PathBuf>,
    /// Report format.
    pub format: ExportFormat,
    /// Fixed report width; the terminal width when unset.
    pub width: Option<usize>,
    /// List include cycles after the reports.
    pub cycles: bool,
    /// How the universe is discovered.
    pub discovery: DiscoveryOptions,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            ctags: DEFAULT_CTAGS.to_string(),
            tags_file: None,
            format: ExportFormat::default(),
            width: None,
            cycles: false,
            discovery: DiscoveryOptions::default(),
        }
    }
}

impl ProbeConfig {
    /// Columns the text report is laid out for.
    pub fn report_width(&self) -> usize {
        self.width.unwrap_or_else(terminal_columns)
    }

    /// Default log filter directive for the configured verbosity.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

/// Width of the attached terminal, or [`FALLBACK_COLUMNS`].
pub fn terminal_columns() -> usize {
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => cols as usize,
        _ => FALLBACK_COLUMNS,
    }
}
