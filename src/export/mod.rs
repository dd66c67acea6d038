//! Rendering of utility reports.
//!
//! This module provides exporters for writing analysis results as the
//! fixed-width text report, or as JSON, CSV and Markdown.

pub mod csv;
pub mod json;
pub mod markdown;
pub mod text;

use crate::analysis::{Relationship, UtilityReport};
use crate::graph::CycleInfo;
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Fixed-width text - the terminal report
    #[default]
    Text,
    /// JSON format - machine-readable, full data
    Json,
    /// CSV format - one row per counterpart
    Csv,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: text, json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Data container for export operations.
#[derive(Debug, Clone, Default)]
pub struct ExportData {
    /// One report per analyzed file, in analysis order
    pub reports: Vec<UtilityReport>,
    /// Include cycles, when they were asked for
    pub cycles: Option<Vec<CycleInfo>>,
}

impl ExportData {
    /// Create export data from analysis results.
    pub fn new(reports: Vec<UtilityReport>) -> Self {
        Self {
            reports,
            cycles: None,
        }
    }

    /// Attach the include cycles of the universe.
    pub fn with_cycles(mut self, cycles: Vec<CycleInfo>) -> Self {
        self.cycles = Some(cycles);
        self
    }

    /// Total number of rows over all reports
    pub fn row_count(&self) -> usize {
        self.reports.iter().map(|r| r.rows.len()).sum()
    }

    /// Number of rows with a direct relationship
    pub fn direct_count(&self) -> usize {
        self.reports
            .iter()
            .flat_map(|r| &r.rows)
            .filter(|row| row.relationship == Relationship::Direct)
            .count()
    }

    /// Number of rows whose counterpart contributes nothing
    pub fn unused_count(&self) -> usize {
        self.reports
            .iter()
            .flat_map(|r| &r.rows)
            .filter(|row| row.ratio == 0.0)
            .count()
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
///
/// `columns` is the terminal width the text report wraps its tag lists to;
/// the other formats ignore it.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData,
    columns: usize,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Text => text::TextExporter::new(columns).export(data, writer),
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Csv => csv::CsvExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(
    format: ExportFormat,
    data: &ExportData,
    columns: usize,
) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, columns, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
