//! CSV export implementation.
//!
//! Exports one row per (analyzed file, counterpart) pair for spreadsheet use.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// CSV exporter implementation.
pub struct CsvExporter;

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or newlines.
    fn escape_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "subject,subject_kind,counterpart,relationship,utility_percent,shared_tags"
        )?;

        for report in &data.reports {
            for row in &report.rows {
                let utility = row
                    .percentage()
                    .map(|pct| format!("{:.1}", pct))
                    .unwrap_or_default();
                let tags = row
                    .shared_tags
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");

                writeln!(
                    writer,
                    "{},{},{},{},{},{}",
                    Self::escape_field(&report.subject),
                    report.subject_kind,
                    Self::escape_field(&row.counterpart),
                    row.relationship,
                    utility,
                    tags
                )?;
            }
        }

        Ok(())
    }
}
