//! Markdown export implementation.
//!
//! Exports utility reports in Markdown format for documentation and reporting.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "# Include Utility Report")?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Analyzed Files | {} |", data.reports.len())?;
        writeln!(writer, "| Rows | {} |", data.row_count())?;
        writeln!(writer, "| Direct | {} |", data.direct_count())?;
        writeln!(writer, "| Unused | {} |", data.unused_count())?;
        if let Some(cycles) = &data.cycles {
            writeln!(writer, "| Include Cycles | {} |", cycles.len())?;
        }
        writeln!(writer)?;

        for report in &data.reports {
            writeln!(writer, "## {}", report.subject)?;
            writeln!(writer)?;

            if report.rows.is_empty() {
                writeln!(
                    writer,
                    "No {} files in the set.",
                    report.counterpart_kind()
                )?;
                writeln!(writer)?;
                continue;
            }

            let title = report.counterpart_kind().title();
            writeln!(writer, "| {} | Type | Utility (%) | Used Tags |", title)?;
            writeln!(writer, "|{}|------|-------------|-----------|", "-".repeat(title.len() + 2))?;
            for row in &report.rows {
                let utility = row
                    .percentage()
                    .map(|pct| format!("{:.1}", pct))
                    .unwrap_or_else(|| "-".to_string());
                let tags = row
                    .shared_tags
                    .iter()
                    .map(|t| format!("`{}`", t))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(
                    writer,
                    "| {} | {} | {} | {} |",
                    row.counterpart,
                    row.relationship.label(),
                    utility,
                    tags
                )?;
            }
            writeln!(writer)?;
        }

        if let Some(cycles) = data.cycles.as_ref().filter(|c| !c.is_empty()) {
            writeln!(writer, "## Include Cycles")?;
            writeln!(writer)?;
            writeln!(writer, "The following include cycles were detected:")?;
            writeln!(writer)?;
            for (i, cycle) in cycles.iter().enumerate() {
                writeln!(writer, "{}. `{}`", i + 1, cycle.cycle_path())?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by headerprobe*")?;

        Ok(())
    }
}
