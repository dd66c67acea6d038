//! Fixed-width text report.
//!
//! ```text
//! ANALYSIS: a.c
//! HEADER:             TYPE:          UTILITY (%):   USED TAGS:
//! c.h                                50.0           C_ONLY
//! b.h                 direct         50.0           FOO
//! ```

use super::{ExportData, Exporter};
use crate::analysis::{UtilityReport, UtilityRow};
use std::io::{self, Write};

/// Width of the path, type and utility columns together.
pub const TAG_COLUMN: usize = 50;

/// Narrowest tag column before the margin is taken off.
const MIN_TAG_WIDTH: usize = 40;

/// Right margin kept clear of the tag list.
const TAG_MARGIN: usize = 5;

/// Text exporter implementation.
pub struct TextExporter {
    columns: usize,
}

impl TextExporter {
    /// Create an exporter for a terminal `columns` wide.
    pub fn new(columns: usize) -> Self {
        Self { columns }
    }

    /// Width the tag list is wrapped to.
    pub fn tag_width(&self) -> usize {
        MIN_TAG_WIDTH.max(self.columns.saturating_sub(TAG_COLUMN)) - TAG_MARGIN
    }

    /// Space-joined tags, wrapped, with continuation lines aligned under
    /// the tag column.
    fn wrap_tags(&self, row: &UtilityRow) -> String {
        let joined = row
            .shared_tags
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        let options = textwrap::Options::new(self.tag_width()).break_words(false);
        let indent = format!("\n{:<width$}", "", width = TAG_COLUMN);

        textwrap::wrap(&joined, options).join(indent.as_str())
    }

    fn write_report<W: Write>(&self, report: &UtilityReport, writer: &mut W) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "ANALYSIS: {}", report.subject)?;
        writeln!(
            writer,
            "{:<20}{:<15}{:<15}{}",
            format!("{}:", report.counterpart_kind().title()),
            "TYPE:",
            "UTILITY (%):",
            "USED TAGS:"
        )?;

        for row in &report.rows {
            let tags = self.wrap_tags(row);
            match row.percentage() {
                Some(pct) => writeln!(
                    writer,
                    "{:<20}{:<15}{:<15.1}{}",
                    row.counterpart,
                    row.relationship.label(),
                    pct,
                    tags
                )?,
                None => writeln!(
                    writer,
                    "{:<20}{:<15}{:<15}{}",
                    row.counterpart,
                    row.relationship.label(),
                    "-",
                    tags
                )?,
            }
        }

        Ok(())
    }
}

impl Default for TextExporter {
    fn default() -> Self {
        Self::new(80)
    }
}

impl Exporter for TextExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        for report in &data.reports {
            self.write_report(report, writer)?;
        }

        if let Some(cycles) = &data.cycles {
            writeln!(writer)?;
            if cycles.is_empty() {
                writeln!(writer, "INCLUDE CYCLES: none")?;
            } else {
                writeln!(writer, "INCLUDE CYCLES:")?;
                for cycle in cycles {
                    writeln!(writer, "  {}", cycle.cycle_path())?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Relationship;
    use crate::export::fixtures;

    fn render(data: &ExportData, columns: usize) -> String {
        let mut output = Vec::new();
        TextExporter::new(columns).export(data, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_text_report_layout() {
        let data = ExportData::new(vec![fixtures::source_report()]);
        let text = render(&data, 80);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "ANALYSIS: a.c");
        assert_eq!(
            lines[2],
            "HEADER:             TYPE:          UTILITY (%):   USED TAGS:"
        );
        assert_eq!(
            lines[3],
            "c.h                                50.0           C_ONLY"
        );
        assert_eq!(
            lines[4],
            "b.h                 direct         50.0           FOO"
        );
        assert_eq!(lines[5].trim_end(), "d.h                 direct         -");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_header_report_lists_sources() {
        let data = ExportData::new(vec![fixtures::header_report()]);
        let text = render(&data, 80);
        assert!(text.contains("ANALYSIS: b.h"));
        assert!(text.contains("SOURCE:             TYPE:"));
        assert!(text.contains("a.c                 direct         100.0          FOO"));
    }

    #[test]
    fn test_tag_width() {
        assert_eq!(TextExporter::new(80).tag_width(), 35);
        assert_eq!(TextExporter::new(0).tag_width(), 35);
        assert_eq!(TextExporter::new(150).tag_width(), 95);
    }

    #[test]
    fn test_long_tag_lists_wrap_under_tag_column() {
        let names: Vec<String> = (0..10).map(|i| format!("TAG_{:02}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        let mut report = fixtures::header_report();
        report.rows[0].shared_tags = fixtures::tags(&refs);
        report.rows[0].relationship = Relationship::Indirect;

        let text = render(&ExportData::new(vec![report]), 80);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[3].ends_with("TAG_00 TAG_01 TAG_02 TAG_03 TAG_04"));
        assert_eq!(lines[4], format!("{}TAG_05 TAG_06 TAG_07 TAG_08 TAG_09", " ".repeat(50)));
    }

    #[test]
    fn test_cycles_section() {
        let data = ExportData::new(Vec::new()).with_cycles(vec![fixtures::cycle()]);
        let text = render(&data, 80);
        assert!(text.contains("INCLUDE CYCLES:\n  x.h -> y.h -> x.h"));

        let data = ExportData::new(Vec::new()).with_cycles(Vec::new());
        assert!(render(&data, 80).contains("INCLUDE CYCLES: none"));

        assert_eq!(render(&ExportData::default(), 80), "");
    }
}
