//! JSON export implementation.
//!
//! Exports utility reports in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use crate::analysis::UtilityReport;
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable cycle info for JSON output.
#[derive(Serialize)]
struct JsonCycle {
    files: Vec<String>,
    path: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    analyzed_files: usize,
    rows: usize,
    direct: usize,
    unused: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_cycles: Option<usize>,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    summary: JsonSummary,
    reports: &'a [UtilityReport],
    #[serde(skip_serializing_if = "Option::is_none")]
    include_cycles: Option<Vec<JsonCycle>>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let include_cycles = data.cycles.as_ref().map(|cycles| {
            cycles
                .iter()
                .map(|c| JsonCycle {
                    files: c.nodes.clone(),
                    path: c.cycle_path(),
                })
                .collect::<Vec<_>>()
        });

        let export = JsonExport {
            summary: JsonSummary {
                analyzed_files: data.reports.len(),
                rows: data.row_count(),
                direct: data.direct_count(),
                unused: data.unused_count(),
                include_cycles: data.cycles.as_ref().map(Vec::len),
            },
            reports: &data.reports,
            include_cycles,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    fn parse(data: &ExportData) -> serde_json::Value {
        let mut output = Vec::new();
        JsonExporter.export(data, &mut output).unwrap();
        let json_str = String::from_utf8(output).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    #[test]
    fn test_json_export_summary() {
        let data = ExportData::new(vec![fixtures::source_report(), fixtures::header_report()]);
        let parsed = parse(&data);

        assert_eq!(parsed["summary"]["analyzed_files"], 2);
        assert_eq!(parsed["summary"]["rows"], 4);
        assert_eq!(parsed["summary"]["direct"], 3);
        assert_eq!(parsed["summary"]["unused"], 1);
        assert!(parsed["summary"].get("include_cycles").is_none());
        assert!(parsed.get("include_cycles").is_none());
    }

    #[test]
    fn test_json_export_rows() {
        let data = ExportData::new(vec![fixtures::source_report()]);
        let parsed = parse(&data);

        let report = &parsed["reports"][0];
        assert_eq!(report["subject"], "a.c");
        assert_eq!(report["subject_kind"], "source");
        assert_eq!(report["used_tags"], serde_json::json!(["C_ONLY", "FOO"]));

        let rows = report["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["counterpart"], "c.h");
        assert_eq!(rows[0]["relationship"], "indirect");
        assert_eq!(rows[0]["ratio"], 0.5);
        assert_eq!(rows[1]["relationship"], "direct");
        assert_eq!(rows[2]["shared_tags"], serde_json::json!([]));
    }

    #[test]
    fn test_json_export_with_cycles() {
        let data = ExportData::new(Vec::new()).with_cycles(vec![fixtures::cycle()]);
        let parsed = parse(&data);

        assert_eq!(parsed["summary"]["include_cycles"], 1);
        assert_eq!(parsed["include_cycles"][0]["path"], "x.h -> y.h -> x.h");
        assert_eq!(parsed["include_cycles"][0]["files"][1], "y.h");
    }
}
