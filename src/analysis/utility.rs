//! Utility scoring of include relationships.
//!
//! For a subject file and the files on the other side of its include
//! relationships (the headers a source pulls in, or the sources that pull
//! in a header), measures how much of the tags both sides share each
//! counterpart accounts for.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::graph::{GraphError, IncludeGraph};
use crate::universe::{FileEntity, FileKind, FileUniverse, HeaderFile, IncludeSite, SourceFile};

/// Errors that can occur during utility analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{0} is not part of the file set")]
    NotInUniverse(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// How a counterpart is related to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    /// One file names the other in an `#include`.
    Direct,
    /// Reached only through intermediate headers.
    Indirect,
}

impl Relationship {
    /// Text shown in the report's TYPE column; indirect rows stay blank.
    pub fn label(&self) -> &'static str {
        match self {
            Relationship::Direct => "direct",
            Relationship::Indirect => "",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relationship::Direct => write!(f, "direct"),
            Relationship::Indirect => write!(f, "indirect"),
        }
    }
}

/// A counterpart file handed to [`score`].
#[derive(Debug, Clone, Copy)]
pub struct Counterpart<'a> {
    pub path: &'a str,
    pub identifiers: &'a HashSet<String>,
    pub relationship: Relationship,
}

impl<'a> Counterpart<'a> {
    /// Wrap any include site as a counterpart.
    pub fn new<S: IncludeSite + ?Sized>(site: &'a S, relationship: Relationship) -> Self {
        Self {
            path: site.path(),
            identifiers: site.identifiers(),
            relationship,
        }
    }
}

/// One row of a utility report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilityRow {
    /// Path of the counterpart file
    pub counterpart: String,
    /// Direct or indirect
    pub relationship: Relationship,
    /// Share of the used tags this counterpart accounts for, 0.0 to 1.0
    pub ratio: f64,
    /// The used tags this counterpart accounts for
    pub shared_tags: BTreeSet<String>,
}

impl UtilityRow {
    /// Ratio as a percentage, `None` when nothing is shared.
    pub fn percentage(&self) -> Option<f64> {
        if self.ratio == 0.0 {
            None
        } else {
            Some(self.ratio * 100.0)
        }
    }
}

/// Utility of every counterpart of one subject file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilityReport {
    /// The analyzed file
    pub subject: String,
    /// Kind of the analyzed file
    pub subject_kind: FileKind,
    /// Tags declared by some counterpart and referenced by the subject
    pub used_tags: BTreeSet<String>,
    /// Rows sorted by ratio, highest first
    pub rows: Vec<UtilityRow>,
}

impl UtilityReport {
    /// Kind of the files listed in the rows.
    pub fn counterpart_kind(&self) -> FileKind {
        match self.subject_kind {
            FileKind::Source => FileKind::Header,
            FileKind::Header => FileKind::Source,
        }
    }

    /// Looks up the row for a counterpart.
    pub fn row(&self, counterpart: &str) -> Option<&UtilityRow> {
        self.rows.iter().find(|r| r.counterpart == counterpart)
    }
}

/// Scores counterparts against a subject's identifiers.
///
/// The used tag set is the union of all counterpart identifiers that the
/// subject also has. Each counterpart's ratio is the share of the used set
/// it declares, and is 0 when the used set is empty. Rows come back sorted
/// by ratio, highest first; equal ratios keep the order of `counterparts`.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use headerprobe::analysis::{score, Counterpart, Relationship};
///
/// let subject: HashSet<String> = ["FOO", "main"].iter().map(|s| s.to_string()).collect();
/// let header: HashSet<String> = ["FOO", "BAR"].iter().map(|s| s.to_string()).collect();
///
/// let (used, rows) = score(
///     &subject,
///     [Counterpart { path: "b.h", identifiers: &header, relationship: Relationship::Direct }],
/// );
/// assert_eq!(used.len(), 1);
/// assert_eq!(rows[0].ratio, 1.0);
/// ```
pub fn score<'a, I>(subject: &HashSet<String>, counterparts: I) -> (BTreeSet<String>, Vec<UtilityRow>)
where
    I: IntoIterator<Item = Counterpart<'a>>,
{
    let counterparts: Vec<Counterpart<'a>> = counterparts.into_iter().collect();

    let used_tags: BTreeSet<String> = counterparts
        .iter()
        .flat_map(|c| c.identifiers.iter())
        .filter(|tag| subject.contains(*tag))
        .cloned()
        .collect();

    let mut rows: Vec<UtilityRow> = counterparts
        .iter()
        .map(|c| {
            let shared_tags: BTreeSet<String> = c
                .identifiers
                .iter()
                .filter(|tag| used_tags.contains(*tag))
                .cloned()
                .collect();

            let ratio = if used_tags.is_empty() {
                0.0
            } else {
                shared_tags.len() as f64 / used_tags.len() as f64
            };

            UtilityRow {
                counterpart: c.path.to_string(),
                relationship: c.relationship,
                ratio,
                shared_tags,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));
    (used_tags, rows)
}

/// Runs utility analysis over a universe.
pub struct Analyzer<'u> {
    universe: &'u FileUniverse,
    graph: IncludeGraph,
}

impl<'u> Analyzer<'u> {
    /// Create an analyzer, building the include graph of the universe.
    pub fn new(universe: &'u FileUniverse) -> Self {
        Self {
            universe,
            graph: IncludeGraph::from_universe(universe),
        }
    }

    /// The include graph built from the universe.
    pub fn graph(&self) -> &IncludeGraph {
        &self.graph
    }

    /// Analyze the file at `path`, whichever kind it is.
    pub fn analyze(&self, path: &str) -> AnalysisResult<UtilityReport> {
        match self.universe.get(path) {
            Some(FileEntity::Source(source)) => self.analyze_source(source),
            Some(FileEntity::Header(header)) => self.analyze_header(header),
            None => Err(AnalysisError::NotInUniverse(path.to_string())),
        }
    }

    fn header_paths(&self) -> Vec<&'u str> {
        self.universe.headers().iter().map(|h| h.path()).collect()
    }

    /// How much a source uses each header it pulls in.
    pub fn analyze_source(&self, source: &SourceFile) -> AnalysisResult<UtilityReport> {
        let headers = self.header_paths();
        let reached = self.graph.resolve(source.path(), &headers)?;

        let counterparts = reached.into_iter().filter_map(|path| {
            let header = self.universe.header(path)?;
            let relationship = if source.includes_name(path) {
                Relationship::Direct
            } else {
                Relationship::Indirect
            };
            Some(Counterpart::new(header, relationship))
        });

        let (used_tags, rows) = score(source.identifiers(), counterparts);
        tracing::debug!(
            "{}: {} headers, {} used tags",
            source.path(),
            rows.len(),
            used_tags.len()
        );

        Ok(UtilityReport {
            subject: source.path().to_string(),
            subject_kind: FileKind::Source,
            used_tags,
            rows,
        })
    }

    /// How much each source that pulls in a header uses it.
    pub fn analyze_header(&self, header: &HeaderFile) -> AnalysisResult<UtilityReport> {
        let headers = self.header_paths();
        let sources: Vec<&'u str> = self.universe.sources().iter().map(|s| s.path()).collect();
        let users = self
            .graph
            .including_sources(header.path(), &sources, &headers)?;

        let counterparts = users.into_iter().filter_map(|path| {
            let source = self.universe.source(path)?;
            let relationship = if source.includes_name(header.path()) {
                Relationship::Direct
            } else {
                Relationship::Indirect
            };
            Some(Counterpart::new(source, relationship))
        });

        let (used_tags, rows) = score(header.identifiers(), counterparts);
        tracing::debug!(
            "{}: {} sources, {} used tags",
            header.path(),
            rows.len(),
            used_tags.len()
        );

        Ok(UtilityReport {
            subject: header.path().to_string(),
            subject_kind: FileKind::Header,
            used_tags,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{SymbolRecord, TagKind};

    fn ids(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn tags(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn header(path: &str, raw: &str, defines: &[&str]) -> HeaderFile {
        let symbols = defines
            .iter()
            .map(|name| SymbolRecord::new(*name, TagKind::Define, path, "", "1"))
            .collect();
        HeaderFile::from_parts(path, raw, symbols)
    }

    #[test]
    fn test_relationship_labels() {
        assert_eq!(Relationship::Direct.label(), "direct");
        assert_eq!(Relationship::Indirect.label(), "");
        assert_eq!(Relationship::Indirect.to_string(), "indirect");
    }

    #[test]
    fn test_score_ratios() {
        let subject = ids(&["A", "B", "C", "D", "main"]);
        let h1 = ids(&["A", "B", "C", "X"]);
        let h2 = ids(&["C", "D"]);
        let h3 = ids(&["Y"]);

        let (used, rows) = score(
            &subject,
            [
                Counterpart { path: "h3.h", identifiers: &h3, relationship: Relationship::Direct },
                Counterpart { path: "h2.h", identifiers: &h2, relationship: Relationship::Indirect },
                Counterpart { path: "h1.h", identifiers: &h1, relationship: Relationship::Direct },
            ],
        );

        assert_eq!(used, tags(&["A", "B", "C", "D"]));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].counterpart, "h1.h");
        assert_eq!(rows[0].ratio, 0.75);
        assert_eq!(rows[0].shared_tags, tags(&["A", "B", "C"]));
        assert_eq!(rows[1].counterpart, "h2.h");
        assert_eq!(rows[1].ratio, 0.5);
        assert_eq!(rows[2].counterpart, "h3.h");
        assert_eq!(rows[2].ratio, 0.0);
        assert_eq!(rows[2].percentage(), None);
        assert!(rows.iter().all(|r| (0.0..=1.0).contains(&r.ratio)));
    }

    #[test]
    fn test_score_empty_used_set() {
        let subject = ids(&["main"]);
        let h = ids(&["FOO"]);
        let (used, rows) = score(
            &subject,
            [Counterpart { path: "b.h", identifiers: &h, relationship: Relationship::Direct }],
        );
        assert!(used.is_empty());
        assert_eq!(rows[0].ratio, 0.0);
        assert!(rows[0].shared_tags.is_empty());
    }

    #[test]
    fn test_score_ties_keep_input_order() {
        let subject = ids(&["A", "B"]);
        let h1 = ids(&["A"]);
        let h2 = ids(&["B"]);
        let (_, rows) = score(
            &subject,
            [
                Counterpart { path: "z.h", identifiers: &h1, relationship: Relationship::Direct },
                Counterpart { path: "a.h", identifiers: &h2, relationship: Relationship::Direct },
            ],
        );
        assert_eq!(rows[0].counterpart, "z.h");
        assert_eq!(rows[1].counterpart, "a.h");
    }

    #[test]
    fn test_single_direct_header() {
        let universe = FileUniverse::new(
            vec![header("b.h", "", &["FOO", "BAR"])],
            vec![SourceFile::from_text(
                "a.c",
                "#include \"b.h\"\nint main(void) { return FOO; }\n",
            )],
        )
        .unwrap();

        let report = Analyzer::new(&universe).analyze("a.c").unwrap();
        assert_eq!(report.subject_kind, FileKind::Source);
        assert_eq!(report.counterpart_kind(), FileKind::Header);
        assert_eq!(report.used_tags, tags(&["FOO"]));
        assert_eq!(report.rows.len(), 1);

        let row = &report.rows[0];
        assert_eq!(row.counterpart, "b.h");
        assert_eq!(row.relationship, Relationship::Direct);
        assert_eq!(row.shared_tags, tags(&["FOO"]));
        assert_eq!(row.ratio, 1.0);
    }

    #[test]
    fn test_transitive_header() {
        let universe = FileUniverse::new(
            vec![
                header("b.h", "#include \"c.h\"\n", &["B_ONLY"]),
                header("c.h", "", &["C_ONLY"]),
            ],
            vec![SourceFile::from_text(
                "a.c",
                "#include \"b.h\"\nint x = C_ONLY;\n",
            )],
        )
        .unwrap();

        let report = Analyzer::new(&universe).analyze("a.c").unwrap();
        assert_eq!(report.rows.len(), 2);

        let c = report.row("c.h").unwrap();
        assert_eq!(c.relationship, Relationship::Indirect);
        assert!(c.ratio > 0.0);

        let b = report.row("b.h").unwrap();
        assert_eq!(b.relationship, Relationship::Direct);
        assert_eq!(b.ratio, 0.0);
        assert_eq!(b.percentage(), None);

        assert_eq!(report.rows[0].counterpart, "c.h");
    }

    #[test]
    fn test_unreached_headers_are_not_rows() {
        let universe = FileUniverse::new(
            vec![header("b.h", "", &["FOO"]), header("z.h", "", &["FOO"])],
            vec![SourceFile::from_text("a.c", "#include \"b.h\"\nint x = FOO;\n")],
        )
        .unwrap();

        let report = Analyzer::new(&universe).analyze("a.c").unwrap();
        assert!(report.row("z.h").is_none());
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn test_header_against_sources() {
        let universe = FileUniverse::new(
            vec![
                header("b.h", "#include \"c.h\"\n", &["B1"]),
                header("c.h", "", &["C1", "C2", "C3", "C4"]),
            ],
            vec![
                SourceFile::from_text("a.c", "#include \"b.h\"\nint x = C1 + C2 + C3;\n"),
                SourceFile::from_text("d.c", "#include \"c.h\"\nint y = C4;\n"),
                SourceFile::from_text("e.c", "int z = C1;\n"),
            ],
        )
        .unwrap();

        let report = Analyzer::new(&universe).analyze("c.h").unwrap();
        assert_eq!(report.subject_kind, FileKind::Header);
        assert_eq!(report.used_tags, tags(&["C1", "C2", "C3", "C4"]));
        assert_eq!(report.rows.len(), 2);

        assert_eq!(report.rows[0].counterpart, "a.c");
        assert_eq!(report.rows[0].relationship, Relationship::Indirect);
        assert_eq!(report.rows[0].ratio, 0.75);

        assert_eq!(report.rows[1].counterpart, "d.c");
        assert_eq!(report.rows[1].relationship, Relationship::Direct);
        assert_eq!(report.rows[1].ratio, 0.25);
    }

    #[test]
    fn test_walked_root_resolves_includes() {
        use crate::extract::TagsFileExtractor;
        use crate::universe::{DiscoveryOptions, FileSelection};
        use std::fs;

        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.c"),
            "#include \"b.h\"\nint main(void) { return FOO; }\n",
        )
        .unwrap();
        fs::write(dir.path().join("b.h"), "#define FOO 1\n").unwrap();

        let options = DiscoveryOptions {
            recursive: true,
            root: Some(dir.path().to_path_buf()),
            exclude: Vec::new(),
        };
        let selection =
            FileSelection::discover(&[], &["a.c".to_string()], &options).unwrap();
        assert_eq!(selection.headers, vec!["b.h"]);

        let tags = TagsFileExtractor::from_str("FOO\tb.h\t1;\"\td\n");
        let universe = FileUniverse::load(&selection, &tags).unwrap();
        let report = Analyzer::new(&universe).analyze("a.c").unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].counterpart, "b.h");
        assert_eq!(report.rows[0].relationship, Relationship::Direct);
        assert_eq!(report.rows[0].ratio, 1.0);
    }

    #[test]
    fn test_analyze_unknown_path() {
        let universe = FileUniverse::new(
            vec![header("b.h", "", &[])],
            vec![SourceFile::from_text("a.c", "")],
        )
        .unwrap();
        let err = Analyzer::new(&universe).analyze("q.c").unwrap_err();
        assert!(matches!(err, AnalysisError::NotInUniverse(_)));
    }
}
