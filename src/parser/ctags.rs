//! Parser for ctags tag lines.
//!
//! This module decodes the tab separated tags format (see
//! <http://ctags.sourceforge.net/FORMAT>) into [`SymbolRecord`]s. Bad lines
//! are collected as failures; they never abort a batch.

use std::path::MAIN_SEPARATOR;

use super::types::{SymbolRecord, TagKind};

/// Prefix of tags file metadata lines (`!_TAG_FILE_FORMAT` etc.).
pub const METADATA_PREFIX: &str = "!_";

/// Errors that can occur while parsing a tag line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagParseError {
    /// The line has fewer than the four required fields.
    #[error("Unable to parse tag line ({fields} fields): {line}")]
    MissingFields { line: String, fields: usize },

    /// The line is a tags file metadata line.
    #[error("Tag metadata line: {0}")]
    Metadata(String),
}

/// Result type alias for tag parsing.
pub type TagParseResult<T> = Result<T, TagParseError>;

/// Parses one tag line into a symbol record.
///
/// Only the first four fields (`name`, `file`, `address`, `kind`) are read;
/// extension fields after them are ignored. An unknown kind letter still
/// produces a record, with [`TagKind::Unknown`], and logs a warning.
///
/// # Example
///
/// ```
/// use headerprobe::parser::{parse_line, TagKind};
///
/// let rec = parse_line("MAX_LEN\tlist.h\t12;\"\td").unwrap();
/// assert_eq!(rec.name, "MAX_LEN");
/// assert_eq!(rec.file, "list.h");
/// assert_eq!(rec.address, "12");
/// assert_eq!(rec.kind, TagKind::Define);
/// ```
pub fn parse_line(line: &str) -> TagParseResult<SymbolRecord> {
    if line.starts_with(METADATA_PREFIX) {
        return Err(TagParseError::Metadata(line.to_string()));
    }

    let fields: Vec<&str> = line.splitn(5, '\t').collect();
    let &[name, file, address, kind, ..] = fields.as_slice() else {
        return Err(TagParseError::MissingFields {
            line: line.to_string(),
            fields: fields.len(),
        });
    };

    let (path, file) = match file.rsplit_once(MAIN_SEPARATOR) {
        Some((path, file)) => (path, file),
        None => ("", file),
    };

    let address = address.trim_end_matches([';', '"']);

    let tag_kind = TagKind::from_field(kind);
    if tag_kind == TagKind::Unknown {
        tracing::warn!("Unknown kind: {} (tag {})", kind, name);
    }

    Ok(SymbolRecord::new(name, tag_kind, file, path, address))
}

/// The outcome of parsing a whole tag listing.
#[derive(Debug, Default)]
pub struct TagBatch {
    /// Records parsed from well-formed lines, in input order.
    pub records: Vec<SymbolRecord>,
    /// Lines that could not be parsed.
    pub failures: Vec<TagParseError>,
}

impl TagBatch {
    /// Names of records whose kind contributes to a header's identifier set.
    pub fn identifier_names(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(|r| r.kind.is_identifier_kind())
            .map(|r| r.name.as_str())
    }
}

/// Parses every line of a tag listing.
///
/// Empty lines and metadata lines are skipped silently. Malformed lines are
/// logged and recorded in [`TagBatch::failures`].
///
/// # Example
///
/// ```
/// use headerprobe::parser::parse_lines;
///
/// let batch = parse_lines(["!_TAG_FILE_SORTED\t1\t/0=unsorted/", "FOO\ta.h\t3;\"\td", "bad\tline"]);
/// assert_eq!(batch.records.len(), 1);
/// assert_eq!(batch.failures.len(), 1);
/// ```
pub fn parse_lines<'a, I>(lines: I) -> TagBatch
where
    I: IntoIterator<Item = &'a str>,
{
    let mut batch = TagBatch::default();

    for line in lines {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with(METADATA_PREFIX) {
            continue;
        }

        match parse_line(line) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                tracing::warn!("{}", e);
                batch.failures.push(e);
            }
        }
    }

    batch
}

/// Parses a complete tags listing held in a string.
pub fn parse_str(content: &str) -> TagBatch {
    parse_lines(content.lines())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TAGS: &str = "!_TAG_FILE_FORMAT\t2\t/extended format/\n\
!_TAG_FILE_SORTED\t1\t/0=unsorted, 1=sorted/\n\
LIST_MAX\tlist.h\t4;\"\td\n\
list_node_t\tlist.h\t9;\"\tt\ttyperef:struct:list_node\n\
list_push\tlist.h\t12;\"\tp\tsignature:(list_t *l, void *v)\n\
LIST_EMPTY\tlist.h\t15;\"\te\tenum:list_state\n\
next\tlist.h\t7;\"\tm\tstruct:list_node\n";

    #[test]
    fn test_parse_line_basic() {
        let rec = parse_line("list_push\tlist.h\t12;\"\tf").unwrap();
        assert_eq!(rec.name, "list_push");
        assert_eq!(rec.file, "list.h");
        assert_eq!(rec.path, "");
        assert_eq!(rec.address, "12");
        assert_eq!(rec.kind, TagKind::Function);
    }

    #[test]
    fn test_parse_line_splits_path() {
        let line = format!("FOO\tsrc{0}inc{0}foo.h\t3;\"\td", MAIN_SEPARATOR);
        let rec = parse_line(&line).unwrap();
        assert_eq!(rec.file, "foo.h");
        assert_eq!(rec.path, format!("src{}inc", MAIN_SEPARATOR));
    }

    #[test]
    fn test_parse_line_ignores_extension_fields() {
        let rec = parse_line("node_t\tlist.h\t9;\"\tt\ttyperef:struct:node\tfile:").unwrap();
        assert_eq!(rec.kind, TagKind::Typedef);
        assert_eq!(rec.name, "node_t");
    }

    #[test]
    fn test_parse_line_unknown_kind_is_kept() {
        let rec = parse_line("ns\tlist.h\t1;\"\tn").unwrap();
        assert_eq!(rec.kind, TagKind::Unknown);
        assert!(!rec.kind.is_identifier_kind());
    }

    #[test]
    fn test_parse_line_too_few_fields() {
        let err = parse_line("FOO\tlist.h").unwrap_err();
        assert!(matches!(err, TagParseError::MissingFields { fields: 2, .. }));
        assert!(err.to_string().contains("Unable to parse"));
    }

    #[test]
    fn test_parse_line_metadata() {
        let err = parse_line("!_TAG_PROGRAM_NAME\tExuberant Ctags\t//").unwrap_err();
        assert!(matches!(err, TagParseError::Metadata(_)));
    }

    #[test]
    fn test_parse_str_sample() {
        let batch = parse_str(SAMPLE_TAGS);
        assert_eq!(batch.records.len(), 5);
        assert!(batch.failures.is_empty());

        let mut names: Vec<_> = batch.identifier_names().collect();
        names.sort();
        assert_eq!(names, vec!["LIST_EMPTY", "LIST_MAX", "list_node_t"]);
    }

    #[test]
    fn test_malformed_line_resilience() {
        let batch = parse_lines(["FOO\ta.h\t3;\"\td", "BAR\ta.h"]);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].name, "FOO");
        assert_eq!(batch.failures.len(), 1);
    }

    #[test]
    fn test_parse_lines_skips_blank_and_crlf() {
        let batch = parse_str("FOO\ta.h\t3;\"\td\r\n\r\n\nBAR\ta.h\t4;\"\tf\r\n");
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].kind, TagKind::Define);
        assert_eq!(batch.records[1].kind, TagKind::Function);
    }
}
