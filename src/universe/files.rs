//! Source and header file records.
//!
//! Each file is read and scanned exactly once when the universe is loaded.
//! After that the records are only read.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;

use super::{UniverseError, UniverseResult};
use crate::extract::TagExtractor;
use crate::parser::{self, SymbolRecord};

/// Extensions treated as headers.
pub const HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "hxx"];

/// Extensions treated as sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx"];

/// Whether a file is a source or a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Source,
    Header,
}

impl FileKind {
    /// Classify a path by its extension.
    ///
    /// # Example
    ///
    /// ```
    /// use headerprobe::universe::FileKind;
    ///
    /// assert_eq!(FileKind::from_path("src/list.c"), Some(FileKind::Source));
    /// assert_eq!(FileKind::from_path("inc/list.hpp"), Some(FileKind::Header));
    /// assert_eq!(FileKind::from_path("README.md"), None);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        if HEADER_EXTENSIONS.contains(&ext) {
            Some(FileKind::Header)
        } else if SOURCE_EXTENSIONS.contains(&ext) {
            Some(FileKind::Source)
        } else {
            None
        }
    }

    /// Column title used for counterparts of this kind in reports.
    pub fn title(&self) -> &'static str {
        match self {
            FileKind::Source => "SOURCE",
            FileKind::Header => "HEADER",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Source => write!(f, "source"),
            FileKind::Header => write!(f, "header"),
        }
    }
}

/// A file that takes part in include relationships.
pub trait IncludeSite {
    /// Path as given on the command line; unique within a run.
    fn path(&self) -> &str;

    /// Literal include names, in source order, duplicates kept.
    fn includes(&self) -> &[String];

    /// Identifiers used (sources) or declared (headers) by this file.
    fn identifiers(&self) -> &HashSet<String>;

    /// Returns true if `name` appears literally among this file's includes.
    fn includes_name(&self, name: &str) -> bool {
        self.includes().iter().any(|i| i == name)
    }
}

/// Comment-stripped text and include list shared by both file kinds.
#[derive(Debug, Clone)]
struct ScannedText {
    text: String,
    includes: Vec<String>,
}

impl ScannedText {
    fn scan(raw: &str) -> Self {
        let text = parser::strip_comments(raw);
        let includes = parser::parse_includes(&text);
        Self { text, includes }
    }
}

fn read_text(path: &Path) -> UniverseResult<String> {
    let bytes = fs::read(path).map_err(|source| UniverseError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// A `.c`-like file. Its identifiers come straight from its text.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: String,
    scanned: ScannedText,
    identifiers: HashSet<String>,
}

impl SourceFile {
    /// Build a source record from file contents.
    pub fn from_text(path: impl Into<String>, raw: &str) -> Self {
        let scanned = ScannedText::scan(raw);
        let identifiers = parser::extract_identifiers(&scanned.text);
        Self {
            path: path.into(),
            scanned,
            identifiers,
        }
    }

    /// Read and scan a source file.
    pub fn read(path: &str) -> UniverseResult<Self> {
        Self::read_in(Path::new(""), path)
    }

    /// Read `path` relative to `base`. The record keeps `path` as its key.
    pub fn read_in(base: &Path, path: &str) -> UniverseResult<Self> {
        let raw = read_text(&base.join(path))?;
        Ok(Self::from_text(path, &raw))
    }

    /// Comment-stripped text.
    pub fn text(&self) -> &str {
        &self.scanned.text
    }
}

impl IncludeSite for SourceFile {
    fn path(&self) -> &str {
        &self.path
    }

    fn includes(&self) -> &[String] {
        &self.scanned.includes
    }

    fn identifiers(&self) -> &HashSet<String> {
        &self.identifiers
    }
}

/// A `.h`-like file. Its identifiers are the names of the defines,
/// enumerators, functions and typedefs the tag extractor found in it.
#[derive(Debug, Clone)]
pub struct HeaderFile {
    path: String,
    scanned: ScannedText,
    symbols: Vec<SymbolRecord>,
    identifiers: HashSet<String>,
}

impl HeaderFile {
    /// Build a header record from its contents and extracted symbols.
    pub fn from_parts(path: impl Into<String>, raw: &str, symbols: Vec<SymbolRecord>) -> Self {
        let identifiers = symbols
            .iter()
            .filter(|s| s.kind.is_identifier_kind())
            .map(|s| s.name.clone())
            .collect();

        Self {
            path: path.into(),
            scanned: ScannedText::scan(raw),
            symbols,
            identifiers,
        }
    }

    /// Read a header and extract its symbols.
    ///
    /// Extractor failures are logged and leave the header without symbols;
    /// only failing to read the header itself is an error.
    pub fn read<E: TagExtractor + ?Sized>(path: &str, extractor: &E) -> UniverseResult<Self> {
        Self::read_in(Path::new(""), path, extractor)
    }

    /// Read `path` relative to `base`. The record keeps `path` as its key.
    pub fn read_in<E: TagExtractor + ?Sized>(
        base: &Path,
        path: &str,
        extractor: &E,
    ) -> UniverseResult<Self> {
        let full = base.join(path);
        let raw = read_text(&full)?;

        let symbols = match extractor.extract_symbols(&full) {
            Ok(output) => parser::parse_lines(output.lines.iter().map(String::as_str)).records,
            Err(e) => {
                tracing::error!("{}", e);
                Vec::new()
            }
        };

        tracing::debug!("{}: {} symbols", path, symbols.len());
        Ok(Self::from_parts(path, &raw, symbols))
    }

    /// Comment-stripped text.
    pub fn text(&self) -> &str {
        &self.scanned.text
    }

    /// Every symbol the extractor reported, whatever its kind.
    pub fn symbols(&self) -> &[SymbolRecord] {
        &self.symbols
    }
}

impl IncludeSite for HeaderFile {
    fn path(&self) -> &str {
        &self.path
    }

    fn includes(&self) -> &[String] {
        &self.scanned.includes
    }

    fn identifiers(&self) -> &HashSet<String> {
        &self.identifiers
    }
}

/// A borrowed file from the universe, either kind.
#[derive(Debug, Clone, Copy)]
pub enum FileEntity<'u> {
    Source(&'u SourceFile),
    Header(&'u HeaderFile),
}

impl<'u> FileEntity<'u> {
    /// The kind of file this is.
    pub fn kind(&self) -> FileKind {
        match self {
            FileEntity::Source(_) => FileKind::Source,
            FileEntity::Header(_) => FileKind::Header,
        }
    }

    /// The file's path.
    pub fn path(&self) -> &'u str {
        match self {
            FileEntity::Source(s) => &s.path,
            FileEntity::Header(h) => &h.path,
        }
    }
}
