//! Tag extraction.
//!
//! Headers get their symbols from an external tag extractor. The analysis
//! only depends on the [`TagExtractor`] trait: hand it a path, get back the
//! raw tag lines and the exit status of whatever produced them.
//!
//! # Extractors
//!
//! - [`CtagsExtractor`] - runs `ctags` once per header
//! - [`TagsFileExtractor`] - serves lines from a pre-generated tags file
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use headerprobe::extract::{CtagsExtractor, TagExtractor};
//! use headerprobe::parser::parse_lines;
//!
//! let output = CtagsExtractor::new("ctags").extract_symbols(Path::new("list.h"))?;
//! let batch = parse_lines(output.lines.iter().map(String::as_str));
//! ```

pub mod ctags;
pub mod tags_file;

use std::io;
use std::path::Path;

pub use ctags::CtagsExtractor;
pub use tags_file::TagsFileExtractor;

/// Errors that can occur while obtaining tag lines.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The extractor process could not be started.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// A tags file could not be read.
    #[error("Failed to read tags file {path}: {source}")]
    TagsFile {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Raw output of one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOutput {
    /// Tag lines as produced, metadata lines included.
    pub lines: Vec<String>,
    /// Exit code of the extractor, `None` if it was killed by a signal.
    pub exit_code: Option<i32>,
}

impl TagOutput {
    /// Creates output for a successful extraction.
    pub fn success(lines: Vec<String>) -> Self {
        Self {
            lines,
            exit_code: Some(0),
        }
    }

    /// Returns true if the extractor exited with status zero.
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Something that can list the symbols declared in a file.
pub trait TagExtractor {
    /// Extract tag lines for `path`.
    ///
    /// A nonzero exit status is not an error: whatever output was captured
    /// is returned alongside it.
    fn extract_symbols(&self, path: &Path) -> ExtractResult<TagOutput>;
}

impl<T: TagExtractor + ?Sized> TagExtractor for &T {
    fn extract_symbols(&self, path: &Path) -> ExtractResult<TagOutput> {
        (**self).extract_symbols(path)
    }
}

impl<T: TagExtractor + ?Sized> TagExtractor for Box<T> {
    fn extract_symbols(&self, path: &Path) -> ExtractResult<TagOutput> {
        (**self).extract_symbols(path)
    }
}
