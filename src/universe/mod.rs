//! The set of files known to a run.
//!
//! A [`FileUniverse`] owns one [`HeaderFile`] per header and one
//! [`SourceFile`] per source. Everything downstream borrows from it.
//!
//! # Example
//!
//! ```ignore
//! use headerprobe::extract::CtagsExtractor;
//! use headerprobe::universe::{DiscoveryOptions, FileSelection, FileUniverse};
//!
//! let selection = FileSelection::discover(&files, &analysis, &DiscoveryOptions::default())?;
//! let universe = FileUniverse::load(&selection, &CtagsExtractor::default())?;
//! println!("{} headers, {} sources", universe.headers().len(), universe.sources().len());
//! ```

pub mod discovery;
pub mod files;

use std::collections::HashMap;
use std::io;

use thiserror::Error;

use crate::extract::TagExtractor;

pub use discovery::{filter_files, DiscoveryOptions, FileSelection};
pub use files::{FileEntity, FileKind, HeaderFile, IncludeSite, SourceFile};

/// Errors that can occur while building the universe.
#[derive(Error, Debug)]
pub enum UniverseError {
    #[error("No header files specified.")]
    NoHeaders,

    #[error("No source files specified.")]
    NoSources,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Result type for universe operations.
pub type UniverseResult<T> = Result<T, UniverseError>;

/// All headers and sources of a run.
#[derive(Debug, Clone, Default)]
pub struct FileUniverse {
    headers: Vec<HeaderFile>,
    sources: Vec<SourceFile>,
    index: HashMap<String, FileSlot>,
}

#[derive(Debug, Clone, Copy)]
enum FileSlot {
    Header(usize),
    Source(usize),
}

impl FileUniverse {
    /// Build a universe from already scanned files.
    ///
    /// Fails if either list is empty: resolution and scoring need at least
    /// one file on each side.
    pub fn new(headers: Vec<HeaderFile>, sources: Vec<SourceFile>) -> UniverseResult<Self> {
        if headers.is_empty() {
            return Err(UniverseError::NoHeaders);
        }
        if sources.is_empty() {
            return Err(UniverseError::NoSources);
        }

        let mut index = HashMap::with_capacity(headers.len() + sources.len());
        for (i, h) in headers.iter().enumerate() {
            index.insert(h.path().to_string(), FileSlot::Header(i));
        }
        for (i, s) in sources.iter().enumerate() {
            index.insert(s.path().to_string(), FileSlot::Source(i));
        }

        Ok(Self {
            headers,
            sources,
            index,
        })
    }

    /// Read every selected file, running the extractor once per header.
    ///
    /// Paths are read relative to the selection's base directory.
    ///
    /// Files that cannot be read are logged and left out. The emptiness
    /// checks are made on the selection first, so nothing is read when
    /// either side is missing.
    pub fn load<E: TagExtractor + ?Sized>(
        selection: &FileSelection,
        extractor: &E,
    ) -> UniverseResult<Self> {
        if selection.headers.is_empty() {
            return Err(UniverseError::NoHeaders);
        }
        if selection.sources.is_empty() {
            return Err(UniverseError::NoSources);
        }

        let sources = selection
            .sources
            .iter()
            .filter_map(|path| match SourceFile::read_in(&selection.base, path) {
                Ok(file) => Some(file),
                Err(e) => {
                    tracing::error!("{}", e);
                    None
                }
            })
            .collect();

        let headers = selection
            .headers
            .iter()
            .filter_map(|path| match HeaderFile::read_in(&selection.base, path, extractor) {
                Ok(file) => Some(file),
                Err(e) => {
                    tracing::error!("{}", e);
                    None
                }
            })
            .collect();

        Self::new(headers, sources)
    }

    /// All headers, in selection order.
    pub fn headers(&self) -> &[HeaderFile] {
        &self.headers
    }

    /// All sources, in selection order.
    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }

    /// Look up a header by path.
    pub fn header(&self, path: &str) -> Option<&HeaderFile> {
        match self.index.get(path)? {
            FileSlot::Header(i) => self.headers.get(*i),
            FileSlot::Source(_) => None,
        }
    }

    /// Look up a source by path.
    pub fn source(&self, path: &str) -> Option<&SourceFile> {
        match self.index.get(path)? {
            FileSlot::Source(i) => self.sources.get(*i),
            FileSlot::Header(_) => None,
        }
    }

    /// Look up any file by path.
    pub fn get(&self, path: &str) -> Option<FileEntity<'_>> {
        match self.index.get(path)? {
            FileSlot::Header(i) => self.headers.get(*i).map(FileEntity::Header),
            FileSlot::Source(i) => self.sources.get(*i).map(FileEntity::Source),
        }
    }

    /// Returns true if a file with this path is known.
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }
}
