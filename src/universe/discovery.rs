//! Finding the files that make up the universe.
//!
//! Files come either from an explicit list or from a recursive walk, are
//! split into headers and sources by extension, and are filtered through
//! exclusion globs.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use glob::Pattern;
use walkdir::WalkDir;

use super::files::FileKind;
use super::{UniverseError, UniverseResult};

/// Directories a recursive walk never enters, besides hidden ones.
const BUILD_DIRS: &[&str] = &["build", "target", "out", "CMakeFiles"];

/// How files are discovered.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Walk `root` recursively in addition to the explicit list.
    pub recursive: bool,
    /// Directory every path is relative to, and where a recursive walk
    /// starts. Defaults to the current directory.
    pub root: Option<PathBuf>,
    /// Glob patterns for files to leave out.
    pub exclude: Vec<String>,
}

/// The headers and sources of a run, plus the files to report on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    /// Sorted header paths.
    pub headers: Vec<String>,
    /// Sorted source paths.
    pub sources: Vec<String>,
    /// Sorted paths to analyze; each is also in `headers` or `sources`.
    pub analysis: Vec<String>,
    /// Directory the paths above are relative to; empty for the current
    /// directory.
    pub base: PathBuf,
}

impl FileSelection {
    /// Build the selection from the `-f` and `-a` lists.
    ///
    /// The universe is the union of both lists (plus the walked tree when
    /// recursive). All paths are made relative to the root so that they
    /// line up with the names used in `#include` directives. Analysis paths
    /// that end up outside the universe, because they were excluded or are
    /// not C files, are dropped with a warning.
    pub fn discover(
        files: &[String],
        analysis: &[String],
        options: &DiscoveryOptions,
    ) -> UniverseResult<Self> {
        let base = options.root.clone().unwrap_or_default();

        let mut candidates: Vec<String> = files
            .iter()
            .chain(analysis)
            .map(|f| relative_to(&base, f))
            .collect();

        if options.recursive {
            let root = if base.as_os_str().is_empty() {
                Path::new(".")
            } else {
                base.as_path()
            };
            candidates.extend(walk(root));
        }

        let headers = filter_files(FileKind::Header, &candidates, &options.exclude)?;
        let sources = filter_files(FileKind::Source, &candidates, &options.exclude)?;

        let analysis: BTreeSet<String> = analysis.iter().map(|f| relative_to(&base, f)).collect();

        let analysis = analysis
            .into_iter()
            .filter(|path| {
                let known = headers.binary_search(path).is_ok()
                    || sources.binary_search(path).is_ok();
                if !known {
                    tracing::warn!("{} is not a header or source in the file set; skipped", path);
                }
                known
            })
            .collect();

        Ok(Self {
            headers,
            sources,
            analysis,
            base,
        })
    }
}

/// Keep the paths of one kind from a list, minus exclusions, sorted and
/// deduplicated.
///
/// # Example
///
/// ```
/// use headerprobe::universe::{filter_files, FileKind};
///
/// let files = vec!["b.h".to_string(), "a.c".to_string(), "a.h".to_string(), "b.h".to_string()];
/// let headers = filter_files(FileKind::Header, &files, &[]).unwrap();
/// assert_eq!(headers, vec!["a.h", "b.h"]);
/// ```
pub fn filter_files(
    kind: FileKind,
    files: &[String],
    exclude: &[String],
) -> UniverseResult<Vec<String>> {
    let exclude = compile_patterns(exclude)?;

    let selected: BTreeSet<String> = files
        .iter()
        .map(|f| strip_dot_prefix(f))
        .filter(|f| FileKind::from_path(f) == Some(kind))
        .filter(|f| {
            let excluded = is_excluded(f, &exclude);
            if excluded {
                tracing::debug!("Excluded: {}", f);
            }
            !excluded
        })
        .map(str::to_string)
        .collect();

    Ok(selected.into_iter().collect())
}

fn compile_patterns(patterns: &[String]) -> UniverseResult<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(strip_dot_prefix(p)).map_err(|source| UniverseError::Pattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

fn is_excluded(path: &str, exclude: &[Pattern]) -> bool {
    exclude.iter().any(|p| p.matches(path))
}

fn strip_dot_prefix(mut path: &str) -> &str {
    let native = format!(".{}", MAIN_SEPARATOR);
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else if let Some(rest) = path.strip_prefix(native.as_str()) {
            path = rest;
        } else {
            return path;
        }
    }
}

/// `path` relative to `base` when it lies under it, otherwise as given.
fn relative_to(base: &Path, path: &str) -> String {
    let relative = if base.as_os_str().is_empty() {
        None
    } else {
        Path::new(path).strip_prefix(base).ok()
    };

    match relative {
        Some(rel) => strip_dot_prefix(&rel.to_string_lossy()).to_string(),
        None => strip_dot_prefix(path).to_string(),
    }
}

/// Every C file below `root`, relative to `root`, skipping hidden and build
/// directories.
fn walk(root: &Path) -> Vec<String> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| FileKind::from_path(e.path()).is_some())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap_or(e.path());
            strip_dot_prefix(&rel.to_string_lossy()).to_string()
        })
        .collect()
}

/// Check if a directory should be skipped during traversal.
fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || BUILD_DIRS.contains(&name.as_ref())
}
