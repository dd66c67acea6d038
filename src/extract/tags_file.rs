//! Tag extraction from a pre-generated tags file.
//!
//! Useful when ctags has already been run over the tree
//! (`ctags -R --excmd=number`) or when ctags is not installed where the
//! analysis runs.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, MAIN_SEPARATOR};

use super::{ExtractError, ExtractResult, TagExtractor, TagOutput};
use crate::parser::ctags::METADATA_PREFIX;

/// Serves tag lines from one tags file, grouped by the file they declare.
#[derive(Debug, Clone, Default)]
pub struct TagsFileExtractor {
    by_file: HashMap<String, Vec<String>>,
}

impl TagsFileExtractor {
    /// Read and index a tags file.
    pub fn open(path: &Path) -> ExtractResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ExtractError::TagsFile {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_str(&content))
    }

    /// Index tag lines held in a string.
    ///
    /// Metadata and lines without a file field are dropped here; parse
    /// errors for short lines are left to the tag parser.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Self {
        let mut by_file: HashMap<String, Vec<String>> = HashMap::new();

        for line in content.lines() {
            if line.is_empty() || line.starts_with(METADATA_PREFIX) {
                continue;
            }
            let Some(file) = line.split('\t').nth(1) else {
                continue;
            };
            by_file
                .entry(normalize_key(file).to_string())
                .or_default()
                .push(line.to_string());
        }

        Self { by_file }
    }

    /// Number of distinct files with tags.
    pub fn file_count(&self) -> usize {
        self.by_file.len()
    }

    fn lookup(&self, path: &Path) -> Option<&Vec<String>> {
        let key = path.to_string_lossy();
        let key = normalize_key(&key);

        if let Some(lines) = self.by_file.get(key) {
            return Some(lines);
        }

        // An absolute or deeper tags path ending in the requested one.
        let suffix = format!("{}{}", MAIN_SEPARATOR, key);
        let deeper = self
            .by_file
            .iter()
            .filter(|(file, _)| file.ends_with(&suffix))
            .min_by_key(|(file, _)| file.len())
            .map(|(_, lines)| lines);
        if deeper.is_some() {
            return deeper;
        }

        // A tags file written relative to a directory the request lies in.
        self.by_file
            .iter()
            .filter(|(file, _)| key.ends_with(&format!("{}{}", MAIN_SEPARATOR, file)))
            .max_by_key(|(file, _)| file.len())
            .map(|(_, lines)| lines)
    }
}

fn normalize_key(file: &str) -> &str {
    let dot_prefix = format!(".{}", MAIN_SEPARATOR);
    file.strip_prefix(dot_prefix.as_str()).unwrap_or(file)
}

impl TagExtractor for TagsFileExtractor {
    fn extract_symbols(&self, path: &Path) -> ExtractResult<TagOutput> {
        let lines = self.lookup(path).cloned().unwrap_or_default();
        tracing::debug!("{} tag lines for {}", lines.len(), path.display());
        Ok(TagOutput::success(lines))
    }
}
