//! Parser module for headerprobe.
//!
//! This module turns raw inputs into the data the analysis works on:
//!
//! - **Tag lines** from ctags (or a compatible tool) become [`SymbolRecord`]s
//! - **C text** is stripped of comments and scanned for `#include` names and
//!   identifiers
//!
//! # Example
//!
//! ```
//! use headerprobe::parser::{extract_identifiers, parse_includes, parse_str, strip_comments};
//!
//! let text = strip_comments("#include \"list.h\" // lists\nint n = LIST_MAX;\n");
//! assert_eq!(parse_includes(&text), vec!["list.h"]);
//! assert!(extract_identifiers(&text).contains("LIST_MAX"));
//!
//! let batch = parse_str("LIST_MAX\tlist.h\t3;\"\td\n");
//! assert_eq!(batch.identifier_names().collect::<Vec<_>>(), vec!["LIST_MAX"]);
//! ```

pub mod ctags;
pub mod source;
pub mod types;

pub use ctags::{parse_line, parse_lines, parse_str, TagBatch, TagParseError, TagParseResult};
pub use source::{extract_identifiers, parse_includes, strip_comments};
pub use types::{SymbolRecord, TagKind};
