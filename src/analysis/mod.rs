//! Include utility analysis.
//!
//! Answers, for a source file, how much of each header it pulls in (directly
//! or through other headers) it actually uses, and for a header, how much of
//! it each source that pulls it in uses.
//!
//! # Example
//!
//! ```ignore
//! use headerprobe::analysis::Analyzer;
//!
//! let analyzer = Analyzer::new(&universe);
//! let report = analyzer.analyze("src/main.c")?;
//!
//! for row in &report.rows {
//!     println!("{}: {:?}", row.counterpart, row.percentage());
//! }
//! ```

pub mod utility;

pub use utility::{
    score, AnalysisError, AnalysisResult, Analyzer, Counterpart, Relationship, UtilityReport,
    UtilityRow,
};
