//! headerprobe - include utility analysis for C code bases
//!
//! For each source file, this crate measures how much of every header it
//! pulls in (directly or transitively) it actually references, and for each
//! header, how much of it every including source uses. Header symbols come
//! from ctags; includes and identifiers are found with regular expressions.
//!
//! The pipeline is: [`universe`] discovers and reads files, [`extract`]
//! obtains header tags, [`parser`] turns text and tags into records,
//! [`graph`] resolves include closures, [`analysis`] scores them and
//! [`export`] renders the reports.

pub mod analysis;
pub mod config;
pub mod export;
pub mod extract;
pub mod graph;
pub mod parser;
pub mod universe;
