//! Graph module for include relationship modeling.
//!
//! This module provides the [`IncludeGraph`] struct for resolving which
//! headers a file pulls in, which sources pull in a header, and where the
//! includes form cycles.
//!
//! # Example
//!
//! ```rust
//! use headerprobe::graph::IncludeGraph;
//! use headerprobe::universe::FileKind;
//!
//! let mut graph = IncludeGraph::new();
//! graph.add_file("main.c", FileKind::Source);
//! graph.add_file("list.h", FileKind::Header);
//! graph.add_include("main.c", "list.h");
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod include_graph;

pub use include_graph::{CycleInfo, GraphError, GraphResult, IncludeGraph, IncludeNode};
