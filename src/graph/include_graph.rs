//! Include graph implementation using petgraph.
//!
//! Nodes are the files of a run, edges point from a file to each known
//! header it names in an `#include`. Edges are matched on the literal
//! include name, so a header is only reachable under the exact path it was
//! given to the run.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::universe::{FileKind, FileUniverse, IncludeSite};

/// Errors that can occur when querying the include graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The queried path is not a node of the graph.
    #[error("Unknown file: {0}")]
    UnknownFile(String),
}

/// Result type for graph queries.
pub type GraphResult<T> = Result<T, GraphError>;

/// A file in the include graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeNode {
    /// Path of the file, as given to the run
    pub path: String,
    /// Header or source
    pub kind: FileKind,
}

impl IncludeNode {
    /// Creates a new include node.
    pub fn new(path: impl Into<String>, kind: FileKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// A directed graph of `#include` relationships.
///
/// # Example
///
/// ```rust
/// use headerprobe::graph::IncludeGraph;
/// use headerprobe::universe::FileKind;
///
/// let mut graph = IncludeGraph::new();
/// graph.add_file("a.c", FileKind::Source);
/// graph.add_file("b.h", FileKind::Header);
/// graph.add_file("c.h", FileKind::Header);
/// graph.add_include("a.c", "b.h");
/// graph.add_include("b.h", "c.h");
///
/// let reached = graph.resolve("a.c", &["b.h", "c.h"]).unwrap();
/// assert_eq!(reached.into_iter().collect::<Vec<_>>(), vec!["b.h", "c.h"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IncludeGraph {
    /// The underlying directed graph
    graph: DiGraph<IncludeNode, ()>,
    /// Maps paths to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
}

impl IncludeGraph {
    /// Creates a new empty include graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph of every file in a universe.
    ///
    /// Include names that match no header of the universe are dropped:
    /// system headers and files outside the run are invisible.
    pub fn from_universe(universe: &FileUniverse) -> Self {
        let headers = universe.headers();
        let sources = universe.sources();

        let mut graph = Self {
            graph: DiGraph::with_capacity(headers.len() + sources.len(), headers.len()),
            node_indices: HashMap::with_capacity(headers.len() + sources.len()),
        };

        for h in headers {
            graph.add_file(h.path(), FileKind::Header);
        }
        for s in sources {
            graph.add_file(s.path(), FileKind::Source);
        }

        let sites = headers
            .iter()
            .map(|h| h as &dyn IncludeSite)
            .chain(sources.iter().map(|s| s as &dyn IncludeSite));
        for site in sites {
            for name in site.includes() {
                graph.add_include(site.path(), name);
            }
        }

        graph
    }

    /// Adds a file node, returning the existing index if already present.
    pub fn add_file(&mut self, path: &str, kind: FileKind) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(path) {
            return idx;
        }

        let idx = self.graph.add_node(IncludeNode::new(path, kind));
        self.node_indices.insert(path.to_string(), idx);
        idx
    }

    /// Records that `from` includes the header `to`.
    ///
    /// Returns `false` if either file is unknown or `to` is not a header.
    /// Repeated includes collapse into a single edge.
    pub fn add_include(&mut self, from: &str, to: &str) -> bool {
        let (Some(&from_idx), Some(&to_idx)) =
            (self.node_indices.get(from), self.node_indices.get(to))
        else {
            return false;
        };

        if self.graph[to_idx].kind != FileKind::Header {
            return false;
        }

        self.graph.update_edge(from_idx, to_idx, ());
        true
    }

    /// Gets a node by path.
    pub fn get_node(&self, path: &str) -> Option<&IncludeNode> {
        self.node_indices
            .get(path)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Headers a file includes directly, sorted by path.
    pub fn direct_includes(&self, path: &str) -> Vec<&str> {
        self.neighbor_paths(path, Direction::Outgoing)
    }

    /// Files that include `path` directly, sorted by path.
    pub fn direct_includers(&self, path: &str) -> Vec<&str> {
        self.neighbor_paths(path, Direction::Incoming)
    }

    fn neighbor_paths(&self, path: &str, dir: Direction) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(path) else {
            return Vec::new();
        };

        let mut paths: Vec<&str> = self
            .graph
            .neighbors_directed(idx, dir)
            .map(|n| self.graph[n].path.as_str())
            .collect();
        paths.sort_unstable();
        paths
    }

    fn index_of(&self, path: &str) -> GraphResult<NodeIndex> {
        self.node_indices
            .get(path)
            .copied()
            .ok_or_else(|| GraphError::UnknownFile(path.to_string()))
    }

    /// Every header of `universe` that `subject` reaches through includes.
    ///
    /// Works through an explicit frontier of files to expand and a pool of
    /// headers not yet claimed. Expanding a file claims every pooled header
    /// it names, removing them from the pool before any of them is
    /// expanded, so each header is claimed at most once and include cycles
    /// terminate. Headers outside `universe` are never entered, and the
    /// subject is never part of its own result.
    pub fn resolve(&self, subject: &str, universe: &[&str]) -> GraphResult<BTreeSet<&str>> {
        let start = self.index_of(subject)?;

        let mut remaining: HashSet<NodeIndex> = universe
            .iter()
            .filter_map(|path| self.node_indices.get(*path).copied())
            .filter(|&idx| idx != start)
            .collect();

        let mut frontier = VecDeque::from([start]);
        let mut reached = BTreeSet::new();

        while let Some(node) = frontier.pop_front() {
            for next in self.graph.neighbors(node) {
                if remaining.remove(&next) {
                    reached.insert(self.graph[next].path.as_str());
                    frontier.push_back(next);
                }
            }
        }

        Ok(reached)
    }

    /// Every header `subject` reaches, with all headers of the graph as the
    /// universe.
    pub fn header_closure(&self, subject: &str) -> GraphResult<BTreeSet<&str>> {
        let headers = self.paths_of_kind(FileKind::Header);
        self.resolve(subject, &headers)
    }

    /// Sources among `sources` whose closure over `headers` contains
    /// `header`.
    pub fn including_sources<'g>(
        &'g self,
        header: &str,
        sources: &[&'g str],
        headers: &[&str],
    ) -> GraphResult<BTreeSet<&'g str>> {
        self.index_of(header)?;

        let mut users = BTreeSet::new();
        for &source in sources {
            if self.resolve(source, headers)?.contains(header) {
                users.insert(source);
            }
        }
        Ok(users)
    }

    /// Sources of the graph that pull in `header`, directly or transitively.
    pub fn sources_using(&self, header: &str) -> GraphResult<BTreeSet<&str>> {
        let sources = self.paths_of_kind(FileKind::Source);
        let headers = self.paths_of_kind(FileKind::Header);
        self.including_sources(header, &sources, &headers)
    }

    /// Paths of all nodes of one kind, in insertion order.
    pub fn paths_of_kind(&self, kind: FileKind) -> Vec<&str> {
        self.graph
            .node_weights()
            .filter(|n| n.kind == kind)
            .map(|n| n.path.as_str())
            .collect()
    }

    /// Checks if the graph contains include cycles.
    pub fn has_cycles(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Detects include cycles.
    ///
    /// One cycle is reported per strongly connected component with more
    /// than one file, or per file including itself. Each cycle is a real
    /// include chain: it starts at the component's smallest path and
    /// follows the shortest run of include edges back to it. Cycles are
    /// sorted by their first file.
    ///
    /// # Example
    ///
    /// ```rust
    /// use headerprobe::graph::IncludeGraph;
    /// use headerprobe::universe::FileKind;
    ///
    /// let mut graph = IncludeGraph::new();
    /// graph.add_file("a.h", FileKind::Header);
    /// graph.add_file("b.h", FileKind::Header);
    /// graph.add_include("a.h", "b.h");
    /// graph.add_include("b.h", "a.h");
    ///
    /// let cycles = graph.detect_cycles();
    /// assert_eq!(cycles.len(), 1);
    /// assert_eq!(cycles[0].cycle_path(), "a.h -> b.h -> a.h");
    /// ```
    pub fn detect_cycles(&self) -> Vec<CycleInfo> {
        let mut cycles: Vec<CycleInfo> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .filter_map(|scc| {
                let start = *scc.iter().min_by_key(|&&idx| &self.graph[idx].path)?;
                let members: HashSet<NodeIndex> = scc.into_iter().collect();
                let nodes = self
                    .cycle_through(start, &members)
                    .into_iter()
                    .map(|idx| self.graph[idx].path.clone())
                    .collect();
                Some(CycleInfo { nodes })
            })
            .collect();

        cycles.sort_by(|a, b| a.nodes.cmp(&b.nodes));
        cycles
    }

    /// Shortest include chain from `start` back to itself that stays inside
    /// `members`. Neighbours are visited in path order.
    fn cycle_through(&self, start: NodeIndex, members: &HashSet<NodeIndex>) -> Vec<NodeIndex> {
        if self.graph.contains_edge(start, start) {
            return vec![start];
        }

        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            let mut next: Vec<NodeIndex> = self
                .graph
                .neighbors(node)
                .filter(|n| members.contains(n))
                .collect();
            next.sort_by(|a, b| self.graph[*a].path.cmp(&self.graph[*b].path));

            for n in next {
                if n == start {
                    let mut chain = vec![node];
                    let mut cur = node;
                    while let Some(&p) = parent.get(&cur) {
                        chain.push(p);
                        cur = p;
                    }
                    chain.reverse();
                    return chain;
                }
                if !parent.contains_key(&n) {
                    parent.insert(n, node);
                    queue.push_back(n);
                }
            }
        }

        vec![start]
    }

    /// Returns the number of files in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of include edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if the graph has no files.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns true if a file with this path is in the graph.
    pub fn contains(&self, path: &str) -> bool {
        self.node_indices.contains_key(path)
    }
}

/// Information about a detected include cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleInfo {
    /// The files in the cycle
    pub nodes: Vec<String>,
}

impl CycleInfo {
    /// Returns a formatted string representation of the cycle.
    ///
    /// For example: "a.h -> b.h -> a.h"
    pub fn cycle_path(&self) -> String {
        let Some(first) = self.nodes.first() else {
            return String::new();
        };
        format!("{} -> {}", self.nodes.join(" -> "), first)
    }

    /// Returns the number of files in the cycle.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the cycle is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
