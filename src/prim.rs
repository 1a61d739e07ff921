//! Prim's minimum spanning tree over a [`FibonacciHeap`] frontier
//!
//! Three frontier strategies are provided so their overhead can be compared:
//!
//! - [`Scheme::Array`]: the O(V²) baseline; keeps the cheapest known edge per
//!   vertex in an array and scans it for the minimum every step.
//! - [`Scheme::DecreaseKey`]: one heap node per vertex, created up front under
//!   a sentinel key; discovering a cheaper edge to a vertex lowers its key in
//!   place.
//! - [`Scheme::LazyInsert`]: every frontier edge is pushed as a fresh node;
//!   extracted edges that lead back into the tree are discarded.
//!
//! All three grow the tree from a single start vertex (vertex 0 unless
//! configured otherwise) and require a connected graph. A disconnected graph
//! surfaces as [`PrimError::HeapExhausted`] once the frontier runs dry.
//!
//! # Example
//!
//! ```rust
//! use fibonacci_prim::graph::Graph;
//! use fibonacci_prim::prim::{minimum_spanning_tree, Scheme};
//!
//! let graph = Graph::from_edges(3, [(0, 1, 4), (1, 2, 1), (0, 2, 2)]).unwrap();
//! let tree = minimum_spanning_tree(&graph, Scheme::LazyInsert).unwrap();
//! assert_eq!(tree.total_cost, 3);
//! assert_eq!(tree.edges, vec![(0, 2), (2, 1)]);
//! ```

use crate::fibonacci::FibonacciHeap;
use crate::graph::{Cost, Edge, VertexId};
use crate::node::HeapNode;
use crate::storage::NodeHandle;
use crate::traits::{Adjacency, HeapError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

/// Key of a vertex that no frontier edge reaches yet; larger than any edge cost.
pub const UNREACHED: Cost = Cost::MAX;

/// Frontier strategy used to pick the next tree edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Array scan, O(V²)
    Array,
    /// Fibonacci heap with one node per vertex and decrease-key
    DecreaseKey,
    /// Fibonacci heap with one node per discovered edge and lazy deletion
    LazyInsert,
}

impl Scheme {
    pub const ALL: [Scheme; 3] = [Scheme::Array, Scheme::DecreaseKey, Scheme::LazyInsert];

    pub fn name(self) -> &'static str {
        match self {
            Scheme::Array => "array",
            Scheme::DecreaseKey => "decrease-key",
            Scheme::LazyInsert => "lazy-insert",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no [`Scheme`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scheme {0:?} (expected array, decrease-key or lazy-insert)")]
pub struct UnknownScheme(String);

impl FromStr for Scheme {
    type Err = UnknownScheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scheme::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownScheme(s.to_owned()))
    }
}

/// Errors that abort a Prim run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimError {
    /// The frontier ran out before every vertex was reached: the graph is
    /// disconnected.
    #[error("frontier exhausted after settling {settled} of {vertices} vertices; graph is not connected")]
    HeapExhausted { settled: usize, vertices: usize },
    #[error("start vertex {start} is out of range for a graph with {vertices} vertices")]
    StartOutOfRange { start: VertexId, vertices: usize },
    /// An edge carries the cost reserved for unreached vertices.
    #[error("edge {from} -> {to} has reserved cost {cost}", cost = UNREACHED)]
    ReservedCost { from: VertexId, to: VertexId },
    /// The tree's total cost does not fit in a [`Cost`].
    #[error("total tree cost overflows after {edges} edges")]
    CostOverflow { edges: usize },
    #[error(transparent)]
    Heap(#[from] HeapError),
}

/// Frontier traffic recorded during one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrimStats {
    /// Nodes inserted into the heap
    pub inserts: usize,
    /// Successful `decrease_key` calls
    pub decrease_keys: usize,
    /// Successful `extract_min` calls
    pub extractions: usize,
    /// Extracted edges dropped because their destination was already in the tree
    pub stale_discards: usize,
}

/// A minimum spanning tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanningTree {
    pub total_cost: Cost,
    /// Tree edges as `(source, dest)` in the order they were added
    pub edges: Vec<(VertexId, VertexId)>,
    pub stats: PrimStats,
}

/// Runs Prim's algorithm from vertex 0 with the given scheme.
pub fn minimum_spanning_tree<G: Adjacency>(
    graph: &G,
    scheme: Scheme,
) -> Result<SpanningTree, PrimError> {
    PrimDriver::new(graph).run(scheme)
}

/// Configurable Prim's algorithm runner
///
/// # Example
///
/// ```rust
/// use fibonacci_prim::graph::Graph;
/// use fibonacci_prim::prim::{PrimDriver, Scheme};
///
/// let graph = Graph::from_edges(3, [(0, 1, 4), (1, 2, 1), (0, 2, 2)]).unwrap();
/// let tree = PrimDriver::new(&graph).start(1).run(Scheme::DecreaseKey).unwrap();
/// assert_eq!(tree.edges, vec![(1, 2), (2, 0)]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PrimDriver<'g, G> {
    graph: &'g G,
    start: VertexId,
}

impl<'g, G: Adjacency> PrimDriver<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        PrimDriver { graph, start: 0 }
    }

    /// Sets the vertex the tree grows from.
    pub fn start(mut self, vertex: VertexId) -> Self {
        self.start = vertex;
        self
    }

    /// Builds the spanning tree with `scheme`.
    ///
    /// Graphs with fewer than two vertices yield an empty tree without
    /// touching a heap.
    ///
    /// # Errors
    /// - [`PrimError::StartOutOfRange`] if the start vertex does not exist
    /// - [`PrimError::HeapExhausted`] if the graph is disconnected
    /// - [`PrimError::ReservedCost`] if a reached edge costs [`UNREACHED`]
    /// - [`PrimError::CostOverflow`] if the total cost exceeds [`Cost::MAX`]
    pub fn run(&self, scheme: Scheme) -> Result<SpanningTree, PrimError> {
        let vertices = self.graph.num_vertices();
        if vertices == 0 {
            return Ok(SpanningTree::default());
        }
        if self.start >= vertices {
            return Err(PrimError::StartOutOfRange {
                start: self.start,
                vertices,
            });
        }
        if vertices == 1 {
            return Ok(SpanningTree::default());
        }

        debug!(%scheme, vertices, start = self.start, "running prim");
        let tree = match scheme {
            Scheme::Array => self.run_array(),
            Scheme::DecreaseKey => self.run_decrease_key(),
            Scheme::LazyInsert => self.run_lazy_insert(),
        }?;
        debug!(
            %scheme,
            total_cost = tree.total_cost,
            inserts = tree.stats.inserts,
            decrease_keys = tree.stats.decrease_keys,
            extractions = tree.stats.extractions,
            stale_discards = tree.stats.stale_discards,
            "prim finished"
        );
        Ok(tree)
    }

    fn run_array(&self) -> Result<SpanningTree, PrimError> {
        let mut growth = Growth::new(self.graph.num_vertices());
        let mut cheapest: Vec<Option<&'g Edge>> = vec![None; growth.vertices];
        let mut current = self.start;

        while !growth.is_complete() {
            growth.visit(current);
            for edge in self.graph.neighbors(current) {
                if growth.visited[edge.dest] {
                    continue;
                }
                check_cost(edge)?;
                if cheapest[edge.dest].map_or(true, |best| edge.cost < best.cost) {
                    cheapest[edge.dest] = Some(edge);
                }
            }

            let mut chosen: Option<&'g Edge> = None;
            for (vertex, candidate) in cheapest.iter().enumerate() {
                if growth.visited[vertex] {
                    continue;
                }
                if let Some(edge) = *candidate {
                    if chosen.map_or(true, |best| edge.cost < best.cost) {
                        chosen = Some(edge);
                    }
                }
            }

            let edge = chosen.ok_or_else(|| growth.exhausted())?;
            cheapest[edge.dest] = None;
            current = growth.settle(edge)?;
        }

        Ok(growth.tree)
    }

    fn run_decrease_key(&self) -> Result<SpanningTree, PrimError> {
        let mut growth = Growth::new(self.graph.num_vertices());
        let mut heap: FibonacciHeap<Cost, &'g Edge> = FibonacciHeap::new();
        let handles: Vec<NodeHandle> = (0..growth.vertices)
            .map(|_| heap.insert(HeapNode::placeholder(UNREACHED)))
            .collect();
        growth.tree.stats.inserts = handles.len();
        let mut current = self.start;

        while !growth.is_complete() {
            growth.visit(current);
            for edge in self.graph.neighbors(current) {
                if growth.visited[edge.dest] {
                    continue;
                }
                check_cost(edge)?;
                let handle = handles[edge.dest];
                let key = heap
                    .get(handle)
                    .map(|node| *node.key())
                    .ok_or(HeapError::InvalidHandle)?;
                if edge.cost < key {
                    heap.decrease_key(handle, edge.cost)?;
                    heap.set_payload(handle, edge)?;
                    growth.tree.stats.decrease_keys += 1;
                }
            }

            let node = extract(&mut heap, &growth)?;
            growth.tree.stats.extractions += 1;
            // Only a placeholder can surface without an edge: nothing reaches
            // the remaining vertices.
            let edge = node.into_parts().1.ok_or_else(|| growth.exhausted())?;
            current = growth.settle(edge)?;
        }

        Ok(growth.tree)
    }

    fn run_lazy_insert(&self) -> Result<SpanningTree, PrimError> {
        let mut growth = Growth::new(self.graph.num_vertices());
        let mut heap: FibonacciHeap<Cost, &'g Edge> = FibonacciHeap::new();
        let mut current = self.start;

        while !growth.is_complete() {
            growth.visit(current);
            for edge in self.graph.neighbors(current) {
                if !growth.visited[edge.dest] {
                    check_cost(edge)?;
                    heap.push(edge.cost, edge);
                    growth.tree.stats.inserts += 1;
                }
            }

            let edge = loop {
                let node = extract(&mut heap, &growth)?;
                growth.tree.stats.extractions += 1;
                match node.into_parts().1 {
                    Some(edge) if !growth.visited[edge.dest] => break edge,
                    stale => {
                        trace!(edge = ?stale, "discarding stale frontier edge");
                        growth.tree.stats.stale_discards += 1;
                    }
                }
            };
            current = growth.settle(edge)?;
        }

        Ok(growth.tree)
    }
}

/// Extracts the frontier minimum, reporting an empty heap as exhaustion.
fn extract<'g>(
    heap: &mut FibonacciHeap<Cost, &'g Edge>,
    growth: &Growth,
) -> Result<HeapNode<Cost, &'g Edge>, PrimError> {
    heap.extract_min().map_err(|err| match err {
        HeapError::EmptyHeap => growth.exhausted(),
        other => other.into(),
    })
}

/// Rejects frontier edges whose cost collides with the [`UNREACHED`] key.
fn check_cost(edge: &Edge) -> Result<(), PrimError> {
    if edge.cost == UNREACHED {
        return Err(PrimError::ReservedCost {
            from: edge.source,
            to: edge.dest,
        });
    }
    Ok(())
}

/// Tree-growth state shared by every scheme
struct Growth {
    vertices: usize,
    visited: Vec<bool>,
    settled: usize,
    tree: SpanningTree,
}

impl Growth {
    fn new(vertices: usize) -> Self {
        Growth {
            vertices,
            visited: vec![false; vertices],
            settled: 0,
            tree: SpanningTree {
                edges: Vec::with_capacity(vertices.saturating_sub(1)),
                ..SpanningTree::default()
            },
        }
    }

    fn is_complete(&self) -> bool {
        self.tree.edges.len() + 1 >= self.vertices
    }

    fn visit(&mut self, vertex: VertexId) {
        if !self.visited[vertex] {
            self.visited[vertex] = true;
            self.settled += 1;
        }
    }

    /// Records `edge` as a tree edge and returns the vertex it reaches.
    fn settle(&mut self, edge: &Edge) -> Result<VertexId, PrimError> {
        trace!(source = edge.source, dest = edge.dest, cost = edge.cost, "settled vertex");
        self.tree.total_cost = self
            .tree
            .total_cost
            .checked_add(edge.cost)
            .ok_or(PrimError::CostOverflow {
                edges: self.tree.edges.len() + 1,
            })?;
        self.tree.edges.push((edge.source, edge.dest));
        Ok(edge.dest)
    }

    fn exhausted(&self) -> PrimError {
        PrimError::HeapExhausted {
            settled: self.settled,
            vertices: self.vertices,
        }
    }
}
