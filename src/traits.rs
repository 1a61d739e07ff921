//! Shared error type and the graph seam consumed by the Prim driver
//!
//! - [`HeapError`]: caller errors reported by [`FibonacciHeap`](crate::fibonacci::FibonacciHeap)
//! - [`Adjacency`]: the read-only view of a graph that Prim's algorithm walks
//!
//! The heap never inspects graph structure; it only compares keys. Everything
//! it needs to know about a frontier edge travels in the node payload.

use crate::graph::{Edge, VertexId};
use thiserror::Error;

/// Error type for heap operations
///
/// A failed call leaves the heap unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// `extract_min` was called on a heap with no nodes
    #[error("cannot extract the minimum of an empty heap")]
    EmptyHeap,
    /// `decrease_key` was asked to raise a key
    #[error("new key is greater than the current key")]
    InvalidKey,
    /// The handle no longer refers to a node in this heap (it was extracted,
    /// or it belongs to another heap)
    #[error("handle does not refer to a node in this heap")]
    InvalidHandle,
}

/// Read-only adjacency view of an undirected graph
///
/// Implementors list, for every vertex `v`, the incident edges with
/// `source == v`. An undirected edge `{u, v}` therefore appears twice, once in
/// each endpoint's list, so a frontier edge's `dest` is always the vertex it
/// reaches.
///
/// Edge costs must be below `Cost::MAX`, which marks vertices no frontier
/// edge reaches yet; the driver rejects such edges with
/// [`PrimError::ReservedCost`](crate::prim::PrimError::ReservedCost).
///
/// Prim's algorithm assumes the graph is connected. Implementations do not
/// need to guarantee it; the driver reports a disconnected graph as
/// [`PrimError::HeapExhausted`](crate::prim::PrimError::HeapExhausted).
pub trait Adjacency {
    /// Number of vertices; vertex ids are `0..num_vertices()`
    fn num_vertices(&self) -> usize;

    /// Edges leaving `vertex`
    ///
    /// # Panics
    /// May panic if `vertex >= num_vertices()`.
    fn neighbors(&self, vertex: VertexId) -> &[Edge];
}
