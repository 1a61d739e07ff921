//! Prim's Minimum Spanning Tree over a Fibonacci Heap
//!
//! This crate computes minimum spanning trees of weighted undirected graphs
//! with Prim's algorithm and compares frontier strategies for its
//! select-the-cheapest-edge step.
//!
//! # Features
//!
//! - **Fibonacci Heap**: O(1) amortized insert, decrease_key, and meld; O(log n) amortized
//!   extract_min. Nodes live in a slot-map arena and are linked by handles.
//! - **Decrease-key Prim**: one heap node per vertex, lowered in place as cheaper edges appear
//! - **Lazy-insert Prim**: one heap node per discovered edge, stale entries skipped on extraction
//! - **Array Prim**: the O(V²) baseline
//!
//! # Example
//!
//! ```rust
//! use fibonacci_prim::graph::Graph;
//! use fibonacci_prim::prim::{minimum_spanning_tree, Scheme};
//!
//! let graph = Graph::from_edges(
//!     4,
//!     [(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 0, 4), (0, 2, 10)],
//! )
//! .unwrap();
//!
//! let tree = minimum_spanning_tree(&graph, Scheme::DecreaseKey).unwrap();
//! assert_eq!(tree.total_cost, 6);
//! assert_eq!(tree.edges, vec![(0, 1), (1, 2), (2, 3)]);
//! ```

pub mod fibonacci;
pub mod graph;
pub mod node;
pub mod prim;
pub mod storage;
pub mod traits;

pub use fibonacci::FibonacciHeap;
pub use node::HeapNode;
pub use storage::NodeHandle;
pub use traits::{Adjacency, HeapError};
