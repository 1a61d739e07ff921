//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert, decrease_key, and meld
//! - O(log n) amortized extract_min
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked list. The heap maintains a handle to the minimum root.
//!
//! Nodes live in an arena ([`NodeArena`]) and refer to each other through
//! [`NodeHandle`]s, so every ring is an index-linked circular list and a cut
//! only moves a handle between rings; ownership never leaves the heap until
//! [`FibonacciHeap::extract_min`] hands the node back to the caller.

use crate::node::HeapNode;
use crate::storage::{NodeArena, NodeHandle};
use crate::traits::HeapError;
use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};
use tracing::warn;

/// Growth ratio of the minimum tree size per degree, rounded as in the
/// textbook bound `D(n) <= log_phi(n)`
const PHI: f64 = 1.618;

/// Extra degree-table slots on top of the `log_phi(n)` bound
const DEGREE_SLACK: usize = 2;

/// Degree table that stays inline for heaps of up to 2^40 nodes
type DegreeTable = SmallVec<[Option<NodeHandle>; 64]>;

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use fibonacci_prim::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let a = heap.push(5, "a");
/// heap.push(3, "b");
/// heap.decrease_key(a, 1).unwrap();
/// assert_eq!(heap.peek_min().map(|n| *n.key()), Some(1));
///
/// let node = heap.extract_min().unwrap();
/// assert_eq!(node.into_parts(), (1, Some("a")));
/// ```
#[derive(Debug)]
pub struct FibonacciHeap<K, T> {
    nodes: NodeArena<K, T>,
    min: Option<NodeHandle>,
    len: usize,
    generation: u64,
}

impl<K: Ord, T> Default for FibonacciHeap<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, T> FibonacciHeap<K, T> {
    pub fn new() -> Self {
        Self {
            nodes: NodeArena::default(),
            min: None,
            len: 0,
            generation: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Inserts a node into the root ring, to the right of the minimum.
    ///
    /// The node's structural fields are reset; only key and payload are kept.
    ///
    /// # Time Complexity
    /// O(1)
    pub fn insert(&mut self, node: HeapNode<K, T>) -> NodeHandle {
        let handle = self.nodes.insert(node);

        match self.min {
            Some(min) => {
                self.nodes.splice(min, handle);
                if self.nodes[handle].key_lt(&self.nodes[min]) {
                    self.min = Some(handle);
                }
            }
            None => self.min = Some(handle),
        }

        self.len += 1;
        handle
    }

    /// Inserts `payload` under `key`.
    pub fn push(&mut self, key: K, payload: T) -> NodeHandle {
        self.insert(HeapNode::new(key, payload))
    }

    /// Returns the minimum-keyed node without removing it.
    ///
    /// # Time Complexity
    /// O(1)
    pub fn peek_min(&self) -> Option<&HeapNode<K, T>> {
        self.min.map(|min| &self.nodes[min])
    }

    /// Returns the node behind `handle`, if it is still in the heap.
    pub fn get(&self, handle: NodeHandle) -> Option<&HeapNode<K, T>> {
        self.nodes.get(handle)
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains(handle)
    }

    /// Replaces the payload of a live node, returning the previous one.
    pub fn set_payload(&mut self, handle: NodeHandle, payload: T) -> Result<Option<T>, HeapError> {
        let node = self.nodes.get_mut(handle).ok_or(HeapError::InvalidHandle)?;
        Ok(node.payload.replace(payload))
    }

    /// Removes and returns the minimum-keyed node.
    ///
    /// The minimum's children become roots, then roots of equal degree are
    /// linked pairwise until every root degree is distinct.
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap has no nodes.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn extract_min(&mut self) -> Result<HeapNode<K, T>, HeapError> {
        let min = self.min.ok_or(HeapError::EmptyHeap)?;

        let mut survivor = self.nodes.unlink(min);

        if let Some(child) = self.nodes[min].child.take() {
            for promoted in self.nodes.ring(child) {
                let node = &mut self.nodes[promoted];
                node.parent = None;
                node.child_cut = false;
            }
            match survivor {
                Some(root) => self.nodes.splice(root, child),
                None => survivor = Some(child),
            }
        }

        let node = self.nodes.remove(min).ok_or(HeapError::InvalidHandle)?;
        self.len -= 1;

        match survivor {
            Some(start) => self.consolidate(start),
            None => self.min = None,
        }

        Ok(node)
    }

    /// Lowers the key of the node behind `handle`.
    ///
    /// If the node now violates heap order it is cut to the root ring, and its
    /// former ancestors are cut in turn while they have already lost a child.
    ///
    /// # Errors
    /// - [`HeapError::InvalidHandle`] if the node is no longer in this heap
    /// - [`HeapError::InvalidKey`] if `new_key` is greater than the current key;
    ///   the heap is left unchanged
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn decrease_key(&mut self, handle: NodeHandle, new_key: K) -> Result<(), HeapError> {
        let node = self.nodes.get_mut(handle).ok_or(HeapError::InvalidHandle)?;
        if new_key > node.key {
            return Err(HeapError::InvalidKey);
        }
        node.key = new_key;

        if let Some(parent) = self.nodes[handle].parent {
            if self.nodes[handle].key_lt(&self.nodes[parent]) {
                self.cut(handle, parent);
                self.cascading_cut(parent);
            }
        }

        if let Some(min) = self.min {
            if self.nodes[handle].key_lt(&self.nodes[min]) {
                self.min = Some(handle);
            }
        }

        Ok(())
    }

    /// Merges `other` into this heap.
    ///
    /// `other`'s nodes move into this heap's arena with their trees intact,
    /// then the two root rings are spliced together at one point. Handles
    /// issued by `other` are invalid afterwards; the returned map translates
    /// each of them to its handle in this heap.
    pub fn meld(&mut self, other: FibonacciHeap<K, T>) -> FxHashMap<NodeHandle, NodeHandle> {
        let FibonacciHeap {
            nodes,
            min: other_min,
            len: other_len,
            ..
        } = other;

        let Some(other_min) = other_min else {
            return FxHashMap::default();
        };

        let remap = self.nodes.absorb(nodes);
        let other_min = remap[&other_min];

        match self.min {
            Some(min) => {
                self.nodes.splice(min, other_min);
                if self.nodes[other_min].key_lt(&self.nodes[min]) {
                    self.min = Some(other_min);
                }
            }
            None => self.min = Some(other_min),
        }
        self.len += other_len;

        remap
    }

    /// Degrees of the current roots, starting at the minimum.
    pub fn root_degrees(&self) -> Vec<usize> {
        match self.min {
            Some(min) => self
                .nodes
                .ring(min)
                .into_iter()
                .map(|root| self.nodes[root].degree)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Checks every structural invariant of the heap.
    ///
    /// - sibling links form consistent circular rings
    /// - each node's degree equals the size of its child ring
    /// - children point back at their parent and respect heap order
    /// - roots have no parent and a clear child-cut flag
    /// - the minimum handle names the smallest root
    /// - `len` matches the number of reachable nodes and arena slots
    pub fn verify_internal_structure(&self) -> bool {
        let Some(min) = self.min else {
            return self.len == 0 && self.nodes.len() == 0;
        };

        let roots = self.nodes.ring(min);
        let mut reachable = 0;
        let mut stack: Vec<(NodeHandle, Option<NodeHandle>)> =
            roots.iter().map(|&root| (root, None)).collect();

        for &root in &roots {
            let node = &self.nodes[root];
            if node.child_cut || node.key_lt(&self.nodes[min]) {
                return false;
            }
        }

        while let Some((handle, parent)) = stack.pop() {
            reachable += 1;
            let node = &self.nodes[handle];
            if node.parent != parent {
                return false;
            }
            if self.nodes[node.right].left != handle || self.nodes[node.left].right != handle {
                return false;
            }
            if let Some(parent) = parent {
                if node.key_lt(&self.nodes[parent]) {
                    return false;
                }
            }
            let children = node.child.map(|c| self.nodes.ring(c)).unwrap_or_default();
            if children.len() != node.degree {
                return false;
            }
            stack.extend(children.into_iter().map(|c| (c, Some(handle))));
        }

        reachable == self.len && self.nodes.len() == self.len
    }

    /// Links roots of equal degree until all root degrees are distinct, then
    /// rebuilds the root ring and recomputes the minimum.
    fn consolidate(&mut self, start: NodeHandle) {
        self.generation += 1;
        let pass = self.generation;

        // Walk the root ring once, stamping each root with this pass so the
        // walk knows when it is back where it started.
        let mut roots = Vec::new();
        let mut current = start;
        while self.nodes[current].pass != pass {
            self.nodes[current].pass = pass;
            roots.push(current);
            current = self.nodes[current].right;
        }

        let mut table: DegreeTable = smallvec![None; degree_bound(self.len)];

        for root in roots {
            self.nodes.unlink(root);
            let mut x = root;
            loop {
                let degree = self.nodes[x].degree;
                if degree >= table.len() {
                    warn!(
                        degree,
                        len = self.len,
                        "root degree exceeds table size, growing degree table"
                    );
                    table.resize(degree + 1, None);
                }
                match table[degree].take() {
                    None => {
                        table[degree] = Some(x);
                        break;
                    }
                    Some(y) => {
                        // The earlier root keeps its place only if strictly smaller.
                        let (winner, loser) = if self.nodes[y].key_lt(&self.nodes[x]) {
                            (y, x)
                        } else {
                            (x, y)
                        };
                        self.nodes.attach_child(winner, loser);
                        x = winner;
                    }
                }
            }
        }

        let mut first: Option<NodeHandle> = None;
        for root in table.into_iter().flatten() {
            match first {
                Some(anchor) => self.nodes.splice(anchor, root),
                None => first = Some(root),
            }
        }

        self.min = first.map(|anchor| {
            let mut min = anchor;
            for root in self.nodes.ring(anchor) {
                if self.nodes[root].key_lt(&self.nodes[min]) {
                    min = root;
                }
            }
            min
        });
    }

    /// Cuts `handle` from `parent` and moves it to the root ring.
    fn cut(&mut self, handle: NodeHandle, parent: NodeHandle) {
        let next = self.nodes.unlink(handle);
        if self.nodes[parent].child == Some(handle) {
            self.nodes[parent].child = next;
        }
        self.nodes[parent].degree -= 1;

        let node = &mut self.nodes[handle];
        node.parent = None;
        node.child_cut = false;

        // A child always has an ancestor root, so the root ring is non-empty.
        if let Some(min) = self.min {
            self.nodes.splice(min, handle);
        }
    }

    /// Walks up from `handle`: an unmarked non-root is marked and the walk
    /// stops; a marked non-root is cut and the walk continues with its parent.
    fn cascading_cut(&mut self, mut handle: NodeHandle) {
        while let Some(parent) = self.nodes[handle].parent {
            if !self.nodes[handle].child_cut {
                self.nodes[handle].child_cut = true;
                return;
            }
            self.cut(handle, parent);
            handle = parent;
        }
    }
}

/// Size of the consolidation degree table for a heap of `len` nodes.
fn degree_bound(len: usize) -> usize {
    let bound = if len > 1 {
        ((len as f64).ln() / PHI.ln()).ceil() as usize
    } else {
        0
    };
    bound.max(1) + DEGREE_SLACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn drain_keys<T>(heap: &mut FibonacciHeap<i32, T>) -> Vec<i32> {
        let mut keys = Vec::new();
        while let Ok(node) = heap.extract_min() {
            keys.push(node.key);
        }
        keys
    }

    #[test]
    fn test_basic_operations() {
        let mut heap = FibonacciHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.push(5, "a");
        heap.push(3, "b");
        heap.push(7, "c");

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.peek_min().map(|n| *n.key()), Some(3));

        let min = heap.extract_min().unwrap();
        assert_eq!(min.into_parts(), (3, Some("b")));
        assert_eq!(heap.peek_min().map(|n| *n.key()), Some(5));
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_extract_from_empty() {
        let mut heap: FibonacciHeap<i32, ()> = FibonacciHeap::new();
        assert_eq!(heap.extract_min().unwrap_err(), HeapError::EmptyHeap);
    }

    #[test]
    fn test_extracted_node_is_detached() {
        let mut heap = FibonacciHeap::new();
        for i in 0..10 {
            heap.push(i, i);
        }
        heap.extract_min().unwrap();
        // The next minimum now has children from consolidation.
        let node = heap.extract_min().unwrap();
        assert!(node.is_detached());
        assert_eq!(node.degree(), 0);
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_decrease_key() {
        let mut heap = FibonacciHeap::new();
        heap.push(10, "a");
        let h2 = heap.push(20, "b");
        let h3 = heap.push(30, "c");

        assert_eq!(heap.peek_min().map(|n| *n.key()), Some(10));

        heap.decrease_key(h2, 5).unwrap();
        assert_eq!(heap.peek_min().and_then(|n| n.payload().copied()), Some("b"));

        heap.decrease_key(h3, 1).unwrap();
        assert_eq!(heap.peek_min().map(|n| *n.key()), Some(1));
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_decrease_key_rejects_increase() {
        let mut heap = FibonacciHeap::new();
        let h = heap.push(10, ());
        assert_eq!(heap.decrease_key(h, 11), Err(HeapError::InvalidKey));
        assert_eq!(heap.get(h).map(|n| *n.key()), Some(10));
        assert_eq!(heap.decrease_key(h, 10), Ok(()));
    }

    #[test]
    fn test_decrease_key_stale_handle() {
        let mut heap = FibonacciHeap::new();
        let h = heap.push(1, ());
        heap.extract_min().unwrap();
        assert!(!heap.contains(h));
        assert_eq!(heap.decrease_key(h, 0), Err(HeapError::InvalidHandle));
        assert_eq!(heap.set_payload(h, ()), Err(HeapError::InvalidHandle));
    }

    #[test]
    fn test_cascading_cut() {
        let mut heap = FibonacciHeap::new();
        let handles: Vec<_> = (0..32).map(|i| heap.push(i * 10, i)).collect();

        // One extraction consolidates the remaining 31 nodes into deep trees.
        heap.extract_min().unwrap();
        assert!(heap.verify_internal_structure());

        // Decreasing children repeatedly marks and then cuts their parents.
        for (i, &h) in handles.iter().enumerate().skip(1).rev() {
            heap.decrease_key(h, -(i as i32)).unwrap();
            assert!(heap.verify_internal_structure());
        }
        assert_eq!(heap.peek_min().map(|n| *n.key()), Some(-31));

        let keys = drain_keys(&mut heap);
        let expected: Vec<i32> = (1..32).rev().map(|i| -i).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_child_cut_marking() {
        let mut heap = FibonacciHeap::new();
        let handles: Vec<_> = (0..9).map(|i| heap.push(i, ())).collect();
        heap.extract_min().unwrap();

        // Find a non-root node that has children and cut one child.
        let marked = handles[1..]
            .iter()
            .copied()
            .find(|&h| {
                let node = heap.get(h).unwrap();
                !node.is_root() && node.degree() > 0
            })
            .expect("consolidation of 8 nodes builds a tree of depth > 1");
        let child = heap.nodes[marked].child.unwrap();
        heap.decrease_key(child, -1).unwrap();

        assert!(heap.get(child).unwrap().is_root());
        assert!(heap.get(marked).unwrap().child_cut());
        assert!(heap.verify_internal_structure());
    }

    #[test]
    fn test_root_degrees_distinct_after_consolidation() {
        let mut heap = FibonacciHeap::new();
        for i in (0..100).rev() {
            heap.push(i, ());
        }
        heap.extract_min().unwrap();
        let degrees = heap.root_degrees();
        let unique: HashSet<_> = degrees.iter().collect();
        assert_eq!(unique.len(), degrees.len());
    }

    #[test]
    fn test_meld() {
        let mut heap1 = FibonacciHeap::new();
        heap1.push(5, "a");
        heap1.push(10, "b");

        let mut heap2 = FibonacciHeap::new();
        let c = heap2.push(3, "c");
        heap2.push(7, "d");

        let remap = heap1.meld(heap2);
        assert_eq!(heap1.len(), 4);
        assert_eq!(heap1.peek_min().map(|n| *n.key()), Some(3));
        assert_eq!(heap1.get(remap[&c]).and_then(|n| n.payload().copied()), Some("c"));
        assert!(heap1.verify_internal_structure());
    }

    #[test]
    fn test_meld_empty_is_noop() {
        let mut heap = FibonacciHeap::new();
        heap.push(1, ());
        let remap = heap.meld(FibonacciHeap::new());
        assert!(remap.is_empty());
        assert_eq!(heap.len(), 1);

        let mut empty = FibonacciHeap::new();
        empty.meld(heap);
        assert_eq!(empty.len(), 1);
        assert!(empty.verify_internal_structure());
    }

    #[test]
    fn test_meld_keeps_trees() {
        let mut heap1 = FibonacciHeap::new();
        let mut heap2 = FibonacciHeap::new();
        for i in 0..20 {
            heap1.push(i * 2, ());
            heap2.push(i * 2 + 1, ());
        }
        heap2.extract_min().unwrap();
        heap1.meld(heap2);
        assert!(heap1.verify_internal_structure());

        let keys = drain_keys(&mut heap1);
        let mut expected: Vec<i32> = (0..40).filter(|&k| k != 1).collect();
        expected.sort();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_degree_bound() {
        assert_eq!(degree_bound(0), 1 + DEGREE_SLACK);
        assert_eq!(degree_bound(1), 1 + DEGREE_SLACK);
        assert_eq!(degree_bound(2), 2 + DEGREE_SLACK);
        assert!(degree_bound(1_000_000) >= 28);
    }

    #[test]
    fn test_degree_table_stays_inline() {
        let table: DegreeTable = smallvec![None; degree_bound(1 << 40)];
        assert!(!table.spilled());
        assert!(degree_bound(1 << 40) <= table.inline_size());
    }
}
