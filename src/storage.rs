//! Arena storage for heap nodes
//!
//! Every node of a [`FibonacciHeap`](crate::fibonacci::FibonacciHeap) lives in
//! a [`NodeArena`] backed by a `slotmap`. Parent, child and sibling links are
//! [`NodeHandle`]s into that arena, so a sibling ring is an index-linked
//! circular list and "ownership" of a node is simply which ring or table
//! currently refers to its handle.
//!
//! Slot-map keys are generational: a handle to an extracted node never aliases
//! a node inserted later, which is how stale handles are detected.
//!
//! # Ring operations
//!
//! - [`NodeArena::splice`]: join two rings at one point, O(1)
//! - [`NodeArena::unlink`]: remove a node from its ring, leaving a singleton
//! - [`NodeArena::attach_child`]: make one root a child of another

use crate::node::HeapNode;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::ops::{Index, IndexMut};

new_key_type! {
    /// Stable handle to a node inside one heap's arena
    pub struct NodeHandle;
}

/// Slot-map backed node storage
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<K, T> {
    nodes: SlotMap<NodeHandle, HeapNode<K, T>>,
}

impl<K, T> Default for NodeArena<K, T> {
    fn default() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }
}

impl<K, T> NodeArena<K, T> {
    /// Stores `node` as a singleton ring and returns its handle.
    ///
    /// Any structural state the node carried is discarded.
    pub(crate) fn insert(&mut self, mut node: HeapNode<K, T>) -> NodeHandle {
        node.detach();
        self.nodes.insert_with_key(|handle| {
            node.left = handle;
            node.right = handle;
            node
        })
    }

    /// Takes a node out of the arena, returning it fully detached.
    ///
    /// The caller must already have unlinked it from every ring.
    pub(crate) fn remove(&mut self, handle: NodeHandle) -> Option<HeapNode<K, T>> {
        self.nodes.remove(handle).map(|mut node| {
            node.detach();
            node
        })
    }

    pub(crate) fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    pub(crate) fn get(&self, handle: NodeHandle) -> Option<&HeapNode<K, T>> {
        self.nodes.get(handle)
    }

    pub(crate) fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut HeapNode<K, T>> {
        self.nodes.get_mut(handle)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Joins the ring containing `a` with the ring containing `b`.
    ///
    /// `b`'s ring is opened between `b` and its right neighbour and inserted
    /// to the right of `a`. Both arguments must be in different rings.
    pub(crate) fn splice(&mut self, a: NodeHandle, b: NodeHandle) {
        let a_next = self.nodes[a].right;
        let b_next = self.nodes[b].right;
        self.nodes[a].right = b_next;
        self.nodes[b_next].left = a;
        self.nodes[b].right = a_next;
        self.nodes[a_next].left = b;
    }

    /// Removes `handle` from its ring and makes it a singleton.
    ///
    /// Returns the former right neighbour, or `None` if the node was alone.
    pub(crate) fn unlink(&mut self, handle: NodeHandle) -> Option<NodeHandle> {
        let left = self.nodes[handle].left;
        let right = self.nodes[handle].right;
        self.nodes[handle].left = handle;
        self.nodes[handle].right = handle;
        if right == handle {
            return None;
        }
        self.nodes[left].right = right;
        self.nodes[right].left = left;
        Some(right)
    }

    /// Makes the singleton `child` a child of `parent`.
    ///
    /// Splices it into the parent's child ring (or starts one), sets the back
    /// reference, bumps the parent's degree and clears the parent's child-cut
    /// flag.
    pub(crate) fn attach_child(&mut self, parent: NodeHandle, child: NodeHandle) {
        match self.nodes[parent].child {
            Some(anchor) => self.splice(anchor, child),
            None => self.nodes[parent].child = Some(child),
        }
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.child_cut = false;

        let parent = &mut self.nodes[parent];
        parent.degree += 1;
        parent.child_cut = false;
    }

    /// Collects the ring that contains `start`, beginning at `start`.
    pub(crate) fn ring(&self, start: NodeHandle) -> Vec<NodeHandle> {
        let mut members = vec![start];
        let mut current = self.nodes[start].right;
        while current != start {
            members.push(current);
            current = self.nodes[current].right;
        }
        members
    }

    /// Moves every node of `other` into this arena, preserving structure.
    ///
    /// Returns a map from each node's old handle to its new one.
    pub(crate) fn absorb(&mut self, other: NodeArena<K, T>) -> FxHashMap<NodeHandle, NodeHandle> {
        let mut remap = FxHashMap::default();
        remap.reserve(other.len());
        let mut moved = Vec::with_capacity(other.len());

        for (old, mut node) in other.nodes {
            node.pass = 0;
            let links = (node.parent, node.child, node.left, node.right);
            let new = self.nodes.insert(node);
            remap.insert(old, new);
            moved.push((new, links));
        }

        for (new, (parent, child, left, right)) in moved {
            let node = &mut self.nodes[new];
            node.parent = parent.map(|p| remap[&p]);
            node.child = child.map(|c| remap[&c]);
            node.left = remap[&left];
            node.right = remap[&right];
        }

        remap
    }
}

impl<K, T> Index<NodeHandle> for NodeArena<K, T> {
    type Output = HeapNode<K, T>;

    fn index(&self, handle: NodeHandle) -> &Self::Output {
        &self.nodes[handle]
    }
}

impl<K, T> IndexMut<NodeHandle> for NodeArena<K, T> {
    fn index_mut(&mut self, handle: NodeHandle) -> &mut Self::Output {
        &mut self.nodes[handle]
    }
}
