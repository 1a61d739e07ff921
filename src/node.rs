//! Fibonacci heap nodes
//!
//! A [`HeapNode`] carries a key, an optional payload, and the structural links
//! that place it in the heap: its parent, one anchor into its child ring, and
//! its left/right neighbours in whichever sibling ring it currently belongs to.
//!
//! Links are [`NodeHandle`]s into the owning heap's arena rather than pointers.
//! A node that is not in any heap (freshly built, or returned by
//! `extract_min`) has null sibling links and no parent or child.

use crate::storage::NodeHandle;
use slotmap::Key;

/// A node of a [`FibonacciHeap`](crate::fibonacci::FibonacciHeap)
///
/// `payload` is optional so that placeholder nodes (a vertex that has no known
/// frontier edge yet) can sit in the heap under a sentinel key.
#[derive(Debug, Clone)]
pub struct HeapNode<K, T> {
    pub(crate) key: K,
    pub(crate) payload: Option<T>,
    pub(crate) degree: usize,
    pub(crate) child_cut: bool,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) child: Option<NodeHandle>,
    pub(crate) left: NodeHandle,
    pub(crate) right: NodeHandle,
    /// Consolidation generation in which this node was last seen as a root
    pub(crate) pass: u64,
}

impl<K, T> HeapNode<K, T> {
    /// Creates a detached node wrapping `payload`.
    pub fn new(key: K, payload: T) -> Self {
        Self::with_payload(key, Some(payload))
    }

    /// Creates a detached node with no payload.
    pub fn placeholder(key: K) -> Self {
        Self::with_payload(key, None)
    }

    fn with_payload(key: K, payload: Option<T>) -> Self {
        HeapNode {
            key,
            payload,
            degree: 0,
            child_cut: false,
            parent: None,
            child: None,
            left: NodeHandle::null(),
            right: NodeHandle::null(),
            pass: 0,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn payload_mut(&mut self) -> Option<&mut T> {
        self.payload.as_mut()
    }

    /// Consumes the node, returning its key and payload.
    pub fn into_parts(self) -> (K, Option<T>) {
        (self.key, self.payload)
    }

    /// Number of nodes in this node's child ring.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Whether this node has lost a child since it last became a child itself.
    ///
    /// Always `false` for roots.
    pub fn child_cut(&self) -> bool {
        self.child_cut
    }

    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// True when the node is not linked into any ring.
    pub fn is_detached(&self) -> bool {
        self.left.is_null() && self.right.is_null() && self.parent.is_none() && self.child.is_none()
    }

    /// Clears every structural link, leaving key and payload intact.
    pub(crate) fn detach(&mut self) {
        self.degree = 0;
        self.child_cut = false;
        self.parent = None;
        self.child = None;
        self.left = NodeHandle::null();
        self.right = NodeHandle::null();
        self.pass = 0;
    }
}

impl<K: Ord, T> HeapNode<K, T> {
    /// Returns true if this node's key is strictly smaller than `other`'s.
    #[inline]
    pub fn key_lt(&self, other: &Self) -> bool {
        self.key < other.key
    }
}
