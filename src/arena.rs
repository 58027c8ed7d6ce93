//! Node arena and circular ring primitives
//!
//! Heap nodes live in a slotmap-backed arena and refer to each other through
//! stable, generation-tagged keys instead of raw pointers. Structural links
//! (`parent`, `child`, `left`, `right`) are plain keys; the null key is the
//! empty marker. The parent link is a relation only, never ownership.
//!
//! Sibling nodes form circular doubly-linked rings: the root list of a heap
//! and the child list of every node. A solitary node is a ring of one, with
//! `left == right == self`. The splice and excise operations here are the
//! O(1) building blocks for every heap operation.
//!
//! Several heaps may share one arena. That is what makes `merge` O(1): the
//! receiving heap splices the donor's root ring into its own without moving
//! a single node.

use slotmap::{new_key_type, Key, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Generational key identifying a node slot in a [`NodeArena`].
    pub(crate) struct NodeKey;
}

/// Opaque reference to a specific heap node, returned by `insert`.
///
/// The key inside is generation-tagged: once the node is extracted or
/// deleted, the slot's generation advances and any retained handle stops
/// resolving. Operations given such a handle fail with
/// [`HeapError::StaleHandle`](crate::HeapError::StaleHandle) instead of
/// touching freed or reused memory.
///
/// A handle is only meaningful for the heap that issued it. Passing it to a
/// different heap over the same arena is not detected and is a usage error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NodeHandle(pub(crate) NodeKey);

/// A single heap node: key, payload, and structural links.
#[derive(Debug)]
pub(crate) struct Node<T, P> {
    pub(crate) priority: P,
    pub(crate) item: T,
    pub(crate) parent: NodeKey,
    pub(crate) child: NodeKey,
    pub(crate) left: NodeKey,
    pub(crate) right: NodeKey,
    /// Number of direct children. `child` is null iff this is zero.
    pub(crate) degree: usize,
    /// True iff this node has lost a child since it last became a child.
    pub(crate) marked: bool,
}

/// Backing store for heap nodes.
///
/// Create one arena, then any number of heaps on top of it. Heaps that may
/// later be merged must share an arena.
#[derive(Debug, Default)]
pub struct NodeArena<T, P> {
    nodes: SlotMap<NodeKey, Node<T, P>>,
}

impl<T, P> NodeArena<T, P> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Number of live nodes across every heap backed by this arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no heap on this arena holds any node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates a fresh node as a ring of one: unmarked, degree 0, no
    /// parent, no child.
    pub(crate) fn alloc(&mut self, priority: P, item: T) -> NodeKey {
        let key = self.nodes.insert(Node {
            priority,
            item,
            parent: NodeKey::null(),
            child: NodeKey::null(),
            left: NodeKey::null(),
            right: NodeKey::null(),
            degree: 0,
            marked: false,
        });
        let node = &mut self.nodes[key];
        node.left = key;
        node.right = key;
        key
    }

    /// Releases a node's slot, invalidating every handle to it.
    pub(crate) fn free(&mut self, key: NodeKey) -> Option<Node<T, P>> {
        self.nodes.remove(key)
    }

    pub(crate) fn node(&self, key: NodeKey) -> &Node<T, P> {
        &self.nodes[key]
    }

    pub(crate) fn node_mut(&mut self, key: NodeKey) -> &mut Node<T, P> {
        &mut self.nodes[key]
    }

    pub(crate) fn get(&self, key: NodeKey) -> Option<&Node<T, P>> {
        self.nodes.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node<T, P>> {
        self.nodes.get_mut(key)
    }

    /// Splices `node` (a ring of one) into the ring containing `anchor`,
    /// immediately to the left of `anchor`. Does not touch `node.parent`.
    pub(crate) fn ring_insert(&mut self, anchor: NodeKey, node: NodeKey) {
        debug_assert_eq!(self.nodes[node].left, node, "spliced node must be solitary");
        let anchor_left = self.nodes[anchor].left;
        self.nodes[node].left = anchor_left;
        self.nodes[node].right = anchor;
        self.nodes[anchor_left].right = node;
        self.nodes[anchor].left = node;
    }

    /// Excises `node` from whatever ring it is in, leaving it a ring of one.
    /// The caller is responsible for any external anchor (a parent's `child`
    /// pointer, a heap's `min`) that pointed at `node`.
    pub(crate) fn ring_remove(&mut self, node: NodeKey) {
        let left = self.nodes[node].left;
        let right = self.nodes[node].right;
        if left != node {
            self.nodes[left].right = right;
            self.nodes[right].left = left;
        }
        let n = &mut self.nodes[node];
        n.left = node;
        n.right = node;
    }

    /// Splices the whole ring containing `other` into the ring containing
    /// `anchor`. O(1): only four links change.
    pub(crate) fn ring_concat(&mut self, anchor: NodeKey, other: NodeKey) {
        let anchor_left = self.nodes[anchor].left;
        let other_left = self.nodes[other].left;
        self.nodes[anchor_left].right = other;
        self.nodes[other].left = anchor_left;
        self.nodes[other_left].right = anchor;
        self.nodes[anchor].left = other_left;
    }

    /// Snapshots the members of the ring containing `start`, in `right`
    /// order. Used before loops that restructure the ring as they go.
    pub(crate) fn ring_members(&self, start: NodeKey) -> SmallVec<[NodeKey; 8]> {
        let mut members = SmallVec::new();
        let mut cur = start;
        loop {
            members.push(cur);
            cur = self.nodes[cur].right;
            if cur == start {
                break;
            }
        }
        members
    }
}
