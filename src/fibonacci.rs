//! Fibonacci heap over a shared node arena
//!
//! A Fibonacci heap is a mergeable priority queue with:
//! - O(1) amortized `insert`, `decrease_key`, and `merge`
//! - O(log n) amortized `extract_min`
//!
//! The structure is a forest of heap-ordered trees whose roots are linked in
//! a circular ring, with the minimum root tracked separately. Nodes are held
//! in a [`NodeArena`] shared by every heap that may need to merge; the heap
//! itself is just the `min` anchor and a length, so every operation takes the
//! arena as an explicit argument.
//!
//! # Example
//!
//! ```rust
//! use fibonacci_mst::{FibonacciHeap, NodeArena};
//!
//! let mut arena = NodeArena::new();
//! let mut heap = FibonacciHeap::new();
//! let handle = heap.insert(&mut arena, 5, "item");
//! heap.decrease_key(&mut arena, handle, 1).unwrap();
//! assert_eq!(heap.peek(&arena), Some((&1, &"item")));
//! ```

use crate::arena::{NodeArena, NodeHandle, NodeKey};
use crate::error::HeapError;
use slotmap::Key;
use smallvec::SmallVec;
use std::marker::PhantomData;

/// Mergeable min-heap with handle-based `decrease_key`.
///
/// `P` is the ordered priority (key); `T` is an opaque payload the heap never
/// interprets. All nodes live in the [`NodeArena`] passed to each operation;
/// two heaps can be merged in O(1) only if they share an arena.
#[derive(Debug)]
pub struct FibonacciHeap<T, P: Ord> {
    /// Root with the globally smallest key, or null when the heap is empty.
    min: NodeKey,
    len: usize,
    _marker: PhantomData<fn() -> (T, P)>,
}

impl<T, P: Ord> Default for FibonacciHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> FibonacciHeap<T, P> {
    /// Creates an empty heap. Allocates nothing until the first insert.
    pub fn new() -> Self {
        Self {
            min: NodeKey::null(),
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Number of elements currently in this heap.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the heap holds no elements.
    pub fn is_empty(&self) -> bool {
        self.min.is_null()
    }

    /// Inserts an element, returning a handle for later `decrease_key` or
    /// `delete` calls. O(1) worst case; always succeeds.
    pub fn insert(&mut self, arena: &mut NodeArena<T, P>, priority: P, item: T) -> NodeHandle {
        let key = arena.alloc(priority, item);
        if self.min.is_null() {
            self.min = key;
        } else {
            arena.ring_insert(self.min, key);
            if arena.node(key).priority < arena.node(self.min).priority {
                self.min = key;
            }
        }
        self.len += 1;
        NodeHandle(key)
    }

    /// Returns the minimum key and its payload without removing them, or
    /// `None` if the heap is empty. O(1).
    pub fn peek<'a>(&self, arena: &'a NodeArena<T, P>) -> Option<(&'a P, &'a T)> {
        if self.min.is_null() {
            return None;
        }
        let node = arena.node(self.min);
        Some((&node.priority, &node.item))
    }

    /// Removes and returns the minimum element, or `None` if the heap is
    /// empty. The extracted node's handle becomes stale. O(log n) amortized.
    pub fn extract_min(&mut self, arena: &mut NodeArena<T, P>) -> Option<(P, T)> {
        if self.min.is_null() {
            return None;
        }
        let z = self.min;

        // Promote every child of z to the root ring while z is still in it.
        let first_child = arena.node(z).child;
        if !first_child.is_null() {
            let children = arena.ring_members(first_child);
            for child in children {
                arena.ring_remove(child);
                let node = arena.node_mut(child);
                node.parent = NodeKey::null();
                node.marked = false;
                arena.ring_insert(z, child);
            }
            let node = arena.node_mut(z);
            node.child = NodeKey::null();
            node.degree = 0;
        }

        let right = arena.node(z).right;
        if right == z {
            // z was the sole root and had no children.
            self.min = NodeKey::null();
        } else {
            arena.ring_remove(z);
            // Temporary anchor; consolidate rescans for the true minimum.
            self.min = right;
            self.consolidate(arena);
        }
        self.len -= 1;

        let node = arena.free(z)?;
        Some((node.priority, node.item))
    }

    /// Lowers the key of the node behind `handle` to `new_priority`.
    ///
    /// O(1) amortized. The new key must be less than or equal to the current
    /// one.
    ///
    /// # Errors
    ///
    /// - [`HeapError::KeyIncreased`] if `new_priority` is greater than the
    ///   node's current key; the heap is left unchanged.
    /// - [`HeapError::StaleHandle`] if the node was already extracted or
    ///   deleted.
    pub fn decrease_key(
        &mut self,
        arena: &mut NodeArena<T, P>,
        handle: NodeHandle,
        new_priority: P,
    ) -> Result<(), HeapError> {
        let key = handle.0;
        {
            let node = arena.get_mut(key).ok_or(HeapError::StaleHandle)?;
            if new_priority > node.priority {
                return Err(HeapError::KeyIncreased);
            }
            node.priority = new_priority;
        }

        let parent = arena.node(key).parent;
        if !parent.is_null() && arena.node(key).priority < arena.node(parent).priority {
            self.cut(arena, key, parent);
            self.cascading_cut(arena, parent);
        }
        if self.min.is_null() || arena.node(key).priority < arena.node(self.min).priority {
            self.min = key;
        }
        Ok(())
    }

    /// Removes the node behind `handle` regardless of its position,
    /// returning its key and payload. Equivalent to decreasing the key below
    /// every other key and extracting, without needing a minus-infinity
    /// sentinel in `P`.
    ///
    /// # Errors
    ///
    /// [`HeapError::StaleHandle`] if the node was already removed.
    pub fn delete(
        &mut self,
        arena: &mut NodeArena<T, P>,
        handle: NodeHandle,
    ) -> Result<(P, T), HeapError> {
        let key = handle.0;
        if arena.get(key).is_none() {
            return Err(HeapError::StaleHandle);
        }
        let parent = arena.node(key).parent;
        if !parent.is_null() {
            self.cut(arena, key, parent);
            self.cascading_cut(arena, parent);
        }
        // The node is now a root. Promote it to min so the extraction
        // machinery removes exactly this node; extract_min rescans for the
        // real minimum while consolidating.
        self.min = key;
        self.extract_min(arena).ok_or(HeapError::StaleHandle)
    }

    /// Merges `other` into this heap in O(1), leaving `other` empty.
    ///
    /// Both heaps must be backed by `arena`. Only the two root rings are
    /// spliced together; no node is moved or examined, which is what makes
    /// this structure preferable to an ordered container when components
    /// unify.
    pub fn merge(&mut self, arena: &mut NodeArena<T, P>, other: &mut FibonacciHeap<T, P>) {
        if other.min.is_null() {
            return;
        }
        if self.min.is_null() {
            self.min = other.min;
            self.len = other.len;
        } else {
            arena.ring_concat(self.min, other.min);
            if arena.node(other.min).priority < arena.node(self.min).priority {
                self.min = other.min;
            }
            self.len += other.len;
        }
        other.min = NodeKey::null();
        other.len = 0;
    }

    /// Releases every node still held by this heap, leaving it empty.
    ///
    /// The arena reclaims each slot, so retained handles go stale. Dropping
    /// a heap without clearing it leaks nothing: the nodes stay in the arena
    /// and are freed when the arena drops.
    pub fn clear(&mut self, arena: &mut NodeArena<T, P>) {
        if self.min.is_null() {
            return;
        }
        let mut stack: SmallVec<[NodeKey; 8]> = arena.ring_members(self.min);
        while let Some(key) = stack.pop() {
            let child = arena.node(key).child;
            if !child.is_null() {
                stack.extend(arena.ring_members(child));
            }
            arena.free(key);
        }
        self.min = NodeKey::null();
        self.len = 0;
    }

    /// Merges equal-degree roots until every root degree is distinct, then
    /// rebuilds the root ring and rescans for the minimum.
    fn consolidate(&mut self, arena: &mut NodeArena<T, P>) {
        debug_assert!(!self.min.is_null());
        let roots = arena.ring_members(self.min);

        // Degree table sized from floor(log2(len)); it grows on demand, so a
        // transient degree above the bound resizes rather than indexing out
        // of range.
        let bound = usize::BITS as usize - self.len.max(1).leading_zeros() as usize + 1;
        let mut table: Vec<NodeKey> = vec![NodeKey::null(); bound];

        for root in roots {
            let mut x = root;
            let mut d = arena.node(x).degree;
            loop {
                if d >= table.len() {
                    table.resize(d + 1, NodeKey::null());
                }
                if table[d].is_null() {
                    table[d] = x;
                    break;
                }
                let mut y = table[d];
                table[d] = NodeKey::null();
                // The larger key becomes the child.
                if arena.node(x).priority > arena.node(y).priority {
                    std::mem::swap(&mut x, &mut y);
                }
                Self::link(arena, y, x);
                d += 1;
            }
        }

        // Rebuild the root ring from the surviving table entries.
        self.min = NodeKey::null();
        for key in table {
            if key.is_null() {
                continue;
            }
            let node = arena.node_mut(key);
            node.left = key;
            node.right = key;
            if self.min.is_null() {
                self.min = key;
            } else {
                arena.ring_insert(self.min, key);
                if arena.node(key).priority < arena.node(self.min).priority {
                    self.min = key;
                }
            }
        }
    }

    /// Removes root `y` from the root ring and attaches it as a child of
    /// root `x`. O(1).
    fn link(arena: &mut NodeArena<T, P>, y: NodeKey, x: NodeKey) {
        arena.ring_remove(y);
        let x_child = arena.node(x).child;
        if x_child.is_null() {
            arena.node_mut(x).child = y;
        } else {
            arena.ring_insert(x_child, y);
        }
        let node = arena.node_mut(y);
        node.parent = x;
        node.marked = false;
        arena.node_mut(x).degree += 1;
    }

    /// Detaches `node` from `parent`'s child ring and splices it into the
    /// root ring as a fresh unmarked root.
    fn cut(&mut self, arena: &mut NodeArena<T, P>, node: NodeKey, parent: NodeKey) {
        if arena.node(node).right == node {
            // Only child.
            arena.node_mut(parent).child = NodeKey::null();
        } else {
            if arena.node(parent).child == node {
                let next = arena.node(node).right;
                arena.node_mut(parent).child = next;
            }
            arena.ring_remove(node);
        }
        arena.node_mut(parent).degree -= 1;
        {
            let n = arena.node_mut(node);
            n.parent = NodeKey::null();
            n.marked = false;
        }
        if self.min.is_null() {
            self.min = node;
        } else {
            arena.ring_insert(self.min, node);
        }
    }

    /// Walks up the ancestor chain from `start`: a first child loss marks
    /// the ancestor and stops; a second loss cuts it and continues upward.
    /// Iterative, so adversarial depths cannot exhaust the call stack.
    fn cascading_cut(&mut self, arena: &mut NodeArena<T, P>, start: NodeKey) {
        let mut cur = start;
        loop {
            let parent = arena.node(cur).parent;
            if parent.is_null() {
                break;
            }
            if !arena.node(cur).marked {
                arena.node_mut(cur).marked = true;
                break;
            }
            self.cut(arena, cur, parent);
            cur = parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Walks the whole forest checking every structural invariant: ring
    /// integrity, parent/child consistency, degree counts, heap order, min
    /// correctness, and node count against `len`.
    fn audit<T, P: Ord>(heap: &FibonacciHeap<T, P>, arena: &NodeArena<T, P>) {
        if heap.min.is_null() {
            assert_eq!(heap.len, 0);
            return;
        }
        let mut stack: Vec<NodeKey> = Vec::new();
        for root in arena.ring_members(heap.min) {
            assert!(arena.node(root).parent.is_null());
            assert!(arena.node(heap.min).priority <= arena.node(root).priority);
            stack.push(root);
        }
        let mut count = 0usize;
        while let Some(key) = stack.pop() {
            count += 1;
            let node = arena.node(key);
            assert_eq!(arena.node(node.left).right, key);
            assert_eq!(arena.node(node.right).left, key);
            if node.child.is_null() {
                assert_eq!(node.degree, 0);
            } else {
                let children = arena.ring_members(node.child);
                assert_eq!(children.len(), node.degree);
                for child in children {
                    assert_eq!(arena.node(child).parent, key);
                    assert!(node.priority <= arena.node(child).priority);
                    stack.push(child);
                }
            }
        }
        assert_eq!(count, heap.len);
    }

    #[test]
    fn basic_operations() {
        let mut arena = NodeArena::new();
        let mut heap = FibonacciHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
        assert_eq!(heap.peek(&arena), None);

        heap.insert(&mut arena, 5, "a");
        heap.insert(&mut arena, 3, "b");
        heap.insert(&mut arena, 7, "c");

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.peek(&arena), Some((&3, &"b")));

        assert_eq!(heap.extract_min(&mut arena), Some((3, "b")));
        assert_eq!(heap.peek(&arena), Some((&5, &"a")));
        audit(&heap, &arena);
    }

    #[test]
    fn decrease_key_updates_min() {
        let mut arena = NodeArena::new();
        let mut heap = FibonacciHeap::new();
        let _h1 = heap.insert(&mut arena, 10, "a");
        let h2 = heap.insert(&mut arena, 20, "b");
        let h3 = heap.insert(&mut arena, 30, "c");

        assert_eq!(heap.peek(&arena), Some((&10, &"a")));

        heap.decrease_key(&mut arena, h2, 5).unwrap();
        assert_eq!(heap.peek(&arena), Some((&5, &"b")));

        heap.decrease_key(&mut arena, h3, 1).unwrap();
        assert_eq!(heap.peek(&arena), Some((&1, &"c")));
        audit(&heap, &arena);
    }

    #[test]
    fn decrease_key_to_equal_key_is_accepted() {
        let mut arena = NodeArena::new();
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(&mut arena, 10, ());
        assert_eq!(heap.decrease_key(&mut arena, h, 10), Ok(()));
        assert_eq!(heap.peek(&arena), Some((&10, &())));
    }

    #[test]
    fn key_increase_is_rejected_without_damage() {
        let mut arena = NodeArena::new();
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(&mut arena, 10, ());
        assert_eq!(
            heap.decrease_key(&mut arena, h, 11),
            Err(HeapError::KeyIncreased)
        );
        assert_eq!(heap.peek(&arena), Some((&10, &())));
        // the handle is still live afterwards
        assert_eq!(heap.decrease_key(&mut arena, h, 2), Ok(()));
        assert_eq!(heap.peek(&arena), Some((&2, &())));
    }

    #[test]
    fn stale_handle_is_rejected() {
        let mut arena = NodeArena::new();
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(&mut arena, 1, "x");
        assert_eq!(heap.extract_min(&mut arena), Some((1, "x")));
        assert_eq!(
            heap.decrease_key(&mut arena, h, 0),
            Err(HeapError::StaleHandle)
        );
        assert_eq!(heap.delete(&mut arena, h), Err(HeapError::StaleHandle));
    }

    #[test]
    fn delete_removes_an_interior_node() {
        let mut arena = NodeArena::new();
        let mut heap = FibonacciHeap::new();
        let mut handles = Vec::new();
        for k in [9, 4, 7, 1, 8, 2, 6] {
            handles.push((k, heap.insert(&mut arena, k, k)));
        }
        // force tree structure so some nodes gain parents
        assert_eq!(heap.extract_min(&mut arena), Some((1, 1)));
        audit(&heap, &arena);

        let (_, h7) = handles.iter().find(|(k, _)| *k == 7).copied().unwrap();
        assert_eq!(heap.delete(&mut arena, h7), Ok((7, 7)));
        assert_eq!(heap.len(), 5);
        audit(&heap, &arena);

        let mut drained = Vec::new();
        while let Some((k, _)) = heap.extract_min(&mut arena) {
            drained.push(k);
        }
        assert_eq!(drained, vec![2, 4, 6, 8, 9]);
    }

    #[test]
    fn merge_takes_smaller_min_and_empties_donor() {
        let mut arena = NodeArena::new();
        let mut a = FibonacciHeap::new();
        let mut b = FibonacciHeap::new();
        a.insert(&mut arena, 5, "a");
        a.insert(&mut arena, 10, "b");
        b.insert(&mut arena, 3, "c");
        b.insert(&mut arena, 7, "d");

        a.merge(&mut arena, &mut b);
        assert_eq!(a.peek(&arena), Some((&3, &"c")));
        assert_eq!(a.len(), 4);
        assert!(b.is_empty());
        assert_eq!(b.len(), 0);
        audit(&a, &arena);

        let mut drained = Vec::new();
        while let Some((k, _)) = a.extract_min(&mut arena) {
            drained.push(k);
        }
        assert_eq!(drained, vec![3, 5, 7, 10]);
    }

    #[test]
    fn merge_with_empty_heaps() {
        let mut arena = NodeArena::new();
        let mut a = FibonacciHeap::new();
        let mut b = FibonacciHeap::new();
        a.insert(&mut arena, 5, ());
        a.insert(&mut arena, 1, ());

        // empty donor leaves receiver untouched
        a.merge(&mut arena, &mut b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.peek(&arena), Some((&1, &())));

        // empty receiver adopts the donor wholesale
        let mut c = FibonacciHeap::new();
        c.merge(&mut arena, &mut a);
        assert_eq!(c.len(), 2);
        assert!(a.is_empty());
        audit(&c, &arena);
    }

    #[test]
    fn donor_handles_keep_working_after_merge() {
        let mut arena = NodeArena::new();
        let mut a = FibonacciHeap::new();
        let mut b = FibonacciHeap::new();
        a.insert(&mut arena, 2, "a");
        let hb = b.insert(&mut arena, 9, "b");
        a.merge(&mut arena, &mut b);

        a.decrease_key(&mut arena, hb, 1).unwrap();
        assert_eq!(a.peek(&arena), Some((&1, &"b")));
        audit(&a, &arena);
    }

    #[test]
    fn clear_releases_every_slot() {
        let mut arena = NodeArena::new();
        let mut heap = FibonacciHeap::new();
        for k in 0..50 {
            heap.insert(&mut arena, k, k);
        }
        // build some trees first
        heap.extract_min(&mut arena);
        assert_eq!(arena.len(), 49);
        heap.clear(&mut arena);
        assert!(heap.is_empty());
        assert!(arena.is_empty());
    }

    #[test]
    fn cascading_cut_survives_deep_decrease_chains() {
        // Repeated decrease rounds after a consolidation force marked
        // chains; the iterative cascading cut must keep the structure
        // consistent throughout.
        let mut arena = NodeArena::new();
        let mut heap = FibonacciHeap::new();
        let mut handles = Vec::new();
        for k in 0..256i64 {
            handles.push(heap.insert(&mut arena, 1000 + k, k));
        }
        heap.insert(&mut arena, 0, -1);
        assert_eq!(heap.extract_min(&mut arena), Some((0, -1)));
        audit(&heap, &arena);

        for (i, h) in handles.iter().enumerate().rev() {
            heap.decrease_key(&mut arena, *h, i as i64).unwrap();
            if i % 31 == 0 {
                audit(&heap, &arena);
            }
        }
        audit(&heap, &arena);

        let mut last = i64::MIN;
        while let Some((k, _)) = heap.extract_min(&mut arena) {
            assert!(k >= last);
            last = k;
        }
    }

    proptest! {
        #[test]
        fn structure_stays_valid_under_random_ops(
            ops in prop::collection::vec((0u8..3, -100i32..100), 0..200)
        ) {
            let mut arena = NodeArena::new();
            let mut heap = FibonacciHeap::new();
            let mut live: Vec<NodeHandle> = Vec::new();

            for (op, value) in ops {
                match op {
                    0 => {
                        live.push(heap.insert(&mut arena, value, value));
                    }
                    1 => {
                        if heap.extract_min(&mut arena).is_some() {
                            live.retain(|h| arena.get(h.0).is_some());
                        }
                    }
                    _ => {
                        if let Some(h) = live.last().copied() {
                            // may legitimately refuse a key increase
                            let _ = heap.decrease_key(&mut arena, h, value);
                        }
                    }
                }
                audit(&heap, &arena);
            }
        }
    }
}
