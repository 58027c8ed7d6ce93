//! Mergeable Fibonacci priority queue with minimum spanning tree drivers
//!
//! This crate provides an arena-backed Fibonacci heap with the classic
//! mergeable-heap complexity bounds, plus three MST algorithms built on it.
//!
//! # Features
//!
//! - **Fibonacci Heap**: O(1) amortized insert, decrease_key, and merge;
//!   O(log n) amortized extract_min; handle-based access to interior nodes
//! - **Node Arena**: slotmap-backed storage with generation-tagged handles,
//!   so use of a handle after its node was removed is a typed error instead
//!   of undefined behavior
//! - **MST Drivers**: Prim's algorithm, single Boruvka phases, and a
//!   Fredman-Tarjan-style multi-heap Boruvka, all consuming the heap API
//!
//! # Example
//!
//! ```rust
//! use fibonacci_mst::{FibonacciHeap, NodeArena};
//!
//! let mut arena = NodeArena::new();
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.insert(&mut arena, 5, "item1");
//! let _handle2 = heap.insert(&mut arena, 3, "item2");
//! heap.decrease_key(&mut arena, handle1, 1).unwrap();
//! assert_eq!(heap.peek(&arena), Some((&1, &"item1")));
//! ```

pub mod arena;
pub mod error;
pub mod fibonacci;
pub mod mst;
pub mod union_find;

// Re-export the core types for convenience
pub use arena::{NodeArena, NodeHandle};
pub use error::HeapError;
pub use fibonacci::FibonacciHeap;
