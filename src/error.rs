//! Error type for heap operations
//!
//! Every failure the heap can report is a typed outcome; nothing in the
//! library panics on caller mistakes. An empty heap is not an error: `peek`
//! and `extract_min` signal it with `None`.

use std::fmt;

/// Error type for handle-based heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `decrease_key` was called with a key greater than the node's current
    /// key. Applying it would break the heap-order invariant, so it is
    /// rejected instead of silently clamped.
    KeyIncreased,
    /// The handle refers to a node that has already been extracted or
    /// deleted. Handles are generation-tagged, so reuse after removal is
    /// detected rather than corrupting the structure.
    StaleHandle,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::KeyIncreased => {
                write!(f, "new key is greater than the node's current key")
            }
            HeapError::StaleHandle => {
                write!(f, "handle refers to a node that was already removed")
            }
        }
    }
}

impl std::error::Error for HeapError {}
