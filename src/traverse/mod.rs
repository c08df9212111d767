//! Depth-first traversal protocol.
//!
//! The walker visits nodes entry-first, children in ascending
//! edge-start-character order, exit after all children — and listeners
//! observe the tree only through those two actions. `propagate` layers the
//! bottom-up leaf aggregation that every statistics extractor shares.

pub mod propagate;
pub mod walker;

pub use propagate::{walk_bottom_up, BottomUp, BottomUpVisitor, LeafOccurrence, SubtreeFrame};
pub use walker::{walk, TreeListener};
