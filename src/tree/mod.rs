//! Generalized suffix tree construction.
//!
//! - `types`: handles, occurrence records, configuration
//! - `store`: node arena and the per-character update step
//! - `builder`: document-sequence driver (sentinels, type contexts,
//!   duplicate fast-forward)
//!
//! The tree is built once and queried/traversed many times within a
//! single-threaded lifetime; construction either completes or fails
//! fatally, never partially.

pub mod builder;
pub mod store;
pub mod types;

pub use builder::{build_tree, GstBuilder};
pub use store::{PathMatch, TreeStore};
pub use types::{
    DocumentId, EdgeEnd, GstConfig, Node, NodeId, Occurrence, TypeContextId, DEFAULT_SENTINEL,
    ROOT,
};
