//! Types for the generalized suffix tree store.
//!
//! Nodes live in a flat arena and are addressed by stable integer handles;
//! handles grow monotonically and are never reused. Edge labels are not
//! stored as strings: each node carries occurrence records whose
//! `(start, end)` offsets delimit the label inside the shared text buffer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable handle of a node in the arena
pub type NodeId = u32;

/// Index of an input document, assigned strictly increasingly
pub type DocumentId = u32;

/// Caller-defined grouping of documents, coarser than document numbers
pub type TypeContextId = u32;

/// Handle of a shared end marker (one per document)
pub type MarkerId = u32;

/// Handle of the arena root
pub const ROOT: NodeId = 0;

/// Sentinel character terminating every document in the text buffer.
/// Input documents must not contain it.
pub const DEFAULT_SENTINEL: char = '$';

/// End offset of an edge label: fixed, or tracking the shared marker of a
/// still-open document so that every open leaf advances in O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    /// Final buffer offset (exclusive)
    Fixed(usize),
    /// Follows the end marker of the referenced document
    Open(MarkerId),
}

/// One concrete instance of an edge label in the input:
/// `[start, end)` delimits the label in the text buffer as of this
/// occurrence, `document` is the input document that produced it, and
/// `type_context` the grouping active when it was recorded.
///
/// Internal nodes carry exactly one occurrence (it only fixes the edge
/// span); leaves carry one per document suffix ending there, which is what
/// makes the tree generalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub start: usize,
    pub end: EdgeEnd,
    pub document: DocumentId,
    pub type_context: TypeContextId,
}

/// A node in the arena. Children are keyed by the first character of the
/// edge label leading to them; the ordered map keeps traversal order stable
/// and enforces at most one child per distinct start character.
#[derive(Debug)]
pub struct Node {
    pub children: BTreeMap<char, NodeId>,
    pub suffix_link: Option<NodeId>,
    pub occurrences: Vec<Occurrence>,
}

impl Node {
    pub(crate) fn new(occurrence: Occurrence) -> Self {
        Self {
            children: BTreeMap::new(),
            suffix_link: None,
            occurrences: vec![occurrence],
        }
    }

    /// Terminal nodes have no children; only they may carry more than one
    /// occurrence.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Configuration for tree construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GstConfig {
    /// Reserved document separator (default: '$')
    pub sentinel: char,
    /// Seed the cursor through already-indexed duplicate prefixes instead
    /// of re-running the per-character update (default: true). Produces a
    /// tree identical to the naive path.
    pub fast_forward: bool,
    /// Expected total character count across all documents; sizes the node
    /// arena and text buffer up front (default: 1024)
    pub capacity_hint: usize,
}

impl Default for GstConfig {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL,
            fast_forward: true,
            capacity_hint: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_is_childless() {
        let occ = Occurrence {
            start: 0,
            end: EdgeEnd::Fixed(0),
            document: 0,
            type_context: 0,
        };
        let mut node = Node::new(occ);
        assert!(node.is_leaf());

        node.children.insert('a', 1);
        assert!(!node.is_leaf());
    }

    #[test]
    fn test_config_defaults() {
        let config = GstConfig::default();
        assert_eq!(config.sentinel, '$');
        assert!(config.fast_forward);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = GstConfig {
            sentinel: '\u{0}',
            fast_forward: false,
            capacity_hint: 64,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: GstConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sentinel, '\u{0}');
        assert!(!back.fast_forward);
        assert_eq!(back.capacity_hint, 64);
    }
}
