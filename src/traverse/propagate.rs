//! Bottom-up leaf propagation over the depth-first walk.
//!
//! Every aggregate extractor needs the same thing: by the time a node's
//! exit action runs, the occurrence information of its entire subtree must
//! be available on it. [`BottomUp`] provides that once, instead of each
//! listener re-implementing the stack: it keeps one frame per node on the
//! current root-to-node path, resolves a leaf's occurrences when the leaf
//! is entered, and merges each exiting frame's aggregate into its parent
//! before the parent itself exits. A node counts as its own leaf if it is
//! terminal.
//!
//! Merging happens strictly in child-visit order, so repeated entries in
//! downstream collectors line up with traversal order.

use serde::{Deserialize, Serialize};

use super::walker::{walk, TreeListener};
use crate::error::{GstError, Result};
use crate::tree::store::TreeStore;
use crate::tree::types::{DocumentId, NodeId, TypeContextId};

/// One resolved occurrence of a subtree leaf: which document the suffix
/// came from, the grouping it was indexed under, and where the occurrence
/// starts inside its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafOccurrence {
    pub type_context: TypeContextId,
    pub document: DocumentId,
    pub position: usize,
}

/// Per-node frame carried on the propagation stack.
#[derive(Debug)]
pub struct SubtreeFrame {
    pub node: NodeId,
    pub level: usize,
    /// Characters from the root through this node's edge
    pub string_depth: usize,
    /// The substring this node represents (concatenated edge labels)
    pub path_label: String,
    /// Terminal nodes in this subtree, self included if terminal
    pub leaf_count: u64,
    /// Aggregated occurrences of the whole subtree, in traversal order
    pub occurrences: Vec<LeafOccurrence>,
}

/// Exit-time consumer of aggregated frames. `enter` fires before any of
/// the node's children are visited; `exit` fires when the frame carries
/// the whole-subtree aggregate; `finish` fires once after the walk.
pub trait BottomUpVisitor {
    fn enter(&mut self, _tree: &TreeStore, _frame: &SubtreeFrame, _path: &[SubtreeFrame]) -> Result<()> {
        Ok(())
    }

    fn exit(&mut self, tree: &TreeStore, frame: &SubtreeFrame, path: &[SubtreeFrame]) -> Result<()>;

    fn finish(&mut self, _tree: &TreeStore) -> Result<()> {
        Ok(())
    }
}

/// Adapter turning a [`BottomUpVisitor`] into a [`TreeListener`].
pub struct BottomUp<V> {
    visitor: V,
    stack: Vec<SubtreeFrame>,
    /// Aggregate of the walk's start node, kept after its frame pops
    root_aggregate: Option<SubtreeFrame>,
}

impl<V: BottomUpVisitor> BottomUp<V> {
    pub fn new(visitor: V) -> Self {
        Self {
            visitor,
            stack: Vec::new(),
            root_aggregate: None,
        }
    }

    fn resolve_leaf(tree: &TreeStore, node: NodeId, string_depth: usize) -> Vec<LeafOccurrence> {
        let Some(n) = tree.node(node) else {
            return Vec::new();
        };
        if !n.is_leaf() {
            return Vec::new();
        }
        n.occurrences
            .iter()
            .map(|occ| {
                let end = tree.occurrence_end(occ);
                let suffix_start = end - string_depth;
                let doc_begin = tree.document_begin(occ.document).unwrap_or(0);
                LeafOccurrence {
                    type_context: occ.type_context,
                    document: occ.document,
                    position: suffix_start - doc_begin,
                }
            })
            .collect()
    }

    /// Consume the adapter after a completed walk. Returns the visitor and
    /// the start node's aggregate; fails if the walk left frames behind.
    pub fn into_parts(mut self, tree: &TreeStore) -> Result<(V, Option<SubtreeFrame>)> {
        if let Some(frame) = self.stack.last() {
            return Err(GstError::UnbalancedTraversal { node: frame.node });
        }
        self.visitor.finish(tree)?;
        Ok((self.visitor, self.root_aggregate))
    }
}

impl<V: BottomUpVisitor> TreeListener for BottomUp<V> {
    fn on_enter(&mut self, tree: &TreeStore, node: NodeId, level: usize) -> Result<()> {
        let (parent_depth, parent_label) = match self.stack.last() {
            Some(parent) => (parent.string_depth, parent.path_label.as_str()),
            None => (0, ""),
        };
        let edge = tree.edge_string(node);
        let string_depth = parent_depth + tree.edge_len(node);
        let mut path_label = String::with_capacity(parent_label.len() + edge.len());
        path_label.push_str(parent_label);
        path_label.push_str(&edge);

        let occurrences = Self::resolve_leaf(tree, node, string_depth);
        let leaf_count = if occurrences.is_empty() { 0 } else { 1 };

        self.stack.push(SubtreeFrame {
            node,
            level,
            string_depth,
            path_label,
            leaf_count,
            occurrences,
        });
        if let Some((frame, path)) = self.stack.split_last() {
            self.visitor.enter(tree, frame, path)?;
        }
        Ok(())
    }

    fn on_exit(&mut self, tree: &TreeStore, node: NodeId, _level: usize) -> Result<()> {
        let Some(frame) = self.stack.pop() else {
            return Err(GstError::UnbalancedTraversal { node });
        };
        if frame.node != node {
            return Err(GstError::UnbalancedTraversal { node });
        }
        self.visitor.exit(tree, &frame, &self.stack)?;

        match self.stack.last_mut() {
            Some(parent) => {
                parent.leaf_count += frame.leaf_count;
                parent.occurrences.extend(frame.occurrences);
            }
            None => self.root_aggregate = Some(frame),
        }
        Ok(())
    }
}

/// Run a bottom-up walk from `start` and return the visitor together with
/// the start node's whole-subtree aggregate.
pub fn walk_bottom_up<V: BottomUpVisitor>(
    tree: &TreeStore,
    start: NodeId,
    visitor: V,
) -> Result<(V, Option<SubtreeFrame>)> {
    let mut adapter = BottomUp::new(visitor);
    walk(tree, start, &mut adapter)?;
    adapter.into_parts(tree)
}
