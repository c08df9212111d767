//! Structured per-label statistics.
//!
//! One record per node, in traversal (post-) order: the node's path
//! label, its place in the tree (level, sibling and child counts), and the
//! aggregated occurrence tuples of its subtree. Repeated-occurrence
//! entries keep traversal order so downstream consumers can correlate the
//! parallel lists by index.

use crate::error::Result;
use crate::traverse::propagate::{walk_bottom_up, BottomUpVisitor, LeafOccurrence, SubtreeFrame};
use crate::tree::store::TreeStore;
use crate::tree::types::NodeId;

/// Statistics for one node of the tree.
#[derive(Debug, Clone)]
pub struct LabelStats {
    pub node: NodeId,
    /// The substring this node represents
    pub label: String,
    /// Depth in nodes below the walk start
    pub level: usize,
    /// Other children of this node's parent
    pub siblings: usize,
    /// Direct children of this node
    pub children: usize,
    /// Terminal nodes in this subtree
    pub leaves: u64,
    /// Aggregated occurrence count (the label's frequency)
    pub frequency: u64,
    /// One entry per occurrence position, in traversal order
    pub occurrences: Vec<LeafOccurrence>,
}

/// Bottom-up visitor producing a [`LabelStats`] record per node.
#[derive(Default)]
pub struct StatsCollector {
    records: Vec<LabelStats>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[LabelStats] {
        &self.records
    }

    pub fn into_records(self) -> Vec<LabelStats> {
        self.records
    }
}

impl BottomUpVisitor for StatsCollector {
    fn exit(&mut self, tree: &TreeStore, frame: &SubtreeFrame, path: &[SubtreeFrame]) -> Result<()> {
        // The walk start (empty label) is the wrapper, not a record.
        let Some(parent) = path.last() else {
            return Ok(());
        };
        let siblings = tree
            .node(parent.node)
            .map(|n| n.children.len().saturating_sub(1))
            .unwrap_or(0);
        let children = tree.node(frame.node).map(|n| n.children.len()).unwrap_or(0);

        self.records.push(LabelStats {
            node: frame.node,
            label: frame.path_label.clone(),
            level: frame.level,
            siblings,
            children,
            leaves: frame.leaf_count,
            frequency: frame.occurrences.len() as u64,
            occurrences: frame.occurrences.clone(),
        });
        Ok(())
    }
}

/// Collect per-node statistics for the whole tree.
pub fn collect_stats(tree: &TreeStore) -> Result<Vec<LabelStats>> {
    let (collector, _) = walk_bottom_up(tree, tree.root(), StatsCollector::new())?;
    Ok(collector.into_records())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::builder::build_tree;
    use crate::tree::types::GstConfig;

    fn stats_for<'a>(records: &'a [LabelStats], label: &str) -> &'a LabelStats {
        records.iter().find(|r| r.label == label).unwrap()
    }

    #[test]
    fn test_structure_counts() {
        let tree = build_tree(&GstConfig::default(), ["abab"]).unwrap();
        let records = collect_stats(&tree).unwrap();

        // Root children: "ab", "b", "$".
        let ab = stats_for(&records, "ab");
        assert_eq!(ab.level, 1);
        assert_eq!(ab.siblings, 2);
        assert_eq!(ab.children, 2);
        assert_eq!(ab.leaves, 2);
        assert_eq!(ab.frequency, 2);

        let whole = stats_for(&records, "abab$");
        assert_eq!(whole.level, 2);
        assert_eq!(whole.children, 0);
        assert_eq!(whole.frequency, 1);
        assert_eq!(whole.occurrences[0].position, 0);
    }

    #[test]
    fn test_occurrence_positions_in_order() {
        let tree = build_tree(&GstConfig::default(), ["abab"]).unwrap();
        let records = collect_stats(&tree).unwrap();

        // "ab" occurs at positions 0 and 2; children are visited "$"
        // before "ab$"-tail... order follows ascending edge characters.
        let ab = stats_for(&records, "ab");
        let mut positions: Vec<usize> = ab.occurrences.iter().map(|o| o.position).collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn test_records_cover_all_nodes_but_the_root() {
        let tree = build_tree(&GstConfig::default(), ["banana"]).unwrap();
        let records = collect_stats(&tree).unwrap();
        assert_eq!(records.len(), tree.node_count() - 1);
    }

    #[test]
    fn test_type_context_reaches_records() {
        let mut builder = crate::tree::builder::GstBuilder::with_defaults()
            .with_type_contexts(&[0, 1])
            .unwrap();
        builder.add_documents(["ax", "bx"]).unwrap();
        let tree = builder.finish().unwrap();

        let records = collect_stats(&tree).unwrap();
        let ax = stats_for(&records, "ax$");
        assert_eq!(ax.occurrences[0].type_context, 0);
        let bx = stats_for(&records, "bx$");
        assert_eq!(bx.occurrences[0].type_context, 1);
    }
}
