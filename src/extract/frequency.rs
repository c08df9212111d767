//! Per-label frequency extraction.
//!
//! A label here is the full path string a node represents; its frequency
//! is the number of occurrences aggregated from the node's subtree across
//! all documents. Entries are recorded in traversal (post-) order.

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::traverse::propagate::{walk_bottom_up, BottomUpVisitor, SubtreeFrame};
use crate::tree::store::TreeStore;

/// Bottom-up visitor recording `(path label, frequency)` per node.
#[derive(Default)]
pub struct FrequencyCollector {
    entries: Vec<(String, u64)>,
}

impl FrequencyCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(label, frequency)` pairs in traversal order
    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, u64)> {
        self.entries
    }

    /// Collapse the entries into a label-keyed map.
    pub fn totals(&self) -> FxHashMap<String, u64> {
        let mut totals = FxHashMap::default();
        for (label, frequency) in &self.entries {
            *totals.entry(label.clone()).or_insert(0) += frequency;
        }
        totals
    }
}

impl BottomUpVisitor for FrequencyCollector {
    fn exit(
        &mut self,
        _tree: &TreeStore,
        frame: &SubtreeFrame,
        _path: &[SubtreeFrame],
    ) -> Result<()> {
        if frame.path_label.is_empty() {
            return Ok(());
        }
        self.entries
            .push((frame.path_label.clone(), frame.occurrences.len() as u64));
        Ok(())
    }
}

/// Compute the label → frequency map of the whole tree.
pub fn label_frequencies(tree: &TreeStore) -> Result<FxHashMap<String, u64>> {
    let (collector, _) = walk_bottom_up(tree, tree.root(), FrequencyCollector::new())?;
    Ok(collector.totals())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::builder::build_tree;
    use crate::tree::types::GstConfig;

    #[test]
    fn test_abab_frequencies() {
        let tree = build_tree(&GstConfig::default(), ["abab"]).unwrap();
        let frequencies = label_frequencies(&tree).unwrap();

        assert_eq!(frequencies["ab"], 2);
        assert_eq!(frequencies["b"], 2);
        assert_eq!(frequencies["abab$"], 1);
        assert_eq!(frequencies["$"], 1);
    }

    #[test]
    fn test_frequencies_span_documents() {
        let tree = build_tree(&GstConfig::default(), ["ab", "ab", "b"]).unwrap();
        let frequencies = label_frequencies(&tree).unwrap();

        // "b$" ends one suffix in each document; "ab$" only in the two
        // copies of "ab". Every sentinel suffix shares the "$" leaf.
        assert_eq!(frequencies["b$"], 3);
        assert_eq!(frequencies["ab$"], 2);
        assert_eq!(frequencies["$"], 3);
    }

    #[test]
    fn test_path_labels_are_unique_per_node() {
        let tree = build_tree(&GstConfig::default(), ["mississippi"]).unwrap();
        let (collector, _) =
            walk_bottom_up(&tree, tree.root(), FrequencyCollector::new()).unwrap();
        let mut labels: Vec<&str> = collector
            .entries()
            .iter()
            .map(|(l, _)| l.as_str())
            .collect();
        let total = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), total);
    }
}
