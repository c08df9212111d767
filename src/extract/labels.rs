//! Distinct edge label collection.
//!
//! The simplest listener shape: entry-only, no propagation. Labels are
//! kept in a sorted set so repeated extraction is deterministic.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::traverse::walker::{walk, TreeListener};
use crate::tree::store::TreeStore;
use crate::tree::types::NodeId;

/// Entry-only listener collecting the set of distinct edge labels.
#[derive(Default)]
pub struct LabelSetCollector {
    labels: BTreeSet<String>,
}

impl LabelSetCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_labels(self) -> BTreeSet<String> {
        self.labels
    }
}

impl TreeListener for LabelSetCollector {
    fn on_enter(&mut self, tree: &TreeStore, node: NodeId, _level: usize) -> Result<()> {
        let label = tree.edge_string(node);
        if !label.is_empty() {
            self.labels.insert(label);
        }
        Ok(())
    }
}

/// Collect the distinct edge labels of the whole tree.
pub fn collect_labels(tree: &TreeStore) -> Result<BTreeSet<String>> {
    let mut collector = LabelSetCollector::new();
    walk(tree, tree.root(), &mut collector)?;
    Ok(collector.into_labels())
}
