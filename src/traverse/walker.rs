//! Depth-first walker and the listener contract.
//!
//! The walker is the only way read-side code observes the tree: it calls
//! the listener's entry action before descending into a node's children
//! (ascending by edge-start character) and the exit action after every
//! child has been processed. The walk itself performs no I/O and holds an
//! explicit stack, so deep trees cannot overflow the call stack.

use crate::error::Result;
use crate::tree::store::TreeStore;
use crate::tree::types::NodeId;

/// Entry/exit actions invoked by the depth-first walk. Either action may
/// be a no-op for listeners that only care about one direction.
pub trait TreeListener {
    fn on_enter(&mut self, _tree: &TreeStore, _node: NodeId, _level: usize) -> Result<()> {
        Ok(())
    }

    fn on_exit(&mut self, _tree: &TreeStore, _node: NodeId, _level: usize) -> Result<()> {
        Ok(())
    }
}

struct Visit {
    node: NodeId,
    level: usize,
    children: Vec<NodeId>,
    next: usize,
}

fn visit(tree: &TreeStore, node: NodeId, level: usize) -> Visit {
    let children = match tree.node(node) {
        Some(n) => n.children.values().copied().collect(),
        None => Vec::new(),
    };
    Visit {
        node,
        level,
        children,
        next: 0,
    }
}

/// Depth-first walk from `start` (normally the root). An unknown start
/// handle visits nothing.
pub fn walk<L: TreeListener + ?Sized>(
    tree: &TreeStore,
    start: NodeId,
    listener: &mut L,
) -> Result<()> {
    if tree.node(start).is_none() {
        return Ok(());
    }

    listener.on_enter(tree, start, 0)?;
    let mut stack = vec![visit(tree, start, 0)];

    while let Some(top) = stack.last_mut() {
        if top.next < top.children.len() {
            let child = top.children[top.next];
            top.next += 1;
            let level = top.level + 1;
            listener.on_enter(tree, child, level)?;
            stack.push(visit(tree, child, level));
        } else {
            let done = stack.pop();
            if let Some(done) = done {
                listener.on_exit(tree, done.node, done.level)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::builder::build_tree;
    use crate::tree::types::GstConfig;

    /// Records enter/exit events for order assertions.
    #[derive(Default)]
    struct Recorder {
        events: Vec<(bool, NodeId, usize)>,
    }

    impl TreeListener for Recorder {
        fn on_enter(&mut self, _tree: &TreeStore, node: NodeId, level: usize) -> Result<()> {
            self.events.push((true, node, level));
            Ok(())
        }

        fn on_exit(&mut self, _tree: &TreeStore, node: NodeId, level: usize) -> Result<()> {
            self.events.push((false, node, level));
            Ok(())
        }
    }

    #[test]
    fn test_enter_exit_pair_per_node() {
        let tree = build_tree(&GstConfig::default(), ["abab"]).unwrap();
        let mut recorder = Recorder::default();
        walk(&tree, tree.root(), &mut recorder).unwrap();

        let enters = recorder.events.iter().filter(|(e, _, _)| *e).count();
        let exits = recorder.events.len() - enters;
        assert_eq!(enters, tree.node_count());
        assert_eq!(exits, tree.node_count());

        // Post-order: the walk start exits last.
        let last = recorder.events.last().unwrap();
        assert_eq!(*last, (false, tree.root(), 0));
    }

    #[test]
    fn test_children_visited_in_edge_char_order() {
        let tree = build_tree(&GstConfig::default(), ["cba"]).unwrap();
        let mut recorder = Recorder::default();
        walk(&tree, tree.root(), &mut recorder).unwrap();

        // Depth-1 entries in visit order; their edge labels must be sorted
        // by first character.
        let first_chars: Vec<char> = recorder
            .events
            .iter()
            .filter(|(enter, _, level)| *enter && *level == 1)
            .map(|(_, node, _)| tree.edge_string(*node).chars().next().unwrap())
            .collect();
        let mut sorted = first_chars.clone();
        sorted.sort_unstable();
        assert_eq!(first_chars, sorted);
    }

    #[test]
    fn test_walk_from_unknown_node_is_empty() {
        let tree = build_tree(&GstConfig::default(), ["ab"]).unwrap();
        let mut recorder = Recorder::default();
        walk(&tree, 4242, &mut recorder).unwrap();
        assert!(recorder.events.is_empty());
    }

    #[test]
    fn test_walk_from_subtree_node() {
        let tree = build_tree(&GstConfig::default(), ["abab"]).unwrap();
        // Start from the 'a' child of the root; levels are relative to it.
        let a_child = *tree
            .node(tree.root())
            .unwrap()
            .children
            .get(&'a')
            .unwrap();
        let mut recorder = Recorder::default();
        walk(&tree, a_child, &mut recorder).unwrap();
        assert_eq!(recorder.events.first().unwrap(), &(true, a_child, 0));
        assert_eq!(recorder.events.last().unwrap(), &(false, a_child, 0));
    }
}
