//! Node arena and the per-character construction step.
//!
//! The store owns the concatenated text buffer, the document boundary
//! table, and a flat arena of nodes addressed by integer handles. Handles
//! are growth-only: nodes are created during construction and never
//! deleted. Suffix links cross subtrees freely, which is why the graph is
//! held as an arena rather than an owned tree.
//!
//! Still-open leaves do not store their end offset directly; they
//! reference the end marker of the document being indexed, so advancing
//! the write position extends every open leaf in O(1). A document's marker
//! is frozen when its sentinel is consumed.
//!
//! All cursor state (active point, remainder, open document) lives on the
//! instance; independent trees never interfere.

use super::types::{
    DocumentId, EdgeEnd, GstConfig, MarkerId, Node, NodeId, Occurrence, TypeContextId,
    DEFAULT_SENTINEL, ROOT,
};
use crate::error::{GstError, Result};

/// Result of matching a query against existing edges: how far the walk
/// got and the canonical position it ended at. `edge_offset` indexes into
/// the query, not the text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMatch {
    /// Characters of the query consumed
    pub matched: usize,
    /// Deepest node fully entered
    pub node: NodeId,
    /// Offset into the query of the first character of the partially
    /// matched edge (meaningful when `length > 0`)
    pub edge_offset: usize,
    /// Characters matched along the edge below `node`
    pub length: usize,
}

/// Generalized suffix tree store.
#[derive(Debug)]
pub struct TreeStore {
    nodes: Vec<Node>,
    text: Vec<char>,
    sentinel: char,
    /// Start offset of each document in the text buffer
    doc_begins: Vec<usize>,
    /// Shared end markers, one per document; the open document's marker
    /// advances with every appended character
    end_markers: Vec<usize>,
    open_marker: Option<MarkerId>,
    current_document: Option<DocumentId>,
    type_context: TypeContextId,
    // Ukkonen cursor
    active_node: NodeId,
    active_edge: usize,
    active_length: usize,
    remainder: usize,
}

impl TreeStore {
    /// Allocate a store sized for `capacity_hint` total input characters.
    /// The arena reserves `2 * capacity_hint + 2` slots, the most a suffix
    /// tree over that much text can need.
    pub fn new(capacity_hint: usize) -> Self {
        Self::with_sentinel(capacity_hint, DEFAULT_SENTINEL)
    }

    /// Same as [`TreeStore::new`] with a caller-chosen sentinel character.
    pub fn with_sentinel(capacity_hint: usize, sentinel: char) -> Self {
        let mut nodes = Vec::with_capacity(2 * capacity_hint + 2);
        nodes.push(Node::new(Occurrence {
            start: 0,
            end: EdgeEnd::Fixed(0),
            document: 0,
            type_context: 0,
        }));
        Self {
            nodes,
            text: Vec::with_capacity(capacity_hint),
            sentinel,
            doc_begins: Vec::new(),
            end_markers: Vec::new(),
            open_marker: None,
            current_document: None,
            type_context: 0,
            active_node: ROOT,
            active_edge: 0,
            active_length: 0,
            remainder: 0,
        }
    }

    pub fn from_config(config: &GstConfig) -> Self {
        Self::with_sentinel(config.capacity_hint, config.sentinel)
    }

    /// Open the next document. Document numbers are strictly increasing
    /// and a new document may only start after the previous sentinel was
    /// consumed; both are checked, not assumed.
    pub fn begin_document(&mut self, document: DocumentId) -> Result<()> {
        if let Some(open) = self.current_document {
            return Err(GstError::DocumentStillOpen { previous: open });
        }
        let expected = self.doc_begins.len() as DocumentId;
        if document != expected {
            return Err(GstError::DocumentOutOfSequence { document, expected });
        }
        if self.remainder != 0 || self.active_length != 0 || self.active_node != ROOT {
            return Err(GstError::CorruptCursor {
                detail: "cursor not at root at document start",
            });
        }
        self.doc_begins.push(self.text.len());
        self.end_markers.push(self.text.len());
        self.open_marker = Some((self.end_markers.len() - 1) as MarkerId);
        self.current_document = Some(document);
        Ok(())
    }

    /// The single-character update step. Appending the sentinel closes the
    /// current document: its end marker freezes and every suffix of the
    /// document is explicit in the tree (as a leaf or a recorded
    /// occurrence) when this returns.
    pub fn append_char(&mut self, c: char, document: DocumentId) -> Result<()> {
        match self.current_document {
            Some(open) if open == document => {}
            Some(open) => {
                return Err(GstError::DocumentOutOfSequence {
                    document,
                    expected: open,
                });
            }
            None => return Err(GstError::NoOpenDocument),
        }
        self.extend(c, document)?;
        if c == self.sentinel {
            if self.remainder != 0 {
                return Err(GstError::CorruptCursor {
                    detail: "pending suffixes survived the document sentinel",
                });
            }
            self.open_marker = None;
            self.current_document = None;
        }
        Ok(())
    }

    fn extend(&mut self, c: char, document: DocumentId) -> Result<()> {
        let pos = self.text.len();
        self.text.push(c);
        if let Some(marker) = self.open_marker {
            self.end_markers[marker as usize] = pos + 1;
        }
        self.remainder += 1;
        let mut pending: Option<NodeId> = None;

        while self.remainder > 0 {
            if self.active_length == 0 {
                self.active_edge = pos;
            }
            let edge_char = self.text[self.active_edge];
            match self.node_ref(self.active_node).children.get(&edge_char).copied() {
                None => {
                    // No outgoing edge starts with the active character:
                    // grow a fresh leaf under the active node.
                    if self.active_node != ROOT && self.node_ref(self.active_node).is_leaf() {
                        return Err(GstError::CorruptCursor {
                            detail: "terminal node used as a branch point",
                        });
                    }
                    let leaf = self.new_leaf(pos, document);
                    self.node_mut(self.active_node).children.insert(edge_char, leaf);
                    self.link_pending(&mut pending, self.active_node);
                }
                Some(next) => {
                    // The cursor never rests past the end of an edge.
                    let span = self.edge_len(next);
                    if self.active_length >= span {
                        self.active_edge += span;
                        self.active_length -= span;
                        self.active_node = next;
                        continue;
                    }
                    let probe = self.first_occurrence(next).start + self.active_length;
                    if self.text[probe] == c {
                        if c == self.sentinel {
                            // The whole pending tail of this document
                            // repeats earlier content; record it on the
                            // existing leaves instead of growing new ones.
                            self.link_pending(&mut pending, self.active_node);
                            return self.add_remaining_suffixes(document);
                        }
                        // Suffix already implicit; only the cursor moves.
                        self.link_pending(&mut pending, self.active_node);
                        self.active_length += 1;
                        return Ok(());
                    }
                    let split = self.split_edge(next, edge_char);
                    let leaf = self.new_leaf(pos, document);
                    self.node_mut(split).children.insert(c, leaf);
                    self.link_pending(&mut pending, split);
                    pending = Some(split);
                }
            }
            self.remainder -= 1;
            if self.active_node == ROOT && self.active_length > 0 {
                self.active_length -= 1;
                self.active_edge = pos - self.remainder + 1;
            } else if self.active_node != ROOT {
                self.active_node = self
                    .node_ref(self.active_node)
                    .suffix_link
                    .unwrap_or(ROOT);
            }
        }
        Ok(())
    }

    /// Record the pending suffixes of a closing document on the terminal
    /// nodes they already (implicitly) end at, without creating new tree
    /// structure. A pending suffix that cannot be matched against existing
    /// edges, or that ends at a branching node, is a bookkeeping bug and
    /// aborts the build.
    pub fn add_remaining_suffixes(&mut self, document: DocumentId) -> Result<()> {
        let end = self.text.len();
        let first = end - self.remainder;
        for suffix_start in first..end {
            self.record_implicit_suffix(suffix_start, end, document)?;
        }
        self.remainder = 0;
        self.active_node = ROOT;
        self.active_length = 0;
        self.active_edge = end;
        Ok(())
    }

    fn record_implicit_suffix(
        &mut self,
        suffix_start: usize,
        end: usize,
        document: DocumentId,
    ) -> Result<()> {
        let mut node = ROOT;
        let mut j = suffix_start;
        loop {
            let c = self.text[j];
            let Some(&child) = self.node_ref(node).children.get(&c) else {
                return Err(GstError::MissingEdge {
                    node,
                    ch: c,
                    document,
                    offset: j,
                });
            };
            let occ = self.first_occurrence(child);
            let span = self.edge_len(child);
            let take = span.min(end - j);
            for k in 0..take {
                if self.text[occ.start + k] != self.text[j + k] {
                    return Err(GstError::EdgeMismatch {
                        node: child,
                        document,
                        offset: j + k,
                    });
                }
            }
            j += take;
            if j == end {
                if take < span || !self.node_ref(child).is_leaf() {
                    return Err(GstError::ExpectedTerminal {
                        node: child,
                        document,
                    });
                }
                let occurrence = Occurrence {
                    start: j - take,
                    end: EdgeEnd::Fixed(end),
                    document,
                    type_context: self.type_context,
                };
                let duplicate = self
                    .node_ref(child)
                    .occurrences
                    .iter()
                    .any(|o| o.start == occurrence.start && o.document == document);
                if duplicate {
                    return Err(GstError::DuplicateOccurrence {
                        node: child,
                        start: occurrence.start,
                        document,
                    });
                }
                self.node_mut(child).occurrences.push(occurrence);
                return Ok(());
            }
            node = child;
        }
    }

    /// Walk existing edges from `start_node` as far as `text` matches.
    /// Used to fast-forward through a document that duplicates previously
    /// indexed content.
    pub fn longest_existing_path(&self, text: &[char], start_node: NodeId) -> PathMatch {
        let mut node = start_node;
        let mut i = 0;
        if self.node(start_node).is_none() {
            return PathMatch {
                matched: 0,
                node: start_node,
                edge_offset: 0,
                length: 0,
            };
        }
        while i < text.len() {
            let Some(&child) = self.node_ref(node).children.get(&text[i]) else {
                break;
            };
            let occ = self.first_occurrence(child);
            let span = self.edge_len(child);
            let mut k = 0;
            while k < span && i + k < text.len() && self.text[occ.start + k] == text[i + k] {
                k += 1;
            }
            if k == span {
                node = child;
                i += span;
                continue;
            }
            return PathMatch {
                matched: i + k,
                node,
                edge_offset: i,
                length: k,
            };
        }
        PathMatch {
            matched: i,
            node,
            edge_offset: i,
            length: 0,
        }
    }

    /// Append a duplicated prefix of the open document without running the
    /// per-character update: the matched characters enter the buffer, the
    /// pending-suffix count grows by the match length, and the cursor is
    /// seeded at the end of the matched path. Produces the same tree the
    /// naive path would.
    ///
    /// Returns how many characters were consumed; the caller feeds the
    /// rest through [`TreeStore::append_char`].
    pub fn fast_forward(&mut self, document: DocumentId, content: &[char]) -> Result<usize> {
        match self.current_document {
            Some(open) if open == document => {}
            Some(open) => {
                return Err(GstError::DocumentOutOfSequence {
                    document,
                    expected: open,
                });
            }
            None => return Err(GstError::NoOpenDocument),
        }
        if self.remainder != 0 || self.active_length != 0 || self.active_node != ROOT {
            return Err(GstError::CorruptCursor {
                detail: "fast-forward requires a clean cursor",
            });
        }
        let found = self.longest_existing_path(content, ROOT);
        if found.matched == 0 {
            return Ok(0);
        }
        let base = self.text.len();
        self.text.extend_from_slice(&content[..found.matched]);
        if let Some(marker) = self.open_marker {
            self.end_markers[marker as usize] = self.text.len();
        }
        self.remainder = found.matched;
        self.active_node = found.node;
        self.active_length = found.length;
        self.active_edge = base
            + if found.length > 0 {
                found.edge_offset
            } else {
                found.matched
            };
        Ok(found.matched)
    }

    /// The substring labeling the edge into `node`, clipped to the tree's
    /// current extent. The root has an empty label.
    pub fn edge_string(&self, node: NodeId) -> String {
        match self.node(node) {
            Some(n) if node != ROOT => {
                let occ = n.occurrences[0];
                let end = self.occurrence_end(&occ);
                self.text[occ.start..end].iter().collect()
            }
            _ => String::new(),
        }
    }

    /// Deterministic substring membership: walks edges character by
    /// character and reports whether the entire pattern was consumed.
    /// Empty patterns and unknown start nodes are not found.
    pub fn find_pattern(&self, pattern: &str, start_node: NodeId) -> bool {
        if pattern.is_empty() || self.node(start_node).is_none() {
            return false;
        }
        let chars: Vec<char> = pattern.chars().collect();
        self.longest_existing_path(&chars, start_node).matched == chars.len()
    }

    // --- accessors ---

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Bounds-checked node lookup; out-of-range handles are "not found",
    /// never a panic.
    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node as usize)
    }

    /// Resolve an occurrence's end offset, following the shared marker of
    /// a still-open document and clipping to the current buffer extent.
    pub fn occurrence_end(&self, occ: &Occurrence) -> usize {
        let end = match occ.end {
            EdgeEnd::Fixed(end) => end,
            EdgeEnd::Open(marker) => self.end_markers[marker as usize],
        };
        end.min(self.text.len())
    }

    /// Length of the edge label into `node`; zero for the root.
    pub fn edge_len(&self, node: NodeId) -> usize {
        match self.node(node) {
            Some(n) if node != ROOT => {
                let occ = n.occurrences[0];
                self.occurrence_end(&occ) - occ.start
            }
            _ => 0,
        }
    }

    pub fn text(&self) -> &[char] {
        &self.text
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    pub fn sentinel(&self) -> char {
        self.sentinel
    }

    /// Documents begun so far (including a still-open one)
    pub fn document_count(&self) -> usize {
        self.doc_begins.len()
    }

    pub fn document_begin(&self, document: DocumentId) -> Option<usize> {
        self.doc_begins.get(document as usize).copied()
    }

    /// End offset of a document: one character before the next document's
    /// start, or the current write position for the last document.
    pub fn document_end(&self, document: DocumentId) -> Option<usize> {
        let i = document as usize;
        if i >= self.doc_begins.len() {
            return None;
        }
        if i + 1 < self.doc_begins.len() {
            Some(self.doc_begins[i + 1] - 1)
        } else {
            Some(self.text.len())
        }
    }

    /// Reconstruct a document's content (without its sentinel).
    pub fn document_text(&self, document: DocumentId) -> Option<String> {
        let begin = self.document_begin(document)?;
        let mut end = self.document_end(document)?;
        // For the last document the write position sits past the sentinel
        // once the document has closed.
        if document as usize + 1 == self.doc_begins.len()
            && end > begin
            && self.text[end - 1] == self.sentinel
        {
            end -= 1;
        }
        Some(self.text[begin..end].iter().collect())
    }

    /// Current type-context counter; stamped onto every occurrence record
    /// created while it is active. Advanced by the construction driver,
    /// never by the store itself.
    pub fn type_context(&self) -> TypeContextId {
        self.type_context
    }

    pub fn advance_type_context(&mut self) {
        self.type_context += 1;
    }

    // --- internals ---

    fn node_ref(&self, node: NodeId) -> &Node {
        &self.nodes[node as usize]
    }

    fn node_mut(&mut self, node: NodeId) -> &mut Node {
        &mut self.nodes[node as usize]
    }

    fn first_occurrence(&self, node: NodeId) -> Occurrence {
        self.nodes[node as usize].occurrences[0]
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    fn new_leaf(&mut self, start: usize, document: DocumentId) -> NodeId {
        let end = match self.open_marker {
            Some(marker) => EdgeEnd::Open(marker),
            None => EdgeEnd::Fixed(self.text.len()),
        };
        self.push_node(Node::new(Occurrence {
            start,
            end,
            document,
            type_context: self.type_context,
        }))
    }

    /// Split the edge into `child` at the active length: the new interior
    /// node takes the top of the span, `child` keeps the rest, and every
    /// occurrence on `child` advances past the split point so each still
    /// delimits the remaining label.
    fn split_edge(&mut self, child: NodeId, edge_char: char) -> NodeId {
        let taken = self.active_length;
        let head = self.first_occurrence(child);
        let split = self.push_node(Node::new(Occurrence {
            start: head.start,
            end: EdgeEnd::Fixed(head.start + taken),
            document: head.document,
            type_context: head.type_context,
        }));
        self.node_mut(self.active_node).children.insert(edge_char, split);
        for occ in &mut self.nodes[child as usize].occurrences {
            occ.start += taken;
        }
        let tail_char = self.text[self.first_occurrence(child).start];
        self.node_mut(split).children.insert(tail_char, child);
        split
    }

    fn link_pending(&mut self, pending: &mut Option<NodeId>, target: NodeId) {
        if let Some(node) = pending.take() {
            if node != ROOT && node != target {
                self.node_mut(node).suffix_link = Some(target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(store: &mut TreeStore, document: DocumentId, content: &str) {
        store.begin_document(document).unwrap();
        for c in content.chars() {
            store.append_char(c, document).unwrap();
        }
        store.append_char(store.sentinel(), document).unwrap();
    }

    #[test]
    fn test_single_document_substrings() {
        let mut store = TreeStore::new(8);
        build(&mut store, 0, "abab");

        for pattern in ["a", "b", "ab", "ba", "aba", "bab", "abab", "abab$"] {
            assert!(store.find_pattern(pattern, ROOT), "missing {pattern:?}");
        }
        for pattern in ["bb", "aa", "abba", "c"] {
            assert!(!store.find_pattern(pattern, ROOT), "phantom {pattern:?}");
        }
        assert!(!store.find_pattern("", ROOT));
    }

    #[test]
    fn test_find_pattern_bad_start_node() {
        let mut store = TreeStore::new(8);
        build(&mut store, 0, "ab");
        assert!(!store.find_pattern("a", 9999));
        assert!(store.node(9999).is_none());
    }

    #[test]
    fn test_repeated_document_creates_no_nodes() {
        let mut store = TreeStore::new(16);
        build(&mut store, 0, "abc");
        let nodes_after_first = store.node_count();

        build(&mut store, 1, "abc");
        assert_eq!(store.node_count(), nodes_after_first);

        // Every leaf now carries one occurrence per document.
        let root = store.node(ROOT).unwrap();
        for (_, &child) in &root.children {
            let node = store.node(child).unwrap();
            if node.is_leaf() {
                assert_eq!(node.occurrences.len(), 2);
            }
        }
    }

    #[test]
    fn test_shared_suffix_collapses_onto_one_leaf() {
        let mut store = TreeStore::new(16);
        build(&mut store, 0, "xa");
        build(&mut store, 1, "aa");

        // The "a$" path ends at one leaf holding occurrences from both
        // documents.
        let root = store.node(ROOT).unwrap();
        let a = *root.children.get(&'a').unwrap();
        let a_node = store.node(a).unwrap();
        assert!(!a_node.is_leaf());
        let dollar = *a_node.children.get(&'$').unwrap();
        let docs: Vec<DocumentId> = store
            .node(dollar)
            .unwrap()
            .occurrences
            .iter()
            .map(|o| o.document)
            .collect();
        assert_eq!(docs, vec![0, 1]);
    }

    #[test]
    fn test_document_bookkeeping() {
        let mut store = TreeStore::new(16);
        build(&mut store, 0, "abc");
        build(&mut store, 1, "de");

        assert_eq!(store.document_count(), 2);
        assert_eq!(store.document_begin(0), Some(0));
        assert_eq!(store.document_end(0), Some(3));
        assert_eq!(store.document_begin(1), Some(4));
        assert_eq!(store.document_text(0).unwrap(), "abc");
        assert_eq!(store.document_text(1).unwrap(), "de");
        assert_eq!(store.document_begin(2), None);
    }

    #[test]
    fn test_document_sequencing_is_checked() {
        let mut store = TreeStore::new(8);
        assert!(matches!(
            store.append_char('a', 0),
            Err(GstError::NoOpenDocument)
        ));

        store.begin_document(0).unwrap();
        assert!(matches!(
            store.begin_document(1),
            Err(GstError::DocumentStillOpen { previous: 0 })
        ));
        assert!(matches!(
            store.append_char('a', 1),
            Err(GstError::DocumentOutOfSequence { .. })
        ));

        store.append_char('$', 0).unwrap();
        assert!(matches!(
            store.begin_document(5),
            Err(GstError::DocumentOutOfSequence {
                document: 5,
                expected: 1
            })
        ));
    }

    #[test]
    fn test_edge_string_tracks_open_document() {
        let mut store = TreeStore::new(8);
        store.begin_document(0).unwrap();
        store.append_char('a', 0).unwrap();
        store.append_char('b', 0).unwrap();

        let root = store.node(ROOT).unwrap();
        let leaf = *root.children.get(&'a').unwrap();
        assert_eq!(store.edge_string(leaf), "ab");

        store.append_char('c', 0).unwrap();
        assert_eq!(store.edge_string(leaf), "abc");

        store.append_char('$', 0).unwrap();
        assert_eq!(store.edge_string(leaf), "abc$");

        // The marker froze with the document; later documents leave it be.
        build(&mut store, 1, "zz");
        assert_eq!(store.edge_string(leaf), "abc$");
    }

    #[test]
    fn test_longest_existing_path_partial_match() {
        let mut store = TreeStore::new(8);
        build(&mut store, 0, "abcd");

        let query: Vec<char> = "abxy".chars().collect();
        let found = store.longest_existing_path(&query, ROOT);
        assert_eq!(found.matched, 2);
        assert_eq!(found.node, ROOT);
        assert_eq!(found.edge_offset, 0);
        assert_eq!(found.length, 2);

        let query: Vec<char> = "zz".chars().collect();
        assert_eq!(store.longest_existing_path(&query, ROOT).matched, 0);
    }

    #[test]
    fn test_fast_forward_matches_naive_layout() {
        let mut naive = TreeStore::new(16);
        build(&mut naive, 0, "abab");
        build(&mut naive, 1, "abab");

        let mut seeded = TreeStore::new(16);
        build(&mut seeded, 0, "abab");
        seeded.begin_document(1).unwrap();
        let content: Vec<char> = "abab".chars().collect();
        let consumed = seeded.fast_forward(1, &content).unwrap();
        assert_eq!(consumed, 4);
        for &c in &content[consumed..] {
            seeded.append_char(c, 1).unwrap();
        }
        seeded.append_char('$', 1).unwrap();

        assert_eq!(naive.node_count(), seeded.node_count());
        for id in 0..naive.node_count() as NodeId {
            assert_eq!(naive.edge_string(id), seeded.edge_string(id));
            assert_eq!(
                naive.node(id).unwrap().occurrences.len(),
                seeded.node(id).unwrap().occurrences.len()
            );
        }
    }

    #[test]
    fn test_branching_invariant_holds() {
        let mut store = TreeStore::new(32);
        build(&mut store, 0, "mississippi");
        build(&mut store, 1, "missouri");

        // BTreeMap keys are unique by construction; verify the spans they
        // label really start with their key character.
        for id in 0..store.node_count() as NodeId {
            let node = store.node(id).unwrap();
            for (&c, &child) in &node.children {
                let label = store.edge_string(child);
                assert_eq!(label.chars().next(), Some(c));
            }
        }
    }

    #[test]
    fn test_internal_nodes_have_one_occurrence() {
        let mut store = TreeStore::new(16);
        build(&mut store, 0, "banana");
        for id in 0..store.node_count() as NodeId {
            let node = store.node(id).unwrap();
            if !node.is_leaf() {
                assert_eq!(node.occurrences.len(), 1);
            } else {
                assert!(!node.occurrences.is_empty());
            }
        }
    }
}
