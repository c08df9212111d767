//! Streaming tree-dump serializers.
//!
//! Both writers emit the same nested record shape — node number, edge
//! label, frequency, and one `(type_context, document, position)` tuple
//! per occurrence — to JSON or XML. Records are streamed as the walk
//! proceeds: the opening of a record is written when its node is entered,
//! children nest inside it, and the aggregate fields are written and
//! flushed at exit. The output is closed exactly once, at the end of the
//! walk. The shape is independent of how the tree was constructed
//! (character by character or fast-forwarded).
//!
//! The walker performs no I/O itself; write failures surface through the
//! visitor and leave the tree untouched.

use std::io::Write;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::traverse::propagate::{walk_bottom_up, BottomUpVisitor, LeafOccurrence, SubtreeFrame};
use crate::tree::store::TreeStore;
use crate::tree::types::NodeId;

/// Parsed form of one dumped node, used to read a dump back.
#[derive(Debug, Serialize, Deserialize)]
pub struct DumpNode {
    pub node: NodeId,
    pub label: String,
    #[serde(default)]
    pub children: Vec<DumpNode>,
    pub frequency: u64,
    #[serde(default)]
    pub occurrences: Vec<LeafOccurrence>,
}

/// Streaming JSON serializer. The walk-start node becomes the outermost
/// record (empty label, whole-tree aggregates).
pub struct JsonDumpWriter<W: Write> {
    out: W,
    /// Per open record: whether a child record was already written
    wrote_child: Vec<bool>,
    closed: bool,
}

impl<W: Write> JsonDumpWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            wrote_child: Vec::new(),
            closed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BottomUpVisitor for JsonDumpWriter<W> {
    fn enter(&mut self, tree: &TreeStore, frame: &SubtreeFrame, _path: &[SubtreeFrame]) -> Result<()> {
        if let Some(parent) = self.wrote_child.last_mut() {
            if *parent {
                write!(self.out, ",")?;
            }
            *parent = true;
        }
        write!(self.out, "{{\"node\":{},\"label\":", frame.node)?;
        serde_json::to_writer(&mut self.out, &tree.edge_string(frame.node))?;
        write!(self.out, ",\"children\":[")?;
        self.wrote_child.push(false);
        Ok(())
    }

    fn exit(&mut self, _tree: &TreeStore, frame: &SubtreeFrame, _path: &[SubtreeFrame]) -> Result<()> {
        write!(
            self.out,
            "],\"frequency\":{},\"occurrences\":",
            frame.occurrences.len()
        )?;
        serde_json::to_writer(&mut self.out, &frame.occurrences)?;
        write!(self.out, "}}")?;
        self.wrote_child.pop();
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self, _tree: &TreeStore) -> Result<()> {
        if !self.closed {
            writeln!(self.out)?;
            self.out.flush()?;
            self.closed = true;
        }
        Ok(())
    }
}

/// Streaming XML serializer. The walk-start node becomes the
/// `<suffixtree>` wrapper element.
pub struct XmlDumpWriter<W: Write> {
    out: W,
    closed: bool,
}

impl<W: Write> XmlDumpWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, closed: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl<W: Write> BottomUpVisitor for XmlDumpWriter<W> {
    fn enter(&mut self, tree: &TreeStore, frame: &SubtreeFrame, path: &[SubtreeFrame]) -> Result<()> {
        if path.is_empty() {
            writeln!(
                self.out,
                "<suffixtree nodes=\"{}\" documents=\"{}\">",
                tree.node_count(),
                tree.document_count()
            )?;
        } else {
            writeln!(
                self.out,
                "<node nr=\"{}\" label=\"{}\">",
                frame.node,
                escape_xml(&tree.edge_string(frame.node))
            )?;
        }
        Ok(())
    }

    fn exit(&mut self, _tree: &TreeStore, frame: &SubtreeFrame, path: &[SubtreeFrame]) -> Result<()> {
        writeln!(self.out, "<frequency>{}</frequency>", frame.occurrences.len())?;
        writeln!(self.out, "<occurrences>")?;
        for occ in &frame.occurrences {
            writeln!(
                self.out,
                "<occurrence context=\"{}\" document=\"{}\" position=\"{}\"/>",
                occ.type_context, occ.document, occ.position
            )?;
        }
        writeln!(self.out, "</occurrences>")?;
        if path.is_empty() {
            writeln!(self.out, "</suffixtree>")?;
        } else {
            writeln!(self.out, "</node>")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self, _tree: &TreeStore) -> Result<()> {
        if !self.closed {
            self.out.flush()?;
            self.closed = true;
        }
        Ok(())
    }
}

/// Stream the whole tree as nested JSON records.
pub fn dump_json<W: Write>(tree: &TreeStore, out: W) -> Result<()> {
    walk_bottom_up(tree, tree.root(), JsonDumpWriter::new(out))?;
    Ok(())
}

/// Stream the whole tree as nested XML records.
pub fn dump_xml<W: Write>(tree: &TreeStore, out: W) -> Result<()> {
    walk_bottom_up(tree, tree.root(), XmlDumpWriter::new(out))?;
    Ok(())
}

/// Dump to an in-memory JSON string.
pub fn dump_json_string(tree: &TreeStore) -> Result<String> {
    let mut buffer = Vec::new();
    dump_json(tree, &mut buffer)?;
    // The writer only ever emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Parse a JSON dump back into its record tree.
pub fn read_dump(json: &str) -> Result<DumpNode> {
    Ok(serde_json::from_str(json)?)
}

/// Recompute per-path-label frequencies from a dump's occurrence lists.
/// Matches the frequencies computed directly via traversal.
pub fn frequencies_from_dump(root: &DumpNode) -> FxHashMap<String, u64> {
    fn descend(node: &DumpNode, prefix: &str, totals: &mut FxHashMap<String, u64>) {
        let path = format!("{prefix}{}", node.label);
        if !path.is_empty() {
            totals.insert(path.clone(), node.occurrences.len() as u64);
        }
        for child in &node.children {
            descend(child, &path, totals);
        }
    }

    let mut totals = FxHashMap::default();
    descend(root, "", &mut totals);
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::frequency::label_frequencies;
    use crate::tree::builder::build_tree;
    use crate::tree::types::GstConfig;

    #[test]
    fn test_json_dump_parses_back() {
        let tree = build_tree(&GstConfig::default(), ["abab"]).unwrap();
        let json = dump_json_string(&tree).unwrap();
        let root = read_dump(&json).unwrap();

        assert_eq!(root.node, tree.root());
        assert_eq!(root.label, "");
        // Root aggregates every suffix occurrence of "abab$".
        assert_eq!(root.frequency, 5);
        assert_eq!(root.children.len(), 3);
    }

    #[test]
    fn test_round_trip_frequencies_match_traversal() {
        let tree = build_tree(&GstConfig::default(), ["abab", "banana", "ab"]).unwrap();
        let json = dump_json_string(&tree).unwrap();
        let from_dump = frequencies_from_dump(&read_dump(&json).unwrap());
        let direct = label_frequencies(&tree).unwrap();
        assert_eq!(from_dump, direct);
    }

    #[test]
    fn test_dump_stable_across_construction_strategies() {
        let docs = ["abcabc", "abcabc", "abc"];
        let naive = build_tree(
            &GstConfig {
                fast_forward: false,
                ..Default::default()
            },
            docs,
        )
        .unwrap();
        let seeded = build_tree(&GstConfig::default(), docs).unwrap();
        assert_eq!(
            dump_json_string(&naive).unwrap(),
            dump_json_string(&seeded).unwrap()
        );
    }

    #[test]
    fn test_xml_dump_is_balanced() {
        let tree = build_tree(&GstConfig::default(), ["ab<&>"]).unwrap();
        let mut buffer = Vec::new();
        dump_xml(&tree, &mut buffer).unwrap();
        let xml = String::from_utf8(buffer).unwrap();

        assert!(xml.starts_with("<suffixtree"));
        assert!(xml.trim_end().ends_with("</suffixtree>"));
        assert_eq!(
            xml.matches("<node ").count(),
            xml.matches("</node>").count()
        );
        // Label characters are escaped, never raw.
        assert!(xml.contains("&lt;"));
        assert!(xml.contains("&amp;"));
    }

    #[test]
    fn test_occurrence_tuples_carry_document_positions() {
        let tree = build_tree(&GstConfig::default(), ["abab"]).unwrap();
        let json = dump_json_string(&tree).unwrap();
        let root = read_dump(&json).unwrap();

        // Find the "ab" child and check its occurrence positions 0 and 2.
        let ab = root
            .children
            .iter()
            .find(|c| c.label == "ab")
            .expect("ab record");
        let mut positions: Vec<usize> = ab.occurrences.iter().map(|o| o.position).collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 2]);
    }
}
