//! Error taxonomy for tree construction and extraction.
//!
//! Errors fall into three groups:
//!
//! - **Malformed input** — the caller handed the engine a document batch it
//!   must reject (reserved sentinel inside a document, documents out of
//!   sequence, a bad type-context boundary list). Detected before the tree
//!   is mutated wherever possible; `is_input_error` returns `true`.
//! - **Internal invariants** — a construction or traversal bookkeeping bug.
//!   These abort the whole build; a half-built generalized suffix tree is
//!   not a useful artifact.
//! - **I/O and serialization** — surfaced only by the streaming dump
//!   writers; the tree itself performs no I/O.

use crate::tree::types::{DocumentId, NodeId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GstError>;

#[derive(Debug, Error)]
pub enum GstError {
    /// The reserved sentinel character appeared inside document content.
    #[error("document {document}: reserved sentinel {sentinel:?} at offset {offset}")]
    SentinelInInput {
        document: DocumentId,
        offset: usize,
        sentinel: char,
    },

    /// A document number was supplied out of sequence.
    #[error("document {document} out of sequence (expected {expected})")]
    DocumentOutOfSequence {
        document: DocumentId,
        expected: DocumentId,
    },

    /// A new document was started while the previous one was still open.
    #[error("document {previous} is still open; its sentinel has not been consumed")]
    DocumentStillOpen { previous: DocumentId },

    /// A character arrived with no open document to attach it to.
    #[error("no open document; begin_document must precede append_char")]
    NoOpenDocument,

    /// Type-context boundaries must be strictly increasing document numbers.
    #[error("type-context boundary {boundary} is not after {previous}")]
    ContextBoundaryOrder {
        boundary: DocumentId,
        previous: DocumentId,
    },

    /// A document past the final type-context boundary is unaccounted for.
    #[error("document {document} is not covered by any type-context boundary")]
    DocumentOutsideContext { document: DocumentId },

    /// A type-context boundary named a document that was never indexed.
    #[error("type-context boundary {boundary} was never reached")]
    UnconsumedContextBoundary { boundary: DocumentId },

    /// Resolving a pending suffix found no edge for the next character.
    #[error("document {document}, offset {offset}: no edge from node {node} starts with {ch:?}")]
    MissingEdge {
        node: NodeId,
        ch: char,
        document: DocumentId,
        offset: usize,
    },

    /// An edge label diverged from the indexed text while resolving a
    /// pending suffix.
    #[error("document {document}, offset {offset}: edge into node {node} diverges from the text")]
    EdgeMismatch {
        node: NodeId,
        document: DocumentId,
        offset: usize,
    },

    /// A sentinel-terminated path ended at a branching node instead of a
    /// terminal one.
    #[error("document {document}: terminal node expected, found branching node {node}")]
    ExpectedTerminal { node: NodeId, document: DocumentId },

    /// The same (start, document) occurrence was recorded twice on a node.
    #[error("duplicate occurrence (start {start}, document {document}) on node {node}")]
    DuplicateOccurrence {
        node: NodeId,
        start: usize,
        document: DocumentId,
    },

    /// The active point or remainder reached a state the update rules
    /// cannot produce.
    #[error("construction cursor corrupted: {detail}")]
    CorruptCursor { detail: &'static str },

    /// A traversal listener popped a frame for a node it never entered.
    #[error("traversal stack out of balance at node {node}")]
    UnbalancedTraversal { node: NodeId },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl GstError {
    /// Whether this error indicates bad caller input (reject the batch)
    /// rather than an internal invariant violation.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            GstError::SentinelInInput { .. }
                | GstError::DocumentOutOfSequence { .. }
                | GstError::DocumentStillOpen { .. }
                | GstError::NoOpenDocument
                | GstError::ContextBoundaryOrder { .. }
                | GstError::DocumentOutsideContext { .. }
                | GstError::UnconsumedContextBoundary { .. }
        )
    }
}
