//! Construction driver.
//!
//! Feeds sentinel-terminated documents into the store one character at a
//! time. Input is validated before the tree is touched: a rejected batch
//! leaves no partial structure behind for the offending document's
//! characters. Beyond the per-character update the driver owns two
//! concerns the store does not:
//!
//! - **Type contexts** — an optional caller-supplied list of "this
//!   document ends a context" markers. Each boundary bumps the context
//!   counter stamped onto occurrence records; the list must be strictly
//!   increasing and account for every document exactly once.
//! - **Duplicate fast-forward** — a document that repeats a previously
//!   indexed prefix is seeded through [`TreeStore::fast_forward`] instead
//!   of replaying the update character by character. The resulting tree is
//!   identical either way.

use super::store::TreeStore;
use super::types::{DocumentId, GstConfig};
use crate::error::{GstError, Result};

/// Builder for a generalized suffix tree over a document sequence.
#[derive(Debug)]
pub struct GstBuilder {
    store: TreeStore,
    fast_forward: bool,
    /// Document numbers that each end a type context, strictly increasing
    context_bounds: Vec<DocumentId>,
    next_bound: usize,
}

impl GstBuilder {
    pub fn new(config: &GstConfig) -> Self {
        Self {
            store: TreeStore::from_config(config),
            fast_forward: config.fast_forward,
            context_bounds: Vec::new(),
            next_bound: 0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&GstConfig::default())
    }

    /// Partition the document stream into type contexts. `bounds[i]` is
    /// the number of the last document in context `i`; the list must be
    /// strictly increasing and, once building finishes, must have covered
    /// every document.
    pub fn with_type_contexts(mut self, bounds: &[DocumentId]) -> Result<Self> {
        for pair in bounds.windows(2) {
            if pair[1] <= pair[0] {
                return Err(GstError::ContextBoundaryOrder {
                    boundary: pair[1],
                    previous: pair[0],
                });
            }
        }
        self.context_bounds = bounds.to_vec();
        self.next_bound = 0;
        Ok(self)
    }

    /// Index one document. The content must not contain the reserved
    /// sentinel; the builder appends it. Returns the document number.
    pub fn add_document(&mut self, content: &str) -> Result<DocumentId> {
        let document = self.store.document_count() as DocumentId;
        let sentinel = self.store.sentinel();

        if let Some(offset) = content.chars().position(|c| c == sentinel) {
            return Err(GstError::SentinelInInput {
                document,
                offset,
                sentinel,
            });
        }
        if !self.context_bounds.is_empty() && self.next_bound == self.context_bounds.len() {
            return Err(GstError::DocumentOutsideContext { document });
        }

        self.store.begin_document(document)?;

        let chars: Vec<char> = content.chars().collect();
        let mut consumed = 0;
        if self.fast_forward && document > 0 {
            consumed = self.store.fast_forward(document, &chars)?;
        }
        for &c in &chars[consumed..] {
            self.store.append_char(c, document)?;
        }
        self.store.append_char(sentinel, document)?;

        if self.context_bounds.get(self.next_bound) == Some(&document) {
            self.next_bound += 1;
            self.store.advance_type_context();
        }
        Ok(document)
    }

    /// Index a batch of documents in order.
    pub fn add_documents<'a, I>(&mut self, documents: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for content in documents {
            self.add_document(content)?;
        }
        Ok(())
    }

    /// Finish construction and hand the tree over for querying and
    /// traversal. Fails if a type-context boundary was never reached.
    pub fn finish(self) -> Result<TreeStore> {
        if let Some(&boundary) = self.context_bounds.get(self.next_bound) {
            return Err(GstError::UnconsumedContextBoundary { boundary });
        }
        Ok(self.store)
    }

    /// Read access to the tree mid-build (used by tests and diagnostics).
    pub fn store(&self) -> &TreeStore {
        &self.store
    }
}

/// Build a tree over `documents` with the given configuration.
pub fn build_tree<'a, I>(config: &GstConfig, documents: I) -> Result<TreeStore>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut builder = GstBuilder::new(config);
    builder.add_documents(documents)?;
    builder.finish()
}
