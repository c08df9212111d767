//! # GSTX - Generalized Suffix Tree Engine
//!
//! GSTX builds a generalized suffix tree over one or more text documents
//! using Ukkonen's online construction, and exposes a depth-first
//! traversal protocol for extracting results without materializing the
//! whole tree in an intermediate form.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`tree`] - Node arena, per-character construction step, and the
//!   document-sequence builder
//! - [`traverse`] - Depth-first walker, listener contract, and bottom-up
//!   leaf propagation
//! - [`extract`] - Concrete listeners: label sets, frequencies,
//!   structured statistics, streaming JSON/XML dumps
//! - [`output`] - Terminal result formatting
//! - [`utils`] - Corpus assembly for the CLI
//!
//! ## Quick Start
//!
//! ```
//! use gstx::tree::{build_tree, GstConfig};
//! use gstx::extract::label_frequencies;
//!
//! let tree = build_tree(&GstConfig::default(), ["abab", "banana"]).unwrap();
//!
//! assert!(tree.find_pattern("anan", tree.root()));
//! let frequencies = label_frequencies(&tree).unwrap();
//! assert_eq!(frequencies["ab"], 2);
//! ```
//!
//! ## Model
//!
//! Documents are concatenated into one growable character buffer, each
//! terminated by a reserved sentinel. Distinct documents sharing a suffix
//! collapse onto the same leaf, which carries one occurrence record per
//! document suffix; an optional type-context counter groups documents
//! more coarsely than document numbers. Construction is single-threaded
//! and build-once: the tree is then queried and traversed read-only.

pub mod error;
pub mod extract;
pub mod output;
pub mod traverse;
pub mod tree;
pub mod utils;

pub use error::{GstError, Result};
