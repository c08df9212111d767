//! Shared utilities.
//!
//! - [`corpus`] - file-system corpus assembly for the CLI

pub mod corpus;

pub use corpus::{is_likely_binary, read_corpus_dir, read_corpus_files, CorpusDocument};
