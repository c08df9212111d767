//! Corpus assembly for the CLI.
//!
//! The engine consumes plain document strings; this module is the
//! collaborator that produces them from the file system. Documents are
//! read in parallel and returned in a deterministic (path-sorted) order
//! so document numbers are stable across runs.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// One input document with its origin path.
#[derive(Debug, Clone)]
pub struct CorpusDocument {
    pub path: PathBuf,
    pub content: String,
}

/// Read an explicit list of files, one document per file.
pub fn read_corpus_files(paths: &[PathBuf]) -> Result<Vec<CorpusDocument>> {
    let mut documents: Vec<CorpusDocument> = paths
        .par_iter()
        .map(|path| {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            anyhow::ensure!(!is_likely_binary(&bytes), "{} is binary", path.display());
            let content = String::from_utf8_lossy(&bytes).into_owned();
            Ok(CorpusDocument {
                path: path.clone(),
                content,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    documents.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(documents)
}

/// Walk a directory (honoring ignore files) and read every text file as a
/// document. Binary and unreadable files are skipped, not fatal.
pub fn read_corpus_dir(root: &Path) -> Result<Vec<CorpusDocument>> {
    let mut paths = Vec::new();
    for entry in WalkBuilder::new(root).build() {
        let entry = entry?;
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    let documents: Vec<CorpusDocument> = paths
        .par_iter()
        .filter_map(|path| {
            let bytes = std::fs::read(path).ok()?;
            if is_likely_binary(&bytes) {
                return None;
            }
            Some(CorpusDocument {
                path: path.clone(),
                content: String::from_utf8_lossy(&bytes).into_owned(),
            })
        })
        .collect();
    Ok(documents)
}

/// Check if content is likely binary: null bytes or a high ratio of
/// non-text bytes in the first 8KB.
pub fn is_likely_binary(content: &[u8]) -> bool {
    let sample_size = content.len().min(8192);
    let sample = &content[..sample_size];

    if sample.contains(&0) {
        return true;
    }

    let non_text_count = sample
        .iter()
        .filter(|&&b| b < 0x20 && b != b'\n' && b != b'\r' && b != b'\t')
        .count();

    non_text_count > sample_size / 10
}
