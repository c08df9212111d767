#![no_main]

use libfuzzer_sys::fuzz_target;

use gstx::extract::label_frequencies;
use gstx::tree::{build_tree, GstConfig};

fuzz_target!(|documents: Vec<String>| {
    // Build a tree over arbitrary documents (sentinel chars stripped) and
    // check that every document round-trips as a pattern.
    let cleaned: Vec<String> = documents
        .into_iter()
        .take(8)
        .map(|d| d.chars().filter(|&c| c != '$').take(256).collect())
        .collect();

    let tree = match build_tree(&GstConfig::default(), cleaned.iter().map(|d| d.as_str())) {
        Ok(tree) => tree,
        Err(_) => return,
    };

    for document in &cleaned {
        if !document.is_empty() {
            assert!(tree.find_pattern(document, tree.root()));
        }
    }
    let _ = label_frequencies(&tree);
});
