#![no_main]

use libfuzzer_sys::fuzz_target;

use gstx::tree::{build_tree, GstConfig};

fuzz_target!(|data: (String, String)| {
    // Fuzz membership queries against a small fixed-plus-arbitrary corpus.
    let (document, pattern) = data;
    let document: String = document.chars().filter(|&c| c != '$').take(512).collect();

    let tree = match build_tree(
        &GstConfig::default(),
        ["mississippi", "banana", document.as_str()],
    ) {
        Ok(tree) => tree,
        Err(_) => return,
    };

    let found = tree.find_pattern(&pattern, tree.root());
    let expected = !pattern.is_empty()
        && ["mississippi$", "banana$", &format!("{document}$")]
            .iter()
            .any(|d| d.contains(&pattern));
    assert_eq!(found, expected);
});
