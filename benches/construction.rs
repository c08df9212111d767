//! Construction and extraction benchmarks.
//!
//! Run with: `cargo bench`
//! Save baseline: `cargo bench -- --save-baseline main`
//! Compare: `cargo bench -- --baseline main`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use gstx::extract::{dump_json, label_frequencies};
use gstx::tree::{build_tree, GstConfig};

/// Deterministic pseudo-text over a small alphabet; repetitive enough to
/// exercise splits, suffix links, and shared leaves.
fn synthetic_document(seed: u64, length: usize) -> String {
    const ALPHABET: &[u8] = b"abcdefgh";
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    let mut text = String::with_capacity(length);
    for _ in 0..length {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let index = ((state >> 33) as usize) % ALPHABET.len();
        text.push(ALPHABET[index] as char);
    }
    text
}

fn bench_single_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("construct_single");
    for &length in &[1_000usize, 10_000, 50_000] {
        let document = synthetic_document(7, length);
        group.bench_with_input(BenchmarkId::from_parameter(length), &document, |b, doc| {
            b.iter(|| build_tree(&GstConfig::default(), [doc.as_str()]).unwrap());
        });
    }
    group.finish();
}

fn bench_duplicate_documents(c: &mut Criterion) {
    let document = synthetic_document(11, 5_000);
    let documents: Vec<&str> = std::iter::repeat(document.as_str()).take(8).collect();

    let mut group = c.benchmark_group("construct_duplicates");
    group.bench_function("fast_forward", |b| {
        b.iter(|| build_tree(&GstConfig::default(), documents.iter().copied()).unwrap());
    });
    group.bench_function("naive", |b| {
        let config = GstConfig {
            fast_forward: false,
            ..Default::default()
        };
        b.iter(|| build_tree(&config, documents.iter().copied()).unwrap());
    });
    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let documents: Vec<String> = (0..4).map(|i| synthetic_document(i, 5_000)).collect();
    let tree = build_tree(
        &GstConfig::default(),
        documents.iter().map(|d| d.as_str()),
    )
    .unwrap();

    let mut group = c.benchmark_group("extract");
    group.bench_function("label_frequencies", |b| {
        b.iter(|| label_frequencies(&tree).unwrap());
    });
    group.bench_function("dump_json", |b| {
        b.iter(|| {
            let mut sink = Vec::with_capacity(1 << 20);
            dump_json(&tree, &mut sink).unwrap();
            sink
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_single_document,
    bench_duplicate_documents,
    bench_extraction
);
criterion_main!(benches);
