//! Benchmarks for the key pipeline: normalization and a full keyed sort.

use criterion::{criterion_group, criterion_main, Criterion};
use rowkeeper_keys::{compare_keys, normalize_key};
use std::hint::black_box;

fn sample_titles() -> Vec<String> {
    let bases = [
        "🔥 Team Sync!!",
        "Re: Quarterly report — draft 12",
        "Item 2 of 10",
        "Ｉｔｅｍ ﬁnal",
        "   spaced    out   subject   ",
        "☀️ Morning Digest",
        "café rendezvous",
        "Invoice #00123 overdue",
    ];
    (0..512)
        .map(|i| format!("{} {}", bases[i % bases.len()], i))
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let titles = sample_titles();
    c.bench_function("normalize_key/512 titles", |b| {
        b.iter(|| {
            for title in &titles {
                black_box(normalize_key(black_box(title)));
            }
        });
    });
}

fn bench_keyed_sort(c: &mut Criterion) {
    let keys: Vec<String> = sample_titles().iter().map(|t| normalize_key(t)).collect();
    c.bench_function("stable sort/512 keys", |b| {
        b.iter(|| {
            let mut sorted = keys.clone();
            sorted.sort_by(|a, b| compare_keys(a, b));
            black_box(sorted);
        });
    });
}

criterion_group!(benches, bench_normalize, bench_keyed_sort);
criterion_main!(benches);
