use std::hint::black_box;

use briefly::history::SummaryHistory;
use briefly::keywords::extract_top_keywords;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Generate a synthetic summary of roughly `num_words` words
fn generate_summary(num_words: usize) -> String {
    let words = [
        "ownership",
        "borrowing",
        "the",
        "compiler",
        "lifetimes",
        "and",
        "traits",
        "generics",
        "memory",
        "safety",
        "concurrency",
        "über",
        "naïve",
    ];

    (0..num_words)
        .map(|i| words[(i * 7 + i / 3) % words.len()])
        .collect::<Vec<_>>()
        .join(if num_words % 2 == 0 { " " } else { ", " })
}

fn bench_keyword_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyword_extraction");

    for size in [200, 2_000, 20_000].iter() {
        let text = generate_summary(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| extract_top_keywords(black_box(&text), 16));
        });
    }

    group.finish();
}

fn bench_history_search(c: &mut Criterion) {
    let mut history = SummaryHistory::new();
    for i in 0..40 {
        history.push(format!("{} {}", generate_summary(60 + i), i));
    }

    let mut group = c.benchmark_group("history_search");
    for query in ["own", "concurrency safety", "zzz"].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(query), query, |b, q| {
            b.iter(|| history.search(black_box(q)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_keyword_extraction, bench_history_search);
criterion_main!(benches);
