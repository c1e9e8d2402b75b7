//! Name derivation benchmarks.
//!
//! Run with: cargo bench -p toolforge-naming --bench abbreviation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use toolforge_naming::{abbreviate, decode, encode};

fn bench_abbreviate(c: &mut Criterion) {
    let mut group = c.benchmark_group("abbreviate");

    let inputs = [
        ("operation_id", "getUserServiceController".to_string()),
        (
            "summary",
            "Update the deployment configuration of an organization repository".to_string(),
        ),
        ("overlong", "Retrieve archived invoices ".repeat(8)),
    ];

    for (label, text) in &inputs {
        group.bench_with_input(BenchmarkId::new("enabled", label), text, |b, text| {
            b.iter(|| black_box(abbreviate(black_box(text), false, Some("billing"))))
        });
    }

    group.finish();
}

fn bench_identifier(c: &mut Criterion) {
    c.bench_function("identifier_round_trip", |b| {
        b.iter(|| {
            let id = encode(black_box("get"), black_box("/orgs/{org}/repos/{repo}/hooks/{hookId}"));
            black_box(decode(&id))
        })
    });
}

criterion_group!(benches, bench_abbreviate, bench_identifier);
criterion_main!(benches);
