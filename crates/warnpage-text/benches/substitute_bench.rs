//! Benchmarks for placeholder substitution.
//!
//! Run with: cargo bench -p warnpage-text

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use warnpage_text::{format, format_pieces};

const ARGS: [&str; 3] = ["example.com", "NET::ERR_CERT_DATE_INVALID", "2026-10-18"];

/// Localized paragraph with `n` placeholders spread through literal text.
fn template(placeholders: usize) -> String {
    let mut out = String::new();
    for i in 0..placeholders {
        out.push_str("Attackers might be trying to steal your information from ");
        out.push_str(&format!("${} ($$ cost) ", i % ARGS.len() + 1));
    }
    out
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("substitute/format");
    for n in [0usize, 1, 4, 16] {
        let t = template(n);
        group.throughput(Throughput::Bytes(t.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &t, |b, t| {
            b.iter(|| format(black_box(t), black_box(&ARGS)))
        });
    }
    group.finish();
}

fn bench_pieces(c: &mut Criterion) {
    let mut group = c.benchmark_group("substitute/pieces");
    for n in [1usize, 4, 16] {
        let t = template(n);
        group.throughput(Throughput::Bytes(t.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &t, |b, t| {
            b.iter(|| format_pieces(black_box(t), black_box(&ARGS)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_format, bench_pieces);
criterion_main!(benches);
