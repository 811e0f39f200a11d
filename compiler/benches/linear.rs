use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ere_compiler::*;

fn pad_input_to_length_with(prefix: &str, suffix: &str, pad_str: &str, len: usize) -> String {
    let prefix_len = prefix.chars().count();
    let suffix_len = suffix.chars().count();

    if (suffix_len + prefix_len) > len {
        "".to_string()
    } else {
        let req_padding = len - suffix_len - prefix_len;

        prefix
            .chars()
            .chain(pad_str.chars().cycle().take(req_padding))
            .chain(suffix.chars())
            .collect()
    }
}

pub fn exponential_pattern_size_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern length compilation comparison");
    let pad = "ab";

    (1..10)
        .map(|exponent| 2usize.pow(exponent))
        .map(|pattern_len| {
            (
                pad_input_to_length_with("^", "", pad, pattern_len),
                pattern_len,
            )
        })
        .for_each(|(pattern, sample_size)| {
            group.throughput(Throughput::Elements(sample_size as u64));
            group.bench_with_input(
                BenchmarkId::new("pattern input length of size", sample_size),
                &pattern,
                |b, pattern| {
                    b.iter(|| {
                        let res = compile(pattern);
                        assert!(res.is_ok())
                    })
                },
            );
        })
}

pub fn exponential_alternation_count_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("alternation count compilation comparison");

    (1..8)
        .map(|exponent| 2usize.pow(exponent))
        .map(|alternatives| {
            let pattern = (0..alternatives)
                .map(|idx| format!("(x{}[a-f]{{1,3}})", idx))
                .collect::<Vec<_>>()
                .join("|");

            (pattern, alternatives)
        })
        .for_each(|(pattern, sample_size)| {
            group.throughput(Throughput::Elements(sample_size as u64));
            group.bench_with_input(
                BenchmarkId::new("alternatives in pattern", sample_size),
                &pattern,
                |b, pattern| {
                    b.iter(|| {
                        let res = compile(pattern);
                        assert!(res.is_ok())
                    })
                },
            );
        })
}

criterion_group!(
    benches,
    exponential_pattern_size_comparison,
    exponential_alternation_count_comparison
);
criterion_main!(benches);
