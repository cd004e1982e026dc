//! Benchmarks for the one-pole filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oidos::dsp::filter::OnePole;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input: Vec<f64> = (0..size).map(|i| (i as f64 * 0.1).sin()).collect();

        let mut lowpass = OnePole::lowpass(1_000.0, 44_100.0);
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| input.iter().map(|&x| lowpass.process(black_box(x))).sum::<f64>())
        });

        let mut highpass = OnePole::lowpass(200.0, 44_100.0);
        group.bench_with_input(BenchmarkId::new("highpass", size), &size, |b, _| {
            b.iter(|| input.iter().map(|&x| highpass.highpass(black_box(x))).sum::<f64>())
        });
    }

    group.finish();
}
