//! Benchmarks for delay line processing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oidos::dsp::delay::DelayLine;

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        let input: Vec<f64> = (0..size).map(|i| (i as f64 * 0.01).sin()).collect();

        // Short and long delays touch different cache lines
        for delay in [256usize, 32_768] {
            let mut line = DelayLine::new();
            group.bench_with_input(BenchmarkId::new(format!("delay_{delay}"), size), &size, |b, _| {
                b.iter(|| {
                    input
                        .iter()
                        .map(|&x| line.next_sample(black_box(x), delay))
                        .sum::<f64>()
                })
            });
        }
    }

    group.finish();
}
