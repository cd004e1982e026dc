//! Benchmarks for reverb processing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oidos::dsp::noise::NoiseTable;
use oidos::dsp::reverb::{Reverb, ReverbParams};

use crate::BLOCK_SIZES;

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");
    let noise = NoiseTable::filled();

    for &size in BLOCK_SIZES {
        let input: Vec<[f64; 2]> = (0..size)
            .map(|i| {
                if i < 10 {
                    [1.0 - i as f64 / 10.0; 2] // Initial impulse
                } else {
                    [(i as f64 * 0.05).sin() * 0.1; 2] // Quiet tail
                }
            })
            .collect();

        // Echo count scales the cost linearly
        for (name, n) in [("sparse", 0.1), ("default", 0.32), ("dense", 0.8)] {
            let params = ReverbParams {
                n,
                ..ReverbParams::default()
            };
            let mut reverb = Reverb::new(&params, 44_100.0);
            reverb.prepare(&noise);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0;
                    for &frame in &input {
                        let [l, r] = reverb.process(black_box(frame));
                        sum += l + r;
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}
