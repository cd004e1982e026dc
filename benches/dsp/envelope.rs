//! Benchmarks for ADSR envelope generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oidos::dsp::envelope::Envelope;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        // Attack phase - ramping up
        let mut env = Envelope::adsr(44_100.0, 1.0, 0.1, 0.7, 0.3);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, &n| {
            b.iter(|| {
                env.note_on();
                (0..n).map(|_| env.next_sample()).sum::<f64>()
            })
        });

        // Sustain - steady state
        let mut env = Envelope::adsr(44_100.0, 0.001, 0.001, 0.7, 0.3);
        env.note_on();
        for _ in 0..1_000 {
            env.next_sample();
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, &n| {
            b.iter(|| black_box((0..n).map(|_| env.next_sample()).sum::<f64>()))
        });
    }

    group.finish();
}
