//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oidos::dsp::noise::NoiseTable;
use oidos::dsp::oscillator::{NoiseOscillator, Oscillator, Waveform};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let increment = 440.0 / 44_100.0;
    let noise = NoiseTable::filled();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];

        for (name, waveform) in [
            ("sine", Waveform::Sine),
            ("saw", Waveform::Saw),
            ("square", Waveform::Square),
            ("triangle", Waveform::Triangle),
        ] {
            let mut osc = Oscillator::new();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for out in buffer.iter_mut() {
                        *out = osc.next_sample(waveform, black_box(increment));
                    }
                })
            });
        }

        // Noise - table lookup per sample
        let mut osc = NoiseOscillator::new();
        group.bench_with_input(BenchmarkId::new("noise", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = osc.next_sample(&noise, 0, 0, black_box(increment));
                }
            })
        });
    }

    group.finish();
}
