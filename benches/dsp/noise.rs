//! Benchmarks for filling the noise table.

use std::hint::black_box;

use criterion::Criterion;
use oidos::dsp::noise::{NoiseGenerator, NoiseSeed, NoiseTable};

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");

    // Full 64³ table - done once per song
    let mut table = NoiseTable::new();
    group.bench_function("fill_table", |b| {
        b.iter(|| {
            table.fill_seeded(black_box(NoiseSeed::default()));
        })
    });

    // Raw generator throughput
    group.bench_function("generator_4096", |b| {
        b.iter(|| {
            NoiseGenerator::new(black_box(NoiseSeed::default()))
                .take(4_096)
                .fold(0u32, |a, w| a ^ w)
        })
    });

    group.finish();
}
