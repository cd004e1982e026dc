//! Benchmarks for the additive partial bank - the hot loop of every song.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};
use oidos::dsp::noise::NoiseTable;
use oidos::synth::{AdditiveParams, PartialBank};

pub fn bench_additive(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/additive");
    let noise = NoiseTable::filled();

    // modes × fat = partials per voice
    for (modes, fat) in [(0.1, 0.01), (0.2, 0.2), (0.5, 0.4)] {
        let settings = AdditiveParams {
            modes,
            fat,
            ..AdditiveParams::default()
        }
        .build(44_100.0);
        let partials = settings.partials();

        let mut bank = PartialBank::with_capacity(partials);
        bank.retrigger(&settings, 57.0, &noise);

        group.throughput(Throughput::Elements(partials as u64 * 1_024));
        group.bench_with_input(BenchmarkId::new("produce_1024", partials), &partials, |b, _| {
            b.iter(|| {
                let mut sum = 0.0;
                for _ in 0..1_024 {
                    sum += bank.produce_sample();
                }
                black_box(sum)
            })
        });

        group.bench_with_input(BenchmarkId::new("retrigger", partials), &partials, |b, _| {
            b.iter(|| bank.retrigger(&settings, black_box(57.0), &noise))
        });

        // Vibrato and slides recompute every step
        let mut detune = 0.0;
        group.bench_with_input(BenchmarkId::new("set_detune", partials), &partials, |b, _| {
            b.iter(|| {
                detune += 0.01;
                bank.set_detune(black_box(detune));
            })
        });
    }

    group.finish();
}
