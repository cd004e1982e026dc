//! Benchmarks for complete voice chains.
//!
//! Each preset plays one held note through its whole chain: source, filter,
//! envelope and velocity.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oidos::dsp::noise::NoiseTable;
use oidos::synth::{Voice, VoiceCtx};
use oidos::voices;

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let noise = NoiseTable::filled();
    let ctx = VoiceCtx {
        noise: &noise,
        track: 0,
        tick: 0,
        detune: 0.0,
    };

    for &size in BLOCK_SIZES {
        for instrument in voices::all() {
            let mut voice = Voice::new(&instrument, 44_100.0);
            voice.start(45, 1.0, &noise); // A-3

            let id = BenchmarkId::new(instrument.name.as_str(), size);
            group.bench_with_input(id, &size, |b, &n| {
                b.iter(|| {
                    let mut sum = 0.0;
                    for _ in 0..n {
                        sum += voice.render_sample(black_box(&ctx));
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}
