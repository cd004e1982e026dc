//! Benchmarks for DSP primitives and whole-song rendering.
//!
//! Run with: cargo bench
//!
//! Generation is offline, so there is no hard deadline. The numbers are
//! still worth watching: an intro's loading screen waits for the whole song.
//!
//! Reference at 44.1kHz: one second of stereo output is 44100 frames, and
//! one tick at 120 BPM with 4 rows per beat is 5512 frames.
//!
//! Benchmark groups:
//!   - dsp/*        Low-level primitives (noise, oscillator, additive, filter, etc.)
//!   - scenarios/*  Preset voices and complete songs

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Block sizes in frames: small blocks, one tick, one second.
pub const BLOCK_SIZES: &[usize] = &[256, 5_512, 44_100];

criterion_group!(
    benches,
    // Low-level DSP primitives
    dsp::bench_noise,
    dsp::bench_oscillator,
    dsp::bench_additive,
    dsp::bench_filter,
    dsp::bench_envelope,
    dsp::bench_delay,
    dsp::bench_reverb,
    // Real-world scenarios
    scenarios::bench_voices,
    scenarios::bench_song,
);
criterion_main!(benches);
