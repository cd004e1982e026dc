//! Benchmarks for low-level DSP primitives.

mod additive;
mod delay;
mod envelope;
mod filter;
mod noise;
mod oscillator;
mod reverb;

pub use additive::bench_additive;
pub use delay::bench_delay;
pub use envelope::bench_envelope;
pub use filter::bench_filter;
pub use noise::bench_noise;
pub use oscillator::bench_oscillator;
pub use reverb::bench_reverb;
