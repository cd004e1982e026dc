//! Low-level DSP primitives used by the instruments and the mixer.
//!
//! Everything here works on `f64` samples, one sample per call, and owns all
//! of its buffers from construction on. Nothing allocates after `new`, so the
//! primitives can be embedded directly inside voice and track structs.

/// Power-of-two circular delay line.
pub mod delay;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// One-pole low/high-pass filter.
pub mod filter;
/// The shared pseudo-random noise table.
pub mod noise;
/// Band-limited waveforms and the pitched noise oscillator.
pub mod oscillator;
/// Bit-level parameter quantization.
pub mod quantize;
/// Multi-tap feedback echo reverb.
pub mod reverb;

pub use envelope::{Envelope, EnvelopeState};
pub use noise::{NoiseSeed, NoiseTable, NOISE_LEN};
pub use oscillator::Waveform;
pub use reverb::ReverbParams;
