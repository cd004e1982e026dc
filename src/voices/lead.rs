//! Lead voice.
//!
//! A filtered saw with a quick attack. Saws carry every harmonic, so the
//! lead cuts through a mix even with the filter closed halfway.

use crate::dsp::oscillator::Waveform;
use crate::synth::{EnvelopeShape, Instrument};

/// Bright monophonic lead. Pairs well with `H` (vibrato) and `G`
/// (portamento) effects.
pub fn lead() -> Instrument {
    Instrument::wave("lead", Waveform::Saw)
        .envelope(EnvelopeShape::adsr(0.005, 0.2, 0.6, 0.1))
        .cutoff(3_000.0)
        .volume(0.7)
}
