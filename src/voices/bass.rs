//! Bass voice.
//!
//! A classic subtractive bass using a square wave filtered down.
//! Square waves have only odd harmonics, giving a hollow, woody character
//! that works well for bass lines.
//!
//! # Variations
//!
//! - Higher cutoff = more aggressive, "acid" bass
//! - Saw instead of square = brighter, more present bass
//! - Longer attack = swelling bass pad

use crate::dsp::oscillator::Waveform;
use crate::synth::{EnvelopeShape, Instrument};

/// Deep, punchy bass for tracks in octaves 1 to 3.
pub fn bass() -> Instrument {
    Instrument::wave("bass", Waveform::Square)
        .envelope(EnvelopeShape::adsr(0.01, 0.1, 0.7, 0.15))
        .cutoff(500.0)
}
