//! Bell voice.
//!
//! Additive with modes pulled away from the harmonic series and high
//! partials decaying faster than low ones, which is most of what makes a
//! struck metal sound.

use crate::synth::{AdditiveParams, EnvelopeShape, Instrument};

pub fn bell() -> Instrument {
    let params = AdditiveParams {
        seed: 0.77,
        modes: 0.12,
        fat: 0.02,
        width: 0.05,
        overtones: 0.6,
        sharpness: 0.35,
        harmonicity: 0.4,
        decaylow: 0.85,
        decayhigh: 0.6,
        filterlow: 0.0,
        filterhigh: 1.0,
        gain: 0.1,
        ..AdditiveParams::default()
    };

    Instrument::additive("bell", params).envelope(EnvelopeShape::oidos(0.02, 0.8))
}
