//! Pad voice - sustained, atmospheric texture.
//!
//! Pads are the foundation of ambient music: a lush backdrop that fills
//! sonic space without demanding attention. This one is additive. Many
//! detuned copies of each mode give width and slow beating; the
//! harmonicity knob keeps the modes close to a harmonic series.
//!
//! # Variations
//!
//! - More `width` = wider, more chorused
//! - Lower `harmonicity` = inharmonic, bell-like
//! - Lower `filterhigh` = darker, more ambient

use crate::synth::{AdditiveParams, EnvelopeShape, Instrument};

pub fn pad() -> Instrument {
    let params = AdditiveParams {
        seed: 0.31,
        modes: 0.4,
        fat: 0.06,
        width: 0.3,
        overtones: 0.3,
        sharpness: 0.6,
        harmonicity: 1.0,
        decaylow: 1.0,
        decayhigh: 0.9,
        filterlow: 0.0,
        filterhigh: 0.6,
        fslopehigh: 0.3,
        gain: 0.3,
        ..AdditiveParams::default()
    };

    Instrument::additive("pad", params)
        .envelope(EnvelopeShape::oidos(0.5, 0.6))
        .volume(0.6)
}
