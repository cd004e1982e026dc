//! Pluck voice - short, percussive melodic sound.
//!
//! No sustain: the note dies away on its own whether or not an `OFF`
//! follows, so plucks work for arpeggios where rows never release.

use crate::dsp::oscillator::Waveform;
use crate::synth::{EnvelopeShape, Instrument};

pub fn pluck() -> Instrument {
    Instrument::wave("pluck", Waveform::Triangle)
        .envelope(EnvelopeShape::adsr(0.001, 0.25, 0.0, 0.05))
        .cutoff(4_000.0)
}
