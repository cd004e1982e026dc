//! Hi-hat voice (closed).
//!
//! A tight, short burst of noise. The note picks how fast the voice walks
//! the noise table: high notes sound bright and hissy, low notes grainy.
//!
//! # Variations
//!
//! - Longer decay = open hi-hat
//! - Low-pass cutoff = darker, jazzier hat

use crate::synth::{EnvelopeShape, Instrument};

/// Closed hi-hat. Play it around `C-7` and up.
pub fn hihat() -> Instrument {
    Instrument::noise("hihat")
        .envelope(EnvelopeShape::adsr(0.001, 0.05, 0.0, 0.03))
        .volume(0.5)
}
