//! Periodic and noise-driven oscillators.

/*
Oscillators
===========

Both oscillators here are phase accumulators: a phase in [0, 1) advances by
`increment = frequency / sample_rate` per sample and wraps around. The
waveform is a function of the phase.

    Sine      sin(2π·phase)
    Triangle  1 - 4·|phase - 0.5|        (shifted so it starts at -1)
    Saw       2·phase - 1                 (minus a PolyBLEP correction)
    Square    ±1 at phase < 0.5           (minus two PolyBLEP corrections)

Saw and square have a jump once (or twice) per cycle. A naive jump aliases
badly at high pitches, so a two-sample polynomial residual ("PolyBLEP") is
subtracted around each discontinuity. It is not perfectly band-limited but
removes most of the audible aliasing for almost no cost.

Noise Oscillator
----------------

The noise oscillator turns the shared noise table into a pitched texture.
Each cycle of its phase is cut into NOISESIZE steps, and each step reads one
texel:

    x = floor(phase · NOISESIZE)     position within the cycle
    y = tick                         changes the waveform every tick
    z = track                        each track reads its own plane

So a note plays a random single-cycle waveform at its pitch which morphs
once per tick, and two tracks never read the same words at the same time.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f64::consts::TAU;

use super::noise::{to_signed, NoiseTable};
use crate::NOISESIZE;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Saw,
    Square,
    Triangle,
}

#[inline]
fn poly_blep(t: f64, dt: f64) -> f64 {
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Oscillator {
    phase: f64,
}

impl Oscillator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Sample at the current phase, then advance by `increment` cycles.
    #[inline]
    pub fn next_sample(&mut self, waveform: Waveform, increment: f64) -> f64 {
        let phase = self.phase;
        let dt = increment.abs().min(0.5);

        let value = match waveform {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            Waveform::Saw => 2.0 * phase - 1.0 - poly_blep(phase, dt),
            Waveform::Square => {
                let naive = if phase < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(phase, dt) - poly_blep((phase + 0.5).fract(), dt)
            }
        };

        self.phase = (phase + increment).rem_euclid(1.0);
        value
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Pitched noise read from the noise table.
#[derive(Debug, Clone, Default)]
pub struct NoiseOscillator {
    phase: f64,
}

impl NoiseOscillator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Sample the table for `track` at `tick`, then advance by `increment` cycles.
    #[inline]
    pub fn next_sample(
        &mut self,
        noise: &NoiseTable,
        track: usize,
        tick: usize,
        increment: f64,
    ) -> f64 {
        let step = (self.phase * NOISESIZE as f64) as usize;
        let value = to_signed(noise.texel(step, tick, track));
        self.phase = (self.phase + increment).rem_euclid(1.0);
        value
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
