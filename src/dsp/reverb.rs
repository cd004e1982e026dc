//! Reverb - a sparse multi-tap feedback echo network.
//!
//! The reverb is a bank of independent feedback delay lines ("echoes"), each
//! with its own delay length picked pseudo-randomly from the noise table.
//!
//! ```text
//!             ┌──────────── band-pass (filterlow..filterhigh) ◄── input[c]
//!             ▼
//!   line_b ◄─(+)◄── × decay^d ◄── band-pass (dampenlow..dampenhigh) ◄── line_b[pos - d]
//!             │
//!             └──► line_b[pos - d - delayadd] × volume[c] ──► output[c]
//! ```
//!
//! Echo `b` listens to and feeds channel `b & 1`, so the left and right
//! reflections are decorrelated.
//!
//! # Echo Selection
//!
//! Delays are walked from `delaymax` down to `delaymin + 1`. With `taken`
//! echoes chosen so far, delay `d` is kept when
//!
//! ```text
//! (noise[seed + d] · (d - delaymin)) >> 32  <  nbufs - taken
//! ```
//!
//! which spreads `nbufs` echoes roughly uniformly over the range without
//! ever picking more than `nbufs`.
//!
//! # Decay
//!
//! `halftime` is the time in seconds for an echo to lose half its level, so
//! the per-sample decay is `0.5^(1 / (halftime · fs))` and an echo of length
//! `d` feeds back with `decay^d`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tracing::debug;

use super::delay::DelayLine;
use super::filter::OnePole;
use super::noise::NoiseTable;
use super::quantize::quantize;

/// Reverb knobs, each in [0, 1].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    pub mix: f32,
    pub pan: f32,
    pub delaymin: f32,
    pub delaymax: f32,
    pub delayadd: f32,
    pub halftime: f32,
    pub filterlow: f32,
    pub filterhigh: f32,
    pub dampenlow: f32,
    pub dampenhigh: f32,
    pub n: f32,
    pub seed: f32,

    pub q_mixpan: f32,
    pub q_flow: f32,
    pub q_fhigh: f32,
    pub q_dlow: f32,
    pub q_dhigh: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            mix: 0.1,
            pan: 0.5,
            delaymin: 0.07,
            delaymax: 0.13,
            delayadd: 0.0,
            halftime: 0.5,
            filterlow: 0.1,
            filterhigh: 0.6,
            dampenlow: 0.1,
            dampenhigh: 0.7,
            n: 0.32,
            seed: 0.32,

            q_mixpan: 0.0,
            q_flow: 0.0,
            q_fhigh: 0.0,
            q_dlow: 0.0,
            q_dhigh: 0.0,
        }
    }
}

/// Knob value scaled to 0..=100.
pub(crate) fn p100(value: f32) -> usize {
    (value.max(0.0) * 100.0 + 0.5).floor() as usize
}

/// Derived reverb settings, in samples and filter coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSettings {
    pub nbufs: usize,
    pub delaymin: usize,
    pub delaymax: usize,
    pub delayadd: usize,
    pub seed: usize,
    pub decay: f64,

    pub filterlow: f64,
    pub filterhigh: f64,
    pub dampenlow: f64,
    pub dampenhigh: f64,

    pub volumes: [f64; 2],
}

impl ReverbParams {
    pub fn build(&self, sample_rate: f32) -> ReverbSettings {
        let nbufs = p100(self.n) * 2;
        let mix = if nbufs == 0 {
            0.0
        } else {
            self.mix * 10.0 / (nbufs as f32).sqrt()
        };
        let decay = 0.5f32.powf(1.0 / (self.halftime.max(0.01) * sample_rate));
        let coefficient = |knob: f32, level: f32| quantize(knob * knob, level).min(1.0) as f64;

        ReverbSettings {
            nbufs,
            delaymin: p100(self.delaymin) * 256,
            delaymax: p100(self.delaymax) * 256,
            delayadd: p100(self.delayadd) * 256,
            seed: p100(self.seed) * 2048,
            decay: decay as f64,

            filterlow: coefficient(self.filterlow, self.q_flow),
            filterhigh: coefficient(self.filterhigh, self.q_fhigh),
            dampenlow: coefficient(self.dampenlow, self.q_dlow),
            dampenhigh: coefficient(self.dampenhigh, self.q_dhigh),

            volumes: [
                quantize(mix * (2.0 * (1.0 - self.pan)).sqrt(), self.q_mixpan) as f64,
                quantize(mix * (2.0 * self.pan).sqrt(), self.q_mixpan) as f64,
            ],
        }
    }
}

struct Echo {
    delay: usize,
    feedback: f64,
    line: DelayLine,
    input_high: OnePole,
    input_low: OnePole,
    damp_high: OnePole,
    damp_low: OnePole,
}

impl Echo {
    fn new(settings: &ReverbSettings) -> Self {
        Self {
            delay: 0,
            feedback: 0.0,
            line: DelayLine::new(),
            input_high: OnePole::with_coefficient(settings.filterhigh),
            input_low: OnePole::with_coefficient(settings.filterlow),
            damp_high: OnePole::with_coefficient(settings.dampenhigh),
            damp_low: OnePole::with_coefficient(settings.dampenlow),
        }
    }

    fn reset(&mut self) {
        self.line.reset();
        self.input_high.reset();
        self.input_low.reset();
        self.damp_high.reset();
        self.damp_low.reset();
    }
}

pub struct Reverb {
    settings: ReverbSettings,
    echoes: Vec<Echo>,
    active: usize,
}

impl Reverb {
    /// Allocate delay lines for up to `nbufs` echoes. No echo sounds until
    /// [`Reverb::prepare`] has picked the delays from a filled noise table.
    pub fn new(params: &ReverbParams, sample_rate: f32) -> Self {
        let settings = params.build(sample_rate);
        let echoes = (0..settings.nbufs).map(|_| Echo::new(&settings)).collect();
        Self {
            settings,
            echoes,
            active: 0,
        }
    }

    /// Clear all state and select echo delays from `noise`.
    pub fn prepare(&mut self, noise: &NoiseTable) {
        let s = self.settings;
        let mut taken = 0;
        let mut feedback = s.decay.powi(s.delaymax as i32);

        for delay in (s.delaymin + 1..=s.delaymax).rev() {
            if taken == self.echoes.len() {
                break;
            }
            let random = noise.get(s.seed + delay) as u64;
            if (random * (delay - s.delaymin) as u64) >> 32 < (s.nbufs - taken) as u64 {
                let echo = &mut self.echoes[taken];
                echo.reset();
                echo.delay = delay;
                echo.feedback = feedback;
                taken += 1;
            }
            feedback /= s.decay;
        }

        self.active = taken;
        debug!(echoes = taken, delaymin = s.delaymin, delaymax = s.delaymax, "reverb prepared");
    }

    /// Process one stereo frame, returning dry plus wet.
    pub fn process(&mut self, input: [f64; 2]) -> [f64; 2] {
        let mut output = input;
        let delayadd = self.settings.delayadd;
        let volumes = self.settings.volumes;

        for (b, echo) in self.echoes[..self.active].iter_mut().enumerate() {
            let c = b & 1;
            output[c] += echo.line.read(echo.delay + delayadd) * volumes[c];

            let x = input[c];
            let filtered = echo.input_high.process(x) - echo.input_low.process(x);

            let tap = echo.line.read(echo.delay);
            let damped = echo.damp_high.process(tap) - echo.damp_low.process(tap);

            echo.line.write(damped * echo.feedback + filtered);
        }

        output
    }

    pub fn settings(&self) -> &ReverbSettings {
        &self.settings
    }

    /// Number of echoes selected by the last `prepare`.
    pub fn echo_count(&self) -> usize {
        self.active
    }

    /// Longest delay any echo reads from.
    pub fn max_delay(&self) -> usize {
        self.settings.delaymax + self.settings.delayadd
    }
}
