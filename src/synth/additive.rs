//! Additive synthesis with many slowly decaying partials.

/*
Additive Partials
=================

An additive instrument is a sum of sine partials. Each partial is a complex
number rotated by a fixed complex step every sample:

    state ← state · step          step = ampmul · e^(iω)

The imaginary part of `state` is a sine at angular frequency ω, and
|ampmul| < 1 makes it decay exponentially. One complex multiply per partial
per sample, no trigonometry in the inner loop.

Modes and Fat
-------------

Partials come in groups. A *mode* is one overtone of the note: it gets a
random sub-tone (how far above the root it sits), a decay rate and an
amplitude. Each mode is then thickened into `fat` partials, each slightly
detuned within `width` semitones and starting at a random phase.

    modes  = 3, fat = 2

    mode 0 ──┬── partial 0   (tone + detune_0, phase_0)
             └── partial 1   (tone + detune_1, phase_1)
    mode 1 ──┬── partial 2
             └── partial 3
    mode 2 ──┬── partial 4
             └── partial 5

All random numbers are read from the noise table, starting at
`mode · 256 + seed`. The same note always produces the same partials.

Harmonicity
-----------

A mode's relative frequency is pulled toward the nearest whole multiple of
the root frequency:

    relfreq_h = relfreq + (round(relfreq) - relfreq) · harmonicity

harmonicity = 1 gives a perfectly harmonic spectrum, 0 leaves the random
inharmonic ratios, and negative values push away from the harmonics.

Spectral Filters
----------------

Every partial carries two linear ramps, one for the low edge and one for the
high edge of a pass band measured in semitones:

    filter_low  = 1 - (f_low  + tone - ptone) · slope_low
    filter_high = 1 - (ptone - (f_high + tone)) · slope_high

Each sample the partial is weighted by clamp(filter_low) · clamp(filter_high)
and both ramps move by their sweep, so the band can open or close over the
life of the note.

Saturation
----------

The sum of n partials is scaled and soft-clipped in one step:

    out = s · sqrt(gain / (n + (gain - 1) · s²))

For small s this is s · sqrt(gain / n); as s grows the output approaches
sqrt(gain / (gain - 1)).
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f64::consts::PI;

use crate::dsp::noise::NoiseTable;
use crate::dsp::quantize::quantize;
use crate::dsp::reverb::p100;

/// Semitone range covered by the spectral filter knobs.
const TOTAL_SEMITONES: f32 = 120.0;

/// Largest partial bank a voice can need: 100 modes of 100 partials each.
pub const MAX_PARTIALS: usize = 100 * 100;

/// Additive instrument knobs, each in [0, 1], plus quantization levels.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdditiveParams {
    pub seed: f32,
    pub modes: f32,
    pub fat: f32,
    pub width: f32,
    pub overtones: f32,
    pub sharpness: f32,
    pub harmonicity: f32,
    pub decaylow: f32,
    pub decayhigh: f32,
    pub filterlow: f32,
    pub fslopelow: f32,
    pub fsweeplow: f32,
    pub filterhigh: f32,
    pub fslopehigh: f32,
    pub fsweephigh: f32,
    pub gain: f32,

    pub q_decaydiff: f32,
    pub q_decaylow: f32,
    pub q_harmonicity: f32,
    pub q_sharpness: f32,
    pub q_width: f32,
    pub q_f_low: f32,
    pub q_fs_low: f32,
    pub q_fsw_low: f32,
    pub q_f_high: f32,
    pub q_fs_high: f32,
    pub q_fsw_high: f32,
    pub q_gain: f32,
}

impl Default for AdditiveParams {
    fn default() -> Self {
        Self {
            seed: 0.2,
            modes: 0.2,
            fat: 0.2,
            width: 0.2,
            overtones: 0.2,
            sharpness: 0.2,
            harmonicity: 1.0,
            decaylow: 1.0,
            decayhigh: 1.0,
            filterlow: 0.2,
            fslopelow: 0.2,
            fsweeplow: 0.5,
            filterhigh: 0.8,
            fslopehigh: 0.2,
            fsweephigh: 0.5,
            gain: 0.2,

            q_decaydiff: 0.0,
            q_decaylow: 0.0,
            q_harmonicity: 0.0,
            q_sharpness: 0.0,
            q_width: 0.0,
            q_f_low: 0.0,
            q_fs_low: 0.0,
            q_fsw_low: 0.0,
            q_f_high: 0.0,
            q_fs_high: 0.0,
            q_fsw_high: 0.0,
            q_gain: 0.0,
        }
    }
}

impl AdditiveParams {
    /// Every knob with its name, for range checks and display.
    pub fn knobs(&self) -> [(&'static str, f32); 28] {
        [
            ("seed", self.seed),
            ("modes", self.modes),
            ("fat", self.fat),
            ("width", self.width),
            ("overtones", self.overtones),
            ("sharpness", self.sharpness),
            ("harmonicity", self.harmonicity),
            ("decaylow", self.decaylow),
            ("decayhigh", self.decayhigh),
            ("filterlow", self.filterlow),
            ("fslopelow", self.fslopelow),
            ("fsweeplow", self.fsweeplow),
            ("filterhigh", self.filterhigh),
            ("fslopehigh", self.fslopehigh),
            ("fsweephigh", self.fsweephigh),
            ("gain", self.gain),
            ("q_decaydiff", self.q_decaydiff),
            ("q_decaylow", self.q_decaylow),
            ("q_harmonicity", self.q_harmonicity),
            ("q_sharpness", self.q_sharpness),
            ("q_width", self.q_width),
            ("q_f_low", self.q_f_low),
            ("q_fs_low", self.q_fs_low),
            ("q_fsw_low", self.q_fsw_low),
            ("q_f_high", self.q_f_high),
            ("q_fs_high", self.q_fs_high),
            ("q_fsw_high", self.q_fsw_high),
            ("q_gain", self.q_gain),
        ]
    }

    /// Number of partials a note of this instrument runs.
    pub fn partials(&self) -> usize {
        p100(self.modes).max(1) * p100(self.fat).max(1)
    }

    pub fn build(&self, sample_rate: f32) -> AdditiveSettings {
        let sweep = |knob: f32| (knob - 0.5).powi(3) * TOTAL_SEMITONES * 100.0 / sample_rate;

        AdditiveSettings {
            modes: p100(self.modes).max(1),
            fat: p100(self.fat).max(1),
            seed: p100(self.seed),
            overtones: p100(self.overtones) as f64,

            decaylow: quantize(self.decaylow, self.q_decaylow) as f64,
            decaydiff: quantize(self.decayhigh - self.decaylow, self.q_decaydiff) as f64,
            harmonicity: quantize(self.harmonicity * 2.0 - 1.0, self.q_harmonicity) as f64,
            sharpness: quantize(self.sharpness * 5.0 - 4.0, self.q_sharpness) as f64,
            width: quantize(self.width.powi(5) * 100.0, self.q_width) as f64,

            f_low: quantize((self.filterlow * 2.0 - 1.0) * TOTAL_SEMITONES, self.q_f_low) as f64,
            f_slopelow: quantize((1.0 - self.fslopelow).powi(3), self.q_fs_low) as f64,
            f_sweeplow: quantize(sweep(self.fsweeplow), self.q_fsw_low) as f64,
            f_high: quantize((self.filterhigh * 2.0 - 1.0) * TOTAL_SEMITONES, self.q_f_high) as f64,
            f_slopehigh: quantize((1.0 - self.fslopehigh).powi(3), self.q_fs_high) as f64,
            f_sweephigh: quantize(sweep(self.fsweephigh), self.q_fsw_high) as f64,

            gain: quantize(4096f32.powf(self.gain - 0.25), self.q_gain) as f64,

            base_freq: 440.0 * 2f64.powf(-57.0 / 12.0) / sample_rate as f64 * 2.0 * PI,
        }
    }
}

/// Derived, quantized synthesis settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdditiveSettings {
    pub modes: usize,
    pub fat: usize,
    pub seed: usize,
    pub overtones: f64,

    pub decaylow: f64,
    pub decaydiff: f64,
    pub harmonicity: f64,
    pub sharpness: f64,
    pub width: f64,

    pub f_low: f64,
    pub f_slopelow: f64,
    pub f_sweeplow: f64,
    pub f_high: f64,
    pub f_slopehigh: f64,
    pub f_sweephigh: f64,

    pub gain: f64,

    /// Angular frequency per sample of tone 0.
    pub base_freq: f64,
}

impl AdditiveSettings {
    pub fn partials(&self) -> usize {
        self.modes * self.fat
    }
}

/// Preallocated partial state for one voice.
#[derive(Debug, Clone)]
pub struct PartialBank {
    len: usize,

    state_re: Vec<f64>,
    state_im: Vec<f64>,
    step_re: Vec<f64>,
    step_im: Vec<f64>,
    filter_low: Vec<f64>,
    filter_high: Vec<f64>,
    ptone: Vec<f64>,
    ampmul: Vec<f64>,

    f_add_low: f64,
    f_add_high: f64,
    gain: f64,
    base_freq: f64,
    detune: f64,
}

impl PartialBank {
    pub fn with_capacity(partials: usize) -> Self {
        let zeros = || vec![0.0; partials];
        Self {
            len: 0,
            state_re: zeros(),
            state_im: zeros(),
            step_re: zeros(),
            step_im: zeros(),
            filter_low: zeros(),
            filter_high: zeros(),
            ptone: zeros(),
            ampmul: zeros(),
            f_add_low: 0.0,
            f_add_high: 0.0,
            gain: 1.0,
            base_freq: 0.0,
            detune: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.state_re.len()
    }

    /// Partials in use by the current note.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Lay out the partials of `tone` from scratch.
    pub fn retrigger(&mut self, settings: &AdditiveSettings, tone: f64, noise: &NoiseTable) {
        let capacity = self.capacity();
        self.f_add_low = -settings.f_sweeplow * settings.f_slopelow;
        self.f_add_high = settings.f_sweephigh * settings.f_slopehigh;
        self.gain = settings.gain;
        self.base_freq = settings.base_freq;
        self.detune = 0.0;

        let f_lowlimit = settings.f_low + tone;
        let f_highlimit = settings.f_high + tone;

        let mut i = 0;
        'modes: for m in 0..settings.modes {
            let mut random_index = m * 256 + settings.seed;
            let mut random = || {
                let r = noise.signed(random_index);
                random_index += 1;
                r
            };

            let subtone = random().abs();
            let reltone = subtone * settings.overtones;
            let decay = settings.decaylow + subtone * settings.decaydiff;
            let ampmul = decay.max(0.0).powf(1.0 / 4096.0);

            let relfreq = 2f64.powf(reltone / 12.0);
            let relfreq_ot = (relfreq + 0.5).floor();
            let relfreq_h = relfreq + (relfreq_ot - relfreq) * settings.harmonicity;
            let reltone = relfreq_h.log2() * 12.0;
            let mtone = tone + reltone;
            let mamp = random() * 2f64.powf(reltone * settings.sharpness / 12.0);

            for _ in 0..settings.fat {
                if i == capacity {
                    break 'modes;
                }
                let ptone = mtone + random() * settings.width;
                let phase = settings.base_freq * 2f64.powf(ptone / 12.0);
                self.step_re[i] = ampmul * phase.cos();
                self.step_im[i] = ampmul * phase.sin();

                let angle = random() * PI;
                self.state_re[i] = mamp * angle.cos();
                self.state_im[i] = mamp * angle.sin();

                self.filter_low[i] = 1.0 - (f_lowlimit - ptone) * settings.f_slopelow;
                self.filter_high[i] = 1.0 - (ptone - f_highlimit) * settings.f_slopehigh;

                self.ptone[i] = ptone;
                self.ampmul[i] = ampmul;
                i += 1;
            }
        }
        self.len = i;
    }

    /// Shift every partial by `semitones` relative to the triggered tone.
    /// Steps are only recomputed when the offset changes.
    pub fn set_detune(&mut self, semitones: f64) {
        if semitones == self.detune {
            return;
        }
        self.detune = semitones;
        for i in 0..self.len {
            let phase = self.base_freq * 2f64.powf((self.ptone[i] + semitones) / 12.0);
            self.step_re[i] = self.ampmul[i] * phase.cos();
            self.step_im[i] = self.ampmul[i] * phase.sin();
        }
    }

    /// Sum all partials for one sample and advance them.
    pub fn produce_sample(&mut self) -> f64 {
        let n = self.len;
        if n == 0 {
            return 0.0;
        }

        let mut s = 0.0;
        for i in 0..n {
            let weight = self.filter_low[i].clamp(0.0, 1.0) * self.filter_high[i].clamp(0.0, 1.0);
            s += self.state_im[i] * weight;

            let (re, im) = (self.state_re[i], self.state_im[i]);
            self.state_re[i] = re * self.step_re[i] - im * self.step_im[i];
            self.state_im[i] = re * self.step_im[i] + im * self.step_re[i];

            self.filter_low[i] += self.f_add_low;
            self.filter_high[i] += self.f_add_high;
        }

        // gain < 1 expands instead of compressing; keep the root real
        let denominator = (n as f64 + (self.gain - 1.0) * s * s).max(f64::EPSILON);
        s * (self.gain / denominator).sqrt()
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.detune = 0.0;
    }
}
