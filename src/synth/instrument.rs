//! Instrument descriptions.
//!
//! Every note of an instrument runs the same fixed chain:
//!
//! ```text
//! source (additive | wave | noise) → one-pole low-pass (optional) → × envelope → × velocity · volume
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::additive::AdditiveParams;
use crate::dsp::envelope::Envelope;
use crate::dsp::oscillator::Waveform;
use crate::error::{SongError, SongResult};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Additive(AdditiveParams),
    Wave(Waveform),
    Noise,
}

/// Envelope times in seconds, sustain as a level.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeShape {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

impl Default for EnvelopeShape {
    fn default() -> Self {
        Self {
            attack: 0.005,
            decay: 0.0,
            sustain: 1.0,
            release: 0.05,
        }
    }
}

impl EnvelopeShape {
    pub fn adsr(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Attack/release knobs in [0, 1]: attack lasts `attack²` seconds and
    /// release `release` seconds, with full sustain in between.
    pub fn oidos(attack: f64, release: f64) -> Self {
        Self::adsr(attack * attack, 0.0, 1.0, release)
    }

    pub fn build(&self, sample_rate: f64) -> Envelope {
        Envelope::adsr(sample_rate, self.attack, self.decay, self.sustain, self.release)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub source: Source,
    #[cfg_attr(feature = "serde", serde(default))]
    pub envelope: EnvelopeShape,
    /// Low-pass cutoff applied after the source.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub cutoff_hz: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default = "unity"))]
    pub volume: f64,
}

#[cfg(feature = "serde")]
fn unity() -> f64 {
    1.0
}

impl Instrument {
    pub fn new(name: impl Into<String>, source: Source) -> Self {
        Self {
            name: name.into(),
            source,
            envelope: EnvelopeShape::default(),
            cutoff_hz: None,
            volume: 1.0,
        }
    }

    pub fn additive(name: impl Into<String>, params: AdditiveParams) -> Self {
        Self::new(name, Source::Additive(params))
    }

    pub fn wave(name: impl Into<String>, waveform: Waveform) -> Self {
        Self::new(name, Source::Wave(waveform))
    }

    pub fn noise(name: impl Into<String>) -> Self {
        Self::new(name, Source::Noise)
    }

    pub fn envelope(mut self, envelope: EnvelopeShape) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn cutoff(mut self, hz: f64) -> Self {
        self.cutoff_hz = Some(hz);
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Partials one voice of this instrument needs.
    pub fn partials(&self) -> usize {
        match &self.source {
            Source::Additive(params) => params.partials(),
            Source::Wave(_) | Source::Noise => 0,
        }
    }

    pub fn validate(&self) -> SongResult<()> {
        let field = |name: &str| format!("{}.{name}", self.name);

        if let Source::Additive(params) = &self.source {
            for (knob, value) in params.knobs() {
                if !(0.0..=1.0).contains(&value) {
                    return Err(SongError::invalid_param(
                        field(knob),
                        format!("{value} is outside [0, 1]"),
                    ));
                }
            }
        }

        let e = &self.envelope;
        for (name, value) in [("attack", e.attack), ("decay", e.decay), ("release", e.release)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SongError::invalid_param(
                    field(name),
                    "must be a finite non-negative time",
                ));
            }
        }
        if !(0.0..=1.0).contains(&e.sustain) {
            return Err(SongError::invalid_param(field("sustain"), "must be in [0, 1]"));
        }

        if let Some(cutoff) = self.cutoff_hz {
            if !(cutoff.is_finite() && cutoff > 0.0) {
                return Err(SongError::invalid_param(
                    field("cutoff_hz"),
                    "must be a positive frequency",
                ));
            }
        }
        if !(self.volume.is_finite() && self.volume >= 0.0) {
            return Err(SongError::invalid_param(
                field("volume"),
                "must be a finite non-negative number",
            ));
        }

        Ok(())
    }
}
