use crate::dsp::envelope::{Envelope, EnvelopeState};
use crate::dsp::filter::OnePole;
use crate::dsp::noise::NoiseTable;
use crate::dsp::oscillator::{NoiseOscillator, Oscillator, Waveform};
use crate::sequencing::notes::tone_to_hz;

use super::additive::{AdditiveSettings, PartialBank};
use super::instrument::{Instrument, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Silent, ready for the next note
    Active,    // Playing, envelope in attack/decay/sustain
    Releasing, // Note released, envelope in release phase
}

/// Everything a voice reads from outside itself while rendering.
#[derive(Clone, Copy)]
pub struct VoiceCtx<'a> {
    pub noise: &'a NoiseTable,
    pub track: usize,
    pub tick: usize,
    /// Pitch offset in semitones from slides and vibrato.
    pub detune: f64,
}

enum Generator {
    Additive { settings: AdditiveSettings, bank: PartialBank },
    Wave { waveform: Waveform, osc: Oscillator },
    Noise(NoiseOscillator),
}

/// One sounding note of an instrument.
///
/// All buffers are sized for the instrument when the voice is built, so
/// starting and rendering notes never allocates.
pub struct Voice {
    tone: u8,
    velocity: f64,
    volume: f64,
    state: VoiceState,
    sample_rate: f64,
    generator: Generator,
    filter: Option<OnePole>,
    envelope: Envelope,
}

impl Voice {
    pub fn new(instrument: &Instrument, sample_rate: f64) -> Self {
        let generator = match &instrument.source {
            Source::Additive(params) => {
                let settings = params.build(sample_rate as f32);
                Generator::Additive {
                    settings,
                    bank: PartialBank::with_capacity(settings.partials()),
                }
            }
            Source::Wave(waveform) => Generator::Wave {
                waveform: *waveform,
                osc: Oscillator::new(),
            },
            Source::Noise => Generator::Noise(NoiseOscillator::new()),
        };

        Self {
            tone: 0,
            velocity: 0.0,
            volume: instrument.volume,
            state: VoiceState::Free,
            sample_rate,
            generator,
            filter: instrument.cutoff_hz.map(|hz| OnePole::lowpass(hz, sample_rate)),
            envelope: instrument.envelope.build(sample_rate),
        }
    }

    /// Start `tone` from scratch. Nothing of the previous note survives.
    pub fn start(&mut self, tone: u8, velocity: f64, noise: &NoiseTable) {
        self.tone = tone;
        self.velocity = velocity;
        self.state = VoiceState::Active;

        match &mut self.generator {
            Generator::Additive { settings, bank } => bank.retrigger(settings, tone as f64, noise),
            Generator::Wave { osc, .. } => osc.reset(),
            Generator::Noise(osc) => osc.reset(),
        }
        if let Some(filter) = &mut self.filter {
            filter.reset();
        }
        self.envelope.note_on();
    }

    pub fn release(&mut self) {
        if self.state == VoiceState::Active {
            self.state = VoiceState::Releasing;
            self.envelope.note_off();
        }
    }

    pub fn render_sample(&mut self, ctx: &VoiceCtx<'_>) -> f64 {
        if self.state == VoiceState::Free {
            return 0.0;
        }

        let raw = match &mut self.generator {
            Generator::Additive { bank, .. } => {
                bank.set_detune(ctx.detune);
                bank.produce_sample()
            }
            Generator::Wave { waveform, osc } => {
                let increment = tone_to_hz(self.tone as f64 + ctx.detune) / self.sample_rate;
                osc.next_sample(*waveform, increment)
            }
            Generator::Noise(osc) => {
                let increment = tone_to_hz(self.tone as f64 + ctx.detune) / self.sample_rate;
                osc.next_sample(ctx.noise, ctx.track, ctx.tick, increment)
            }
        };

        let filtered = match &mut self.filter {
            Some(filter) => filter.process(raw),
            None => raw,
        };
        let out = filtered * self.envelope.next_sample() * self.velocity * self.volume;

        // If voice is releasing and envelope has finished, mark as free
        if self.state == VoiceState::Releasing && !self.envelope.is_active() {
            self.free();
        }

        out
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn envelope_level(&self) -> f64 {
        self.envelope.level()
    }

    pub fn release_samples(&self) -> usize {
        self.envelope.release_samples() as usize
    }

    pub fn envelope_state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.envelope.reset();
        if let Generator::Additive { bank, .. } = &mut self.generator {
            bank.clear();
        }
    }

    pub fn tone(&self) -> u8 {
        self.tone
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }
}
