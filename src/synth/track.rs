//! Per-track playback state.
//!
//! A track is monophonic, plus a small pool of tail voices for notes that
//! are still releasing. When a new note starts, the sounding voice moves to
//! a free tail slot and is released there while the new note starts from
//! scratch in the current slot.
//!
//! ```text
//!   row:      C-4          E-4               G-4
//!   current:  [C-4 ......] [E-4 .........]   [G-4 ...
//!   tails:                 [C-4 release .......... ]
//!                                            [E-4 release ...
//! ```
//!
//! The pool is sized when the track is built so that a release spanning
//! several rows always finds a free slot. Only a track whose release outlasts
//! [`MAX_TAILS`] rows has to steal, and it takes the quietest tail.
//!
//! Continuous effects (volume slide, pitch slide, portamento, vibrato) are
//! advanced once per tick, so every sample of a tick sees the same values.

use std::f64::consts::TAU;

use tracing::trace;

use super::instrument::Instrument;
use super::voice::{Voice, VoiceCtx};
use crate::dsp::noise::NoiseTable;
use crate::sequencing::row::{Effect, Note, Row};

/// Effect parameter scale for volume: 40h is unity.
const VOLUME_UNIT: f64 = 64.0;
/// Effect parameter scale for pitch: 16 steps per semitone.
const PITCH_UNIT: f64 = 16.0;

/// Most released voices a track keeps sounding at once.
pub const MAX_TAILS: usize = 16;

/// A released note and the pitch offset it had when it was let go.
struct Tail {
    voice: Voice,
    detune: f64,
}

pub struct TrackState {
    index: usize,
    current: Voice,
    tails: Vec<Tail>,

    volume: f64,
    volume_slide: f64,

    pitch_offset: f64,
    pitch_slide: f64,
    portamento: Option<(f64, f64)>,

    vibrato_speed: f64,
    vibrato_depth: f64,
    vibrato_phase: f64,
}

impl TrackState {
    /// Build a track whose notes can change every `samples_per_row` samples.
    pub fn new(
        index: usize,
        instrument: &Instrument,
        sample_rate: f64,
        samples_per_row: usize,
    ) -> Self {
        let current = Voice::new(instrument, sample_rate);
        let count = tail_count(current.release_samples(), samples_per_row);
        let tails = (0..count)
            .map(|_| Tail {
                voice: Voice::new(instrument, sample_rate),
                detune: 0.0,
            })
            .collect();

        Self {
            index,
            current,
            tails,

            volume: 1.0,
            volume_slide: 0.0,
            pitch_offset: 0.0,
            pitch_slide: 0.0,
            portamento: None,
            vibrato_speed: 0.0,
            vibrato_depth: 0.0,
            vibrato_phase: 0.0,
        }
    }

    /// Back to the state before the first row: silent, unity volume.
    pub fn reset(&mut self) {
        self.current.free();
        for tail in &mut self.tails {
            tail.voice.free();
            tail.detune = 0.0;
        }
        self.volume = 1.0;
        self.clear_row_effects();
        self.pitch_offset = 0.0;
        self.vibrato_phase = 0.0;
    }

    fn clear_row_effects(&mut self) {
        self.volume_slide = 0.0;
        self.pitch_slide = 0.0;
        self.portamento = None;
        self.vibrato_speed = 0.0;
        self.vibrato_depth = 0.0;
    }

    /// Apply the events of a row that starts on this tick.
    pub fn apply_row(&mut self, row: &Row, noise: &NoiseTable) {
        self.clear_row_effects();

        let glide = matches!(row.effect, Some(Effect::Portamento(_))) && self.current.is_active();

        match row.note {
            Note::On(tone) if glide => {
                let speed = match row.effect {
                    Some(Effect::Portamento(speed)) => speed as f64 / PITCH_UNIT,
                    _ => 0.0,
                };
                let target = tone as f64 - self.current.tone() as f64;
                self.portamento = Some((target, speed));
                trace!(track = self.index, tone, "portamento");
            }
            Note::On(tone) => {
                self.retrigger(tone, row.velocity(), noise);
                trace!(track = self.index, tone, velocity = row.velocity(), "note on");
            }
            Note::Off => {
                self.current.release();
                trace!(track = self.index, "note off");
            }
            Note::Empty => {}
        }

        match row.effect {
            Some(Effect::Volume(v)) => self.volume = (v as f64 / VOLUME_UNIT).clamp(0.0, 1.0),
            Some(Effect::VolumeSlide { up, down }) => {
                self.volume_slide = (up as f64 - down as f64) / VOLUME_UNIT;
            }
            Some(Effect::SlideUp(v)) => self.pitch_slide = v as f64 / PITCH_UNIT,
            Some(Effect::SlideDown(v)) => self.pitch_slide = -(v as f64) / PITCH_UNIT,
            Some(Effect::Vibrato { speed, depth }) => {
                self.vibrato_speed = speed as f64 / 64.0;
                self.vibrato_depth = depth as f64 / 8.0;
            }
            Some(Effect::Portamento(_)) | None => {}
        }
    }

    fn retrigger(&mut self, tone: u8, velocity: f64, noise: &NoiseTable) {
        if !self.current.is_free() {
            let detune = self.detune();
            let slot = self.tail_slot();
            let tail = &mut self.tails[slot];
            std::mem::swap(&mut self.current, &mut tail.voice);
            tail.detune = detune;
            tail.voice.release();
        }

        self.pitch_offset = 0.0;
        self.vibrato_phase = 0.0;
        self.current.start(tone, velocity, noise);
    }

    /// A free tail slot, or the quietest one when all are sounding.
    fn tail_slot(&self) -> usize {
        if let Some(free) = self.tails.iter().position(|t| t.voice.is_free()) {
            return free;
        }
        trace!(track = self.index, "stealing a releasing voice");
        self.tails
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.voice.envelope_level().total_cmp(&b.voice.envelope_level())
            })
            .map_or(0, |(slot, _)| slot)
    }

    /// Advance slides, portamento and vibrato by one tick.
    pub fn advance_tick(&mut self) {
        self.volume = (self.volume + self.volume_slide).clamp(0.0, 1.0);
        self.pitch_offset += self.pitch_slide;

        if let Some((target, speed)) = self.portamento {
            let distance = target - self.pitch_offset;
            if distance.abs() <= speed {
                self.pitch_offset = target;
            } else {
                self.pitch_offset += speed.copysign(distance);
            }
        }

        if self.vibrato_depth > 0.0 {
            self.vibrato_phase = (self.vibrato_phase + self.vibrato_speed).fract();
        }
    }

    /// Current pitch offset in semitones including vibrato.
    pub fn detune(&self) -> f64 {
        self.pitch_offset + self.vibrato_depth * (TAU * self.vibrato_phase).sin()
    }

    /// One sample of this track, before static gain and panning.
    pub fn render_sample(&mut self, noise: &NoiseTable, tick: usize) -> f64 {
        let mut ctx = VoiceCtx {
            noise,
            track: self.index,
            tick,
            detune: self.detune(),
        };
        let mut out = self.current.render_sample(&ctx);
        for tail in self.tails.iter_mut().filter(|t| !t.voice.is_free()) {
            ctx.detune = tail.detune;
            out += tail.voice.render_sample(&ctx);
        }
        out * self.volume
    }

    pub fn is_silent(&self) -> bool {
        self.current.is_free() && self.tails.iter().all(|t| t.voice.is_free())
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn current(&self) -> &Voice {
        &self.current
    }

    /// Released voices that are still sounding.
    pub fn tails(&self) -> impl Iterator<Item = &Voice> {
        self.tails.iter().map(|t| &t.voice).filter(|v| !v.is_free())
    }

    /// Number of preallocated tail voices.
    pub fn tail_capacity(&self) -> usize {
        self.tails.len()
    }
}

/// Enough tails for a release of `release` samples when notes change every
/// `row` samples, plus one for the note being released right now.
fn tail_count(release: usize, row: usize) -> usize {
    (release.div_ceil(row.max(1)) + 1).clamp(1, MAX_TAILS)
}
