//! Song description: tracks, instruments, patterns, order and tempo.
//!
//! A [`Song`] is plain data. It can be built in code with [`Song::builder`]
//! or loaded from JSON, and is checked once by [`Song::validate`] before an
//! engine accepts it.
//!
//! # Timing
//!
//! The sequencer counts ticks. A row lasts `ticks_per_row` ticks and a beat
//! `rows_per_beat` rows, so
//!
//! ```text
//! ticks_per_minute = bpm · rows_per_beat · ticks_per_row
//! samples_per_tick = floor(44100 · 60 / ticks_per_minute)
//! ```
//!
//! The tick length is rounded down to whole samples, so the real tempo is
//! slightly faster than `bpm`. `ticks_per_second` reports the exact rate.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tracing::warn;

use super::pattern::Pattern;
use super::row::Note;
use crate::dsp::reverb::ReverbParams;
use crate::error::{SongError, SongResult};
use crate::io::wav::MAX_FRAMES;
use crate::synth::instrument::Instrument;
use crate::SAMPLE_RATE;

/// One output track: which instrument plays it and where it sits in the mix.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Index into [`Song::instruments`].
    pub instrument: usize,
    /// Static track gain.
    #[cfg_attr(feature = "serde", serde(default = "unity"))]
    pub volume: f64,
    /// 0 = left, 0.5 = centre, 1 = right.
    #[cfg_attr(feature = "serde", serde(default = "centre"))]
    pub pan: f64,
    /// Send this track through the reverb.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reverb: bool,
}

#[cfg(feature = "serde")]
fn unity() -> f64 {
    1.0
}

#[cfg(feature = "serde")]
fn centre() -> f64 {
    0.5
}

impl TrackSpec {
    pub fn new(name: impl Into<String>, instrument: usize) -> Self {
        Self {
            name: name.into(),
            instrument,
            volume: 1.0,
            pan: 0.5,
            reverb: false,
        }
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn pan(mut self, pan: f64) -> Self {
        self.pan = pan;
        self
    }

    pub fn reverb(mut self, send: bool) -> Self {
        self.reverb = send;
        self
    }
}

/// Sample-level timing derived from the tempo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub samples_per_tick: usize,
    pub ticks_per_second: f32,
}

impl Timing {
    pub fn new(bpm: f64, rows_per_beat: u32, ticks_per_row: u32) -> Self {
        let ticks_per_minute = bpm * rows_per_beat as f64 * ticks_per_row as f64;
        let samples_per_tick = if ticks_per_minute > 0.0 && ticks_per_minute.is_finite() {
            ((SAMPLE_RATE as f64 * 60.0 / ticks_per_minute).floor() as usize).max(1)
        } else {
            1
        };
        Self {
            samples_per_tick,
            ticks_per_second: SAMPLE_RATE as f32 / samples_per_tick as f32,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub bpm: f64,
    pub rows_per_beat: u32,
    pub ticks_per_row: u32,
    pub master_volume: f64,
    pub tracks: Vec<TrackSpec>,
    pub instruments: Vec<Instrument>,
    pub patterns: Vec<Pattern>,
    /// Pattern indices in play order.
    pub order: Vec<usize>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub reverb: Option<ReverbParams>,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            rows_per_beat: 4,
            ticks_per_row: 1,
            master_volume: 1.0,
            tracks: Vec::new(),
            instruments: Vec::new(),
            patterns: Vec::new(),
            order: Vec::new(),
            reverb: None,
        }
    }
}

impl Song {
    pub fn builder() -> SongBuilder {
        SongBuilder::default()
    }

    /// Total length in ticks.
    pub fn music_length(&self) -> usize {
        self.order
            .iter()
            .map(|&p| self.patterns.get(p).map_or(0, |pattern| pattern.length))
            .sum::<usize>()
            * self.ticks_per_row as usize
    }

    pub fn timing(&self) -> Timing {
        Timing::new(self.bpm, self.rows_per_beat, self.ticks_per_row)
    }

    /// Length of the rendered buffer in stereo frames.
    pub fn frames(&self) -> usize {
        self.music_length() * self.timing().samples_per_tick
    }

    /// Frame count without wrapping, `None` if it overflows `u64`.
    fn checked_frames(&self) -> Option<u64> {
        let rows = self.order.iter().try_fold(0u64, |rows, &p| {
            let length = self.patterns.get(p).map_or(0, |pattern| pattern.length);
            rows.checked_add(u64::try_from(length).ok()?)
        })?;
        rows.checked_mul(self.ticks_per_row as u64)?
            .checked_mul(self.timing().samples_per_tick as u64)
    }

    /// Check every reference and parameter. A song that passes can be
    /// generated without any runtime failure.
    pub fn validate(&self) -> SongResult<()> {
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return Err(SongError::InvalidTempo { bpm: self.bpm });
        }
        if self.rows_per_beat == 0 {
            return Err(SongError::invalid_param("rows_per_beat", "must be at least 1"));
        }
        if self.ticks_per_row == 0 {
            return Err(SongError::invalid_param("ticks_per_row", "must be at least 1"));
        }
        if !(self.master_volume.is_finite() && self.master_volume >= 0.0) {
            return Err(SongError::invalid_param(
                "master_volume",
                "must be a finite non-negative number",
            ));
        }
        if self.tracks.is_empty() {
            return Err(SongError::NoTracks);
        }
        if self.order.is_empty() {
            return Err(SongError::EmptyOrder);
        }

        for (position, &pattern) in self.order.iter().enumerate() {
            if pattern >= self.patterns.len() {
                return Err(SongError::UnknownPattern {
                    position,
                    pattern,
                    available: self.patterns.len(),
                });
            }
        }

        for (index, pattern) in self.patterns.iter().enumerate() {
            if pattern.columns() > self.tracks.len() {
                return Err(SongError::TooManyColumns {
                    pattern: index,
                    columns: pattern.columns(),
                    tracks: self.tracks.len(),
                });
            }
            for (column, rows) in pattern.tracks.iter().enumerate() {
                if rows.len() > pattern.length {
                    return Err(SongError::ColumnTooLong {
                        pattern: index,
                        column,
                        rows: rows.len(),
                        length: pattern.length,
                    });
                }
            }
        }

        for (index, track) in self.tracks.iter().enumerate() {
            if track.instrument >= self.instruments.len() {
                return Err(SongError::UnknownInstrument {
                    track: index,
                    instrument: track.instrument,
                    available: self.instruments.len(),
                });
            }
            if !(track.volume.is_finite() && track.volume >= 0.0) {
                return Err(SongError::invalid_param(
                    format!("tracks[{index}].volume"),
                    "must be a finite non-negative number",
                ));
            }
            if !(0.0..=1.0).contains(&track.pan) {
                return Err(SongError::invalid_param(
                    format!("tracks[{index}].pan"),
                    "must be in [0, 1]",
                ));
            }
        }

        for instrument in &self.instruments {
            instrument.validate()?;
        }

        match self.checked_frames() {
            Some(0) => return Err(SongError::EmptySong),
            Some(frames) if frames <= MAX_FRAMES => {}
            frames => {
                return Err(SongError::TooLong {
                    frames: frames.unwrap_or(u64::MAX),
                    max: MAX_FRAMES,
                })
            }
        }

        self.warn_degenerate();
        Ok(())
    }

    fn warn_degenerate(&self) {
        for (index, track) in self.tracks.iter().enumerate() {
            let plays = self.order.iter().any(|&p| {
                self.patterns[p]
                    .tracks
                    .get(index)
                    .is_some_and(|rows| rows.iter().any(|r| matches!(r.note, Note::On(_))))
            });
            if !plays {
                warn!(track = index, name = %track.name, "track plays no notes");
            }
            if track.reverb && self.reverb.is_none() {
                warn!(
                    track = index,
                    name = %track.name,
                    "track sends to reverb but the song has none"
                );
            }
        }
    }
}

#[cfg(feature = "serde")]
impl Song {
    /// Parse and validate a JSON song.
    pub fn from_json(json: &str) -> SongResult<Self> {
        let song: Song = serde_json::from_str(json)?;
        song.validate()?;
        Ok(song)
    }

    /// Read, parse and validate a JSON song file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> SongResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> SongResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builder for songs written in code.
///
/// Instruments and patterns are numbered in the order they are added.
#[derive(Debug, Default)]
pub struct SongBuilder {
    song: Song,
}

impl SongBuilder {
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.song.bpm = bpm;
        self
    }

    pub fn rows_per_beat(mut self, rows: u32) -> Self {
        self.song.rows_per_beat = rows;
        self
    }

    pub fn ticks_per_row(mut self, ticks: u32) -> Self {
        self.song.ticks_per_row = ticks;
        self
    }

    pub fn master_volume(mut self, volume: f64) -> Self {
        self.song.master_volume = volume;
        self
    }

    pub fn instrument(mut self, instrument: Instrument) -> Self {
        self.song.instruments.push(instrument);
        self
    }

    /// Add a centred track playing instrument `instrument`.
    pub fn track(self, name: impl Into<String>, instrument: usize) -> Self {
        self.track_spec(TrackSpec::new(name, instrument))
    }

    pub fn track_spec(mut self, track: TrackSpec) -> Self {
        self.song.tracks.push(track);
        self
    }

    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.song.patterns.push(pattern);
        self
    }

    pub fn order(mut self, order: impl IntoIterator<Item = usize>) -> Self {
        self.song.order = order.into_iter().collect();
        self
    }

    pub fn reverb(mut self, params: ReverbParams) -> Self {
        self.song.reverb = Some(params);
        self
    }

    /// Validate and return the song.
    pub fn build(self) -> SongResult<Song> {
        self.song.validate()?;
        Ok(self.song)
    }
}
