//! The engine: owns a song and everything needed to render it.
//!
//! ```text
//! Oidos::new(song)          validate, allocate output, voices, reverb lines
//!   └─ fill_noise_table()   populate the 64³ noise table
//!        └─ generate_music()
//!             for each tick from the Sequencer:
//!                 row start?  → TrackState::apply_row for every track
//!                 every tick  → TrackState::advance_tick
//!                 Mixer::render_tick → samples_per_tick output frames
//!             → Music { samples, ticks_per_second, length, header }
//! ```
//!
//! Generation is a single pass over a preallocated buffer and cannot fail.
//! Generating before the noise table is filled is allowed but meaningless:
//! additive and noise sources then read zeros.

pub mod mixer;
pub mod sequencer;

use std::io::{self, Write};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use self::mixer::Mixer;
use self::sequencer::Sequencer;
use crate::dsp::noise::{NoiseSeed, NoiseTable};
use crate::error::{SongError, SongResult};
use crate::io::wav::{write_samples, WavHeader, MAX_FRAMES};
use crate::io::Sample;
use crate::sequencing::{Song, Timing};
use crate::synth::TrackState;
use crate::SAMPLE_RATE;

pub struct Oidos {
    song: Song,
    timing: Timing,
    seed: NoiseSeed,
    noise: NoiseTable,
    tracks: Vec<TrackState>,
    mixer: Mixer,
    sequencer: Sequencer,
    output: Vec<Sample>,
    header: WavHeader,
}

impl Oidos {
    /// Build an engine for `song` with the default noise seed.
    pub fn new(song: Song) -> SongResult<Self> {
        Self::with_seed(song, NoiseSeed::default())
    }

    pub fn with_seed(song: Song, seed: NoiseSeed) -> SongResult<Self> {
        song.validate()?;

        let timing = song.timing();
        let frames = song.music_length() * timing.samples_per_tick;
        let header = WavHeader::for_frames(frames).ok_or(SongError::TooLong {
            frames: frames as u64,
            max: MAX_FRAMES,
        })?;
        let samples_per_row = timing.samples_per_tick * song.ticks_per_row as usize;
        let tracks = song
            .tracks
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                let instrument = &song.instruments[spec.instrument];
                TrackState::new(index, instrument, SAMPLE_RATE as f64, samples_per_row)
            })
            .collect();

        info!(
            tracks = song.tracks.len(),
            ticks = song.music_length(),
            samples_per_tick = timing.samples_per_tick,
            frames,
            "engine ready"
        );

        Ok(Self {
            mixer: Mixer::new(&song),
            sequencer: Sequencer::new(&song),
            output: vec![Sample::SILENCE; frames],
            header,
            noise: NoiseTable::new(),
            tracks,
            timing,
            seed,
            song,
        })
    }

    /// Populate the noise table. Must run before [`Oidos::generate_music`].
    pub fn fill_noise_table(&mut self) {
        self.noise.fill_seeded(self.seed);
    }

    /// Render the whole song into the output buffer.
    ///
    /// Every call starts from silence, so repeated calls produce identical
    /// buffers.
    pub fn generate_music(&mut self) -> Music<'_> {
        let started = Instant::now();
        let Self {
            song,
            timing,
            noise,
            tracks,
            mixer,
            sequencer,
            output,
            ..
        } = self;

        info!(ticks = sequencer.total_ticks(), frames = output.len(), "generating");

        for track in tracks.iter_mut() {
            track.reset();
        }
        mixer.prepare(noise);
        sequencer.reset();

        let spt = timing.samples_per_tick;
        for cursor in sequencer.by_ref() {
            if cursor.row_start {
                if cursor.row == 0 {
                    debug!(
                        position = cursor.position,
                        pattern = cursor.pattern,
                        tick = cursor.tick,
                        "pattern start"
                    );
                }
                let pattern = &song.patterns[cursor.pattern];
                for (index, track) in tracks.iter_mut().enumerate() {
                    track.apply_row(pattern.row(index, cursor.row), noise);
                }
            }

            for track in tracks.iter_mut() {
                track.advance_tick();
            }

            let start = cursor.tick * spt;
            let out = &mut output[start..start + spt];
            mixer.render_tick(tracks, noise, cursor.tick, out);
        }

        if mixer.clipped() > 0 {
            warn!(
                frames = mixer.clipped(),
                peak = mixer.peak(),
                "output clipped, lower master_volume"
            );
        }
        info!(
            ticks = sequencer.tick(),
            frames = output.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generation finished"
        );

        self.music()
    }

    /// View of the output buffer and its metadata as of the last generation.
    pub fn music(&self) -> Music<'_> {
        Music {
            samples: &self.output,
            ticks_per_second: self.timing.ticks_per_second,
            // the header check in `new` bounds ticks below 2^32
            length: self.sequencer.tick() as u32,
            header: self.header,
            samples_per_tick: self.timing.samples_per_tick,
        }
    }

    pub fn noise_table(&self) -> &NoiseTable {
        &self.noise
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }
}

/// Rendered song: the sample buffer plus what a player needs to know.
#[derive(Debug, Clone, Copy)]
pub struct Music<'a> {
    pub samples: &'a [Sample],
    pub ticks_per_second: f32,
    /// Length in ticks.
    pub length: u32,
    pub header: WavHeader,
    pub samples_per_tick: usize,
}

impl Music<'_> {
    /// Header followed by the sample data.
    pub fn write_wav<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.header.to_bytes())?;
        self.write_raw(writer)
    }

    /// Sample data only, `header.data_bytes()` bytes.
    pub fn write_raw<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let frames = self.header.data_bytes() as usize / 4;
        write_samples(writer, &self.samples[..frames.min(self.samples.len())])
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / SAMPLE_RATE as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::Waveform;
    use crate::io::wav::HEADER_BYTES;
    use crate::pattern;
    use crate::sequencing::notes::*;
    use crate::synth::Instrument;

    fn sine_song() -> Song {
        Song::builder()
            .instrument(Instrument::wave("sine", Waveform::Sine))
            .track("lead", 0)
            .pattern(pattern![A4, _, OFF, _])
            .order([0])
            .build()
            .expect("valid song")
    }

    #[test]
    fn buffer_matches_song_length() {
        let song = sine_song();
        let expected = song.frames();
        let mut oidos = Oidos::new(song).unwrap();
        oidos.fill_noise_table();
        let music = oidos.generate_music();

        assert_eq!(music.samples.len(), expected);
        assert_eq!(music.length, 4);
        assert_eq!(music.samples.len() * 4, music.header.data_bytes() as usize);
        assert_eq!(music.ticks_per_second, 44_100.0 / music.samples_per_tick as f32);
    }

    #[test]
    fn generation_is_repeatable() {
        let mut oidos = Oidos::new(sine_song()).unwrap();
        oidos.fill_noise_table();
        let first = oidos.generate_music().samples.to_vec();
        let second = oidos.generate_music().samples.to_vec();
        assert_eq!(first, second);
        assert!(first.iter().any(|s| *s != Sample::SILENCE));
    }

    #[test]
    fn invalid_song_is_rejected() {
        let mut song = sine_song();
        song.order = vec![3];
        assert!(Oidos::new(song).is_err());
    }

    #[test]
    fn wav_and_raw_output_sizes() {
        let mut oidos = Oidos::new(sine_song()).unwrap();
        oidos.fill_noise_table();
        let music = oidos.generate_music();

        let mut wav = Vec::new();
        music.write_wav(&mut wav).unwrap();
        let mut raw = Vec::new();
        music.write_raw(&mut raw).unwrap();

        assert_eq!(raw.len(), music.header.data_bytes() as usize);
        assert_eq!(wav.len(), HEADER_BYTES + raw.len());
        assert_eq!(&wav[..4], b"RIFF");
        assert_eq!(&wav[HEADER_BYTES..], &raw[..]);
    }

    #[test]
    fn seed_changes_additive_output() {
        use crate::synth::AdditiveParams;

        let song = Song::builder()
            .instrument(Instrument::additive("pad", AdditiveParams::default()))
            .track("pad", 0)
            .pattern(pattern![C4, _])
            .order([0])
            .build()
            .unwrap();

        let mut a = Oidos::new(song.clone()).unwrap();
        let mut b = Oidos::with_seed(song, NoiseSeed([1, 2, 3, 4])).unwrap();
        a.fill_noise_table();
        b.fill_noise_table();
        assert_ne!(a.generate_music().samples, b.generate_music().samples);
    }
}
