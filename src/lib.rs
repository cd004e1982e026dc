pub mod dsp;
pub mod engine; // Sequencer, mixer and the generation entry points
pub mod error;
pub mod io;
#[cfg(feature = "playback")]
pub mod runtime; // Live playback through cpal
pub mod sequencing; // Notes, rows, patterns and songs
pub mod synth; // Instruments, voices and per-track state
pub mod voices; // Ready-made instrument presets

/// Output sample rate. Fixed; every timing formula assumes it.
pub const SAMPLE_RATE: u32 = 44_100;
/// Edge length of the cubic noise table.
pub const NOISESIZE: usize = 64;

pub(crate) const MIN_TIME: f64 = 1.0 / 48_000.0;

pub use dsp::noise::{NoiseSeed, NoiseTable};
pub use engine::{Music, Oidos};
pub use error::{SongError, SongResult};
pub use io::{Sample, WavHeader};
pub use sequencing::{Pattern, Row, Song};
pub use synth::instrument::Instrument;
