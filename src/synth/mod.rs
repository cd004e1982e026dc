// Purpose: Instruments, voices and per-track playback state
// This layer sits above the dsp primitives and below the sequencer

pub mod additive;
pub mod instrument;
pub mod track;
pub mod voice;

pub use additive::{AdditiveParams, AdditiveSettings, PartialBank, MAX_PARTIALS};
pub use instrument::{EnvelopeShape, Instrument, Source};
pub use track::TrackState;
pub use voice::{Voice, VoiceCtx, VoiceState};
