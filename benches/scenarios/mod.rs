//! Real-world scenario benchmarks.
//!
//! Preset instruments playing one note, and complete songs rendered start
//! to finish the way the dump tool does it.

mod song;
mod voices;

pub use song::bench_song;
pub use voices::bench_voices;
