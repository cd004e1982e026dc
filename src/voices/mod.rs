//! Pre-built instruments for common sounds.
//!
//! Use these as starting points for your own sounds, or study them to learn
//! how different timbres are built.
//!
//! # Example
//!
//! ```
//! use oidos::{voices, Song};
//!
//! let song = Song::builder()
//!     .instrument(voices::bass())
//!     .instrument(voices::pad())
//!     .track("bass", 0)
//!     .track("pad", 1);
//! ```

mod bass;
mod bell;
mod hihat;
mod lead;
mod pad;
mod pluck;

pub use bass::bass;
pub use bell::bell;
pub use hihat::hihat;
pub use lead::lead;
pub use pad::pad;
pub use pluck::pluck;

use crate::synth::Instrument;

/// Every preset, in a fixed order.
pub fn all() -> Vec<Instrument> {
    vec![bass(), lead(), pad(), pluck(), bell(), hihat()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for instrument in all() {
            assert!(instrument.validate().is_ok(), "{} failed validation", instrument.name);
        }
    }

    #[test]
    fn preset_names_are_unique() {
        let mut names: Vec<String> = all().into_iter().map(|i| i.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), all().len());
    }
}
