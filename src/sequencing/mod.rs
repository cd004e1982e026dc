#[allow(non_upper_case_globals)]
pub mod notes;
pub mod pattern;
pub mod row;
pub mod song;

pub use notes::{note_name, parse_note, tone_to_hz};
pub use pattern::Pattern;
pub use row::{Effect, Note, Row};
pub use song::{Song, SongBuilder, Timing, TrackSpec};
