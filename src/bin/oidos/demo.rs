//! Built-in demo song, rendered when no song file is given.

use oidos::dsp::reverb::ReverbParams;
use oidos::sequencing::{Pattern, TrackSpec};
use oidos::{voices, Song, SongResult};

const INTRO: &str = "
# pad    | bass   | lead        | hat
C-4 60   | C-2    | ---         | ---
---      | ---    | ---         | C-8 40
---      | C-3    | ---         | ---
---      | ---    | ---         | C-8 30
D#4 60   | G#1    | ---         | ---
---      | ---    | ---         | C-8 40
---      | G#2    | ---         | ---
---      | OFF    | ---         | C-8 30
";

const THEME: &str = "
C-4 60   | C-2    | G-5 .. H23  | C-8 50
---      | ---    | ---         | C-8 30
---      | C-3    | D#5 .. G10  | C-8 50
---      | ---    | ---         | C-8 30
D#4 60   | G#1    | F-5 .. A01  | C-8 50
---      | ---    | ---         | C-8 30
---      | G#2    | D-5         | C-8 50
---      | ---    | OFF         | C-8 30
";

const OUTRO: &str = "
G-3 50   | G-1    | D-5 .. D04  | ---
---      | ---    | ---         | ---
---      | ---    | OFF         | ---
---      | ---    | ---         | ---
OFF      | OFF    | ---         | ---
---      | ---    | ---         | ---
---      | ---    | ---         | ---
---      | ---    | ---         | ---
";

pub fn song() -> SongResult<Song> {
    Song::builder()
        .bpm(110.0)
        .rows_per_beat(2)
        .ticks_per_row(2)
        .master_volume(0.5)
        .instrument(voices::pad())
        .instrument(voices::bass())
        .instrument(voices::lead())
        .instrument(voices::hihat())
        .track_spec(TrackSpec::new("pad", 0).reverb(true).volume(0.8))
        .track_spec(TrackSpec::new("bass", 1))
        .track_spec(TrackSpec::new("lead", 2).pan(0.35).reverb(true))
        .track_spec(TrackSpec::new("hat", 3).pan(0.7))
        .pattern(Pattern::parse(INTRO)?)
        .pattern(Pattern::parse(THEME)?)
        .pattern(Pattern::parse(OUTRO)?)
        .order([0, 0, 1, 1, 2])
        .reverb(ReverbParams::default())
        .build()
}
