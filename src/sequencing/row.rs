/*
Tracker Rows
============

One row of one track is a cell of up to three fields separated by spaces:

    NOTE [VOL] [EFFECT]

    C-4                 play C-4 at full velocity
    C-4 40              play C-4 at velocity 0x40
    C-4 .. A04          full velocity, volume slide down
    --- V20             no note, set track volume to half
    OFF                 release the sounding note
    ---                 nothing happens

NOTE is a three-character note (`C-4`, `F#2`), `---` for no note or `OFF`
for a note-off. VOL is two hex digits 00-7F (`..` means 7F). EFFECT is one
letter and two hex digits:

    Vxx   track volume = xx / 40h (40h is unity, clamped to 1)
    Axy   volume slide, per tick +x/40h and -y/40h
    Uxx   pitch slide up, xx/16 semitones per tick
    Dxx   pitch slide down, xx/16 semitones per tick
    Gxx   tone portamento: glide to the row's note at xx/16 semitones per
          tick instead of retriggering
    Hxy   vibrato, x/64 cycles per tick, depth y/8 semitones

Slides, portamento and vibrato last for the row that carries them. A volume
set with V stays until the next V.
*/

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::notes::{note_name, parse_note};
use crate::error::{SongError, SongResult};

/// Highest velocity a cell can carry.
pub const MAX_VELOCITY: u8 = 0x7F;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Note {
    #[default]
    Empty,
    On(u8),
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// `Vxx`
    Volume(u8),
    /// `Axy`
    VolumeSlide { up: u8, down: u8 },
    /// `Uxx`
    SlideUp(u8),
    /// `Dxx`
    SlideDown(u8),
    /// `Gxx`
    Portamento(u8),
    /// `Hxy`
    Vibrato { speed: u8, depth: u8 },
}

impl Effect {
    fn letter(&self) -> char {
        match self {
            Effect::Volume(_) => 'V',
            Effect::VolumeSlide { .. } => 'A',
            Effect::SlideUp(_) => 'U',
            Effect::SlideDown(_) => 'D',
            Effect::Portamento(_) => 'G',
            Effect::Vibrato { .. } => 'H',
        }
    }

    fn parameter(&self) -> u8 {
        match *self {
            Effect::Volume(v)
            | Effect::SlideUp(v)
            | Effect::SlideDown(v)
            | Effect::Portamento(v) => v,
            Effect::VolumeSlide { up, down } => (up << 4) | (down & 0x0F),
            Effect::Vibrato { speed, depth } => (speed << 4) | (depth & 0x0F),
        }
    }

    fn parse(token: &str, cell: &str) -> SongResult<Self> {
        let mut chars = token.chars();
        let letter = chars.next().map(|c| c.to_ascii_uppercase());
        let digits = chars.as_str();
        let value = parse_hex(digits).ok_or_else(|| {
            SongError::invalid_cell(cell, format!("effect '{token}' needs two hex digits"))
        })?;
        let (hi, lo) = (value >> 4, value & 0x0F);

        match letter {
            Some('V') => Ok(Effect::Volume(value)),
            Some('A') => Ok(Effect::VolumeSlide { up: hi, down: lo }),
            Some('U') => Ok(Effect::SlideUp(value)),
            Some('D') => Ok(Effect::SlideDown(value)),
            Some('G') => Ok(Effect::Portamento(value)),
            Some('H') => Ok(Effect::Vibrato { speed: hi, depth: lo }),
            _ => Err(SongError::invalid_cell(cell, format!("unknown effect '{token}'"))),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02X}", self.letter(), self.parameter())
    }
}

fn parse_hex(digits: &str) -> Option<u8> {
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(digits, 16).ok()
}

/// One cell of one track.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Row {
    pub note: Note,
    /// Velocity 0..=0x7F; `None` plays at full velocity.
    pub volume: Option<u8>,
    pub effect: Option<Effect>,
}

impl Row {
    pub const EMPTY: Row = Row {
        note: Note::Empty,
        volume: None,
        effect: None,
    };

    pub fn note(tone: u8) -> Self {
        Self {
            note: Note::On(tone),
            ..Self::EMPTY
        }
    }

    pub fn off() -> Self {
        Self {
            note: Note::Off,
            ..Self::EMPTY
        }
    }

    pub fn with_volume(mut self, volume: u8) -> Self {
        self.volume = Some(volume.min(MAX_VELOCITY));
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Note velocity as a gain in [0, 1].
    pub fn velocity(&self) -> f64 {
        self.volume.unwrap_or(MAX_VELOCITY) as f64 / MAX_VELOCITY as f64
    }
}

impl FromStr for Row {
    type Err = SongError;

    fn from_str(cell: &str) -> SongResult<Self> {
        let mut tokens = cell.split_whitespace();

        let note = match tokens.next() {
            None | Some("---") | Some("...") => Note::Empty,
            Some(t) if t.eq_ignore_ascii_case("OFF") || t == "===" => Note::Off,
            Some(t) => Note::On(parse_note(t).ok_or_else(|| {
                SongError::invalid_cell(cell, format!("bad note '{t}'"))
            })?),
        };

        let mut row = Row {
            note,
            ..Row::EMPTY
        };

        let mut next = tokens.next();
        if let Some(token) = next {
            if token.len() == 2 {
                if token != ".." {
                    let volume = parse_hex(token).ok_or_else(|| {
                        SongError::invalid_cell(cell, format!("bad volume '{token}'"))
                    })?;
                    if volume > MAX_VELOCITY {
                        return Err(SongError::invalid_cell(
                            cell,
                            format!("volume {volume:#04X} above 7F"),
                        ));
                    }
                    row.volume = Some(volume);
                }
                next = tokens.next();
            }
        }

        if let Some(token) = next {
            row.effect = Some(Effect::parse(token, cell)?);
        }

        if tokens.next().is_some() {
            return Err(SongError::invalid_cell(cell, "trailing fields"));
        }

        Ok(row)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.note {
            Note::Empty => f.write_str("---")?,
            Note::Off => f.write_str("OFF")?,
            Note::On(tone) => f.write_str(&note_name(tone))?,
        }
        if let Some(volume) = self.volume {
            write!(f, " {volume:02X}")?;
        }
        if let Some(effect) = self.effect {
            write!(f, " {effect}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Row {
    type Error = SongError;

    fn try_from(cell: String) -> SongResult<Self> {
        cell.parse()
    }
}

impl From<Row> for String {
    fn from(row: Row) -> Self {
        row.to_string()
    }
}
