/*
Patterns
========

A pattern is a block of rows, one column per track. The song's order lists
which pattern plays next; the same pattern can appear many times.

    row   track 0       track 1
    0     C-4 7F        C-2
    1     ---           ---
    2     E-4 .. A02    G-1
    3     OFF           ---

Columns may be shorter than the pattern (missing rows are empty) and a
pattern may have fewer columns than the song has tracks (missing tracks are
silent for the pattern's length).

In text form each line is one row and columns are separated by `|`:

    C-4 7F    | C-2
    ---       | ---
    E-4 .. A02| G-1
    OFF       | ---

Blank lines and lines starting with `#` are skipped.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::row::Row;
use crate::error::SongResult;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pattern {
    /// Number of rows.
    pub length: usize,
    /// One column of rows per track.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tracks: Vec<Vec<Row>>,
}

impl Pattern {
    /// An empty pattern of `length` rows.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            tracks: Vec::new(),
        }
    }

    /// Add the next track's column.
    pub fn with_track(mut self, rows: Vec<Row>) -> Self {
        self.tracks.push(rows);
        self
    }

    /// A single-column pattern as long as its rows.
    pub fn single(rows: Vec<Row>) -> Self {
        Self::new(rows.len()).with_track(rows)
    }

    /// Parse `|`-separated columns, one row per line.
    pub fn parse(text: &str) -> SongResult<Self> {
        let mut tracks: Vec<Vec<Row>> = Vec::new();
        let mut length = 0;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            for (column, cell) in line.split('|').enumerate() {
                if tracks.len() <= column {
                    tracks.push(vec![Row::EMPTY; length]);
                }
                let rows = &mut tracks[column];
                // earlier lines may have had fewer cells
                rows.resize(length, Row::EMPTY);
                rows.push(cell.trim().parse()?);
            }
            length += 1;
        }

        Ok(Self { length, tracks })
    }

    /// Row `row` of `track`, empty when the column does not reach it.
    pub fn row(&self, track: usize, row: usize) -> &Row {
        self.tracks
            .get(track)
            .and_then(|column| column.get(row))
            .unwrap_or(&Row::EMPTY)
    }

    pub fn columns(&self) -> usize {
        self.tracks.len()
    }

    /// Render back into the text form accepted by [`Pattern::parse`].
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for r in 0..self.length {
            let cells: Vec<String> = (0..self.tracks.len())
                .map(|t| self.row(t, r).to_string())
                .collect();
            text.push_str(&cells.join(" | "));
            text.push('\n');
        }
        text
    }
}

/// Macro for writing a single-track pattern
///
/// # Examples
///
/// ```
/// use oidos::pattern;
/// use oidos::sequencing::notes::*;
///
/// // four rows: three notes and a note-off
/// let arp = pattern![C4, E4, G4, OFF];
/// assert_eq!(arp.length, 4);
///
/// // empty rows with _
/// let sparse = pattern![C4, _, G4, _];
/// assert!(sparse.row(0, 1).is_empty());
/// ```
#[macro_export]
macro_rules! pattern {
    [$($row:tt),* $(,)?] => {
        $crate::sequencing::Pattern::single(vec![$($crate::pattern!(@row $row)),*])
    };

    // Empty row
    (@row _) => {
        $crate::sequencing::Row::EMPTY
    };

    // Note-off row
    (@row OFF) => {
        $crate::sequencing::Row::off()
    };

    // Note row (any other identifier/expression)
    (@row $note:expr) => {
        $crate::sequencing::Row::note($note)
    };
}
