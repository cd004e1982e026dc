//! Tick cursor over the song's order.
//!
//! The sequencer only knows positions; applying rows and rendering is left
//! to the engine. Each call to `next` yields the tick about to be rendered:
//!
//! ```text
//! order:   [ p0 (2 rows) | p1 (1 row) ]        ticks_per_row = 2
//!
//! tick       0    1    2    3    4    5
//! position   0    0    0    0    1    1
//! row        0    0    1    1    0    0
//! row_start  yes  no   yes  no   yes  no
//! ```
//!
//! After `music_length` ticks the iterator is exhausted.

use crate::sequencing::Song;

/// Where the sequencer stands on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Global tick index.
    pub tick: usize,
    /// Index into the order.
    pub position: usize,
    /// Pattern playing at this position.
    pub pattern: usize,
    /// Row within the pattern.
    pub row: usize,
    /// True on the first tick of a row, when its events fire.
    pub row_start: bool,
}

pub struct Sequencer {
    /// (pattern index, pattern length) per order position
    order: Vec<(usize, usize)>,
    ticks_per_row: usize,
    total_ticks: usize,

    position: usize,
    row: usize,
    tick_in_row: usize,
    tick: usize,
}

impl Sequencer {
    pub fn new(song: &Song) -> Self {
        let order = song
            .order
            .iter()
            .map(|&p| (p, song.patterns.get(p).map_or(0, |pattern| pattern.length)))
            .collect();

        Self {
            order,
            ticks_per_row: song.ticks_per_row.max(1) as usize,
            total_ticks: song.music_length(),
            position: 0,
            row: 0,
            tick_in_row: 0,
            tick: 0,
        }
    }

    /// Back to the first tick of the first pattern.
    pub fn reset(&mut self) {
        self.position = 0;
        self.row = 0;
        self.tick_in_row = 0;
        self.tick = 0;
    }

    /// Ticks handed out so far.
    pub fn tick(&self) -> usize {
        self.tick
    }

    pub fn total_ticks(&self) -> usize {
        self.total_ticks
    }

    pub fn is_finished(&self) -> bool {
        self.tick >= self.total_ticks
    }
}

impl Iterator for Sequencer {
    type Item = Cursor;

    fn next(&mut self) -> Option<Cursor> {
        if self.is_finished() {
            return None;
        }

        // empty patterns take no time
        while self.order.get(self.position).is_some_and(|&(_, length)| length == 0) {
            self.position += 1;
        }
        let &(pattern, length) = self.order.get(self.position)?;

        let cursor = Cursor {
            tick: self.tick,
            position: self.position,
            pattern,
            row: self.row,
            row_start: self.tick_in_row == 0,
        };

        self.tick += 1;
        self.tick_in_row += 1;
        if self.tick_in_row == self.ticks_per_row {
            self.tick_in_row = 0;
            self.row += 1;
            if self.row == length {
                self.row = 0;
                self.position += 1;
            }
        }

        Some(cursor)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_ticks.saturating_sub(self.tick);
        (remaining, Some(remaining))
    }
}
