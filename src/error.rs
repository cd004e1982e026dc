//! Error types for song descriptions.
//!
//! Generation itself cannot fail. Everything that could go wrong is caught
//! while a song is parsed, validated or loaded into an engine.

use thiserror::Error;

/// Result type for song loading and validation.
pub type SongResult<T> = Result<T, SongError>;

/// Errors that can occur while building or loading a song.
#[derive(Debug, Error)]
pub enum SongError {
    /// The pattern order is empty.
    #[error("song has no patterns in its order")]
    EmptyOrder,

    /// The song has no tracks.
    #[error("song has no tracks")]
    NoTracks,

    /// An order entry points past the pattern list.
    #[error(
        "order position {position} refers to pattern {pattern}, but only {available} patterns exist"
    )]
    UnknownPattern {
        /// Index into the order.
        position: usize,
        /// The missing pattern index.
        pattern: usize,
        /// Number of patterns in the song.
        available: usize,
    },

    /// A track refers to an instrument that does not exist.
    #[error("track {track} uses instrument {instrument}, but only {available} instruments exist")]
    UnknownInstrument {
        track: usize,
        instrument: usize,
        available: usize,
    },

    /// A pattern has more columns than the song has tracks.
    #[error("pattern {pattern} has {columns} columns for {tracks} tracks")]
    TooManyColumns {
        pattern: usize,
        columns: usize,
        tracks: usize,
    },

    /// A pattern column holds more rows than the pattern is long.
    #[error("pattern {pattern} column {column} has {rows} rows, pattern length is {length}")]
    ColumnTooLong {
        pattern: usize,
        column: usize,
        rows: usize,
        length: usize,
    },

    /// The order plays no rows at all.
    #[error("song is zero ticks long")]
    EmptySong,

    /// Tempo must be positive and finite.
    #[error("invalid tempo: {bpm} bpm")]
    InvalidTempo {
        /// The invalid tempo.
        bpm: f64,
    },

    /// The rendered song would not fit the 32-bit size fields of a WAV header.
    #[error("song renders {frames} frames, at most {max} fit in a WAV file")]
    TooLong { frames: u64, max: u64 },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// A tracker cell could not be parsed.
    #[error("invalid cell '{cell}': {reason}")]
    InvalidCell {
        /// The cell text as written.
        cell: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Malformed song file.
    #[cfg(feature = "serde")]
    #[error("song file error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SongError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid cell error.
    pub fn invalid_cell(cell: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCell {
            cell: cell.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = SongError::UnknownPattern {
            position: 3,
            pattern: 9,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "order position 3 refers to pattern 9, but only 2 patterns exist"
        );

        let err = SongError::invalid_cell("C-Z", "bad octave");
        assert_eq!(err.to_string(), "invalid cell 'C-Z': bad octave");
    }

    #[test]
    fn io_errors_convert() {
        fn open() -> SongResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))?;
            Ok(())
        }
        assert!(matches!(open(), Err(SongError::Io(_))));
    }
}
