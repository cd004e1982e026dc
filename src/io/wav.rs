//! The fixed 44-byte header of a 44.1 kHz stereo 16-bit WAV file.
//!
//! Kept as eleven 32-bit words so it can be written next to the sample data
//! with a single copy:
//!
//! ```text
//! word  value
//! 0     "RIFF"
//! 1     36 + data bytes
//! 2     "WAVE"
//! 3     "fmt "
//! 4     16                      fmt chunk size
//! 5     1 | 2 << 16             PCM, two channels
//! 6     44100                   sample rate
//! 7     44100 · 4               byte rate
//! 8     4 | 16 << 16            block align, bits per sample
//! 9     "data"
//! 10    data bytes
//! ```

use std::io::{self, Write};

use super::sample::Sample;
use crate::SAMPLE_RATE;

const CHANNELS: u32 = 2;
const BYTES_PER_FRAME: u32 = 4;
const BITS_PER_SAMPLE: u32 = 16;
const FORMAT_PCM: u32 = 1;

/// Size of the header in bytes.
pub const HEADER_BYTES: usize = 44;

/// Most frames whose RIFF size (`36 + data bytes`) still fits in 32 bits.
pub const MAX_FRAMES: u64 = (u32::MAX as u64 - 36) / BYTES_PER_FRAME as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader(pub [u32; 11]);

impl WavHeader {
    /// Header for `frames` stereo frames, or `None` past [`MAX_FRAMES`].
    pub fn for_frames(frames: usize) -> Option<Self> {
        let data_bytes = u32::try_from(frames).ok()?.checked_mul(BYTES_PER_FRAME)?;
        let riff_bytes = data_bytes.checked_add(36)?;
        Some(Self([
            u32::from_le_bytes(*b"RIFF"),
            riff_bytes,
            u32::from_le_bytes(*b"WAVE"),
            u32::from_le_bytes(*b"fmt "),
            16,
            FORMAT_PCM | (CHANNELS << 16),
            SAMPLE_RATE,
            SAMPLE_RATE * BYTES_PER_FRAME,
            BYTES_PER_FRAME | (BITS_PER_SAMPLE << 16),
            u32::from_le_bytes(*b"data"),
            data_bytes,
        ]))
    }

    /// Size of the sample data in bytes.
    pub fn data_bytes(&self) -> u32 {
        self.0[10]
    }

    pub fn words(&self) -> &[u32; 11] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; HEADER_BYTES] {
        let mut bytes = [0u8; HEADER_BYTES];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(self.0) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }
}

/// Write `samples` as little-endian PCM.
pub fn write_samples<W: Write>(writer: &mut W, samples: &[Sample]) -> io::Result<()> {
    let mut buffer = Vec::with_capacity(samples.len().min(16_384) * 4);
    for chunk in samples.chunks(16_384) {
        buffer.clear();
        for sample in chunk {
            buffer.extend_from_slice(&sample.to_le_bytes());
        }
        writer.write_all(&buffer)?;
    }
    Ok(())
}
