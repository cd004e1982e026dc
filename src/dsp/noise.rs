//! The shared noise table.

/*
Noise Table
===========

Everything random in the synthesizer comes from one block of precomputed
pseudo-random words: partial frequencies, phases and amplitudes of the
additive instruments, the pitched noise oscillator, and the echo pattern of
the reverb. Nothing calls a random number generator during synthesis, so the
whole piece is a pure function of the song and this table.

Layout
------

The table is a cube of NOISESIZE x NOISESIZE x NOISESIZE unsigned 32-bit
words stored as one flat slice:

    index = x + y * NOISESIZE + z * NOISESIZE * NOISESIZE

Hosts can upload the same slice as a 3D texture.

The Generator
-------------

Four words of state. For every output value, the first three words are each
updated from themselves and their right neighbour:

    state[s] = rotate_right(state[s], state[s]) + state[s + 1]

and the output is the XOR of the three updated words. The fourth word never
changes; it keeps the chain from collapsing to zero.

Filling always restarts the generator from its seed, so filling twice with
the same seed gives the same table.
*/

use tracing::debug;

use crate::NOISESIZE;

/// Number of entries in the noise table.
pub const NOISE_LEN: usize = NOISESIZE * NOISESIZE * NOISESIZE;

const NOISE_MASK: usize = NOISE_LEN - 1;
const AXIS_MASK: usize = NOISESIZE - 1;

/// Initial state of the noise generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseSeed(pub [u32; 4]);

impl Default for NoiseSeed {
    fn default() -> Self {
        Self([0x6F15AAF2, 0x4E89D208, 0x9548B49A, 0x9C4FD335])
    }
}

/// Infinite stream of noise words.
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    state: [u32; 4],
}

impl NoiseGenerator {
    pub fn new(seed: NoiseSeed) -> Self {
        Self { state: seed.0 }
    }
}

impl Iterator for NoiseGenerator {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        let mut value = 0u32;
        for s in 0..3 {
            let word = self.state[s];
            let word = word.rotate_right(word).wrapping_add(self.state[s + 1]);
            self.state[s] = word;
            value ^= word;
        }
        Some(value)
    }
}

/// Cubic table of pseudo-random words shared by all instruments.
///
/// Must be filled before any synthesis reads it. Reading an unfilled table
/// is not an error, it just reads zeros.
pub struct NoiseTable {
    data: Box<[u32]>,
}

impl NoiseTable {
    /// Allocate an unfilled (all zero) table.
    pub fn new() -> Self {
        Self {
            data: vec![0u32; NOISE_LEN].into_boxed_slice(),
        }
    }

    /// Allocate and fill from the default seed.
    pub fn filled() -> Self {
        let mut table = Self::new();
        table.fill();
        table
    }

    /// Fill every entry from the default seed.
    pub fn fill(&mut self) {
        self.fill_seeded(NoiseSeed::default());
    }

    /// Fill every entry from `seed`.
    pub fn fill_seeded(&mut self, seed: NoiseSeed) {
        let written = self.fill_from(NoiseGenerator::new(seed));
        debug!(entries = written, seed = ?seed.0, "noise table filled");
    }

    /// Write values from `values` in index order, returning how many entries
    /// were written. A finite source shorter than the table leaves the tail
    /// untouched.
    pub fn fill_from<I>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = u32>,
    {
        let mut written = 0;
        for (slot, value) in self.data.iter_mut().zip(values) {
            *slot = value;
            written += 1;
        }
        written
    }

    /// Entry at `index`, wrapped to the table size.
    #[inline]
    pub fn get(&self, index: usize) -> u32 {
        self.data[index & NOISE_MASK]
    }

    /// Entry at texel coordinates, each wrapped to `NOISESIZE`.
    #[inline]
    pub fn texel(&self, x: usize, y: usize, z: usize) -> u32 {
        let index = (x & AXIS_MASK)
            + (y & AXIS_MASK) * NOISESIZE
            + (z & AXIS_MASK) * NOISESIZE * NOISESIZE;
        self.data[index]
    }

    /// Entry at `index` reinterpreted as a signed value in [-1, 1).
    #[inline]
    pub fn signed(&self, index: usize) -> f64 {
        to_signed(self.get(index))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for NoiseTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Reinterpret a noise word as a signed fraction in [-1, 1).
#[inline]
pub fn to_signed(word: u32) -> f64 {
    word as i32 as f64 / 2_147_483_648.0
}
