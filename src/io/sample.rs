/// One interleaved stereo frame of 16-bit PCM.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sample {
    pub left: i16,
    pub right: i16,
}

impl Sample {
    pub const SILENCE: Sample = Sample { left: 0, right: 0 };

    /// Convert a frame in [-1, 1] to PCM, saturating anything outside.
    #[inline]
    pub fn from_frame(frame: [f64; 2]) -> Self {
        Self {
            left: to_pcm(frame[0]),
            right: to_pcm(frame[1]),
        }
    }

    /// Whether converting `frame` had to saturate either channel.
    #[inline]
    pub fn clips(frame: [f64; 2]) -> bool {
        frame.iter().any(|x| (x * 32767.0).abs() > 32767.5)
    }

    /// Little-endian bytes as they appear in a WAV data chunk.
    pub fn to_le_bytes(self) -> [u8; 4] {
        let [l0, l1] = self.left.to_le_bytes();
        let [r0, r1] = self.right.to_le_bytes();
        [l0, l1, r0, r1]
    }
}

#[inline]
fn to_pcm(x: f64) -> i16 {
    // NaN converts to 0
    (x * 32767.0).round().clamp(-32768.0, 32767.0) as i16
}
