/// Delay line length in samples. A power of two so positions wrap with a mask.
pub const DELAY_SIZE: usize = 65_536;

const DELAY_MASK: usize = DELAY_SIZE - 1;

/// Circular buffer of past samples.
///
/// `write` stores at the head and advances it; `read(d)` returns the sample
/// written `d` writes ago, so `read(1)` is the most recent one.
#[derive(Clone)]
pub struct DelayLine {
    buffer: Box<[f64]>,
    head: usize,
}

impl DelayLine {
    pub fn new() -> Self {
        Self {
            buffer: vec![0.0; DELAY_SIZE].into_boxed_slice(),
            head: 0,
        }
    }

    #[inline]
    pub fn read(&self, delay: usize) -> f64 {
        self.buffer[self.head.wrapping_sub(delay) & DELAY_MASK]
    }

    #[inline]
    pub fn write(&mut self, sample: f64) {
        self.buffer[self.head] = sample;
        self.head = (self.head + 1) & DELAY_MASK;
    }

    /// Read `delay` samples back, then write `sample`.
    pub fn next_sample(&mut self, sample: f64, delay: usize) -> f64 {
        let delayed = self.read(delay.clamp(1, DELAY_SIZE - 1));
        self.write(sample);
        delayed
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.head = 0;
    }
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new()
    }
}
