use std::f64::consts::TAU;

/*
One-Pole Filter
===============

The smallest useful IIR filter: the output moves a fixed fraction of the way
toward the input every sample.

    y[n] = y[n-1] + (x[n] - y[n-1]) · a

`a` in (0, 1] is the coefficient. a = 1 passes the input unchanged, small
values smooth heavily. For a cutoff frequency fc at sample rate fs:

    a = 1 - e^(-2π · fc / fs)

| output            | computed as              | passes          | rejects      |
| ----------------- | ------------------------ | --------------- | ------------ |
| low-pass          | y                        | below cutoff    | above cutoff |
| high-pass         | x - y                    | above cutoff    | below cutoff |
| band-pass         | lp(a_high) - lp(a_low)   | between cutoffs | outside      |

The slope is only 6 dB/octave, which is what the reverb wants for gently
darkening its echoes, and enough to take the edge off bright instruments.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePole {
    state: f64,
    coefficient: f64,
}

impl OnePole {
    pub fn with_coefficient(coefficient: f64) -> Self {
        Self {
            state: 0.0,
            coefficient: coefficient.clamp(0.0, 1.0),
        }
    }

    pub fn lowpass(cutoff_hz: f64, sample_rate: f64) -> Self {
        Self::with_coefficient(Self::coefficient_for(cutoff_hz, sample_rate))
    }

    /// Coefficient giving a -3 dB point at `cutoff_hz`.
    pub fn coefficient_for(cutoff_hz: f64, sample_rate: f64) -> f64 {
        1.0 - (-TAU * cutoff_hz.max(0.0) / sample_rate).exp()
    }

    /// Low-pass one sample.
    #[inline]
    pub fn process(&mut self, sample: f64) -> f64 {
        self.state += (sample - self.state) * self.coefficient;
        self.state
    }

    /// High-pass one sample (input minus its low-passed part).
    #[inline]
    pub fn highpass(&mut self, sample: f64) -> f64 {
        sample - self.process(sample)
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn set_coefficient(&mut self, coefficient: f64) {
        self.coefficient = coefficient.clamp(0.0, 1.0);
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

impl Default for OnePole {
    fn default() -> Self {
        Self::with_coefficient(1.0)
    }
}
