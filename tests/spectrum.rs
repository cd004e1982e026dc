use approx::assert_abs_diff_eq;
use rustfft::{num_complex::Complex, FftPlanner};

use oidos::dsp::oscillator::Waveform;
use oidos::sequencing::notes::*;
use oidos::synth::EnvelopeShape;
use oidos::{pattern, Instrument, Oidos, Song};

const FFT_SIZE: usize = 16_384;

/// Frequency of the strongest bin in the left channel, after the attack.
fn peak_frequency(song: Song) -> f64 {
    let mut oidos = Oidos::new(song).unwrap();
    oidos.fill_noise_table();
    let music = oidos.generate_music();
    assert!(music.samples.len() >= 4_096 + FFT_SIZE, "song too short");

    let mut buffer: Vec<Complex<f64>> = music.samples[4_096..4_096 + FFT_SIZE]
        .iter()
        .enumerate()
        .map(|(i, s)| {
            // Hann window
            let w = 0.5 - 0.5 * (std::f64::consts::TAU * i as f64 / FFT_SIZE as f64).cos();
            Complex::new(s.left as f64 * w, 0.0)
        })
        .collect();

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(FFT_SIZE).process(&mut buffer);

    let (bin, _) = buffer[1..FFT_SIZE / 2]
        .iter()
        .enumerate()
        .map(|(i, c)| (i + 1, c.norm()))
        .fold((0, 0.0), |best, (i, m)| if m > best.1 { (i, m) } else { best });
    bin as f64 * 44_100.0 / FFT_SIZE as f64
}

fn sustained(instrument: Instrument, tone: u8) -> Song {
    Song::builder()
        .instrument(instrument.envelope(EnvelopeShape::adsr(0.01, 0.0, 1.0, 0.05)))
        .track("lead", 0)
        .pattern(pattern![tone, _, _, _, _, _])
        .order([0])
        .build()
        .unwrap()
}

#[test]
fn sine_at_a4_peaks_at_440_hz() {
    let hz = peak_frequency(sustained(Instrument::wave("sine", Waveform::Sine), A4));
    assert_abs_diff_eq!(hz, 440.0, epsilon = 44_100.0 / FFT_SIZE as f64);
}

#[test]
fn saw_fundamental_follows_the_note() {
    let hz = peak_frequency(sustained(Instrument::wave("saw", Waveform::Saw), A3));
    assert_abs_diff_eq!(hz, 220.0, epsilon = 44_100.0 / FFT_SIZE as f64);
}

#[test]
fn octave_up_doubles_frequency() {
    let low = peak_frequency(sustained(Instrument::wave("sine", Waveform::Sine), C4));
    let high = peak_frequency(sustained(Instrument::wave("sine", Waveform::Sine), C5));
    assert_abs_diff_eq!(high / low, 2.0, epsilon = 0.02);
}
