//! Sums track samples into stereo output frames.
//!
//! ```text
//! track ─► × volume · master ─► pan ─┬─► dry bus ─────────────────┐
//!                                    └─► reverb bus ─► Reverb ─────┴─► (+) ─► saturate ─► Sample
//! ```
//!
//! Panning is equal power with unity gain on both sides at the centre:
//! `left = sqrt(2 · (1 - pan))`, `right = sqrt(2 · pan)`.

use crate::dsp::noise::NoiseTable;
use crate::dsp::reverb::Reverb;
use crate::io::Sample;
use crate::sequencing::Song;
use crate::synth::TrackState;
use crate::SAMPLE_RATE;

/// Left and right gain for `pan` in [0, 1].
pub fn pan_gains(pan: f64) -> [f64; 2] {
    let pan = pan.clamp(0.0, 1.0);
    [(2.0 * (1.0 - pan)).sqrt(), (2.0 * pan).sqrt()]
}

pub struct Mixer {
    gains: Vec<[f64; 2]>,
    sends: Vec<bool>,
    reverb: Option<Reverb>,
    clipped: usize,
    peak: f64,
}

impl Mixer {
    pub fn new(song: &Song) -> Self {
        let gains = song
            .tracks
            .iter()
            .map(|track| {
                let [l, r] = pan_gains(track.pan);
                let gain = track.volume * song.master_volume;
                [l * gain, r * gain]
            })
            .collect();

        let reverb = song
            .reverb
            .as_ref()
            .map(|params| Reverb::new(params, SAMPLE_RATE as f32));
        let sends = song
            .tracks
            .iter()
            .map(|track| track.reverb && reverb.is_some())
            .collect();

        Self {
            gains,
            sends,
            reverb,
            clipped: 0,
            peak: 0.0,
        }
    }

    /// Clear all state before a new pass.
    pub fn prepare(&mut self, noise: &NoiseTable) {
        if let Some(reverb) = &mut self.reverb {
            reverb.prepare(noise);
        }
        self.clipped = 0;
        self.peak = 0.0;
    }

    /// Render one tick into `out`, one frame per slot.
    pub fn render_tick(
        &mut self,
        tracks: &mut [TrackState],
        noise: &NoiseTable,
        tick: usize,
        out: &mut [Sample],
    ) {
        for slot in out.iter_mut() {
            let mut dry = [0.0; 2];
            let mut bus = [0.0; 2];

            for ((track, gain), &send) in tracks.iter_mut().zip(&self.gains).zip(&self.sends) {
                let s = track.render_sample(noise, tick);
                let target = if send { &mut bus } else { &mut dry };
                target[0] += s * gain[0];
                target[1] += s * gain[1];
            }

            let frame = match &mut self.reverb {
                Some(reverb) => {
                    let wet = reverb.process(bus);
                    [dry[0] + wet[0], dry[1] + wet[1]]
                }
                None => [dry[0] + bus[0], dry[1] + bus[1]],
            };

            self.peak = self.peak.max(frame[0].abs()).max(frame[1].abs());
            if Sample::clips(frame) {
                self.clipped += 1;
            }
            *slot = Sample::from_frame(frame);
        }
    }

    /// Frames that saturated during the last pass.
    pub fn clipped(&self) -> usize {
        self.clipped
    }

    /// Largest absolute frame value of the last pass, before saturation.
    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn has_reverb(&self) -> bool {
        self.reverb.is_some()
    }
}
