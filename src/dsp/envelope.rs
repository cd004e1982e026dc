use crate::MIN_TIME;

/*
ADSR Envelope Implementation
============================

A linear ADSR envelope generator, running at a fixed sample rate.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0). This multiplies
              the note's signal to control its amplitude over time.

  stage       Which phase of the envelope we're in: Idle, Attack, Decay,
              Sustain, or Release. A state machine governs transitions.

  gate        The note on/off signal. Gate high (note_on) triggers Attack.
              Gate low (note_off) triggers Release from wherever we are.

  increment   How much `level` changes per sample, computed once from the
              stage duration and the sample rate.


The Shape: Linear Ramps
-----------------------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release
         (A)   (D)      (S)      (R)

An Oidos-style instrument is the special case D = 0, S = 1: the additive
partials bring their own exponential decay, the envelope only fades the note
in and out.


The State Machine
-----------------

    Idle ──note_on──→ Attack ──level=1──→ Decay ──level=S──→ Sustain
      ↑                  │                  │                  │
      │                  └──────note_off────┴──────────────────┘
      │                                     ↓
      └─────────────level=0───────────── Release

note_off triggers Release from ANY active stage, always starting from the
CURRENT level. The largest step the release can take is

    start_level / release_samples

so a release never produces a jump larger than that.

note_on always restarts from level 0 (retrigger policy: restart).
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Gate low, envelope inactive, level = 0
    Attack,  // Gate just went high, ramping up to 1.0
    Decay,   // Reached peak, ramping down to sustain level
    Sustain, // Holding at sustain level while gate is high
    Release, // Gate went low, ramping down to 0
}

#[derive(Debug, Clone)]
pub struct Envelope {
    // Per-sample increments (fixed once the sample rate is known)
    attack_step: f64,
    decay_step: f64,
    sustain_level: f64,
    release_samples: u32,

    // Runtime state (changes every sample)
    stage: EnvelopeState,
    level: f64,

    // Release bookkeeping
    release_start_level: f64,
    release_elapsed_samples: u32,
}

impl Envelope {
    /// Build an envelope from times in seconds.
    pub fn adsr(sample_rate: f64, attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        let sustain_level = sustain.clamp(0.0, 1.0);
        Self {
            attack_step: 1.0 / (attack.max(MIN_TIME) * sample_rate).max(1.0),
            decay_step: (1.0 - sustain_level) / (decay.max(MIN_TIME) * sample_rate).max(1.0),
            sustain_level,
            release_samples: (release.max(MIN_TIME) * sample_rate).round().max(1.0) as u32,

            stage: EnvelopeState::Idle,
            level: 0.0,
            release_start_level: 0.0,
            release_elapsed_samples: 0,
        }
    }

    /// Gate high: start the attack phase from zero.
    pub fn note_on(&mut self) {
        self.level = 0.0;
        self.stage = EnvelopeState::Attack;
        self.release_elapsed_samples = 0;
    }

    /// Gate low: start the release phase from the current level.
    pub fn note_off(&mut self) {
        if matches!(self.stage, EnvelopeState::Idle | EnvelopeState::Release) {
            return;
        }
        self.release_start_level = self.level;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeState::Release;
    }

    /// Advance the envelope by one sample and return the new level.
    pub fn next_sample(&mut self) -> f64 {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.level += self.attack_step;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = if self.sustain_level < 1.0 {
                        EnvelopeState::Decay
                    } else {
                        EnvelopeState::Sustain
                    };
                }
            }

            EnvelopeState::Decay => {
                self.level -= self.decay_step;
                if self.level <= self.sustain_level {
                    self.level = self.sustain_level;
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }

            EnvelopeState::Release => {
                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);
                let progress = self.release_elapsed_samples as f64 / self.release_samples as f64;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);

                if self.release_elapsed_samples >= self.release_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    /// Reset to idle state.
    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.release_elapsed_samples = 0;
        self.release_start_level = 0.0;
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Length of a release in samples, from any level.
    pub fn release_samples(&self) -> u32 {
        self.release_samples
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 1_000.0;

    fn render_samples(env: &mut Envelope, samples: usize) {
        for _ in 0..samples {
            env.next_sample();
        }
    }

    #[test]
    fn attack_reaches_full_level() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.1, 0.7, 0.2);
        env.note_on();
        render_samples(&mut env, (0.01 * SAMPLE_RATE) as usize);

        assert!(env.level() > 0.99, "expected attack to reach full level");
        assert_ne!(env.state(), EnvelopeState::Attack);
    }

    #[test]
    fn sustain_holds_target_level() {
        let sustain = 0.6;
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.05, sustain, 0.2);
        env.note_on();
        render_samples(&mut env, ((0.01 + 0.05) * SAMPLE_RATE) as usize + 5);

        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert!((env.level() - sustain).abs() < 1e-9, "sustain level should be held");
    }

    #[test]
    fn full_sustain_skips_decay() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.005, 0.0, 1.0, 0.1);
        env.note_on();
        render_samples(&mut env, 5);
        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert_eq!(env.level(), 1.0);
    }

    #[test]
    fn release_falls_back_to_idle() {
        let release = 0.03;
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.05, 0.5, release);
        env.note_on();
        render_samples(&mut env, (0.02 * SAMPLE_RATE) as usize);

        env.note_off();
        render_samples(&mut env, (release * SAMPLE_RATE) as usize);

        assert_eq!(env.level(), 0.0);
        assert_eq!(env.state(), EnvelopeState::Idle);
    }

    #[test]
    fn release_during_attack_is_continuous() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.1, 0.0, 1.0, 0.05);
        env.note_on();
        render_samples(&mut env, 40);
        let before = env.level();

        env.note_off();
        let mut prev = before;
        let max_step = before / 50.0 + 1e-12;
        while env.is_active() {
            let level = env.next_sample();
            let jump = (prev - level).abs();
            assert!(jump <= max_step, "jump {jump} > {max_step}");
            assert!(level <= prev);
            prev = level;
        }
    }

    #[test]
    fn note_on_restarts_from_zero() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.0, 1.0, 0.1);
        env.note_on();
        render_samples(&mut env, 50);
        env.note_on();
        assert_eq!(env.level(), 0.0);
        assert_eq!(env.state(), EnvelopeState::Attack);
    }

    #[test]
    fn note_off_on_idle_is_ignored() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.0, 1.0, 0.1);
        env.note_off();
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert_eq!(env.next_sample(), 0.0);
    }
}
