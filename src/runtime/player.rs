use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};
use thiserror::Error;
use tracing::{error, info};

use crate::engine::Music;
use crate::io::Sample;
use crate::SAMPLE_RATE;

const COMMAND_CAPACITY: usize = 64;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Pause,
    Resume,
    /// Jump to a frame index.
    Seek(usize),
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("no default output device available")]
    NoDevice,
    #[error("failed to build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
    #[error("player command queue is full")]
    QueueFull,
}

/// Audio-thread side of the player.
struct Playback {
    samples: Arc<[Sample]>,
    commands: Consumer<PlayerCommand>,
    position: Arc<AtomicUsize>,
    cursor: usize,
    paused: bool,
}

impl Playback {
    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.pop() {
            match command {
                PlayerCommand::Pause => self.paused = true,
                PlayerCommand::Resume => self.paused = false,
                PlayerCommand::Seek(frame) => self.cursor = frame.min(self.samples.len()),
            }
        }
    }

    fn fill(&mut self, data: &mut [f32]) {
        self.drain_commands();

        for frame in data.chunks_exact_mut(2) {
            let sample = match self.samples.get(self.cursor) {
                Some(&sample) if !self.paused => {
                    self.cursor += 1;
                    sample
                }
                _ => Sample::SILENCE,
            };
            frame[0] = sample.left as f32 / 32_768.0;
            frame[1] = sample.right as f32 / 32_768.0;
        }

        self.position.store(self.cursor, Ordering::Relaxed);
    }
}

/// Streams a rendered song to the default output device.
///
/// The samples are copied once when playback starts. Control goes through a
/// lock-free queue, so the audio callback never blocks.
pub struct Player {
    _stream: cpal::Stream,
    commands: Producer<PlayerCommand>,
    position: Arc<AtomicUsize>,
    frames: usize,
    samples_per_tick: usize,
}

impl Player {
    pub fn start(music: &Music<'_>) -> Result<Self, PlayerError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(PlayerError::NoDevice)?;
        let config = cpal::StreamConfig {
            channels: 2,
            sample_rate: cpal::SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        };

        let (producer, consumer) = RingBuffer::<PlayerCommand>::new(COMMAND_CAPACITY);
        let position = Arc::new(AtomicUsize::new(0));
        let mut playback = Playback {
            samples: Arc::from(music.samples),
            commands: consumer,
            position: Arc::clone(&position),
            cursor: 0,
            paused: false,
        };

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| playback.fill(data),
            |err| error!(%err, "audio stream error"),
            None,
        )?;
        stream.play()?;

        info!(
            device = %device.name().unwrap_or_default(),
            frames = music.samples.len(),
            "playback started"
        );

        Ok(Self {
            _stream: stream,
            commands: producer,
            position,
            frames: music.samples.len(),
            samples_per_tick: music.samples_per_tick.max(1),
        })
    }

    /// Played position in ticks.
    pub fn position(&self) -> f32 {
        self.position.load(Ordering::Relaxed) as f32 / self.samples_per_tick as f32
    }

    pub fn pause(&mut self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Pause)
    }

    pub fn resume(&mut self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Resume)
    }

    /// Continue from the start of `tick`.
    pub fn seek(&mut self, tick: usize) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Seek(tick * self.samples_per_tick))
    }

    pub fn is_finished(&self) -> bool {
        self.position.load(Ordering::Relaxed) >= self.frames
    }

    fn send(&mut self, command: PlayerCommand) -> Result<(), PlayerError> {
        self.commands.push(command).map_err(|_| PlayerError::QueueFull)
    }
}
