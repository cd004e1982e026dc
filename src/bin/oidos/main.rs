//! oidos - render songs to WAV or raw PCM
//!
//! Run with: cargo run -- render song.json -o song.wav

mod demo;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use oidos::{Oidos, Song};

/// Deterministic additive music synthesis
#[derive(Parser)]
#[command(name = "oidos")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a song and write it as WAV (or raw PCM)
    Render {
        /// Song file (JSON); the built-in demo when omitted
        song: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write sample data only, without the 44-byte header
        #[arg(long)]
        raw: bool,
    },

    /// Print timing and length of a song
    Info {
        /// Song file (JSON); the built-in demo when omitted
        song: Option<PathBuf>,
    },

    /// Render a song and play it on the default output device
    #[cfg(feature = "playback")]
    Play {
        /// Song file (JSON); the built-in demo when omitted
        song: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    // logs go to stderr so stdout stays clean for dumps
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render { song, output, raw } => render(load(song)?, output, raw),
        Commands::Info { song } => info(&load(song)?),
        #[cfg(feature = "playback")]
        Commands::Play { song } => play(load(song)?),
    }
}

fn load(path: Option<PathBuf>) -> Result<Song> {
    match path {
        Some(path) => Song::from_path(&path)
            .wrap_err_with(|| format!("failed to load song {}", path.display())),
        None => demo::song().wrap_err("failed to build demo song"),
    }
}

fn render(song: Song, output: Option<PathBuf>, raw: bool) -> Result<()> {
    let mut oidos = Oidos::new(song).wrap_err("song rejected")?;
    oidos.fill_noise_table();
    let music = oidos.generate_music();

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).wrap_err_with(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if raw {
        music.write_raw(&mut writer)
    } else {
        music.write_wav(&mut writer)
    }
    .and_then(|()| writer.flush())
    .wrap_err("failed to write output")?;

    tracing::info!(
        frames = music.samples.len(),
        seconds = music.duration().as_secs_f64(),
        output = %output.as_deref().map_or("stdout".into(), |p| p.display().to_string()),
        "written"
    );
    Ok(())
}

fn info(song: &Song) -> Result<()> {
    song.validate().wrap_err("song rejected")?;
    let timing = song.timing();
    let frames = song.frames();

    println!("Tracks:            {}", song.tracks.len());
    for (index, track) in song.tracks.iter().enumerate() {
        let instrument = &song.instruments[track.instrument];
        println!(
            "  {index}: {:<12} {:<12} partials {}",
            track.name,
            instrument.name,
            instrument.partials()
        );
    }
    println!("Patterns:          {} ({} in order)", song.patterns.len(), song.order.len());
    println!("BPM:               {}", song.bpm);
    println!("Samples per tick:  {}", timing.samples_per_tick);
    println!("Ticks per second:  {:.4}", timing.ticks_per_second);
    println!("Length:            {} ticks", song.music_length());
    println!("Frames:            {frames}");
    println!("Duration:          {:.2} s", frames as f64 / oidos::SAMPLE_RATE as f64);
    println!("Data bytes:        {}", frames * 4);
    Ok(())
}

#[cfg(feature = "playback")]
fn play(song: Song) -> Result<()> {
    use std::time::Duration;

    use oidos::runtime::Player;

    let mut oidos = Oidos::new(song).wrap_err("song rejected")?;
    oidos.fill_noise_table();
    let music = oidos.generate_music();

    let player = Player::start(&music).wrap_err("failed to start playback")?;
    let mut stderr = io::stderr();
    while !player.is_finished() {
        write!(stderr, "\rtick {:>8.1} / {}", player.position(), music.length)?;
        stderr.flush()?;
        std::thread::sleep(Duration::from_millis(100));
    }
    writeln!(stderr)?;
    Ok(())
}
