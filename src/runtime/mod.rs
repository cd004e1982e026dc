//! Real-time playback of rendered music.
//!
//! # Example
//!
//! ```ignore
//! use oidos::{runtime::Player, Oidos, Song};
//!
//! fn main() -> color_eyre::Result<()> {
//!     let mut oidos = Oidos::new(Song::from_path("song.json")?)?;
//!     oidos.fill_noise_table();
//!     let music = oidos.generate_music();
//!
//!     let player = Player::start(&music)?;
//!     while !player.is_finished() {
//!         std::thread::sleep(std::time::Duration::from_millis(100));
//!     }
//!     Ok(())
//! }
//! ```

mod player;

pub use player::{Player, PlayerCommand, PlayerError};
