//! STARFALL desktop application.
//!
//! This crate wires the simulation engine to settings persistence, asset
//! loading, and a macroquad window, keyboard, and mixer.

pub mod assets;
pub mod config;
pub mod frontend;
pub mod game_loop;
pub mod platform;

pub use starfall_core as core;

use assets::AssetError;
use config::ConfigError;

/// Anything that stops the game from starting.
#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error("Settings error: {0}")]
    Config(#[from] ConfigError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}
