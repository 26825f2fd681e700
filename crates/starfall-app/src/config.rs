//! JSON-backed user settings.
//!
//! The settings file has five sections: `video`, `audio`, `language`,
//! `game_data`, and `keys`. `SettingsStore` keeps the parsed file in memory
//! and rewrites the whole file on every change.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use starfall_core::constants::{DEFAULT_FPS, LARGE_RESOLUTION};
use starfall_core::types::Resolution;

/// Settings errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Top-level settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub video: VideoSettings,
    pub audio: AudioSettings,
    pub language: LanguageSettings,
    /// Free-form data owned by game screens.
    pub game_data: serde_json::Value,
    pub keys: KeyBindings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Frame-rate cap; 0 disables pacing.
    pub fps: u32,
}

/// Volumes in `[0, 1]`. Music and effects are scaled by `main_volume`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub main_volume: f32,
    pub music_volume: f32,
    pub effects_volume: f32,
}

/// The active language plus every language's text table, keyed by code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageSettings {
    pub language_set: String,
    #[serde(flatten)]
    pub texts: BTreeMap<String, GameTexts>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameTexts {
    /// Window title.
    pub title: String,
    /// Any other strings the screens look up.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Key names for each control, e.g. `"left"`, `"a"`, `"space"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
    pub shoot: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            width: LARGE_RESOLUTION.0,
            height: LARGE_RESOLUTION.1,
            vsync: false,
            fps: DEFAULT_FPS,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            main_volume: 1.0,
            music_volume: 0.5,
            effects_volume: 0.8,
        }
    }
}

impl Default for LanguageSettings {
    fn default() -> Self {
        let english = GameTexts {
            title: "Starfall".to_string(),
            extra: BTreeMap::new(),
        };
        Self {
            language_set: "en".to_string(),
            texts: BTreeMap::from([("en".to_string(), english)]),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: "up".to_string(),
            down: "down".to_string(),
            left: "left".to_string(),
            right: "right".to_string(),
            shoot: "space".to_string(),
        }
    }
}

impl Settings {
    /// Window resolution from the video section.
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.video.width, self.video.height)
    }

    /// Texts for the active language, if that language is present.
    pub fn texts(&self) -> Option<&GameTexts> {
        self.language.texts.get(&self.language.language_set)
    }

    /// Window title in the active language.
    pub fn title(&self) -> &str {
        self.texts().map_or("Starfall", |texts| texts.title.as_str())
    }

    /// Effective music volume.
    pub fn music_volume(&self) -> f32 {
        (self.audio.main_volume * self.audio.music_volume).clamp(0.0, 1.0)
    }

    /// Effective sound-effect volume.
    pub fn effects_volume(&self) -> f32 {
        (self.audio.main_volume * self.audio.effects_volume).clamp(0.0, 1.0)
    }

    /// Parse a settings document from a file.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(ConfigError::Parse)
    }
}

/// Owns the settings file and its in-memory copy.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Load settings from `path`, writing a default file first if none exists.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if !path.exists() {
            log::info!("no settings at {}, writing defaults", path.display());
            let store = Self {
                path,
                settings: Settings::default(),
            };
            store.save()?;
            return Ok(store);
        }

        let settings = Settings::read(&path)?;
        log::debug!("loaded settings from {}", path.display());
        Ok(Self { path, settings })
    }

    /// Wrap already-parsed settings without touching the filesystem.
    pub fn in_memory(path: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            path: path.into(),
            settings,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Rewrite the settings file from the in-memory copy.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let contents =
            serde_json::to_string_pretty(&self.settings).map_err(ConfigError::Serialize)?;
        fs::write(&self.path, contents)?;
        log::debug!("wrote settings to {}", self.path.display());
        Ok(())
    }

    /// Record a new window resolution and persist it.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), ConfigError> {
        self.settings.video.width = resolution.width;
        self.settings.video.height = resolution.height;
        self.save()
    }
}
