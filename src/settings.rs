//! Player preferences persisted as JSON
//!
//! Settings are loaded once at startup and written back after every change,
//! so nothing is lost if the terminal is closed mid-game. A missing file is
//! created with defaults; an unreadable one is replaced by defaults in memory
//! and reported in the log.

use log::{info, warn};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Longest player name kept in settings and the score table
pub const MAX_PLAYER_NAME_LEN: usize = 20;

pub const DEFAULT_PLAYER_NAME: &str = "Player";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Game speed preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Tick interval at level 1
    pub fn tick_interval(self) -> Duration {
        match self {
            Self::Easy => Duration::from_millis(200),
            Self::Medium => Duration::from_millis(150),
            Self::Hard => Duration::from_millis(100),
        }
    }

    /// Easy → Medium → Hard → Easy
    pub fn next(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// Palette the snake can be drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnakeColor {
    #[default]
    EmeraldGreen,
    Red,
    Blue,
    Yellow,
    Magenta,
    Cyan,
}

impl SnakeColor {
    pub const ALL: [SnakeColor; 6] = [
        SnakeColor::EmeraldGreen,
        SnakeColor::Red,
        SnakeColor::Blue,
        SnakeColor::Yellow,
        SnakeColor::Magenta,
        SnakeColor::Cyan,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::EmeraldGreen => "Emerald Green",
            Self::Red => "Red",
            Self::Blue => "Blue",
            Self::Yellow => "Yellow",
            Self::Magenta => "Magenta",
            Self::Cyan => "Cyan",
        }
    }

    /// Colour of the head
    pub fn head(self) -> Color {
        match self {
            Self::EmeraldGreen => Color::LightGreen,
            Self::Red => Color::LightRed,
            Self::Blue => Color::LightBlue,
            Self::Yellow => Color::LightYellow,
            Self::Magenta => Color::LightMagenta,
            Self::Cyan => Color::LightCyan,
        }
    }

    /// Dimmer shade for the body segments
    pub fn body(self) -> Color {
        match self {
            Self::EmeraldGreen => Color::Green,
            Self::Red => Color::Red,
            Self::Blue => Color::Blue,
            Self::Yellow => Color::Yellow,
            Self::Magenta => Color::Magenta,
            Self::Cyan => Color::Cyan,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub player_name: String,
    pub snake_color: SnakeColor,
    pub powerups_enabled: bool,
    pub obstacles_enabled: bool,
    pub sound_enabled: bool,
    pub show_grid: bool,
    pub fullscreen: bool,
    pub best_score: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            snake_color: SnakeColor::default(),
            powerups_enabled: true,
            obstacles_enabled: false,
            sound_enabled: true,
            show_grid: true,
            fullscreen: false,
            best_score: 0,
        }
    }
}

/// Clean up a typed-in name; `None` when nothing usable is left
pub fn normalize_player_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_PLAYER_NAME_LEN).collect())
}

/// In-memory settings bound to the file they came from
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Load settings from `path`, falling back to defaults
    ///
    /// Never fails: a broken file is logged and ignored so the game can
    /// still start.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let settings = match Self::read(&path) {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                info!("no settings at {:?}, writing defaults", path);
                let store = Self {
                    path: path.clone(),
                    settings: Settings::default(),
                };
                store.save_or_warn();
                return store;
            }
            Err(e) => {
                warn!("failed to load settings, using defaults: {}", e);
                Settings::default()
            }
        };

        Self { path, settings }
    }

    fn read(path: &Path) -> Result<Option<Settings>, SettingsError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| SettingsError::Json {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write the current settings as pretty JSON, creating parent directories
    pub fn save(&self) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|source| {
            SettingsError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, json).map_err(io_err)
    }

    /// Save, logging rather than propagating failures
    pub fn save_or_warn(&self) {
        if let Err(e) = self.save() {
            warn!("failed to save settings: {}", e);
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` and persist the result
    pub fn update(&mut self, change: impl FnOnce(&mut Settings)) {
        change(&mut self.settings);
        self.save_or_warn();
    }

    /// Returns false when the name was blank or unchanged
    pub fn set_player_name(&mut self, raw: &str) -> bool {
        match normalize_player_name(raw) {
            Some(name) if name != self.settings.player_name => {
                self.update(|s| s.player_name = name);
                true
            }
            _ => false,
        }
    }

    /// Raise the best score if `score` beats it; returns whether it did
    pub fn record_score(&mut self, score: u32) -> bool {
        if score <= self.settings.best_score {
            return false;
        }
        self.update(|s| s.best_score = score);
        true
    }
}
