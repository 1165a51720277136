//! Screen state machines
//!
//! Each screen consumes key events and reports a [`Transition`]; the app loop
//! owns the terminal and swaps screens accordingly. Screens hold no terminal
//! handles so they can be driven directly from tests.

pub mod high_scores;
pub mod main_menu;
pub mod play;
pub mod settings;

use log::warn;
use std::path::PathBuf;

pub use high_scores::HighScoresScreen;
pub use main_menu::{MainMenu, MainMenuItem};
pub use play::{Overlay, PauseItem, PlayScreen};
pub use settings::{SettingItem, SettingsScreen};

use crate::game::GameConfig;
use crate::highscores::HighScoreStore;
use crate::input::InputHandler;
use crate::metrics::GameMetrics;
use crate::settings::SettingsStore;

/// Where the app should go after handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    MainMenu,
    StartGame,
    Settings,
    HighScores,
    Exit,
}

/// State shared by every screen
pub struct AppContext {
    pub settings: SettingsStore,
    /// `None` when the score database could not be opened
    pub scores: Option<HighScoreStore>,
    pub input: InputHandler,
    /// Grid size and rule constants; preferences are layered on per round
    pub base_config: GameConfig,
    /// Round timer plus counters that outlive a single play screen
    pub metrics: GameMetrics,
    /// Queued terminal bell, drained by the app loop
    bell: bool,
}

impl AppContext {
    pub fn new(
        settings: SettingsStore,
        scores: Option<HighScoreStore>,
        base_config: GameConfig,
    ) -> Self {
        Self {
            settings,
            scores,
            input: InputHandler::new(),
            base_config,
            metrics: GameMetrics::new(),
            bell: false,
        }
    }

    /// Configuration for a round started now
    pub fn game_config(&self) -> GameConfig {
        self.base_config.clone().with_settings(self.settings.settings())
    }

    pub fn toggle_fullscreen(&mut self) {
        self.settings.update(|s| s.fullscreen = !s.fullscreen);
    }

    /// Ring the bell on the next frame if sound is on
    pub fn beep(&mut self) {
        if self.settings.settings().sound_enabled {
            self.bell = true;
        }
    }

    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    /// Context for tests: settings under `dir`, no score database
    pub fn scratch(dir: impl Into<PathBuf>) -> Self {
        let settings = SettingsStore::load(dir.into().join("settings.json"));
        Self::new(settings, None, GameConfig::default())
    }

    pub(crate) fn record_round(&mut self, score: u32, level: u32) -> bool {
        let new_best = self.settings.record_score(score);

        if let Some(scores) = &self.scores {
            let name = self.settings.settings().player_name.clone();
            if let Err(e) = scores.add_score(&name, score, level, chrono::Utc::now()) {
                warn!("failed to save score: {}", e);
            }
        }

        new_best
    }
}

/// Cursor over a fixed list of entries, wrapping at both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuState {
    pub selected: usize,
    len: usize,
}

impl MenuState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            len: len.max(1),
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.len;
    }

    pub fn previous(&mut self) {
        self.selected = (self.selected + self.len - 1) % self.len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_menu_wraps_both_ways() {
        let mut menu = MenuState::new(4);
        menu.previous();
        assert_eq!(menu.selected, 3);
        menu.next();
        assert_eq!(menu.selected, 0);
        menu.next();
        assert_eq!(menu.selected, 1);
    }

    #[test]
    fn test_bell_respects_sound_setting() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());

        ctx.beep();
        assert!(ctx.take_bell());
        assert!(!ctx.take_bell());

        ctx.settings.update(|s| s.sound_enabled = false);
        ctx.beep();
        assert!(!ctx.take_bell());
    }

    #[test]
    fn test_record_round_updates_best_and_table() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        ctx.scores = Some(HighScoreStore::open(dir.path().join("scores")).unwrap());

        assert!(ctx.record_round(70, 1));
        assert!(!ctx.record_round(40, 1));

        assert_eq!(ctx.settings.settings().best_score, 70);
        let scores = ctx.scores.as_ref().unwrap().top_scores(10).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].score, 70);
    }
}
