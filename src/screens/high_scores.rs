use crossterm::event::KeyEvent;
use log::warn;

use super::{AppContext, Transition};
use crate::highscores::{HighScore, DISPLAY_LIMIT};
use crate::input::MenuKey;

/// Snapshot of the score table taken when the screen opens
pub enum HighScoresScreen {
    Loaded {
        scores: Vec<HighScore>,
        /// Rounds recorded in total, including those past the display limit
        total: usize,
    },
    Unavailable(String),
}

impl HighScoresScreen {
    pub fn load(ctx: &AppContext) -> Self {
        let Some(store) = &ctx.scores else {
            return Self::Unavailable("High score database is not available".to_string());
        };

        if store.is_empty() {
            return Self::Loaded {
                scores: Vec::new(),
                total: 0,
            };
        }

        match store.top_scores(DISPLAY_LIMIT) {
            Ok(scores) => Self::Loaded {
                scores,
                total: store.len(),
            },
            Err(e) => {
                warn!("failed to read high scores: {}", e);
                Self::Unavailable(format!("Could not read high scores: {}", e))
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Transition {
        match ctx.input.handle_menu_key(key) {
            MenuKey::Back | MenuKey::Select => Transition::MainMenu,
            MenuKey::Exit => Transition::Exit,
            MenuKey::ToggleFullscreen => {
                ctx.toggle_fullscreen();
                Transition::Stay
            }
            _ => Transition::Stay,
        }
    }
}
