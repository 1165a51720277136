use crossterm::event::KeyEvent;

use super::{AppContext, MenuState, Transition};
use crate::input::MenuKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuItem {
    StartGame,
    HighScores,
    Settings,
    Quit,
}

impl MainMenuItem {
    pub const ALL: [MainMenuItem; 4] = [
        MainMenuItem::StartGame,
        MainMenuItem::HighScores,
        MainMenuItem::Settings,
        MainMenuItem::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::StartGame => "START GAME",
            Self::HighScores => "HIGH SCORES",
            Self::Settings => "SETTINGS",
            Self::Quit => "QUIT",
        }
    }

    fn transition(self) -> Transition {
        match self {
            Self::StartGame => Transition::StartGame,
            Self::HighScores => Transition::HighScores,
            Self::Settings => Transition::Settings,
            Self::Quit => Transition::Exit,
        }
    }
}

pub struct MainMenu {
    pub menu: MenuState,
}

impl MainMenu {
    pub fn new() -> Self {
        Self {
            menu: MenuState::new(MainMenuItem::ALL.len()),
        }
    }

    pub fn selected(&self) -> MainMenuItem {
        MainMenuItem::ALL[self.menu.selected]
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Transition {
        match ctx.input.handle_menu_key(key) {
            MenuKey::Previous => self.menu.previous(),
            MenuKey::Next => self.menu.next(),
            MenuKey::Select => return self.selected().transition(),
            MenuKey::Back | MenuKey::Exit => return Transition::Exit,
            MenuKey::ToggleFullscreen => ctx.toggle_fullscreen(),
            MenuKey::Char(_) | MenuKey::None => {}
        }
        Transition::Stay
    }
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use tempfile::TempDir;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_starts_game_by_default() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut menu = MainMenu::new();

        assert_eq!(menu.handle_key(press(KeyCode::Enter), &mut ctx), Transition::StartGame);
    }

    #[test]
    fn test_navigation_reaches_every_entry() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut menu = MainMenu::new();

        menu.handle_key(press(KeyCode::Down), &mut ctx);
        assert_eq!(menu.handle_key(press(KeyCode::Enter), &mut ctx), Transition::HighScores);
        menu.handle_key(press(KeyCode::Char('s')), &mut ctx);
        assert_eq!(menu.handle_key(press(KeyCode::Enter), &mut ctx), Transition::Settings);

        // Up from the top wraps to Quit
        let mut menu = MainMenu::new();
        menu.handle_key(press(KeyCode::Up), &mut ctx);
        assert_eq!(menu.selected(), MainMenuItem::Quit);
        assert_eq!(menu.handle_key(press(KeyCode::Enter), &mut ctx), Transition::Exit);
    }

    #[test]
    fn test_escape_quits_and_f11_toggles_fullscreen() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut menu = MainMenu::new();

        assert_eq!(menu.handle_key(press(KeyCode::F(11)), &mut ctx), Transition::Stay);
        assert!(ctx.settings.settings().fullscreen);
        assert_eq!(menu.handle_key(press(KeyCode::Esc), &mut ctx), Transition::Exit);
    }
}
