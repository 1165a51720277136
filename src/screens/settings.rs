use crossterm::event::KeyEvent;
use log::info;

use super::{AppContext, MenuState, Transition};
use crate::input::{MenuKey, TextKey};
use crate::settings::{Settings, MAX_PLAYER_NAME_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingItem {
    Difficulty,
    SnakeColor,
    PlayerName,
    Powerups,
    Obstacles,
    Sound,
    ShowGrid,
    Fullscreen,
    Back,
}

impl SettingItem {
    pub const ALL: [SettingItem; 9] = [
        SettingItem::Difficulty,
        SettingItem::SnakeColor,
        SettingItem::PlayerName,
        SettingItem::Powerups,
        SettingItem::Obstacles,
        SettingItem::Sound,
        SettingItem::ShowGrid,
        SettingItem::Fullscreen,
        SettingItem::Back,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Difficulty => "Difficulty",
            Self::SnakeColor => "Snake Color",
            Self::PlayerName => "Player Name",
            Self::Powerups => "Powerups",
            Self::Obstacles => "Obstacles",
            Self::Sound => "Sound",
            Self::ShowGrid => "Show Grid",
            Self::Fullscreen => "Fullscreen",
            Self::Back => "BACK",
        }
    }

    /// Current value as shown next to the label
    pub fn value(self, settings: &Settings) -> String {
        let on_off = |flag: bool| if flag { "ON" } else { "OFF" }.to_string();
        match self {
            Self::Difficulty => format!(
                "{} ({}ms)",
                settings.difficulty.as_str(),
                settings.difficulty.tick_interval().as_millis()
            ),
            Self::SnakeColor => settings.snake_color.name().to_string(),
            Self::PlayerName => settings.player_name.clone(),
            Self::Powerups => on_off(settings.powerups_enabled),
            Self::Obstacles => on_off(settings.obstacles_enabled),
            Self::Sound => on_off(settings.sound_enabled),
            Self::ShowGrid => on_off(settings.show_grid),
            Self::Fullscreen => on_off(settings.fullscreen),
            Self::Back => String::new(),
        }
    }
}

pub struct SettingsScreen {
    pub menu: MenuState,
    /// Text being typed into the player name dialog, if it is open
    pub name_entry: Option<String>,
}

impl SettingsScreen {
    pub fn new() -> Self {
        Self {
            menu: MenuState::new(SettingItem::ALL.len()),
            name_entry: None,
        }
    }

    pub fn selected(&self) -> SettingItem {
        SettingItem::ALL[self.menu.selected]
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Transition {
        if self.name_entry.is_some() {
            return self.handle_name_key(key, ctx);
        }

        match ctx.input.handle_menu_key(key) {
            MenuKey::Previous => self.menu.previous(),
            MenuKey::Next => self.menu.next(),
            MenuKey::Select => return self.activate(self.selected(), ctx),
            MenuKey::Back => return Transition::MainMenu,
            MenuKey::Exit => return Transition::Exit,
            MenuKey::ToggleFullscreen => ctx.toggle_fullscreen(),
            MenuKey::Char(_) | MenuKey::None => {}
        }
        Transition::Stay
    }

    /// Cycle or toggle an entry; every change is saved straight away
    fn activate(&mut self, item: SettingItem, ctx: &mut AppContext) -> Transition {
        match item {
            SettingItem::Difficulty => ctx.settings.update(|s| s.difficulty = s.difficulty.next()),
            SettingItem::SnakeColor => {
                ctx.settings.update(|s| s.snake_color = s.snake_color.next())
            }
            SettingItem::PlayerName => {
                self.name_entry = Some(ctx.settings.settings().player_name.clone());
            }
            SettingItem::Powerups => ctx.settings.update(|s| s.powerups_enabled = !s.powerups_enabled),
            SettingItem::Obstacles => {
                ctx.settings.update(|s| s.obstacles_enabled = !s.obstacles_enabled)
            }
            SettingItem::Sound => ctx.settings.update(|s| s.sound_enabled = !s.sound_enabled),
            SettingItem::ShowGrid => ctx.settings.update(|s| s.show_grid = !s.show_grid),
            SettingItem::Fullscreen => ctx.toggle_fullscreen(),
            SettingItem::Back => return Transition::MainMenu,
        }
        Transition::Stay
    }

    fn handle_name_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Transition {
        let Some(buffer) = self.name_entry.as_mut() else {
            return Transition::Stay;
        };

        match ctx.input.handle_text_key(key) {
            TextKey::Insert(c) => {
                if buffer.chars().count() < MAX_PLAYER_NAME_LEN {
                    buffer.push(c);
                }
            }
            TextKey::Backspace => {
                buffer.pop();
            }
            TextKey::Confirm => {
                if let Some(name) = self.name_entry.take() {
                    if ctx.settings.set_player_name(&name) {
                        info!("player name changed to {}", ctx.settings.settings().player_name);
                    }
                }
            }
            TextKey::Cancel => self.name_entry = None,
            TextKey::Exit => return Transition::Exit,
            TextKey::None => {}
        }
        Transition::Stay
    }
}

impl Default for SettingsScreen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Difficulty, SettingsStore, SnakeColor};
    use crossterm::event::{KeyCode, KeyModifiers};
    use tempfile::TempDir;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn select(screen: &mut SettingsScreen, item: SettingItem, ctx: &mut AppContext) -> Transition {
        while screen.selected() != item {
            screen.handle_key(press(KeyCode::Down), ctx);
        }
        screen.handle_key(press(KeyCode::Enter), ctx)
    }

    #[test]
    fn test_cycles_and_toggles_are_saved() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut screen = SettingsScreen::new();

        select(&mut screen, SettingItem::Difficulty, &mut ctx);
        select(&mut screen, SettingItem::SnakeColor, &mut ctx);
        select(&mut screen, SettingItem::Obstacles, &mut ctx);
        select(&mut screen, SettingItem::ShowGrid, &mut ctx);

        let saved = SettingsStore::load(ctx.settings.path());
        assert_eq!(saved.settings().difficulty, Difficulty::Hard);
        assert_eq!(saved.settings().snake_color, SnakeColor::Red);
        assert!(saved.settings().obstacles_enabled);
        assert!(!saved.settings().show_grid);
    }

    #[test]
    fn test_name_dialog_confirm_and_cancel() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut screen = SettingsScreen::new();

        select(&mut screen, SettingItem::PlayerName, &mut ctx);
        assert_eq!(screen.name_entry.as_deref(), Some("Player"));

        for _ in 0..6 {
            screen.handle_key(press(KeyCode::Backspace), &mut ctx);
        }
        // Movement letters are text here, not navigation
        for c in "Sam".chars() {
            screen.handle_key(press(KeyCode::Char(c)), &mut ctx);
        }
        screen.handle_key(press(KeyCode::Enter), &mut ctx);
        assert!(screen.name_entry.is_none());
        assert_eq!(ctx.settings.settings().player_name, "Sam");

        screen.handle_key(press(KeyCode::Enter), &mut ctx);
        screen.handle_key(press(KeyCode::Char('x')), &mut ctx);
        screen.handle_key(press(KeyCode::Esc), &mut ctx);
        assert_eq!(ctx.settings.settings().player_name, "Sam");
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut screen = SettingsScreen::new();

        select(&mut screen, SettingItem::PlayerName, &mut ctx);
        screen.name_entry = Some("   ".to_string());
        screen.handle_key(press(KeyCode::Enter), &mut ctx);

        assert_eq!(ctx.settings.settings().player_name, "Player");
    }

    #[test]
    fn test_back_returns_to_menu() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut screen = SettingsScreen::new();

        assert_eq!(screen.handle_key(press(KeyCode::Esc), &mut ctx), Transition::MainMenu);
        assert_eq!(select(&mut screen, SettingItem::Back, &mut ctx), Transition::MainMenu);
    }

    #[test]
    fn test_value_labels() {
        let settings = Settings::default();
        assert_eq!(SettingItem::Difficulty.value(&settings), "Medium (150ms)");
        assert_eq!(SettingItem::Powerups.value(&settings), "ON");
        assert_eq!(SettingItem::Obstacles.value(&settings), "OFF");
        assert_eq!(SettingItem::SnakeColor.value(&settings), "Emerald Green");
    }
}
