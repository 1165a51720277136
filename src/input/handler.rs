use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction};

/// Keys while a round is running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    GameAction(Action),
    TogglePause,
    PauseMenu,
    ToggleFullscreen,
    /// Ctrl+C: leave the application from anywhere
    Exit,
    None,
}

/// Keys on menus, dialogs and overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKey {
    Previous,
    Next,
    Select,
    Back,
    ToggleFullscreen,
    Exit,
    /// Any other letter, lowercased, for dialog shortcuts
    Char(char),
    None,
}

/// Keys while typing into a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    Insert(char),
    Backspace,
    Confirm,
    Cancel,
    Exit,
    None,
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if is_ctrl_c(&key) {
            return KeyAction::Exit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::GameAction(Action::Move(Direction::Up)),
            KeyCode::Down => KeyAction::GameAction(Action::Move(Direction::Down)),
            KeyCode::Left => KeyAction::GameAction(Action::Move(Direction::Left)),
            KeyCode::Right => KeyAction::GameAction(Action::Move(Direction::Right)),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::GameAction(Action::Move(Direction::Up))
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::GameAction(Action::Move(Direction::Down))
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::GameAction(Action::Move(Direction::Left))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::GameAction(Action::Move(Direction::Right))
            }

            KeyCode::Char(' ') => KeyAction::TogglePause,
            KeyCode::Esc => KeyAction::PauseMenu,
            KeyCode::F(11) => KeyAction::ToggleFullscreen,

            _ => KeyAction::None,
        }
    }

    pub fn handle_menu_key(&self, key: KeyEvent) -> MenuKey {
        if is_ctrl_c(&key) {
            return MenuKey::Exit;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => MenuKey::Previous,
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => MenuKey::Next,
            KeyCode::Enter | KeyCode::Char(' ') => MenuKey::Select,
            KeyCode::Esc => MenuKey::Back,
            KeyCode::F(11) => MenuKey::ToggleFullscreen,
            KeyCode::Char(c) if c.is_alphabetic() => MenuKey::Char(c.to_ascii_lowercase()),
            _ => MenuKey::None,
        }
    }

    pub fn handle_text_key(&self, key: KeyEvent) -> TextKey {
        if is_ctrl_c(&key) {
            return TextKey::Exit;
        }

        match key.code {
            KeyCode::Enter => TextKey::Confirm,
            KeyCode::Esc => TextKey::Cancel,
            KeyCode::Backspace => TextKey::Backspace,
            KeyCode::Char(c) if !c.is_control() => TextKey::Insert(c),
            _ => TextKey::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
