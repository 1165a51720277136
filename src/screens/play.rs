use crossterm::event::KeyEvent;
use log::info;
use std::time::Duration;

use super::{AppContext, MenuState, SettingsScreen, Transition};
use crate::game::{Action, Direction, GameEngine, GameState};
use crate::input::{KeyAction, MenuKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseItem {
    Resume,
    Restart,
    Settings,
    MainMenu,
    Quit,
}

impl PauseItem {
    pub const ALL: [PauseItem; 5] = [
        PauseItem::Resume,
        PauseItem::Restart,
        PauseItem::Settings,
        PauseItem::MainMenu,
        PauseItem::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Resume => "RESUME",
            Self::Restart => "RESTART",
            Self::Settings => "SETTINGS",
            Self::MainMenu => "MAIN MENU",
            Self::Quit => "QUIT GAME",
        }
    }
}

/// Labels of the game-over dialog buttons, in menu order
pub const GAME_OVER_CHOICES: [&str; 2] = ["YES", "NO"];

/// What is drawn on top of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Paused(MenuState),
    GameOver { menu: MenuState, new_best: bool },
}

/// A round in progress plus its pause and game-over dialogs
pub struct PlayScreen {
    engine: GameEngine,
    pub state: GameState,
    pub overlay: Overlay,
    /// Settings list opened from the pause menu, drawn over the board
    pub settings_menu: Option<SettingsScreen>,
    pending_direction: Option<Direction>,
}

impl PlayScreen {
    pub fn new(ctx: &mut AppContext) -> Self {
        ctx.metrics.on_game_start();
        Self::with_engine(GameEngine::new(ctx.game_config()))
    }

    pub fn with_engine(mut engine: GameEngine) -> Self {
        let state = engine.reset();

        Self {
            engine,
            state,
            overlay: Overlay::None,
            settings_menu: None,
            pending_direction: None,
        }
    }

    /// Delay until the next tick at the current level
    pub fn tick_interval(&self) -> Duration {
        self.state.tick_interval
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Transition {
        if let Some(settings) = self.settings_menu.as_mut() {
            return match settings.handle_key(key, ctx) {
                Transition::Stay => Transition::Stay,
                Transition::Exit => Transition::Exit,
                // Leaving the list goes back to the pause menu
                _ => {
                    self.settings_menu = None;
                    Transition::Stay
                }
            };
        }

        match self.overlay {
            Overlay::None => self.handle_game_key(ctx.input.handle_key_event(key), ctx),
            Overlay::Paused(menu) => {
                // Space toggles pause rather than picking the highlighted entry
                if ctx.input.handle_key_event(key) == KeyAction::TogglePause {
                    self.resume(ctx);
                    return Transition::Stay;
                }
                self.handle_pause_key(menu, ctx.input.handle_menu_key(key), ctx)
            }
            Overlay::GameOver { menu, new_best } => {
                self.handle_game_over_key(menu, new_best, ctx.input.handle_menu_key(key), ctx)
            }
        }
    }

    fn handle_game_key(&mut self, action: KeyAction, ctx: &mut AppContext) -> Transition {
        match action {
            KeyAction::GameAction(Action::Move(dir)) => {
                self.pending_direction = Some(dir);
            }
            KeyAction::GameAction(Action::Continue) => {}
            KeyAction::TogglePause | KeyAction::PauseMenu => self.pause(ctx),
            KeyAction::ToggleFullscreen => ctx.toggle_fullscreen(),
            KeyAction::Exit => return Transition::Exit,
            KeyAction::None => {}
        }
        Transition::Stay
    }

    fn handle_pause_key(
        &mut self,
        mut menu: MenuState,
        key: MenuKey,
        ctx: &mut AppContext,
    ) -> Transition {
        match key {
            MenuKey::Previous => menu.previous(),
            MenuKey::Next => menu.next(),
            MenuKey::Select => {
                return match PauseItem::ALL[menu.selected] {
                    PauseItem::Resume => {
                        self.resume(ctx);
                        Transition::Stay
                    }
                    PauseItem::Restart => {
                        self.restart(ctx);
                        Transition::Stay
                    }
                    PauseItem::Settings => {
                        self.overlay = Overlay::Paused(menu);
                        self.settings_menu = Some(SettingsScreen::new());
                        Transition::Stay
                    }
                    PauseItem::MainMenu => Transition::MainMenu,
                    PauseItem::Quit => Transition::Exit,
                }
            }
            MenuKey::Back => {
                self.resume(ctx);
                return Transition::Stay;
            }
            MenuKey::ToggleFullscreen => ctx.toggle_fullscreen(),
            MenuKey::Exit => return Transition::Exit,
            MenuKey::Char(_) | MenuKey::None => {}
        }
        self.overlay = Overlay::Paused(menu);
        Transition::Stay
    }

    fn handle_game_over_key(
        &mut self,
        mut menu: MenuState,
        new_best: bool,
        key: MenuKey,
        ctx: &mut AppContext,
    ) -> Transition {
        let play_again = match key {
            MenuKey::Previous => {
                menu.previous();
                None
            }
            MenuKey::Next => {
                menu.next();
                None
            }
            MenuKey::Select => Some(menu.selected == 0),
            MenuKey::Char('y') | MenuKey::Char('r') => Some(true),
            MenuKey::Char('n') | MenuKey::Char('q') | MenuKey::Back => Some(false),
            MenuKey::ToggleFullscreen => {
                ctx.toggle_fullscreen();
                None
            }
            MenuKey::Exit => return Transition::Exit,
            MenuKey::Char(_) | MenuKey::None => None,
        };

        match play_again {
            Some(true) => {
                self.restart(ctx);
                Transition::Stay
            }
            Some(false) => Transition::MainMenu,
            None => {
                self.overlay = Overlay::GameOver { menu, new_best };
                Transition::Stay
            }
        }
    }

    /// Advance the round by one tick
    pub fn tick(&mut self, ctx: &mut AppContext) {
        if self.overlay != Overlay::None {
            return;
        }

        let action = Action::from(self.pending_direction.take());
        let result = self.engine.step(&mut self.state, action);

        if result.info.ate_food || result.info.collected_powerup {
            ctx.beep();
        }

        if result.terminated && !self.state.is_alive {
            self.finish_round(ctx);
        }
    }

    fn finish_round(&mut self, ctx: &mut AppContext) {
        let score = self.state.score;
        let level = self.state.level;

        ctx.metrics.on_game_over(score);
        let new_best = ctx.record_round(score, level);
        ctx.beep();

        info!(
            "game over: {} scored {} (level {}, {} steps, {:?}){}",
            ctx.settings.settings().player_name,
            score,
            level,
            self.state.steps,
            self.state.collision,
            if new_best { " - new best" } else { "" }
        );

        self.overlay = Overlay::GameOver {
            menu: MenuState::new(GAME_OVER_CHOICES.len()),
            new_best,
        };
    }

    fn pause(&mut self, ctx: &mut AppContext) {
        self.state.toggle_pause();
        if self.state.paused {
            ctx.metrics.on_pause();
            self.overlay = Overlay::Paused(MenuState::new(PauseItem::ALL.len()));
        }
    }

    fn resume(&mut self, ctx: &mut AppContext) {
        if self.state.paused {
            self.state.toggle_pause();
        }
        ctx.metrics.on_resume();
        self.overlay = Overlay::None;
    }

    /// Start over with whatever the settings say now
    fn restart(&mut self, ctx: &mut AppContext) {
        self.engine.set_config(ctx.game_config());
        self.state = self.engine.reset();
        ctx.metrics.on_game_start();
        self.overlay = Overlay::None;
        self.settings_menu = None;
        self.pending_direction = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, GameConfig, Position, Snake};
    use crossterm::event::{KeyCode, KeyModifiers};
    use tempfile::TempDir;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> PlayScreen {
        PlayScreen::with_engine(GameEngine::with_seed(GameConfig::small(), 11))
    }

    /// Snake whose next step down lands on its own tail
    fn doomed(screen: &mut PlayScreen) {
        screen.state.snake = Snake {
            body: vec![
                Position::new(5, 5),
                Position::new(6, 5),
                Position::new(6, 6),
                Position::new(5, 6),
            ],
            direction: Direction::Left,
        };
        screen.pending_direction = Some(Direction::Down);
    }

    #[test]
    fn test_game_initialization() {
        let screen = screen();
        assert!(screen.state.is_alive);
        assert_eq!(screen.state.score, 0);
        assert_eq!(screen.overlay, Overlay::None);
        assert_eq!(screen.tick_interval(), Duration::from_millis(150));
    }

    #[test]
    fn test_key_sets_direction_for_next_tick() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut screen = screen();
        screen.state.food = Some(Position::new(0, 0));

        screen.handle_key(press(KeyCode::Down), &mut ctx);
        assert_eq!(screen.state.snake.direction, Direction::Right);

        screen.tick(&mut ctx);
        assert_eq!(screen.state.snake.direction, Direction::Down);
        assert_eq!(screen.state.snake.head(), Position::new(5, 6));
    }

    #[test]
    fn test_pause_freezes_and_escape_resumes() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut screen = screen();
        let head = screen.state.snake.head();

        screen.handle_key(press(KeyCode::Char(' ')), &mut ctx);
        assert!(screen.state.paused);
        assert!(matches!(screen.overlay, Overlay::Paused(_)));

        screen.tick(&mut ctx);
        assert_eq!(screen.state.snake.head(), head);

        screen.handle_key(press(KeyCode::Esc), &mut ctx);
        assert!(!screen.state.paused);
        assert_eq!(screen.overlay, Overlay::None);
    }

    #[test]
    fn test_pause_menu_entries() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut screen = screen();
        screen.state.score = 50;

        screen.handle_key(press(KeyCode::Esc), &mut ctx);
        screen.handle_key(press(KeyCode::Down), &mut ctx);
        assert_eq!(screen.handle_key(press(KeyCode::Enter), &mut ctx), Transition::Stay);
        assert_eq!(screen.state.score, 0);
        assert!(screen.state.is_active());

        screen.handle_key(press(KeyCode::Esc), &mut ctx);
        screen.handle_key(press(KeyCode::Up), &mut ctx);
        assert_eq!(screen.handle_key(press(KeyCode::Enter), &mut ctx), Transition::Exit);

        let mut screen = self::screen();
        screen.handle_key(press(KeyCode::Esc), &mut ctx);
        for _ in 0..3 {
            screen.handle_key(press(KeyCode::Down), &mut ctx);
        }
        assert_eq!(screen.handle_key(press(KeyCode::Enter), &mut ctx), Transition::MainMenu);
    }

    #[test]
    fn test_game_over_records_and_offers_restart() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut screen = screen();
        doomed(&mut screen);
        screen.state.score = 40;

        screen.tick(&mut ctx);

        assert!(!screen.state.is_alive);
        assert_eq!(screen.state.collision, Some(CollisionType::SelfCollision));
        assert!(matches!(
            screen.overlay,
            Overlay::GameOver { new_best: true, .. }
        ));
        assert_eq!(ctx.settings.settings().best_score, 40);
        assert_eq!(ctx.metrics.games_played, 1);
        assert_eq!(ctx.metrics.high_score, 40);
        assert!(ctx.take_bell());

        // Movement keys are menu navigation now
        screen.handle_key(press(KeyCode::Down), &mut ctx);
        screen.handle_key(press(KeyCode::Up), &mut ctx);
        assert_eq!(screen.handle_key(press(KeyCode::Enter), &mut ctx), Transition::Stay);
        assert!(screen.state.is_alive);
        assert_eq!(screen.overlay, Overlay::None);
    }

    #[test]
    fn test_game_over_shortcuts() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut screen = screen();
        doomed(&mut screen);

        screen.tick(&mut ctx);
        assert!(matches!(
            screen.overlay,
            Overlay::GameOver { new_best: false, .. }
        ));

        assert_eq!(screen.handle_key(press(KeyCode::Char('x')), &mut ctx), Transition::Stay);
        assert_eq!(screen.handle_key(press(KeyCode::Char('n')), &mut ctx), Transition::MainMenu);
    }

    #[test]
    fn test_restart_picks_up_new_settings() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        ctx.base_config = GameConfig::small();
        let mut screen = PlayScreen::new(&mut ctx);
        assert_eq!(screen.tick_interval(), Duration::from_millis(150));

        ctx.settings
            .update(|s| s.difficulty = crate::settings::Difficulty::Easy);
        screen.restart(&mut ctx);
        assert_eq!(screen.tick_interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_space_resumes_whatever_is_highlighted() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut screen = screen();

        screen.handle_key(press(KeyCode::Char(' ')), &mut ctx);
        // Cursor wraps onto QUIT GAME
        screen.handle_key(press(KeyCode::Up), &mut ctx);
        assert_eq!(
            screen.handle_key(press(KeyCode::Char(' ')), &mut ctx),
            Transition::Stay
        );
        assert!(!screen.state.paused);
        assert_eq!(screen.overlay, Overlay::None);
    }

    #[test]
    fn test_settings_from_pause_menu() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        let mut screen = screen();
        let head = screen.state.snake.head();

        screen.handle_key(press(KeyCode::Esc), &mut ctx);
        screen.handle_key(press(KeyCode::Down), &mut ctx);
        screen.handle_key(press(KeyCode::Down), &mut ctx);
        assert_eq!(screen.handle_key(press(KeyCode::Enter), &mut ctx), Transition::Stay);
        assert!(screen.settings_menu.is_some());

        // Show Grid is the seventh entry; the change is visible straight away
        for _ in 0..6 {
            screen.handle_key(press(KeyCode::Down), &mut ctx);
        }
        screen.handle_key(press(KeyCode::Enter), &mut ctx);
        assert!(!ctx.settings.settings().show_grid);

        // Ticks are still frozen behind the list
        screen.tick(&mut ctx);
        assert_eq!(screen.state.snake.head(), head);

        assert_eq!(screen.handle_key(press(KeyCode::Esc), &mut ctx), Transition::Stay);
        assert!(screen.settings_menu.is_none());
        match screen.overlay {
            Overlay::Paused(menu) => assert_eq!(PauseItem::ALL[menu.selected], PauseItem::Settings),
            other => panic!("expected pause menu, got {:?}", other),
        }
        assert!(screen.state.paused);
    }
}
