use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{stderr, Stderr, Write};
use std::time::Duration;
use tokio::time::{interval, interval_at, Instant, Interval};

use crate::render::{menus, Renderer};
use crate::screens::{
    AppContext, HighScoresScreen, MainMenu, PlayScreen, SettingsScreen, Transition,
};

/// Frame period for redraws (about 30 FPS)
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// The screen currently receiving input
pub enum Screen {
    MainMenu(MainMenu),
    Settings(SettingsScreen),
    HighScores(HighScoresScreen),
    Playing(PlayScreen),
}

impl Screen {
    fn name(&self) -> &'static str {
        match self {
            Screen::MainMenu(_) => "main menu",
            Screen::Settings(_) => "settings",
            Screen::HighScores(_) => "high scores",
            Screen::Playing(_) => "game",
        }
    }
}

pub struct App {
    ctx: AppContext,
    screen: Screen,
    renderer: Renderer,
    should_quit: bool,
}

impl App {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            screen: Screen::MainMenu(MainMenu::new()),
            renderer: Renderer::new(),
            should_quit: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run the event loop, restoring the terminal even if it fails
        let result = self.run_loop(&mut terminal).await;

        cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut render_timer = interval(RENDER_INTERVAL);

        // Only polled while a round is on screen; rebuilt whenever the speed changes
        let mut tick_period = self.tick_period();
        let mut tick_timer = tick_timer_for(tick_period);

        info!("entering {}", self.screen.name());

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick(), if tick_period.is_some() => {
                    self.tick();
                }

                // Render frame
                _ = render_timer.tick() => {
                    if let Screen::Playing(_) = self.screen {
                        self.ctx.metrics.update();
                    }
                    terminal.draw(|frame| self.draw(frame)).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.ctx.take_bell() {
                let backend = terminal.backend_mut();
                backend.write_all(b"\x07").context("Failed to ring bell")?;
                backend.flush().context("Failed to ring bell")?;
            }

            if self.should_quit {
                break;
            }

            let period = self.tick_period();
            if period != tick_period {
                debug!("tick period changed to {:?}", period);
                tick_period = period;
                tick_timer = tick_timer_for(tick_period);
            }
        }

        info!("shutting down");
        Ok(())
    }

    /// Current game speed, or `None` when no round is on screen
    pub fn tick_period(&self) -> Option<Duration> {
        match &self.screen {
            Screen::Playing(play) => Some(play.tick_interval()),
            _ => None,
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        let transition = match &mut self.screen {
            Screen::MainMenu(menu) => menu.handle_key(key, &mut self.ctx),
            Screen::Settings(settings) => settings.handle_key(key, &mut self.ctx),
            Screen::HighScores(scores) => scores.handle_key(key, &mut self.ctx),
            Screen::Playing(play) => play.handle_key(key, &mut self.ctx),
        };
        self.apply(transition);
    }

    pub fn tick(&mut self) {
        if let Screen::Playing(play) = &mut self.screen {
            play.tick(&mut self.ctx);
        }
    }

    fn apply(&mut self, transition: Transition) {
        let next = match transition {
            Transition::Stay => return,
            Transition::Exit => {
                self.should_quit = true;
                return;
            }
            Transition::MainMenu => Screen::MainMenu(MainMenu::new()),
            Transition::StartGame => Screen::Playing(PlayScreen::new(&mut self.ctx)),
            Transition::Settings => Screen::Settings(SettingsScreen::new()),
            Transition::HighScores => Screen::HighScores(HighScoresScreen::load(&self.ctx)),
        };
        debug!("{} -> {}", self.screen.name(), next.name());
        self.screen = next;
    }

    fn draw(&self, frame: &mut Frame) {
        let settings = self.ctx.settings.settings();
        match &self.screen {
            Screen::MainMenu(menu) => menus::render_main_menu(frame, menu, settings),
            Screen::Settings(screen) => menus::render_settings(frame, screen, settings),
            Screen::HighScores(screen) => menus::render_high_scores(frame, screen, settings),
            Screen::Playing(play) => self.renderer.render(frame, play, &self.ctx),
        }
    }
}

fn tick_timer_for(period: Option<Duration>) -> Interval {
    let period = period.unwrap_or(RENDER_INTERVAL);
    interval_at(Instant::now() + period, period)
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}
