use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use super::{app_area, centered_rect, menus};
use crate::game::{CollisionType, GameState, Position};
use crate::screens::play::GAME_OVER_CHOICES;
use crate::metrics::GameMetrics;
use crate::screens::{AppContext, Overlay, PauseItem, PlayScreen};
use crate::settings::Settings;

const FOOD_STYLE: Style = Style::new().fg(Color::LightRed).add_modifier(Modifier::BOLD);
const POWERUP_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const OBSTACLE_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Gray);
const GRID_STYLE: Style = Style::new().fg(Color::DarkGray);

/// Draws a round in progress
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, screen: &PlayScreen, ctx: &AppContext) {
        let settings = ctx.settings.settings();
        let area = app_area(frame.area(), settings.fullscreen);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(area);

        frame.render_widget(self.render_stats(screen, settings, &ctx.metrics), chunks[0]);

        let state = &screen.state;
        let (cell_w, cell_h) = cell_size(state, chunks[1], settings.fullscreen);
        let board_area = centered_rect(
            cells(state.grid_width).saturating_mul(cell_w).saturating_add(2),
            cells(state.grid_height).saturating_mul(cell_h).saturating_add(2),
            chunks[1],
        );
        frame.render_widget(self.render_grid(state, settings, cell_w, cell_h), board_area);

        frame.render_widget(self.render_controls(), chunks[2]);

        match screen.overlay {
            Overlay::None => {}
            Overlay::Paused(menu) => self.render_pause_menu(frame, area, menu.selected),
            Overlay::GameOver { menu, new_best } => self.render_game_over(
                frame,
                area,
                state,
                settings,
                &ctx.metrics,
                menu.selected,
                new_best,
            ),
        }

        if let Some(list) = &screen.settings_menu {
            menus::render_settings(frame, list, settings);
        }
    }

    fn render_grid(
        &self,
        state: &GameState,
        settings: &Settings,
        cell_w: u16,
        cell_h: u16,
    ) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(state.grid_height * cell_h as usize);

        for y in 0..state.grid_height {
            let cells: Vec<(char, Style)> = (0..state.grid_width)
                .map(|x| cell_at(state, settings, Position::new(x as i32, y as i32)))
                .collect();

            for row in 0..cell_h {
                let spans: Vec<Span> = cells
                    .iter()
                    .map(|(glyph, style)| {
                        let mut text = String::with_capacity(cell_w as usize * 3);
                        text.push(if row == 0 { *glyph } else { ' ' });
                        text.extend(std::iter::repeat(' ').take(cell_w as usize - 1));
                        Span::styled(text, *style)
                    })
                    .collect();
                lines.push(Line::from(spans));
            }
        }

        let title = if state.paused { " Snake (paused) " } else { " Snake " };
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::LightBlue))
                .title(title),
        )
    }

    fn render_stats(
        &self,
        screen: &PlayScreen,
        settings: &Settings,
        metrics: &GameMetrics,
    ) -> Paragraph<'_> {
        let state = &screen.state;
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        let best = settings.best_score.max(state.score);

        let pairs = [
            ("Score: ", state.score.to_string()),
            ("Best: ", best.to_string()),
            ("Level: ", state.level.to_string()),
            ("Speed: ", format!("{}ms", state.tick_interval.as_millis())),
            ("Player: ", settings.player_name.clone()),
            ("Time: ", metrics.format_time()),
        ];

        let mut spans = Vec::with_capacity(pairs.len() * 3);
        for (i, (name, val)) in pairs.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(name, label));
            spans.push(Span::styled(val, value));
        }

        Paragraph::new(vec![Line::from(""), Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_pause_menu(&self, frame: &mut Frame, area: Rect, selected: usize) {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "GAME PAUSED",
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (i, item) in PauseItem::ALL.iter().enumerate() {
            lines.push(menu_line(item.label(), i == selected));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Space/Esc to resume",
            Style::default().fg(Color::Gray),
        )));

        let area = centered_rect(34, lines.len() as u16 + 2, area);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::LightBlue)),
            ),
            area,
        );
    }

    fn render_game_over(
        &self,
        frame: &mut Frame,
        area: Rect,
        state: &GameState,
        settings: &Settings,
        metrics: &GameMetrics,
        selected: usize,
        new_best: bool,
    ) {
        let white = Style::default().fg(Color::White);
        let cause = match state.collision {
            Some(CollisionType::Obstacle) => "You hit an obstacle",
            Some(CollisionType::SelfCollision) | None => "You ran into yourself",
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(cause, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(Span::styled(format!("Score: {}", state.score), white)),
            Line::from(Span::styled(
                format!("Best Score: {}", settings.best_score),
                white,
            )),
            Line::from(Span::styled(format!("Level Reached: {}", state.level), white)),
            Line::from(Span::styled(
                format!(
                    "Session: {} games, best {}",
                    metrics.games_played, metrics.high_score
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        if new_best {
            lines.push(Line::from(Span::styled(
                "NEW BEST!",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Do you want to play again?",
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));

        let buttons: Vec<Span> = GAME_OVER_CHOICES
            .iter()
            .enumerate()
            .flat_map(|(i, label)| {
                let color = if i == 0 { Color::Green } else { Color::Red };
                let style = if i == selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(color)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(color)
                };
                [Span::styled(format!("  {}  ", label), style), Span::raw("    ")]
            })
            .collect();
        lines.push(Line::from(buttons));

        let area = centered_rect(40, lines.len() as u16 + 2, area);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Thick)
                    .border_style(Style::default().fg(Color::Red)),
            ),
            area,
        );
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("Esc", Style::default().fg(Color::Cyan)),
            Span::raw(" menu | "),
            Span::styled("F11", Style::default().fg(Color::Cyan)),
            Span::raw(" fullscreen"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Highlighted or plain entry in a vertical menu
pub(crate) fn menu_line(label: &str, selected: bool) -> Line<'static> {
    if selected {
        Line::from(Span::styled(
            format!("▶ {} ◀", label),
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            format!("  {}  ", label),
            Style::default().fg(Color::White),
        ))
    }
}

/// Grid dimension as a terminal length, saturating on huge grids
fn cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Characters per cell (width, height); fullscreen scales the board up
fn cell_size(state: &GameState, area: Rect, fullscreen: bool) -> (u16, u16) {
    if !fullscreen {
        return (2, 1);
    }

    let inner_w = area.width.saturating_sub(2);
    let inner_h = area.height.saturating_sub(2);
    let by_width = inner_w / cells(state.grid_width).saturating_mul(2).max(1);
    let by_height = inner_h / cells(state.grid_height).max(1);
    let scale = by_width.min(by_height).max(1);
    (scale * 2, scale)
}

fn cell_at(state: &GameState, settings: &Settings, pos: Position) -> (char, Style) {
    let color = settings.snake_color;

    if pos == state.snake.head() {
        let style = Style::default()
            .fg(Color::Black)
            .bg(color.head())
            .add_modifier(Modifier::BOLD);
        return (state.snake.direction.head_symbol(), style);
    }
    if state.snake.occupies(pos) {
        return (' ', Style::default().bg(color.body()));
    }
    if state.food == Some(pos) {
        return ('●', FOOD_STYLE);
    }
    if state.has_powerup_at(pos) {
        return ('★', POWERUP_STYLE);
    }
    if state.has_obstacle_at(pos) {
        return ('╳', OBSTACLE_STYLE);
    }

    if settings.show_grid {
        ('·', GRID_STYLE)
    } else {
        (' ', Style::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, GameEngine, Snake, TimedItem};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::{Duration, Instant};

    fn state() -> GameState {
        GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Some(Position::new(1, 1)),
            10,
            10,
            Duration::from_millis(150),
        )
    }

    #[test]
    fn test_cell_glyphs() {
        let mut state = state();
        let now = Instant::now();
        state.powerups.push(TimedItem::new(Position::new(2, 2), now));
        state.obstacles.push(TimedItem::new(Position::new(3, 3), now));
        let mut settings = Settings::default();

        assert_eq!(cell_at(&state, &settings, Position::new(5, 5)).0, '▶');
        assert_eq!(cell_at(&state, &settings, Position::new(4, 5)).0, ' ');
        assert_eq!(cell_at(&state, &settings, Position::new(1, 1)).0, '●');
        assert_eq!(cell_at(&state, &settings, Position::new(2, 2)).0, '★');
        assert_eq!(cell_at(&state, &settings, Position::new(3, 3)).0, '╳');
        assert_eq!(cell_at(&state, &settings, Position::new(8, 8)).0, '·');

        settings.show_grid = false;
        assert_eq!(cell_at(&state, &settings, Position::new(8, 8)).0, ' ');
    }

    #[test]
    fn test_fullscreen_scales_cells() {
        let state = state();
        assert_eq!(cell_size(&state, Rect::new(0, 0, 200, 60), false), (2, 1));
        assert_eq!(cell_size(&state, Rect::new(0, 0, 62, 32), true), (6, 3));
        assert_eq!(cell_size(&state, Rect::new(0, 0, 10, 5), true), (2, 1));
    }

    #[test]
    fn test_huge_grid_does_not_overflow() {
        let mut state = state();
        state.grid_width = 40_000;
        state.grid_height = 70_000;
        assert_eq!(cells(state.grid_width), 40_000);
        assert_eq!(cells(state.grid_height), u16::MAX);
        assert_eq!(cell_size(&state, Rect::new(0, 0, 200, 60), true), (2, 1));
    }

    #[test]
    fn test_renders_header_and_game_over() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut ctx = AppContext::scratch(dir.path());
        ctx.metrics.on_game_over(30);
        let mut screen =
            PlayScreen::with_engine(GameEngine::with_seed(GameConfig::small(), 3));
        screen.state.score = 30;
        screen.state.is_alive = false;
        screen.overlay = Overlay::GameOver {
            menu: crate::screens::MenuState::new(2),
            new_best: true,
        };

        let text = draw(&screen, &ctx);
        assert!(text.contains("Score: 30"));
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("NEW BEST!"));
        assert!(text.contains("Session: 1 games, best 30"));
    }

    #[test]
    fn test_settings_list_drawn_over_paused_board() {
        let dir = tempfile::TempDir::new().unwrap();
        let ctx = AppContext::scratch(dir.path());
        let mut screen =
            PlayScreen::with_engine(GameEngine::with_seed(GameConfig::small(), 3));
        screen.state.paused = true;
        screen.overlay = Overlay::Paused(crate::screens::MenuState::new(PauseItem::ALL.len()));
        screen.settings_menu = Some(crate::screens::SettingsScreen::new());

        let text = draw(&screen, &ctx);
        assert!(text.contains("SETTINGS"));
        assert!(text.contains("Snake Color"));
        assert!(!text.contains("GAME PAUSED"));
    }

    fn draw(screen: &PlayScreen, ctx: &AppContext) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, screen, ctx))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }
}
