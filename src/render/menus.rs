use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::{app_area, centered_rect, renderer::menu_line};
use crate::screens::{HighScoresScreen, MainMenu, MainMenuItem, SettingItem, SettingsScreen};
use crate::settings::{Settings, MAX_PLAYER_NAME_LEN};

const TITLE: &str = "ULTIMATE SNAKE";

fn frame_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::LightBlue))
        .title(title)
        .title_alignment(Alignment::Center)
}

fn split_body(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Title
            Constraint::Min(0),    // Body
            Constraint::Length(2), // Hints
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn hint(text: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(text, Style::default().fg(Color::Gray))))
        .alignment(Alignment::Center)
}

fn title(text: &str, color: Color) -> Paragraph<'_> {
    Paragraph::new(vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
}

pub fn render_main_menu(frame: &mut Frame, menu: &MainMenu, settings: &Settings) {
    let area = app_area(frame.area(), settings.fullscreen);
    frame.render_widget(frame_block(""), area);
    let [top, body, bottom] = split_body(area);

    frame.render_widget(title(TITLE, Color::LightGreen), top);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Welcome, {}!", settings.player_name),
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            format!("Best Score: {}", settings.best_score),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
    ];
    for (i, item) in MainMenuItem::ALL.iter().enumerate() {
        lines.push(menu_line(item.label(), i == menu.menu.selected));
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);

    frame.render_widget(hint("↑↓ select | Enter confirm | F11 fullscreen | Esc quit"), bottom);
}

pub fn render_settings(frame: &mut Frame, screen: &SettingsScreen, settings: &Settings) {
    let area = app_area(frame.area(), settings.fullscreen);
    // Also drawn on top of a paused round
    frame.render_widget(Clear, area);
    frame.render_widget(frame_block(""), area);
    let [top, body, bottom] = split_body(area);

    frame.render_widget(title("SETTINGS", Color::LightBlue), top);

    let mut lines = Vec::with_capacity(SettingItem::ALL.len() * 2);
    for (i, item) in SettingItem::ALL.iter().enumerate() {
        let label = match item {
            SettingItem::Back => item.label().to_string(),
            _ => format!("{:<12} {:>16}", item.label(), item.value(settings)),
        };
        lines.push(menu_line(&label, i == screen.menu.selected));
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);

    frame.render_widget(hint("↑↓ select | Enter change | Esc back"), bottom);

    if let Some(buffer) = &screen.name_entry {
        render_name_dialog(frame, area, buffer);
    }
}

fn render_name_dialog(frame: &mut Frame, area: Rect, buffer: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Enter your name:",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{}_", buffer),
                Style::default().fg(Color::Black).bg(Color::White),
            ),
        ]),
        Line::from(Span::styled(
            format!("{}/{}", buffer.chars().count(), MAX_PLAYER_NAME_LEN),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter save | Esc cancel",
            Style::default().fg(Color::Gray),
        )),
    ];

    let popup = centered_rect(36, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::LightBlue))
                .title(" Player Name "),
        ),
        popup,
    );
}

pub fn render_high_scores(frame: &mut Frame, screen: &HighScoresScreen, settings: &Settings) {
    let area = app_area(frame.area(), settings.fullscreen);
    frame.render_widget(frame_block(""), area);
    let [top, body, bottom] = split_body(area);

    frame.render_widget(title("HIGH SCORES", Color::Yellow), top);

    let body = centered_rect(72, body.height, body);
    match screen {
        HighScoresScreen::Unavailable(message) => {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    message.as_str(),
                    Style::default().fg(Color::Red),
                )))
                .alignment(Alignment::Center),
                body,
            );
        }
        HighScoresScreen::Loaded { total: 0, .. } => {
            frame.render_widget(
                Paragraph::new("No scores yet. Go play!").alignment(Alignment::Center),
                body,
            );
        }
        HighScoresScreen::Loaded { scores, .. } => {
            let header = Row::new(["#", "Player", "Score", "Level", "Played At"]).style(
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            );
            let rows = scores.iter().enumerate().map(|(i, entry)| {
                let style = match i {
                    0 => Style::default().fg(Color::Yellow),
                    1 => Style::default().fg(Color::White),
                    2 => Style::default().fg(Color::LightRed),
                    _ => Style::default().fg(Color::Gray),
                };
                Row::new([
                    Cell::from((i + 1).to_string()),
                    Cell::from(entry.player_name.clone()),
                    Cell::from(entry.score.to_string()),
                    Cell::from(entry.level.to_string()),
                    Cell::from(
                        entry
                            .played_at
                            .with_timezone(&Local)
                            .format("%Y-%m-%d %H:%M")
                            .to_string(),
                    ),
                ])
                .style(style)
            });
            let table = Table::new(
                rows,
                [
                    Constraint::Length(4),
                    Constraint::Length(22),
                    Constraint::Length(8),
                    Constraint::Length(7),
                    Constraint::Length(18),
                ],
            )
            .header(header)
            .column_spacing(2);
            frame.render_widget(table, body);
        }
    }

    let footer = match screen {
        HighScoresScreen::Loaded { scores, total } if *total > 0 => format!(
            "Showing {} of {} rounds | Enter/Esc back",
            scores.len(),
            total
        ),
        _ => "Enter/Esc back".to_string(),
    };
    frame.render_widget(hint(&footer), bottom);
}
