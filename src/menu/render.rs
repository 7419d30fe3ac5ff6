// Menu rendering with Ratatui

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::state::{MenuScreen, MenuState};
use crate::config::{Config, SettingKey};
use crate::ui::{render_overlay, OverlayMessage};

const TITLE: [&str; 5] = [
    "█     ███  █   █ ████   ███  █   █  ████",
    "█    █   █ ██  █ █   █ █   █ ██  █ █    ",
    "█    █████ █ █ █ ████  █   █ █ █ █ █  ██",
    "█    █   █ █  ██ █     █   █ █  ██ █   █",
    "████ █   █ █   █ █      ███  █   █  ████",
];

fn black_background(frame: &mut Frame, area: Rect) {
    let bg = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    frame.render_widget(bg, area);
}

fn hint(pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in pairs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            format!(": {}", action),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

/// Render the main menu and whichever sub-screen is open
pub fn render_menu(frame: &mut Frame, menu: &MenuState, config: &Config) {
    let area = frame.area();
    black_background(frame, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(6),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(area);

    let mut title: Vec<Line> = vec![Line::from("")];
    title.extend(TITLE.iter().map(|row| {
        Line::from(Span::styled(
            *row,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
    }));
    frame.render_widget(Paragraph::new(title).alignment(Alignment::Center), chunks[0]);

    let items: Vec<Line> = menu
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if i == menu.selected_index {
                Line::from(Span::styled(
                    format!("  > {}", item.display_text()),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!("    {}", item.display_text()),
                    Style::default().fg(Color::White),
                ))
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(items).alignment(Alignment::Center), chunks[1]);

    if let Some(status) = &menu.status {
        let status = Paragraph::new(Span::styled(
            status.as_str(),
            Style::default().fg(Color::LightRed),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(status, chunks[2]);
    }

    let controls = hint(&[("↑/↓", "Navigate"), ("Enter", "Select"), ("Q/Esc", "Quit")]);
    frame.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center),
        chunks[3],
    );

    match menu.screen {
        MenuScreen::Main => {}
        MenuScreen::JoinDialog => render_join_dialog(frame, menu),
        MenuScreen::Settings => render_settings(frame, menu, config),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn dialog_block(title: &'static str) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Rgb(20, 20, 20)))
}

fn render_join_dialog(frame: &mut Frame, menu: &MenuState) {
    let dialog = centered(frame.area(), 50, 7);
    frame.render_widget(Clear, dialog);
    frame.render_widget(dialog_block("Host Address"), dialog);

    let inner = dialog.inner(Margin::new(2, 1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let input = if menu.address_input.is_empty() {
        Span::styled(
            "(type or Ctrl+V the host's IP)",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(
            format!("{}_", menu.address_input),
            Style::default().fg(Color::White),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(input)), rows[0]);

    let controls = hint(&[("Enter", "Connect"), ("Ctrl+V", "Paste"), ("Esc", "Cancel")]);
    frame.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center),
        rows[2],
    );
}

/// One settings row, e.g. `> Paddle speed   < 8 >`
pub fn setting_row(config: &Config, key: SettingKey, selected: bool) -> String {
    let desc = key.descriptor();
    let marker = if selected { ">" } else { " " };
    format!(
        "{} {:<14} < {:>4} >",
        marker,
        desc.label,
        config.setting(key)
    )
}

fn render_settings(frame: &mut Frame, menu: &MenuState, config: &Config) {
    let keys = SettingKey::all();
    let dialog = centered(frame.area(), 40, keys.len() as u16 + 6);
    frame.render_widget(Clear, dialog);
    frame.render_widget(dialog_block("Settings"), dialog);

    let mut lines: Vec<Line> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let selected = i == menu.setting_index;
            let style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(setting_row(config, *key, selected), style))
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(hint(&[("←/→", "Change"), ("Esc", "Save")]));

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        dialog.inner(Margin::new(2, 1)),
    );
}

/// Host screen while the accept runs in the background
pub fn render_waiting_for_connection(
    frame: &mut Frame,
    address: &str,
    dots: usize,
    feedback: &str,
    overlay: Option<&OverlayMessage>,
) {
    let area = frame.area();
    black_background(frame, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Min(8),
            Constraint::Percentage(30),
        ])
        .split(area);

    let title = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Waiting for a player to join{:<3}", ".".repeat(dots % 4)),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let mut body = vec![
        Line::from(Span::styled(
            "Share this address:",
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            address,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        hint(&[("C", "Copy"), ("Q", "Cancel")]),
    ];
    if !feedback.is_empty() {
        body.push(Line::from(Span::styled(
            feedback,
            Style::default().fg(Color::Green),
        )));
    }

    let width = (address.chars().count() as u16 + 10).max(30);
    let boxed = centered(chunks[1], width, 8);
    let widget = Paragraph::new(body).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .style(Style::default().bg(Color::Rgb(20, 20, 20))),
    );
    frame.render_widget(widget, boxed);

    if let Some(message) = overlay {
        render_overlay(frame, message, area);
    }
}

/// Guest screen while connecting and negotiating
pub fn render_connecting(frame: &mut Frame, address: &str, overlay: Option<&OverlayMessage>) {
    let area = frame.area();
    black_background(frame, area);

    let text = vec![
        Line::from(Span::styled(
            format!("Connecting to {}...", address),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Receiving game settings from the host",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center),
        centered(area, area.width, 3),
    );

    if let Some(message) = overlay {
        render_overlay(frame, message, area);
    }
}
