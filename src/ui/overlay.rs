// Centered message boxes drawn over the table or a menu screen

use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::game::GamePhase;
use crate::network::{Role, View};

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMessage {
    pub lines: Vec<String>,
    pub title: Option<String>,
    pub style: OverlayStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStyle {
    /// Phase prompts (start, game over)
    Info,
    /// Waiting on the other player
    Warning,
    /// Connection or protocol failure
    Error,
}

impl OverlayMessage {
    pub fn info(lines: Vec<String>) -> Self {
        Self::styled(lines, OverlayStyle::Info)
    }

    pub fn warning(lines: Vec<String>) -> Self {
        Self::styled(lines, OverlayStyle::Warning)
    }

    pub fn error(lines: Vec<String>) -> Self {
        Self::styled(lines, OverlayStyle::Error)
    }

    fn styled(lines: Vec<String>, style: OverlayStyle) -> Self {
        Self {
            lines,
            title: None,
            style,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn border_color(&self) -> Color {
        match self.style {
            OverlayStyle::Info => Color::Cyan,
            OverlayStyle::Warning => Color::Yellow,
            OverlayStyle::Error => Color::Red,
        }
    }

    fn text_color(&self) -> Color {
        match self.style {
            OverlayStyle::Info => Color::White,
            OverlayStyle::Warning => Color::Yellow,
            OverlayStyle::Error => Color::LightRed,
        }
    }
}

/// Prompt for the current phase, worded for this peer's role.
/// `None` while the ball is in play.
pub fn phase_overlay(view: &View, role: Role) -> Option<OverlayMessage> {
    match (view.phase, role) {
        (GamePhase::Playing, _) => None,
        (GamePhase::Start, Role::Server) => Some(OverlayMessage::info(vec![
            "Press SPACE to start".to_string(),
            String::new(),
            "Q to Quit".to_string(),
        ])),
        (GamePhase::Start, Role::Client) => Some(OverlayMessage::warning(vec![
            "Waiting for host to start".to_string(),
            String::new(),
            "Q to Quit".to_string(),
        ])),
        (GamePhase::GameOver, _) => {
            let local_won = match role {
                Role::Server => view.server_score > view.client_score,
                Role::Client => view.client_score > view.server_score,
            };
            let verdict = if local_won { "YOU WIN!" } else { "YOU LOSE" };
            let prompt = match role {
                Role::Server => "SPACE to restart  |  Q to Quit",
                Role::Client => "Waiting for host to restart  |  Q to Quit",
            };
            Some(
                OverlayMessage::info(vec![
                    verdict.to_string(),
                    String::new(),
                    prompt.to_string(),
                ])
                .with_title("Game Over"),
            )
        }
    }
}

/// Box dimensions for a message: the longest line plus border and padding,
/// never larger than the area
pub fn overlay_area(message: &OverlayMessage, area: Rect) -> Rect {
    let longest = message
        .lines
        .iter()
        .map(|line| line.chars().count())
        .chain(message.title.iter().map(|t| t.chars().count() + 2))
        .max()
        .unwrap_or(0) as u16;

    let width = longest.saturating_add(6).min(area.width);
    let height = (message.lines.len() as u16).saturating_add(4).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_overlay(frame: &mut Frame, message: &OverlayMessage, area: Rect) {
    let boxed = overlay_area(message, area);
    frame.render_widget(Clear, boxed);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(message.border_color()))
        .style(Style::default().bg(Color::Rgb(20, 20, 20)));
    if let Some(title) = &message.title {
        block = block.title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(message.border_color())
                .add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(block, boxed);

    let text: Vec<Line> = message
        .lines
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                line.as_str(),
                Style::default().fg(message.text_color()),
            ))
        })
        .collect();

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, boxed.inner(Margin::new(2, 1)));
}
