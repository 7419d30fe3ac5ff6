use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
    Frame,
};

use super::overlay::{render_overlay, OverlayMessage};
use crate::game::state::{
    BALL_SIZE, LEFT_PADDLE_PLANE, PADDLE_HEIGHT, PADDLE_WIDTH, RIGHT_PADDLE_INSET,
};
use crate::network::{Role, View};

// Rows above the table: score line and controls hint
const HEADER_ROWS: u16 = 2;

/// Draw one frame of the table as this peer sees it
pub fn render(frame: &mut Frame, view: &View, role: Role, overlay: Option<&OverlayMessage>) {
    let area = frame.area();
    let bg = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    frame.render_widget(bg, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(HEADER_ROWS), Constraint::Min(3)])
        .split(area);

    draw_header(frame, view, role, chunks[0]);
    draw_table(frame, view, chunks[1]);

    if let Some(message) = overlay {
        render_overlay(frame, message, chunks[1]);
    }
}

pub fn score_line(view: &View) -> String {
    format!(
        "HOST {:>2}  :  {:<2} GUEST",
        view.server_score, view.client_score
    )
}

fn draw_header(frame: &mut Frame, view: &View, role: Role, area: Rect) {
    let you = match role {
        Role::Server => "You: left paddle (host)",
        Role::Client => "You: right paddle (guest)",
    };

    let lines = vec![
        Line::from(Span::styled(
            score_line(view),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(you, Style::default().fg(Color::Gray)),
            Span::styled("   ↑/↓: Move  Q: Quit", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

// Field y grows downward, canvas y grows upward
fn draw_table(frame: &mut Frame, view: &View, area: Rect) {
    let width = view.field_width as f64;
    let height = view.field_height as f64;
    let flip = |y: f64| height - y;

    let left_x = (LEFT_PADDLE_PLANE - PADDLE_WIDTH) as f64;
    let right_x = (view.field_width - RIGHT_PADDLE_INSET) as f64;
    let paddle_w = PADDLE_WIDTH as f64;
    let paddle_h = PADDLE_HEIGHT as f64;
    let half_ball = BALL_SIZE as f64 / 2.0;

    let server_top = view.server_paddle as f64;
    let client_top = view.client_paddle as f64;
    let ball_x = view.ball_x as f64;
    let ball_y = view.ball_y as f64;

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .background_color(Color::Rgb(0, 0, 0))
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            draw_center_line(ctx, width / 2.0, height);

            fill_rect(ctx, left_x, flip(server_top + paddle_h), paddle_w, paddle_h, Color::Cyan);
            fill_rect(ctx, right_x, flip(client_top + paddle_h), paddle_w, paddle_h, Color::Magenta);
            fill_rect(
                ctx,
                ball_x - half_ball,
                flip(ball_y + half_ball),
                BALL_SIZE as f64,
                BALL_SIZE as f64,
                Color::White,
            );
        });

    frame.render_widget(canvas, area);
}

fn draw_center_line(ctx: &mut Context, x: f64, height: f64) {
    let dash = height / 30.0;
    let mut y = 0.0;
    while y < height {
        ctx.draw(&CanvasLine {
            x1: x,
            y1: y,
            x2: x,
            y2: (y + dash).min(height),
            color: Color::DarkGray,
        });
        y += dash * 2.0;
    }
}

// Solid rectangle from vertical strokes; (x, y) is the bottom-left corner
fn fill_rect(ctx: &mut Context, x: f64, y: f64, width: f64, height: f64, color: Color) {
    let strokes = (width.ceil() as usize).max(1);
    let step = width / strokes as f64;
    for i in 0..=strokes {
        let sx = x + step * i as f64;
        ctx.draw(&CanvasLine {
            x1: sx,
            y1: y,
            x2: sx,
            y2: y + height,
            color,
        });
    }
}
