//! Helpers shared by the host and join flows

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    style::{Color, Style},
    widgets::Block,
    Terminal,
};

use crate::ui::{render_overlay, OverlayMessage};

/// Length of one tick at `fps` ticks per second, with `fps` clamped to 1..=1000
pub fn frame_duration(fps: u64) -> Duration {
    Duration::from_secs(1) / fps.clamp(1, 1000) as u32
}

/// Sleep out the remainder of the current tick.
///
/// Call at the end of each loop iteration with the `Instant` taken at its
/// start. A tick that already overran returns immediately.
pub fn limit_frame_rate(frame_start: Instant, fps: u64) {
    let elapsed = frame_start.elapsed();
    let budget = frame_duration(fps);
    if elapsed < budget {
        std::thread::sleep(budget - elapsed);
    }
}

/// Show a message box until the player presses Q, Esc or Enter
pub fn show_message<B: Backend>(
    terminal: &mut Terminal<B>,
    message: &OverlayMessage,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            f.render_widget(
                Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0))),
                area,
            );
            render_overlay(f, message, area);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(
                        key.code,
                        KeyCode::Char('q' | 'Q') | KeyCode::Esc | KeyCode::Enter
                    )
                {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration() {
        assert_eq!(frame_duration(60), Duration::from_nanos(16_666_666));
        assert_eq!(frame_duration(1), Duration::from_secs(1));
        assert_eq!(frame_duration(0), Duration::from_secs(1));
    }

    #[test]
    fn test_limit_frame_rate_waits_out_tick() {
        let start = Instant::now();
        limit_frame_rate(start, 50);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_overrun_tick_does_not_sleep() {
        let start = Instant::now() - Duration::from_millis(100);
        let before = Instant::now();
        limit_frame_rate(start, 60);
        assert!(before.elapsed() < Duration::from_millis(15));
    }
}
