use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::time::Duration;

use crate::config::KeyBindings;

/// Keys the host or client holds during one tick.
///
/// Terminals report presses (and auto-repeat), not releases, so a direction
/// counts as held for the tick in which its press arrived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalInput {
    pub up: bool,
    pub down: bool,
    pub start: bool,
    pub restart: bool,
    pub quit: bool,
}

impl LocalInput {
    /// Fold one key press into this tick's input
    pub fn record(&mut self, code: KeyCode, bindings: &KeyBindings) {
        if matches_binding(code, &bindings.paddle_up) {
            self.up = true;
        }
        if matches_binding(code, &bindings.paddle_down) {
            self.down = true;
        }
        if matches_binding(code, &bindings.start) {
            self.start = true;
        }
        if matches_binding(code, &bindings.restart) {
            self.restart = true;
        }
        if matches_binding(code, &bindings.quit) || code == KeyCode::Esc {
            self.quit = true;
        }
    }
}

/// Drain pending terminal events into a single tick's input without blocking
pub fn poll_input(bindings: &KeyBindings) -> Result<LocalInput, std::io::Error> {
    let mut input = LocalInput::default();

    while event::poll(Duration::from_millis(0))? {
        if let Event::Key(key) = event::read()? {
            if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                input.record(key.code, bindings);
            }
        }
    }

    Ok(input)
}

/// Parse a config key name ("Up", "Space", "W") into a key code
pub fn parse_key(binding: &str) -> Option<KeyCode> {
    match binding.trim().to_ascii_lowercase().as_str() {
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "space" => Some(KeyCode::Char(' ')),
        "backspace" => Some(KeyCode::Backspace),
        "tab" => Some(KeyCode::Tab),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}

/// Case-insensitive match of a pressed key against a binding
pub fn matches_binding(code: KeyCode, binding: &str) -> bool {
    match (code, parse_key(binding)) {
        (KeyCode::Char(pressed), Some(KeyCode::Char(bound))) => {
            pressed.to_ascii_lowercase() == bound
        }
        (pressed, Some(bound)) => pressed == bound,
        (_, None) => false,
    }
}
