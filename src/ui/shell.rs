use std::io;

use ratatui::{backend::Backend, Terminal};

use super::overlay::phase_overlay;
use super::render::render;
use crate::config::KeyBindings;
use crate::game::{poll_input, LocalInput};
use crate::network::{Role, Shell, View};

/// The real terminal: keyboard in, braille table out
pub struct TerminalShell<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    bindings: KeyBindings,
    role: Role,
}

impl<'a, B: Backend> TerminalShell<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>, bindings: KeyBindings, role: Role) -> Self {
        Self {
            terminal,
            bindings,
            role,
        }
    }
}

impl<B: Backend> Shell for TerminalShell<'_, B> {
    fn get_local_input(&mut self) -> io::Result<LocalInput> {
        poll_input(&self.bindings)
    }

    fn present(&mut self, view: &View) -> io::Result<()> {
        let overlay = phase_overlay(view, self.role);
        let role = self.role;
        self.terminal
            .draw(|f| render(f, view, role, overlay.as_ref()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GamePhase;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_present_draws_to_backend() {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let view = View {
            phase: GamePhase::Start,
            server_paddle: 300.0,
            client_paddle: 300.0,
            ball_x: 400.0,
            ball_y: 300.0,
            server_score: 0,
            client_score: 0,
            field_width: 800.0,
            field_height: 600.0,
        };

        {
            let mut shell = TerminalShell::new(&mut terminal, KeyBindings::default(), Role::Server);
            shell.present(&view).unwrap();
        }

        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Press SPACE to start"));
    }
}
