use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::menu;
use crate::network::{
    discover_host_ip, spawn_accept, Channel, ClientSession, Listener, ServerSession, Session,
    SessionError, TerminalSignal,
};
use crate::ui::{OverlayMessage, TerminalShell};

use super::common::{limit_frame_rate, show_message};

// How long each waiting-screen frame blocks on the pending accept
const ACCEPT_POLL: Duration = Duration::from_millis(50);
const DOTS_PERIOD_MS: u128 = 400;

/// Host a game: listen, show the address until a guest arrives, then play
pub fn run_game_network_host<B: Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
) -> io::Result<()> {
    let addr = SocketAddr::new(discover_host_ip(), config.network.port);
    let listener = match Listener::bind(addr) {
        Ok(listener) => listener,
        Err(e) => {
            error!("cannot host: {}", e);
            return show_message(terminal, &failure("Cannot Host Game", &e.to_string()));
        }
    };
    info!("hosting on {}", listener.local_addr());

    let channel = match wait_for_guest(terminal, listener)? {
        Some(channel) => channel,
        None => return Ok(()),
    };

    let mut session = ServerSession::new(channel, config);
    run_session(terminal, &mut session, config)
}

/// Join a game hosted at `address`
pub fn run_game_network_client<B: Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    address: &str,
) -> io::Result<()> {
    terminal.draw(|f| menu::render_connecting(f, address, None))?;

    let channel = match Channel::connect(address, config.network.port) {
        Ok(channel) => channel,
        Err(e) => {
            warn!("join failed: {}", e);
            let message = failure("Connection Failed", &e.to_string());
            return show_message(terminal, &message);
        }
    };
    info!("connected to {}", channel.peer_addr());

    let mut session = ClientSession::new(channel, config);
    run_session(terminal, &mut session, config)
}

/// Draw the waiting screen while the accept runs on its helper thread.
/// `None` if the host gave up waiting.
fn wait_for_guest<B: Backend>(
    terminal: &mut Terminal<B>,
    listener: Listener,
) -> io::Result<Option<Channel>> {
    let shown = listener.local_addr().to_string();
    let mut pending = spawn_accept(listener)?;
    let started = Instant::now();
    let mut feedback = String::new();

    loop {
        let dots = (started.elapsed().as_millis() / DOTS_PERIOD_MS) as usize;
        terminal.draw(|f| menu::render_waiting_for_connection(f, &shown, dots, &feedback, None))?;

        if event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q' | 'Q') | KeyCode::Esc => {
                            info!("host cancelled waiting");
                            pending.cancel();
                            return Ok(None);
                        }
                        KeyCode::Char('c' | 'C') => feedback = copy_to_clipboard(&shown),
                        _ => {}
                    }
                }
            }
        }

        match pending.poll(ACCEPT_POLL) {
            Some(Ok(channel)) => {
                info!("guest connected from {}", channel.peer_addr());
                return Ok(Some(channel));
            }
            Some(Err(e)) => {
                error!("accept failed: {}", e);
                show_message(terminal, &failure("Connection Failed", &e.to_string()))?;
                return Ok(None);
            }
            None => {}
        }
    }
}

fn copy_to_clipboard(text: &str) -> String {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => "Copied to clipboard!".to_string(),
        Err(e) => {
            warn!("copy failed: {}", e);
            format!("Copy failed: {}", e)
        }
    }
}

/// Negotiate, then tick until someone quits or the connection breaks.
///
/// Errors from the session end the game with an overlay; only terminal
/// failures are returned.
fn run_session<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut dyn Session,
    config: &Config,
) -> io::Result<()> {
    let role = session.role();
    if let Err(e) = session.negotiate(&config.session_params()) {
        return end_with_error(terminal, session, e);
    }

    let fps = config.display.target_fps;
    let mut shell = TerminalShell::new(terminal, config.keybindings.clone(), role);

    let outcome = loop {
        let frame_start = Instant::now();
        match session.run_tick(&mut shell) {
            Ok(None) => {}
            Ok(Some(TerminalSignal::Quit)) => break Ok(()),
            Err(e) => break Err(e),
        }
        limit_frame_rate(frame_start, fps);
    };
    drop(shell);

    match outcome {
        Ok(()) => {
            info!("{:?} left the game", role);
            session.close();
            Ok(())
        }
        Err(e) => end_with_error(terminal, session, e),
    }
}

fn end_with_error<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut dyn Session,
    e: SessionError,
) -> io::Result<()> {
    session.close();
    match e {
        SessionError::Shell(io_error) => Err(io_error),
        other => {
            error!("session ended: {}", other);
            let title = if other.is_setup() {
                "Connection Failed"
            } else {
                "Connection Lost"
            };
            show_message(terminal, &failure(title, &other.to_string()))
        }
    }
}

fn failure(title: &str, detail: &str) -> OverlayMessage {
    OverlayMessage::error(vec![
        title.to_string(),
        String::new(),
        detail.to_string(),
        String::new(),
        "Press Q to return to menu".to_string(),
    ])
}
