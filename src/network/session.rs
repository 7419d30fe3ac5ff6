// Lock-step synchronization between the two peers
//
// Each tick the host simulates, sends one state record and waits for the
// client's paddle echo; the client waits for the record, applies it, and
// answers with its paddle. Both sides block on the stream, so neither can
// run ahead of the other.

use std::io;

use tracing::{debug, info, trace};

use super::error::{DecodeError, SessionError};
use super::protocol::{self, GameStateRecord, WireMessage};
use super::transport::{self, Channel};
use crate::config::{Config, PhysicsConfig, SessionParams};
use crate::game::physics::{self, PhysicsEvents};
use crate::game::state::PADDLE_HEIGHT;
use crate::game::{GamePhase, GameState, LocalInput, Side};

/// Which end of the connection this peer is. Fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Runs the physics, owns the left paddle
    Server,
    /// Mirrors the host, owns the right paddle
    Client,
}

/// How the shell wants to reach the other player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Wait for a peer on the service port (host)
    Listen,

    /// Connect to a host's address
    Connect { address: String },
}

impl ConnectionMode {
    pub fn role(&self) -> Role {
        match self {
            ConnectionMode::Listen => Role::Server,
            ConnectionMode::Connect { .. } => Role::Client,
        }
    }
}

/// Returned by `run_tick` when the local player asked to leave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalSignal {
    Quit,
}

/// Everything the shell needs to draw one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub phase: GamePhase,
    pub server_paddle: f32,
    pub client_paddle: f32,
    pub ball_x: f32,
    pub ball_y: f32,
    pub server_score: u8,
    pub client_score: u8,
    pub field_width: f32,
    pub field_height: f32,
}

impl From<&GameState> for View {
    fn from(state: &GameState) -> Self {
        Self {
            phase: state.phase,
            server_paddle: state.server_paddle,
            client_paddle: state.client_paddle,
            ball_x: state.ball.x,
            ball_y: state.ball.y,
            server_score: state.server_score,
            client_score: state.client_score,
            field_width: state.field_width,
            field_height: state.field_height,
        }
    }
}

/// Input and output the session borrows from the presentation layer
pub trait Shell {
    fn get_local_input(&mut self) -> io::Result<LocalInput>;
    fn present(&mut self, view: &View) -> io::Result<()>;
}

/// One peer's half of a game. `ServerSession` and `ClientSession` are the
/// two behaviours; the role is chosen once, when the session is built.
pub trait Session {
    fn role(&self) -> Role;

    /// Run the one-time parameter handshake. Returns the parameters both
    /// peers will play with (always the host's).
    fn negotiate(&mut self, local: &SessionParams) -> Result<SessionParams, SessionError>;

    /// One lock-step tick: input, exchange, present.
    fn run_tick(&mut self, shell: &mut dyn Shell) -> Result<Option<TerminalSignal>, SessionError>;

    /// Current state as this peer sees it
    fn view(&self) -> View;

    fn close(&mut self);
}

/// Build a session by listening (host) or connecting (client). Blocks until
/// the connection is established.
pub fn create_session(
    mode: &ConnectionMode,
    config: &Config,
) -> Result<Box<dyn Session>, SessionError> {
    let port = config.network.port;
    match mode {
        ConnectionMode::Listen => {
            let channel = transport::listen_and_accept(port)?;
            Ok(Box::new(ServerSession::new(channel, config)))
        }
        ConnectionMode::Connect { address } => {
            let channel = Channel::connect(address, port)?;
            Ok(Box::new(ClientSession::new(channel, config)))
        }
    }
}

/// Host side: authoritative physics
pub struct ServerSession {
    channel: Channel,
    physics: PhysicsConfig,
    seed: Option<u64>,
    state: Option<GameState>,
    acks_received: u32,
    ticks: u64,
}

impl ServerSession {
    pub fn new(channel: Channel, config: &Config) -> Self {
        Self {
            channel,
            physics: config.physics.clone(),
            seed: None,
            state: None,
            acks_received: 0,
            ticks: 0,
        }
    }

    /// Use a fixed random seed for serves and bounce jitter
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Authoritative state, available once negotiation has finished
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    pub fn acks_received(&self) -> u32 {
        self.acks_received
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Session for ServerSession {
    fn role(&self) -> Role {
        Role::Server
    }

    fn negotiate(&mut self, local: &SessionParams) -> Result<SessionParams, SessionError> {
        let rounds = [
            ("paddle speed", local.paddle_speed as f64),
            ("screen height", local.screen_height as f64),
            ("screen width", local.screen_width as f64),
        ];

        for (name, value) in rounds {
            debug!("negotiate: sending {} = {}", name, value);
            send(&mut self.channel, &WireMessage::Number(value))?;
            protocol::decode_ack(&self.channel.receive()?)?;
            self.acks_received += 1;
        }

        self.state = Some(match self.seed {
            Some(seed) => GameState::with_seed(local, &self.physics, seed),
            None => GameState::new(local, &self.physics),
        });
        info!(
            "negotiated with {}: paddle speed {}, field {}x{}",
            self.channel.peer_addr(),
            local.paddle_speed,
            local.screen_width,
            local.screen_height
        );
        Ok(*local)
    }

    fn run_tick(&mut self, shell: &mut dyn Shell) -> Result<Option<TerminalSignal>, SessionError> {
        let state = self.state.as_mut().ok_or(SessionError::NotNegotiated)?;

        let input = shell.get_local_input().map_err(SessionError::Shell)?;
        if input.quit {
            info!("host quit after {} ticks", self.ticks);
            return Ok(Some(TerminalSignal::Quit));
        }

        let events = physics::update(state, &input);
        log_events(state, &events);

        let record = GameStateRecord {
            paddle: state.server_paddle,
            phase: state.phase,
            ball_x: state.ball.x,
            ball_y: state.ball.y,
            server_score: state.server_score,
            client_score: state.client_score,
        };
        send(&mut self.channel, &WireMessage::State(record))?;

        let echo = protocol::decode_number(&self.channel.receive()?)?;
        state.client_paddle = finite("paddle echo", echo)? as f32;

        self.ticks += 1;
        trace!("host tick {} {:?}", self.ticks, record);
        shell
            .present(&View::from(&*state))
            .map_err(SessionError::Shell)?;
        Ok(None)
    }

    fn view(&self) -> View {
        match &self.state {
            Some(state) => View::from(state),
            None => waiting_view(&SessionParams::default()),
        }
    }

    fn close(&mut self) {
        self.channel.close();
    }
}

/// Joining side: mirrors the host and reports its own paddle
pub struct ClientSession {
    channel: Channel,
    params: Option<SessionParams>,
    local_defaults: SessionParams,
    // Local settings, overwritten by the host's values on negotiation
    config: Config,
    paddle: f32,
    mirror: GameStateRecord,
    acks_sent: u32,
    ticks: u64,
}

impl ClientSession {
    pub fn new(channel: Channel, config: &Config) -> Self {
        let local_defaults = config.session_params();
        Self {
            channel,
            params: None,
            local_defaults,
            config: config.clone(),
            paddle: start_paddle(&local_defaults),
            mirror: initial_record(&local_defaults),
            acks_sent: 0,
            ticks: 0,
        }
    }

    /// Parameters adopted from the host, once negotiated
    pub fn params(&self) -> Option<&SessionParams> {
        self.params.as_ref()
    }

    pub fn acks_sent(&self) -> u32 {
        self.acks_sent
    }

    pub fn paddle(&self) -> f32 {
        self.paddle
    }

    /// Local config, holding the host's paddle speed and field size once negotiated
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Last record received from the host
    pub fn last_record(&self) -> &GameStateRecord {
        &self.mirror
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn receive_param(&mut self) -> Result<f64, SessionError> {
        let value = protocol::decode_number(&self.channel.receive()?)?;
        send(&mut self.channel, &WireMessage::Ack)?;
        self.acks_sent += 1;
        Ok(value)
    }
}

impl Session for ClientSession {
    fn role(&self) -> Role {
        Role::Client
    }

    // The client never argues: whatever the host sends is adopted
    fn negotiate(&mut self, local: &SessionParams) -> Result<SessionParams, SessionError> {
        let paddle_speed = self.receive_param()?;
        let paddle_speed = non_negative("paddle speed", paddle_speed)? as f32;
        let screen_height = dimension("screen height", self.receive_param()?)?;
        let screen_width = dimension("screen width", self.receive_param()?)?;

        let params = SessionParams {
            paddle_speed,
            screen_height,
            screen_width,
        };
        if params != *local {
            info!(
                "adopting host parameters {:?} (local was {:?})",
                params, local
            );
        }

        self.local_defaults = *local;
        self.config.apply_session_params(&params);
        self.params = Some(params);
        self.paddle = start_paddle(&params);
        self.mirror = initial_record(&params);
        info!(
            "negotiated with {}: paddle speed {}, field {}x{}",
            self.channel.peer_addr(),
            params.paddle_speed,
            params.screen_width,
            params.screen_height
        );
        Ok(params)
    }

    fn run_tick(&mut self, shell: &mut dyn Shell) -> Result<Option<TerminalSignal>, SessionError> {
        let params = self.params.ok_or(SessionError::NotNegotiated)?;

        let input = shell.get_local_input().map_err(SessionError::Shell)?;
        if input.quit {
            info!("client quit after {} ticks", self.ticks);
            return Ok(Some(TerminalSignal::Quit));
        }

        // Own paddle moves locally; the host takes whatever we report
        if self.mirror.phase == GamePhase::Playing {
            let limit = (params.screen_height as f32 - PADDLE_HEIGHT).max(0.0);
            self.paddle = physics::move_paddle(self.paddle, &input, params.paddle_speed, limit);
        }

        let record = protocol::decode_state(&self.channel.receive()?)?;
        if record.phase != self.mirror.phase {
            debug!("host phase {:?} -> {:?}", self.mirror.phase, record.phase);
        }
        self.mirror = record;

        send(&mut self.channel, &WireMessage::Number(self.paddle as f64))?;

        self.ticks += 1;
        trace!("client tick {} {:?}", self.ticks, record);
        shell.present(&self.view()).map_err(SessionError::Shell)?;
        Ok(None)
    }

    fn view(&self) -> View {
        let params = self.params.unwrap_or(self.local_defaults);
        View {
            phase: self.mirror.phase,
            server_paddle: self.mirror.paddle,
            client_paddle: self.paddle,
            ball_x: self.mirror.ball_x,
            ball_y: self.mirror.ball_y,
            server_score: self.mirror.server_score,
            client_score: self.mirror.client_score,
            field_width: params.screen_width as f32,
            field_height: params.screen_height as f32,
        }
    }

    fn close(&mut self) {
        self.channel.close();
    }
}

fn send(channel: &mut Channel, message: &WireMessage) -> Result<(), SessionError> {
    let bytes = protocol::encode(message).map_err(SessionError::Encode)?;
    channel.send(&bytes)?;
    Ok(())
}

fn log_events(state: &GameState, events: &PhysicsEvents) {
    if let Some(side) = events.goal {
        info!(
            "point to {:?}: {} - {}",
            side, state.server_score, state.client_score
        );
    }
    if events.game_over {
        let winner = state.winner().unwrap_or(Side::Server);
        info!("game over, {:?} wins", winner);
    } else if events.phase_changed {
        debug!("phase now {:?}", state.phase);
    }
    if let Some(side) = events.paddle_hit {
        trace!("ball returned by {:?} paddle", side);
    }
}

fn start_paddle(params: &SessionParams) -> f32 {
    (params.screen_height / 2) as f32
}

fn initial_record(params: &SessionParams) -> GameStateRecord {
    GameStateRecord {
        paddle: start_paddle(params),
        phase: GamePhase::Start,
        ball_x: (params.screen_width / 2) as f32,
        ball_y: (params.screen_height / 2) as f32,
        server_score: 0,
        client_score: 0,
    }
}

fn waiting_view(params: &SessionParams) -> View {
    let record = initial_record(params);
    View {
        phase: record.phase,
        server_paddle: record.paddle,
        client_paddle: record.paddle,
        ball_x: record.ball_x,
        ball_y: record.ball_y,
        server_score: 0,
        client_score: 0,
        field_width: params.screen_width as f32,
        field_height: params.screen_height as f32,
    }
}

fn finite(name: &'static str, value: f64) -> Result<f64, DecodeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DecodeError::InvalidParameter { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<f64, DecodeError> {
    match finite(name, value)? {
        v if v >= 0.0 => Ok(v),
        _ => Err(DecodeError::InvalidParameter { name, value }),
    }
}

// Screen sizes travel as plain numbers but must be whole and positive
fn dimension(name: &'static str, value: f64) -> Result<u32, DecodeError> {
    let v = finite(name, value)?;
    if v >= 1.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
        Ok(v as u32)
    } else {
        Err(DecodeError::InvalidParameter { name, value })
    }
}
