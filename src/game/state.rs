use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{PhysicsConfig, SessionParams};

// Table geometry in field units (the host's screen pixels)
pub const PADDLE_HEIGHT: f32 = 50.0;
pub const PADDLE_WIDTH: f32 = 10.0;
pub const BALL_SIZE: f32 = 20.0;

// Collision planes. The ball must land exactly on these x values to be returned.
pub const LEFT_PADDLE_PLANE: f32 = 30.0;
pub const RIGHT_PADDLE_INSET: f32 = 50.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Start,
    Playing,
    GameOver,
}

/// Which peer a paddle or point belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Server,
    Client,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

/// Authoritative table state, owned by the hosting peer
#[derive(Debug, Clone)]
pub struct GameState {
    pub ball: Ball,
    pub server_paddle: f32,
    pub client_paddle: f32,
    pub server_score: u8,
    pub client_score: u8,
    pub phase: GamePhase,
    pub field_width: f32,
    pub field_height: f32,
    pub ball_speed: f32,
    pub paddle_speed: f32,
    pub winning_score: u8,
    rng: StdRng,
}

impl GameState {
    pub fn new(params: &SessionParams, physics: &PhysicsConfig) -> Self {
        Self::with_rng(params, physics, StdRng::from_entropy())
    }

    /// Seeded state: identical seeds and inputs give identical games
    pub fn with_seed(params: &SessionParams, physics: &PhysicsConfig, seed: u64) -> Self {
        Self::with_rng(params, physics, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: &SessionParams, physics: &PhysicsConfig, rng: StdRng) -> Self {
        let field_width = params.screen_width as f32;
        let field_height = params.screen_height as f32;
        // Paddles start at half height, integer-aligned like the ball
        let start_paddle = (params.screen_height / 2) as f32;

        let mut state = Self {
            ball: Ball {
                x: 0.0,
                y: 0.0,
                vx: 0.0,
                vy: 0.0,
            },
            server_paddle: start_paddle,
            client_paddle: start_paddle,
            server_score: 0,
            client_score: 0,
            phase: GamePhase::Start,
            field_width,
            field_height,
            ball_speed: physics.ball_speed,
            paddle_speed: params.paddle_speed,
            winning_score: physics.winning_score,
            rng,
        };
        state.reset_ball();
        state
    }

    /// Serve from the centre in a random diagonal direction
    pub fn reset_ball(&mut self) {
        let speed = self.ball_speed;
        self.ball.x = (self.field_width / 2.0).floor();
        self.ball.y = (self.field_height / 2.0).floor();
        self.ball.vx = if self.rng.gen_bool(0.5) { speed } else { -speed };
        self.ball.vy = if self.rng.gen_bool(0.5) { speed } else { -speed };
    }

    /// Back to the start screen with a fresh score (restart after game over)
    pub fn reset_game(&mut self) {
        self.server_score = 0;
        self.client_score = 0;
        self.phase = GamePhase::Start;
        self.reset_ball();
    }

    /// Lowest y a paddle's top edge may reach
    pub fn paddle_limit(&self) -> f32 {
        (self.field_height - PADDLE_HEIGHT).max(0.0)
    }

    pub fn right_paddle_plane(&self) -> f32 {
        self.field_width - RIGHT_PADDLE_INSET
    }

    pub fn winner(&self) -> Option<Side> {
        if self.server_score >= self.winning_score {
            Some(Side::Server)
        } else if self.client_score >= self.winning_score {
            Some(Side::Client)
        } else {
            None
        }
    }

    /// Uniform jitter in [-1, 1] added to paddle returns
    pub(crate) fn bounce_jitter(&mut self) -> f32 {
        self.rng.gen_range(-1.0..=1.0)
    }
}
