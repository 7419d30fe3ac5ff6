// LANPong configuration types
// Defaults match the classic 800x600 table the game was tuned on

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

impl Config {
    /// Parameters the hosting peer pushes to the joining peer during negotiation
    pub fn session_params(&self) -> SessionParams {
        SessionParams {
            paddle_speed: self.physics.paddle_speed,
            screen_height: self.display.screen_height,
            screen_width: self.display.screen_width,
        }
    }

    /// Adopt parameters received from the host
    pub fn apply_session_params(&mut self, params: &SessionParams) {
        self.physics.paddle_speed = params.paddle_speed;
        self.display.screen_height = params.screen_height;
        self.display.screen_width = params.screen_width;
    }
}

/// Values agreed once per session, host to client, before the first tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionParams {
    pub paddle_speed: f32,
    pub screen_height: u32,
    pub screen_width: u32,
}

impl Default for SessionParams {
    fn default() -> Self {
        Config::default().session_params()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyBindings {
    pub paddle_up: String,
    pub paddle_down: String,

    // SPACE both starts a round and restarts after game over
    pub start: String,
    pub restart: String,
    pub quit: String,

    pub menu_up: String,
    pub menu_down: String,
    pub menu_select: String,
    pub menu_back: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            paddle_up: "Up".to_string(),
            paddle_down: "Down".to_string(),
            start: "Space".to_string(),
            restart: "Space".to_string(),
            quit: "Q".to_string(),
            menu_up: "Up".to_string(),
            menu_down: "Down".to_string(),
            menu_select: "Enter".to_string(),
            menu_back: "Esc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // Ball speed per axis, in field units per tick
    pub ball_speed: f32,

    // Paddle movement per tick while a direction key is held
    pub paddle_speed: f32,

    // Score that ends the match
    pub winning_score: u8,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            ball_speed: 5.0,
            paddle_speed: 8.0,
            winning_score: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    // Field dimensions; the host's values win during negotiation
    pub screen_width: u32,
    pub screen_height: u32,

    // Ticks per second; physics is coupled to this rate
    pub target_fps: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            target_fps: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    // TCP service port used by both roles
    pub port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { port: 5555 }
    }
}
