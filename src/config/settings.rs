// Editable settings exposed by the menu's settings screen
// Each key maps to a typed descriptor instead of poking fields by name

use super::types::Config;
use crate::game::state::{LEFT_PADDLE_PLANE, RIGHT_PADDLE_INSET};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    PaddleSpeed,
    BallSpeed,
    ScreenWidth,
    ScreenHeight,
}

/// Bounds and step size for one editable setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingDescriptor {
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SettingKey {
    pub fn all() -> [SettingKey; 4] {
        [
            SettingKey::PaddleSpeed,
            SettingKey::BallSpeed,
            SettingKey::ScreenWidth,
            SettingKey::ScreenHeight,
        ]
    }

    pub fn descriptor(self) -> SettingDescriptor {
        match self {
            SettingKey::PaddleSpeed => SettingDescriptor {
                label: "Paddle speed",
                min: 1.0,
                max: 20.0,
                step: 1.0,
            },
            // Only speeds that pass `reaches_paddle_planes` for the current width are stored
            SettingKey::BallSpeed => SettingDescriptor {
                label: "Ball speed",
                min: 1.0,
                max: 10.0,
                step: 1.0,
            },
            SettingKey::ScreenWidth => SettingDescriptor {
                label: "Screen width",
                min: 400.0,
                max: 1920.0,
                step: 10.0,
            },
            SettingKey::ScreenHeight => SettingDescriptor {
                label: "Screen height",
                min: 300.0,
                max: 1080.0,
                step: 10.0,
            },
        }
    }
}

impl Config {
    /// Current value of a setting
    pub fn setting(&self, key: SettingKey) -> f32 {
        match key {
            SettingKey::PaddleSpeed => self.physics.paddle_speed,
            SettingKey::BallSpeed => self.physics.ball_speed,
            SettingKey::ScreenWidth => self.display.screen_width as f32,
            SettingKey::ScreenHeight => self.display.screen_height as f32,
        }
    }

    /// Set a setting, clamped to its descriptor bounds. Returns the stored value.
    ///
    /// Ball speed snaps to the nearest playable speed for the current width,
    /// and a width change re-snaps the ball speed.
    pub fn set_setting(&mut self, key: SettingKey, value: f32) -> f32 {
        let desc = key.descriptor();
        let value = value.clamp(desc.min, desc.max);
        match key {
            SettingKey::PaddleSpeed => self.physics.paddle_speed = value,
            SettingKey::BallSpeed => {
                self.physics.ball_speed = nearest_playable(self.display.screen_width, value);
            }
            SettingKey::ScreenWidth => {
                self.display.screen_width = value.round() as u32;
                self.snap_ball_speed();
            }
            SettingKey::ScreenHeight => self.display.screen_height = value.round() as u32,
        }
        self.setting(key)
    }

    /// Move a setting by a number of descriptor steps (negative to decrease).
    /// Ball speed moves to the next playable speed in that direction.
    pub fn adjust_setting(&mut self, key: SettingKey, steps: i32) -> f32 {
        if key == SettingKey::BallSpeed {
            let speeds = self.playable_ball_speeds();
            let current = self.physics.ball_speed;
            let skip = steps.unsigned_abs() as usize;
            let next = match steps.signum() {
                1 => speeds.iter().copied().filter(|&s| s > current).nth(skip - 1),
                -1 => speeds.iter().rev().copied().filter(|&s| s < current).nth(skip - 1),
                _ => None,
            };
            if let Some(speed) = next {
                self.physics.ball_speed = speed;
            }
            return self.physics.ball_speed;
        }

        let step = key.descriptor().step;
        self.set_setting(key, self.setting(key) + step * steps as f32)
    }

    /// Ball speeds the editor offers for the current screen width, ascending
    pub fn playable_ball_speeds(&self) -> Vec<f32> {
        playable_ball_speeds(self.display.screen_width)
    }

    /// Pull the ball speed onto a playable value for the current width
    pub fn snap_ball_speed(&mut self) {
        let desc = SettingKey::BallSpeed.descriptor();
        let wanted = self.physics.ball_speed.clamp(desc.min, desc.max);
        self.physics.ball_speed = nearest_playable(self.display.screen_width, wanted);
    }
}

/// Whether a ball serving from the centre of a `width`-wide table at `speed`
/// per tick lands exactly on both paddle planes, and on each plane again
/// after a return from the other one.
pub fn reaches_paddle_planes(width: u32, speed: u32) -> bool {
    if speed == 0 {
        return false;
    }
    let centre = i64::from(width / 2);
    let left = LEFT_PADDLE_PLANE as i64;
    let right = i64::from(width) - RIGHT_PADDLE_INSET as i64;
    let speed = i64::from(speed);
    [centre - left, right - centre, right - left]
        .iter()
        .all(|&distance| distance > 0 && distance % speed == 0)
}

fn playable_ball_speeds(width: u32) -> Vec<f32> {
    let desc = SettingKey::BallSpeed.descriptor();
    (desc.min as u32..=desc.max as u32)
        .filter(|&speed| reaches_paddle_planes(width, speed))
        .map(|speed| speed as f32)
        .collect()
}

// Ties go to the slower speed; a table with no playable speed keeps the rounded value
fn nearest_playable(width: u32, wanted: f32) -> f32 {
    let wanted = wanted.round();
    playable_ball_speeds(width)
        .into_iter()
        .min_by(|a, b| (a - wanted).abs().total_cmp(&(b - wanted).abs()))
        .unwrap_or(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_moves_by_step() {
        let mut config = Config::default();
        assert_eq!(config.adjust_setting(SettingKey::PaddleSpeed, 2), 10.0);
        assert_eq!(config.physics.paddle_speed, 10.0);
        assert_eq!(config.adjust_setting(SettingKey::ScreenWidth, -3), 770.0);
        assert_eq!(config.display.screen_width, 770);
    }

    #[test]
    fn test_set_clamps_to_bounds() {
        let mut config = Config::default();
        // 10 divides both 370 and 350 on the default 800 wide table
        assert_eq!(config.set_setting(SettingKey::BallSpeed, 99.0), 10.0);
        assert_eq!(config.set_setting(SettingKey::ScreenHeight, 0.0), 300.0);
        assert_eq!(config.display.screen_height, 300);
    }

    #[test]
    fn test_every_default_is_within_bounds() {
        let config = Config::default();
        for key in SettingKey::all() {
            let desc = key.descriptor();
            let value = config.setting(key);
            assert!(
                value >= desc.min && value <= desc.max,
                "{} default {} outside [{}, {}]",
                desc.label,
                value,
                desc.min,
                desc.max
            );
        }
    }

    // Serve from the centre with both paddles parked on the ball's row and
    // count the returns each side makes
    fn returns_per_side(config: &Config) -> (u32, u32) {
        use crate::game::{physics, GamePhase, GameState, LocalInput};

        let mut state = GameState::with_seed(&config.session_params(), &config.physics, 3);
        state.phase = GamePhase::Playing;
        let (mut left, mut right) = (0, 0);
        for _ in 0..5000 {
            let paddle = (state.ball.y - 25.0).clamp(0.0, state.paddle_limit());
            state.server_paddle = paddle;
            state.client_paddle = paddle;
            match physics::update(&mut state, &LocalInput::default()).paddle_hit {
                Some(crate::game::Side::Server) => left += 1,
                Some(crate::game::Side::Client) => right += 1,
                None => {}
            }
            if state.phase != GamePhase::Playing {
                break;
            }
        }
        (left, right)
    }

    #[test]
    fn test_every_offered_ball_speed_reaches_both_paddles() {
        for width in [800u32, 810, 640, 1000] {
            let mut config = Config::default();
            config.set_setting(SettingKey::ScreenWidth, width as f32);
            let offered = config.playable_ball_speeds();
            assert!(!offered.is_empty(), "no playable speed at width {}", width);

            for speed in offered {
                config.set_setting(SettingKey::BallSpeed, speed);
                assert_eq!(config.physics.ball_speed, speed);
                let (left, right) = returns_per_side(&config);
                assert!(
                    left > 0 && right > 0,
                    "speed {} at width {}: {} left, {} right returns",
                    speed,
                    width,
                    left,
                    right
                );
            }
        }
    }

    #[test]
    fn test_stalled_speeds_are_never_stored() {
        let mut config = Config::default();
        assert_eq!(config.playable_ball_speeds(), vec![1.0, 2.0, 5.0, 10.0]);
        for wanted in 1..=10 {
            let stored = config.set_setting(SettingKey::BallSpeed, wanted as f32);
            assert!(reaches_paddle_planes(800, stored as u32), "stored {}", stored);
        }
        assert_eq!(config.set_setting(SettingKey::BallSpeed, 4.0), 5.0);
        assert_eq!(config.set_setting(SettingKey::BallSpeed, 3.0), 2.0);
    }

    #[test]
    fn test_adjust_ball_speed_walks_playable_speeds() {
        let mut config = Config::default();
        assert_eq!(config.adjust_setting(SettingKey::BallSpeed, 1), 10.0);
        assert_eq!(config.adjust_setting(SettingKey::BallSpeed, 1), 10.0);
        assert_eq!(config.adjust_setting(SettingKey::BallSpeed, -1), 5.0);
        assert_eq!(config.adjust_setting(SettingKey::BallSpeed, -1), 2.0);
        assert_eq!(config.adjust_setting(SettingKey::BallSpeed, -1), 1.0);
        assert_eq!(config.adjust_setting(SettingKey::BallSpeed, -1), 1.0);
    }

    #[test]
    fn test_width_change_resnaps_ball_speed() {
        let mut config = Config::default();
        config.set_setting(SettingKey::BallSpeed, 2.0);
        // 810: centre 405 gives distances 375, 355 and 730
        config.set_setting(SettingKey::ScreenWidth, 810.0);
        assert_eq!(config.physics.ball_speed, 1.0);
        assert!(!reaches_paddle_planes(810, 2));
        assert!(reaches_paddle_planes(810, 5));
    }
}
