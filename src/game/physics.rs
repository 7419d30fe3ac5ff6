use std::f32::consts::{FRAC_PI_2, PI};

use super::input::LocalInput;
use super::state::{GamePhase, GameState, Side, BALL_SIZE, LEFT_PADDLE_PLANE, PADDLE_HEIGHT};

// Steepest return angle, reached when the ball clips a paddle's edge
const MAX_BOUNCE_ANGLE: f32 = PI * 3.0 / 4.0;
const BALL_RADIUS: f32 = BALL_SIZE / 2.0;

/// What happened during one physics tick, for logging
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PhysicsEvents {
    pub phase_changed: bool,
    pub wall_bounce: bool,
    pub paddle_hit: Option<Side>,
    pub goal: Option<Side>,
    pub game_over: bool,
}

impl PhysicsEvents {
    pub fn any(&self) -> bool {
        self.phase_changed
            || self.wall_bounce
            || self.paddle_hit.is_some()
            || self.goal.is_some()
            || self.game_over
    }
}

/// Advance the authoritative state by one tick using the host's local input.
///
/// Phase transitions happen first (start, restart); the table only moves while
/// the phase is `Playing`.
pub fn update(state: &mut GameState, input: &LocalInput) -> PhysicsEvents {
    let mut events = PhysicsEvents::default();

    match state.phase {
        GamePhase::Start if input.start => {
            state.phase = GamePhase::Playing;
            events.phase_changed = true;
        }
        GamePhase::GameOver if input.restart => {
            state.reset_game();
            events.phase_changed = true;
        }
        _ => {}
    }

    if state.phase != GamePhase::Playing {
        return events;
    }

    state.server_paddle = move_paddle(
        state.server_paddle,
        input,
        state.paddle_speed,
        state.paddle_limit(),
    );

    step_ball(state, &mut events);
    events
}

/// Move a paddle by its speed for each held direction, keeping it on the table
pub fn move_paddle(position: f32, input: &LocalInput, speed: f32, limit: f32) -> f32 {
    let mut position = position;
    if input.up {
        position -= speed;
    }
    if input.down {
        position += speed;
    }
    position.clamp(0.0, limit)
}

fn step_ball(state: &mut GameState, events: &mut PhysicsEvents) {
    state.ball.x += state.ball.vx;
    state.ball.y += state.ball.vy;

    // Goals: the ball's centre leaving the table
    if state.ball.x < 0.0 {
        state.client_score = state.client_score.saturating_add(1);
        events.goal = Some(Side::Client);
        state.reset_ball();
    } else if state.ball.x > state.field_width {
        state.server_score = state.server_score.saturating_add(1);
        events.goal = Some(Side::Server);
        state.reset_ball();
    }

    if state.winner().is_some() {
        state.phase = GamePhase::GameOver;
        events.game_over = true;
        events.phase_changed = true;
    }

    // Walls reflect without losing energy
    if state.ball.y <= BALL_RADIUS {
        state.ball.vy = state.ball.vy.abs();
        events.wall_bounce = true;
    } else if state.ball.y >= state.field_height - 1.0 - BALL_RADIUS {
        state.ball.vy = -state.ball.vy.abs();
        events.wall_bounce = true;
    }

    check_paddle_collision(state, events);
}

// Discrete check: the ball must sit exactly on a paddle plane this tick.
// A ball whose x steps over the plane passes through; interval sweeps are not done.
fn check_paddle_collision(state: &mut GameState, events: &mut PhysicsEvents) {
    let server_paddle = state.server_paddle;
    if state.ball.x == LEFT_PADDLE_PLANE && within_paddle(server_paddle, state.ball.y) {
        state.ball.vx = state.ball.vx.abs();
        state.ball.vy = deflect(state, server_paddle);
        events.paddle_hit = Some(Side::Server);
    }

    let client_paddle = state.client_paddle;
    if state.ball.x == state.right_paddle_plane() && within_paddle(client_paddle, state.ball.y) {
        state.ball.vx = -state.ball.vx.abs();
        state.ball.vy = deflect(state, client_paddle);
        events.paddle_hit = Some(Side::Client);
    }
}

fn within_paddle(paddle_y: f32, ball_y: f32) -> bool {
    paddle_y <= ball_y && ball_y < paddle_y + PADDLE_HEIGHT
}

fn deflect(state: &mut GameState, paddle_y: f32) -> f32 {
    let angle = bounce_angle(paddle_y, state.ball.y);
    -angle.sin() * state.ball_speed + state.bounce_jitter()
}

/// Return angle for a hit at `ball_y` on a paddle whose top edge is `paddle_y`.
///
/// The impact offset is normalized to [-1, 1] around the paddle centre and
/// shaped by a sine curve, so centre hits go straight back and edge hits
/// deflect sharply.
pub fn bounce_angle(paddle_y: f32, ball_y: f32) -> f32 {
    let half = PADDLE_HEIGHT / 2.0;
    let normalized = (ball_y - paddle_y - half) / half;
    -(normalized * FRAC_PI_2).sin() * MAX_BOUNCE_ANGLE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PhysicsConfig, SessionParams};
    use crate::game::state::Ball;
    use assert_approx_eq::assert_approx_eq;

    fn playing_state(seed: u64) -> GameState {
        let params = SessionParams {
            paddle_speed: 8.0,
            screen_height: 600,
            screen_width: 800,
        };
        let mut state = GameState::with_seed(&params, &PhysicsConfig::default(), seed);
        state.phase = GamePhase::Playing;
        state
    }

    fn idle() -> LocalInput {
        LocalInput::default()
    }

    #[test]
    fn test_start_input_begins_play() {
        let mut state = playing_state(1);
        state.phase = GamePhase::Start;

        let events = update(&mut state, &idle());
        assert_eq!(state.phase, GamePhase::Start);
        assert!(!events.any());

        let start = LocalInput {
            start: true,
            ..LocalInput::default()
        };
        let events = update(&mut state, &start);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(events.phase_changed);
    }

    #[test]
    fn test_ball_frozen_outside_play() {
        let mut state = playing_state(1);
        state.phase = GamePhase::Start;
        let before = state.ball.clone();
        update(&mut state, &idle());
        assert_eq!(state.ball, before);
    }

    #[test]
    fn test_paddle_moves_and_clamps() {
        let mut state = playing_state(1);
        state.server_paddle = 4.0;
        let up = LocalInput {
            up: true,
            ..LocalInput::default()
        };
        update(&mut state, &up);
        assert_eq!(state.server_paddle, 0.0);

        state.server_paddle = 545.0;
        let down = LocalInput {
            down: true,
            ..LocalInput::default()
        };
        update(&mut state, &down);
        assert_eq!(state.server_paddle, 550.0);
    }

    #[test]
    fn test_ball_advances_by_velocity() {
        let mut state = playing_state(1);
        state.ball = Ball {
            x: 200.0,
            y: 200.0,
            vx: 5.0,
            vy: -5.0,
        };
        update(&mut state, &idle());
        assert_eq!((state.ball.x, state.ball.y), (205.0, 195.0));
    }

    #[test]
    fn test_left_exit_scores_for_client() {
        let mut state = playing_state(2);
        state.ball = Ball {
            x: 3.0,
            y: 200.0,
            vx: -5.0,
            vy: 5.0,
        };
        let events = update(&mut state, &idle());

        assert_eq!(state.client_score, 1);
        assert_eq!(state.server_score, 0);
        assert_eq!(events.goal, Some(Side::Client));
        assert_eq!((state.ball.x, state.ball.y), (400.0, 300.0));
        assert_eq!(state.ball.vx.abs(), 5.0);
        assert_eq!(state.ball.vy.abs(), 5.0);
    }

    #[test]
    fn test_right_exit_scores_for_server() {
        let mut state = playing_state(2);
        state.ball = Ball {
            x: 798.0,
            y: 200.0,
            vx: 5.0,
            vy: 5.0,
        };
        let events = update(&mut state, &idle());
        assert_eq!(state.server_score, 1);
        assert_eq!(events.goal, Some(Side::Server));
    }

    #[test]
    fn test_ball_on_edge_is_not_a_goal() {
        let mut state = playing_state(2);
        state.ball = Ball {
            x: 5.0,
            y: 200.0,
            vx: -5.0,
            vy: 5.0,
        };
        update(&mut state, &idle());
        assert_eq!(state.ball.x, 0.0);
        assert_eq!(state.client_score, 0);
    }

    #[test]
    fn test_game_over_exactly_once_at_ten() {
        let mut state = playing_state(4);
        state.client_score = 8;

        let mut transitions = 0;
        for _ in 0..3 {
            state.ball = Ball {
                x: 2.0,
                y: 200.0,
                vx: -5.0,
                vy: 5.0,
            };
            let events = update(&mut state, &idle());
            if events.game_over {
                transitions += 1;
            }
            if state.client_score == 9 {
                assert_eq!(state.phase, GamePhase::Playing);
            }
        }

        assert_eq!(state.client_score, 10);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(transitions, 1);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = playing_state(4);
        state.phase = GamePhase::GameOver;
        state.server_score = 10;

        update(&mut state, &idle());
        assert_eq!(state.phase, GamePhase::GameOver);

        let restart = LocalInput {
            restart: true,
            ..LocalInput::default()
        };
        let events = update(&mut state, &restart);
        assert!(events.phase_changed);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.server_score, 0);
    }

    #[test]
    fn test_top_wall_reflects() {
        let mut state = playing_state(5);
        state.ball = Ball {
            x: 200.0,
            y: 5.0,
            vx: 5.0,
            vy: -5.0,
        };
        let events = update(&mut state, &idle());
        assert_eq!(state.ball.y, 0.0);
        assert_eq!(state.ball.vy, 5.0);
        assert!(events.wall_bounce);
    }

    #[test]
    fn test_bottom_wall_reflects() {
        let mut state = playing_state(5);
        // 600 - 1 - 10 = 589
        state.ball = Ball {
            x: 200.0,
            y: 584.0,
            vx: 5.0,
            vy: 5.0,
        };
        let events = update(&mut state, &idle());
        assert_eq!(state.ball.y, 589.0);
        assert_eq!(state.ball.vy, -5.0);
        assert!(events.wall_bounce);
        // Speed magnitude is untouched
        assert_eq!(state.ball.vx, 5.0);
    }

    #[test]
    fn test_ball_still_in_wall_band_keeps_moving_out() {
        let mut state = playing_state(5);
        state.ball = Ball {
            x: 200.0,
            y: 3.0,
            vx: 5.0,
            vy: -5.0,
        };
        update(&mut state, &idle());
        assert_eq!((state.ball.y, state.ball.vy), (-2.0, 5.0));

        // y = 3 is still inside the band; the ball must not turn back into the wall
        let events = update(&mut state, &idle());
        assert_eq!((state.ball.y, state.ball.vy), (3.0, 5.0));
        assert!(events.wall_bounce);
    }

    #[test]
    fn test_no_reflection_inside_field() {
        let mut state = playing_state(5);
        state.ball = Ball {
            x: 200.0,
            y: 300.0,
            vx: 5.0,
            vy: 5.0,
        };
        let events = update(&mut state, &idle());
        assert_eq!(state.ball.vy, 5.0);
        assert!(!events.wall_bounce);
    }

    #[test]
    fn test_left_paddle_returns_ball() {
        let mut state = playing_state(6);
        state.server_paddle = 275.0;
        state.ball = Ball {
            x: 35.0,
            y: 295.0,
            vx: -5.0,
            vy: 5.0,
        };
        let events = update(&mut state, &idle());

        assert_eq!(events.paddle_hit, Some(Side::Server));
        assert_eq!(state.ball.vx, 5.0);
        // Centre hit: straight return plus jitter only
        assert!(state.ball.vy.abs() <= 1.0);
    }

    #[test]
    fn test_right_paddle_returns_ball() {
        let mut state = playing_state(6);
        state.client_paddle = 100.0;
        state.ball = Ball {
            x: 745.0,
            y: 105.0,
            vx: 5.0,
            vy: 5.0,
        };
        let events = update(&mut state, &idle());
        assert_eq!(events.paddle_hit, Some(Side::Client));
        assert_eq!(state.ball.vx, -5.0);
    }

    #[test]
    fn test_paddle_missed_when_plane_skipped() {
        let mut state = playing_state(6);
        state.server_paddle = 275.0;
        // x goes 33 -> 28, never exactly 30
        state.ball = Ball {
            x: 33.0,
            y: 300.0,
            vx: -5.0,
            vy: 0.0,
        };
        let events = update(&mut state, &idle());
        assert_eq!(events.paddle_hit, None);
        assert_eq!(state.ball.vx, -5.0);
    }

    #[test]
    fn test_paddle_extent_is_half_open() {
        let mut state = playing_state(6);
        state.server_paddle = 200.0;
        state.ball = Ball {
            x: 35.0,
            y: 250.0,
            vx: -5.0,
            vy: 0.0,
        };
        let events = update(&mut state, &idle());
        assert_eq!(events.paddle_hit, None);
    }

    #[test]
    fn test_bounce_angle_shape() {
        assert_approx_eq!(bounce_angle(100.0, 125.0), 0.0, 1e-6);
        assert_approx_eq!(bounce_angle(100.0, 100.0), MAX_BOUNCE_ANGLE, 1e-5);
        assert_approx_eq!(bounce_angle(100.0, 150.0), -MAX_BOUNCE_ANGLE, 1e-5);
        assert!(bounce_angle(100.0, 110.0) > 0.0);
    }

    #[test]
    fn test_edge_hit_deflects_upward() {
        let mut state = playing_state(8);
        state.server_paddle = 275.0;
        state.ball = Ball {
            x: 35.0,
            y: 280.0,
            vx: -5.0,
            vy: 5.0,
        };
        update(&mut state, &idle());
        // Ball ends the tick at y = 285, in the paddle's upper half
        let expected = -bounce_angle(275.0, 285.0).sin() * 5.0;
        assert!(expected < -1.0);
        assert!((state.ball.vy - expected).abs() <= 1.0);
    }

    #[test]
    fn test_seeded_runs_are_deterministic() {
        let inputs: Vec<LocalInput> = (0..600)
            .map(|i| LocalInput {
                up: i % 7 == 0,
                down: i % 5 == 0,
                start: i == 0,
                restart: i % 97 == 0,
                quit: false,
            })
            .collect();

        let run = |seed| {
            let mut state = playing_state(seed);
            state.phase = GamePhase::Start;
            let mut trace = Vec::new();
            for input in &inputs {
                update(&mut state, input);
                trace.push((
                    state.ball.x,
                    state.ball.y,
                    state.server_score,
                    state.client_score,
                ));
            }
            trace
        };

        assert_eq!(run(42), run(42));
    }
}
