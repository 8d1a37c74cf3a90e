//! Paddle Duel - a turn-based table tennis match between two bots
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collisions, paddle motion, turns)
//! - `protocol`: Bot-facing payloads and move tokens
//! - `bot`: Bot contract plus subprocess and scripted implementations
//! - `match_loop`: Async driver that queries bots and yields snapshots
//! - `settings`: Match configuration

pub mod bot;
pub mod match_loop;
pub mod protocol;
pub mod settings;
pub mod sim;

pub use match_loop::{Match, MatchResult};
pub use protocol::{Move, MoveError};
pub use settings::{MatchConfig, MatchKind, ServeTo};

use glam::DVec2;

/// Field and physics constants
pub mod consts {
    /// Back wall x-coordinate (paddles never go past ±BACK_LIMIT)
    pub const BACK_LIMIT: f64 = 42.0;
    /// Net boundary x-coordinate (paddles never cross ±NET_LIMIT)
    pub const NET_LIMIT: f64 = 23.6;
    /// Paddles closer than this to the centre line count as "near the net"
    pub const NEAR_NET: f64 = 24.0;

    /// Paddle face length
    pub const PADDLE_LENGTH: f64 = 5.5;
    /// Ball radius
    pub const BALL_RADIUS: f64 = 0.8;

    /// Ball defaults
    pub const BALL_START_SPEED: f64 = 10.0;
    pub const SERVE_ANGLE: f64 = 0.3;
    pub const SERVE_HIT_X: f64 = 20.0;
    pub const SERVE_HIT_Z: f64 = 1.5;

    /// Starting paddle positions (p2 mirrors p1)
    pub const P1_START_X: f64 = -34.0;
    pub const P1_START_Y: f64 = -10.0;

    /// Paddle speed: BASE + STREAK_BONUS per repeated move
    pub const PADDLE_BASE_SPEED: f64 = 1.5;
    pub const PADDLE_STREAK_BONUS: f64 = 2.0;
    /// Moves remembered per player (also the streak cap)
    pub const MOVE_HISTORY_LEN: usize = 4;

    /// Speed multiplier when the paddle is moving forward at contact
    pub const ATTACK_BOOST: f64 = 1.1;
    /// Speed multiplier for any other hit
    pub const BLOCK_BOOST: f64 = 1.02;

    /// Aim point x range (magnitude) on the opponent's half
    pub const AIM_X_MIN: f64 = 11.8;
    pub const AIM_X_SPAN: f64 = 11.8;
    /// Aim point y window and its widening factor
    pub const AIM_Y_WINDOW: f64 = 10.0;
    pub const AIM_Y_WIDEN: f64 = 1.4;

    /// A point is scored once the ball is past this x...
    pub const SCORE_LINE_X: f64 = 36.0;
    /// ...and this far behind the defending paddle
    pub const PASS_DISTANCE: f64 = 8.0;

    /// Height scale applied to the flight arc
    pub const Z_MULTIPLIER: f64 = 5.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}
