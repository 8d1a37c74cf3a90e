//! Paddle motion
//!
//! Holding the same direction accelerates the paddle; the result is clamped so
//! a paddle never leaves its own half of the table.

use glam::DVec2;

use super::state::{MoveHistory, Point, Side};
use crate::consts::*;
use crate::protocol::Move;

/// Displacement a move produces this turn (added to the position once).
///
/// `east` is toward the player's own back wall, `west` toward the net, so the
/// x-sign flips between players.
pub fn move_velocity(side: Side, position: Point, mv: Move, history: &MoveHistory) -> DVec2 {
    if mv == Move::None {
        return DVec2::ZERO;
    }

    let speed = PADDLE_BASE_SPEED + PADDLE_STREAK_BONUS * history.streak(mv) as f64;
    let advance = side.forward() * speed;

    let mut velocity = match mv {
        Move::North => DVec2::new(0.0, speed),
        Move::South => DVec2::new(0.0, -speed),
        Move::East => DVec2::new(-advance, 0.0),
        Move::West => DVec2::new(advance, 0.0),
        Move::None => DVec2::ZERO,
    };

    let (min_x, max_x) = side.x_limits();
    velocity.x = (position.x + velocity.x).clamp(min_x, max_x) - position.x;

    velocity
}
