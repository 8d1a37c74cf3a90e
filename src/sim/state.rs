//! Match state and core simulation types
//!
//! Everything a renderer needs to replay a turn lives in `State`.

use std::collections::VecDeque;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::protocol::Move;
use crate::settings::ServeTo;

/// A position in field units
pub type Point = DVec2;

/// Which paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    P1,
    P2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::P1, Side::P2];

    pub fn index(self) -> usize {
        match self {
            Side::P1 => 0,
            Side::P2 => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }

    /// Sign of the x-direction pointing from this side toward the opponent
    pub fn forward(self) -> f64 {
        match self {
            Side::P1 => 1.0,
            Side::P2 => -1.0,
        }
    }

    /// Allowed x-range for this side's paddle (min, max)
    pub fn x_limits(self) -> (f64, f64) {
        match self {
            Side::P1 => (-BACK_LIMIT, -NET_LIMIT),
            Side::P2 => (NET_LIMIT, BACK_LIMIT),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::P1 => "p1",
            Side::P2 => "p2",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last-bounce descriptor used to shape the rendered flight arc
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Horizontal contact point
    pub hit_x: f64,
    /// Height at contact
    pub hit_z: f64,
    /// Horizontal point the ball is aimed at
    pub land_x: f64,
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Distance travelled per turn (always > 0)
    pub speed: f64,
    /// Direction of travel (radians)
    pub angle: f64,
    pub position: Point,
    pub hit: Hit,
    /// Paddle contact point for the turn just resolved
    pub intercept: Option<Point>,
}

impl Ball {
    /// Displacement over one full turn
    pub fn velocity(&self) -> DVec2 {
        crate::polar_to_cartesian(self.speed, self.angle)
    }

    /// Advance in a straight line for a whole turn
    pub fn advance(&mut self) {
        self.position += self.velocity();
        self.intercept = None;
    }
}

/// A paddle and its owner's tally
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Point,
    pub wins: u32,
    pub last_move: Move,
}

impl Player {
    fn at(x: f64, y: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            wins: 0,
            last_move: Move::None,
        }
    }
}

/// Rendering-only marker sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub radius: f64,
    pub color: [f32; 3],
}

/// Complete match state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Turn counter
    pub index: u64,
    pub p1: Player,
    pub p2: Player,
    pub ball: Ball,
    /// Ball as it was at the instant of the most recent paddle hit
    pub last_ball: Option<Ball>,
    pub annotations: Vec<Annotation>,
}

impl State {
    /// Set up a serve. `serve_to` must already be resolved (not `Random`).
    pub fn serve(serve_to: ServeTo) -> Self {
        let mut hit = Hit {
            hit_x: -SERVE_HIT_X,
            hit_z: SERVE_HIT_Z,
            land_x: SERVE_HIT_X,
        };
        let mut angle = SERVE_ANGLE;

        if serve_to == ServeTo::East {
            angle += std::f64::consts::PI;
            hit.hit_x *= -1.0;
            hit.land_x *= -1.0;
        }

        Self {
            index: 0,
            p1: Player::at(P1_START_X, P1_START_Y),
            p2: Player::at(-P1_START_X, -P1_START_Y),
            ball: Ball {
                speed: BALL_START_SPEED,
                angle,
                position: DVec2::ZERO,
                hit,
                intercept: None,
            },
            last_ball: None,
            annotations: Vec::new(),
        }
    }

    pub fn player(&self, side: Side) -> &Player {
        match side {
            Side::P1 => &self.p1,
            Side::P2 => &self.p2,
        }
    }

    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        match side {
            Side::P1 => &mut self.p1,
            Side::P2 => &mut self.p2,
        }
    }
}

/// Trailing moves for one player (newest first)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: VecDeque<Move>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self {
            moves: VecDeque::with_capacity(MOVE_HISTORY_LEN + 1),
        }
    }

    /// Record a move, dropping the oldest beyond the cap
    pub fn push(&mut self, mv: Move) {
        self.moves.push_front(mv);
        self.moves.truncate(MOVE_HISTORY_LEN);
    }

    /// Number of leading entries equal to `mv`
    pub fn streak(&self, mv: Move) -> usize {
        self.moves
            .iter()
            .take(MOVE_HISTORY_LEN)
            .take_while(|&&m| m == mv)
            .count()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}

impl FromIterator<Move> for MoveHistory {
    /// Build from moves listed newest first
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut history = Self::new();
        for mv in iter.into_iter().take(MOVE_HISTORY_LEN) {
            history.moves.push_back(mv);
        }
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_west() {
        let state = State::serve(ServeTo::West);
        assert_eq!(state.index, 0);
        assert!((state.ball.angle - 0.3).abs() < 1e-12);
        assert_eq!(state.ball.hit.hit_x, -20.0);
        assert_eq!(state.ball.hit.land_x, 20.0);
        assert_eq!(state.p1.position, DVec2::new(-34.0, -10.0));
        assert_eq!(state.p2.position, DVec2::new(34.0, 10.0));
        assert!(state.last_ball.is_none());
    }

    #[test]
    fn test_serve_east_mirrors() {
        let state = State::serve(ServeTo::East);
        assert!((state.ball.angle - (0.3 + std::f64::consts::PI)).abs() < 1e-12);
        assert_eq!(state.ball.hit.hit_x, 20.0);
        assert_eq!(state.ball.hit.hit_z, 1.5);
        assert_eq!(state.ball.hit.land_x, -20.0);
        assert!(state.ball.velocity().x < 0.0);
    }

    #[test]
    fn test_history_caps_and_streak() {
        let mut history = MoveHistory::new();
        for _ in 0..6 {
            history.push(Move::North);
        }
        assert_eq!(history.len(), MOVE_HISTORY_LEN);
        assert_eq!(history.streak(Move::North), 4);

        history.push(Move::South);
        assert_eq!(history.streak(Move::South), 1);
        assert_eq!(history.streak(Move::North), 0);
        assert_eq!(history.iter().next(), Some(&Move::South));
    }

    #[test]
    fn test_side_limits() {
        assert_eq!(Side::P1.x_limits(), (-42.0, -23.6));
        assert_eq!(Side::P2.x_limits(), (23.6, 42.0));
        assert_eq!(Side::P1.opponent(), Side::P2);
        assert_eq!(Side::P2.forward(), -1.0);
    }
}
