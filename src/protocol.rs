//! Bot-facing wire format
//!
//! Requests are comma-separated decimals, responses are a single move token.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bot::BotError;
use crate::settings::MatchKind;
use crate::sim::{Point, Side, State};

/// A paddle move for one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    North,
    South,
    East,
    West,
    #[default]
    None,
}

impl Move {
    pub const ALL: [Move; 5] = [Move::North, Move::South, Move::East, Move::West, Move::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            Move::North => "north",
            Move::South => "south",
            Move::East => "east",
            Move::West => "west",
            Move::None => "none",
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a side produced no usable move this turn
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("move invalid: {0:?} (expected \"north\" \"south\" \"east\" \"west\" or \"none\")")]
    Invalid(String),

    #[error("bot failed: {0}")]
    Bot(#[from] BotError),
}

impl FromStr for Move {
    type Err = MoveError;

    /// Parse a bot response. Only the line terminator and surrounding
    /// whitespace are forgiven; tokens are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "north" => Ok(Move::North),
            "south" => Ok(Move::South),
            "east" => Ok(Move::East),
            "west" => Ok(Move::West),
            "none" => Ok(Move::None),
            _ => Err(MoveError::Invalid(s.to_string())),
        }
    }
}

/// Build the request payload a given side receives
pub fn encode_payload(state: &State, kind: MatchKind, side: Side) -> String {
    let values: Vec<f64> = match kind {
        MatchKind::Duel => vec![
            state.p1.position.x,
            state.p1.position.y,
            state.p2.position.x,
            state.p2.position.y,
            state.ball.position.x,
            state.ball.position.y,
        ],
        MatchKind::Practice => {
            let paddle = state.player(side).position;
            vec![
                paddle.x,
                paddle.y,
                state.ball.position.x,
                state.ball.position.y,
            ]
        }
    };

    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// A decoded payload as seen from one bot's side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadView {
    /// The receiving bot's own paddle
    pub paddle: Point,
    /// The opposing paddle (absent in practice payloads)
    pub opponent: Option<Point>,
    pub ball: Point,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("unexpected field count {0} (expected 4 or 6)")]
    FieldCount(usize),

    #[error("unexpected value {0:?}")]
    Value(String),
}

/// Decode a payload for the given side
pub fn decode_payload(payload: &str, side: Side) -> Result<PayloadView, PayloadError> {
    let values = payload
        .trim()
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| PayloadError::Value(part.to_string()))
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let point = |i: usize| Point::new(values[i], values[i + 1]);

    match values.len() {
        6 => {
            let (own, other) = match side {
                Side::P1 => (point(0), point(2)),
                Side::P2 => (point(2), point(0)),
            };
            Ok(PayloadView {
                paddle: own,
                opponent: Some(other),
                ball: point(4),
            })
        }
        4 => Ok(PayloadView {
            paddle: point(0),
            opponent: None,
            ball: point(2),
        }),
        n => Err(PayloadError::FieldCount(n)),
    }
}
