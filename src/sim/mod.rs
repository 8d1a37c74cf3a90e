//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete turn per pair of moves
//! - Seeded RNG only
//! - Fixed resolution order (player 1 before player 2)
//! - No bot I/O

pub mod arc;
pub mod collision;
pub mod intercept;
pub mod state;
pub mod tick;
pub mod velocity;

pub use collision::{PaddleHit, resolve_paddle_hit};
pub use intercept::{Intercept, MovingCircle, MovingPoint, MovingSegment};
pub use state::{Annotation, Ball, Hit, MoveHistory, Player, Point, Side, State};
pub use tick::{BotOutcome, Snapshot, TurnEngine, TurnOutcome};
pub use velocity::move_velocity;
