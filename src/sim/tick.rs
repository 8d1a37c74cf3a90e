//! Turn resolution
//!
//! Advances the match by one turn once both moves are known. Bot I/O lives in
//! `match_loop`; everything here is synchronous and deterministic for a given
//! seed.

use glam::DVec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::first_paddle_hit;
use super::state::{MoveHistory, Side, State};
use super::velocity::move_velocity;
use crate::consts::*;
use crate::protocol::{Move, MoveError};

/// Per-bot result of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotOutcome {
    None,
    Error,
    Victory,
    Defeat,
}

/// Anything noteworthy that happened this turn
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// At least one side produced no usable move; physics was skipped.
    /// Indexed by `Side::index`.
    Fault { errors: [Option<MoveError>; 2] },
    /// The ball got past a paddle
    Point { winner: Side },
}

impl TurnOutcome {
    /// Outcome as seen by each bot, p1 first
    pub fn bot_outcomes(&self) -> [BotOutcome; 2] {
        match self {
            TurnOutcome::Fault { errors } => errors.each_ref().map(|error| match error {
                Some(_) => BotOutcome::Error,
                None => BotOutcome::None,
            }),
            TurnOutcome::Point { winner } => Side::BOTH.map(|side| {
                if side == *winner {
                    BotOutcome::Victory
                } else {
                    BotOutcome::Defeat
                }
            }),
        }
    }
}

/// State after a turn plus what happened in it
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: State,
    /// `None` for an ordinary continuing turn
    pub outcome: Option<TurnOutcome>,
}

impl Snapshot {
    pub fn bot_outcomes(&self) -> Option<[BotOutcome; 2]> {
        self.outcome.as_ref().map(TurnOutcome::bot_outcomes)
    }
}

/// Owns the match state, move histories and RNG; the only thing that mutates
/// `State`.
#[derive(Debug, Clone)]
pub struct TurnEngine {
    state: State,
    histories: [MoveHistory; 2],
    rng: Pcg32,
    /// Side already credited for the current rally
    scored: Option<Side>,
}

impl TurnEngine {
    pub fn new(state: State, rng: Pcg32) -> Self {
        Self {
            state,
            histories: [MoveHistory::new(), MoveHistory::new()],
            rng,
            scored: None,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn history(&self, side: Side) -> &MoveHistory {
        &self.histories[side.index()]
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Replace the state for a fresh rally; histories start over
    pub fn reset(&mut self, state: State) {
        self.state = state;
        self.histories.iter_mut().for_each(MoveHistory::clear);
        self.scored = None;
    }

    /// Resolve one turn from both sides' moves
    pub fn step(&mut self, moves: [Result<Move, MoveError>; 2]) -> Snapshot {
        self.state.index += 1;
        self.state.annotations.clear();

        let outcome = match moves {
            [Ok(p1), Ok(p2)] => {
                self.resolve([p1, p2]);
                self.check_point()
            }
            [p1, p2] => {
                let errors = [p1.err(), p2.err()];
                for side in Side::BOTH {
                    if let Some(error) = &errors[side.index()] {
                        log::warn!("turn {}: {side} {error}", self.state.index);
                    }
                }
                Some(TurnOutcome::Fault { errors })
            }
        };

        Snapshot {
            state: self.state.clone(),
            outcome,
        }
    }

    fn resolve(&mut self, moves: [Move; 2]) {
        let velocities: [DVec2; 2] = Side::BOTH.map(|side| {
            move_velocity(
                side,
                self.state.player(side).position,
                moves[side.index()],
                &self.histories[side.index()],
            )
        });

        match first_paddle_hit(&self.state, velocities, &mut self.rng) {
            Some(hit) => {
                self.state.last_ball = Some(self.state.ball);
                self.state.ball = hit.ball;
            }
            None => self.state.ball.advance(),
        }

        for side in Side::BOTH {
            let i = side.index();
            let player = self.state.player_mut(side);
            player.position += velocities[i];
            player.last_move = moves[i];
            self.histories[i].push(moves[i]);
        }
    }

    /// Has the ball got past a paddle, travelling away from it?
    fn check_point(&mut self) -> Option<TurnOutcome> {
        let ball = &self.state.ball;
        let heading = ball.angle.cos();
        let x = ball.position.x;

        let winner = if heading > 0.0
            && x > SCORE_LINE_X
            && x > self.state.p2.position.x + PASS_DISTANCE
        {
            Side::P1
        } else if heading < 0.0
            && x < -SCORE_LINE_X
            && x < self.state.p1.position.x - PASS_DISTANCE
        {
            Side::P2
        } else {
            return None;
        };

        if self.scored.is_none() {
            self.scored = Some(winner);
            let player = self.state.player_mut(winner);
            player.wins += 1;
            log::info!(
                "turn {}: point to {winner} ({} - {})",
                self.state.index,
                self.state.p1.wins,
                self.state.p2.wins
            );
        }

        Some(TurnOutcome::Point { winner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ServeTo;
    use crate::sim::Annotation;
    use rand::SeedableRng;

    fn engine(state: State) -> TurnEngine {
        TurnEngine::new(state, Pcg32::seed_from_u64(12345))
    }

    fn both(mv: Move) -> [Result<Move, MoveError>; 2] {
        [Ok(mv), Ok(mv)]
    }

    #[test]
    fn test_east_serve_flies_straight() {
        let mut engine = engine(State::serve(ServeTo::East));
        let before = engine.state().ball;
        assert!((before.angle - (0.3 + std::f64::consts::PI)).abs() < 1e-12);

        let snapshot = engine.step(both(Move::None));
        let ball = snapshot.state.ball;

        assert_eq!(snapshot.outcome, None);
        assert_eq!(snapshot.state.index, 1);
        assert!(ball.intercept.is_none());
        assert!(snapshot.state.last_ball.is_none());
        assert!((ball.position.x - before.speed * before.angle.cos()).abs() < 1e-12);
        assert!((ball.position.y - before.speed * before.angle.sin()).abs() < 1e-12);
        assert_eq!(ball.speed, before.speed);
    }

    #[test]
    fn test_point_to_p1() {
        let mut state = State::serve(ServeTo::West);
        state.ball.position = DVec2::new(40.0, 0.0);
        state.ball.angle = 0.1;
        state.p2.position = DVec2::new(24.0, 10.0);
        let mut engine = engine(state);

        let snapshot = engine.step(both(Move::None));
        assert_eq!(
            snapshot.bot_outcomes(),
            Some([BotOutcome::Victory, BotOutcome::Defeat])
        );
        assert_eq!(snapshot.state.p1.wins, 1);

        // Still past the paddle next turn: signalled again, credited once
        let snapshot = engine.step(both(Move::None));
        assert_eq!(snapshot.outcome, Some(TurnOutcome::Point { winner: Side::P1 }));
        assert_eq!(snapshot.state.p1.wins, 1);
    }

    #[test]
    fn test_point_to_p2() {
        let mut state = State::serve(ServeTo::East);
        state.ball.position = DVec2::new(-45.0, 3.0);
        state.p1.position = DVec2::new(-30.0, -10.0);
        let mut engine = engine(state);

        let snapshot = engine.step(both(Move::None));
        assert_eq!(
            snapshot.bot_outcomes(),
            Some([BotOutcome::Defeat, BotOutcome::Victory])
        );
        assert_eq!(snapshot.state.p2.wins, 1);
    }

    #[test]
    fn test_no_point_while_paddle_is_behind() {
        let mut state = State::serve(ServeTo::West);
        state.ball.position = DVec2::new(37.0, 30.0);
        state.ball.angle = 0.0;
        state.p2.position = DVec2::new(42.0, 0.0);
        let mut engine = engine(state);

        // 47 > 36 but not 8 past the paddle at 42
        let snapshot = engine.step(both(Move::None));
        assert_eq!(snapshot.outcome, None);
    }

    #[test]
    fn test_malformed_move_skips_physics() {
        let mut engine = engine(State::serve(ServeTo::West));
        let before = engine.state().clone();

        let error = "diagonal".parse::<Move>().unwrap_err();
        let snapshot = engine.step([Ok(Move::North), Err(error.clone())]);

        assert_eq!(snapshot.state.index, before.index + 1);
        assert_eq!(snapshot.state.p1, before.p1);
        assert_eq!(snapshot.state.p2, before.p2);
        assert_eq!(snapshot.state.ball, before.ball);
        assert_eq!(
            snapshot.outcome,
            Some(TurnOutcome::Fault {
                errors: [None, Some(error)]
            })
        );
        assert_eq!(
            snapshot.bot_outcomes(),
            Some([BotOutcome::None, BotOutcome::Error])
        );
        assert!(engine.history(Side::P1).is_empty());
    }

    #[test]
    fn test_fault_turn_resets_annotations() {
        let mut state = State::serve(ServeTo::West);
        state.annotations.push(Annotation {
            x: 1.0,
            y: 2.0,
            z: 0.0,
            radius: 0.5,
            color: [1.0, 0.0, 0.0],
        });
        let mut engine = engine(state);

        let snapshot = engine.step([Err(MoveError::Invalid("up".into())), Ok(Move::None)]);
        assert!(snapshot.state.annotations.is_empty());
    }

    #[test]
    fn test_both_sides_can_fault() {
        let mut engine = engine(State::serve(ServeTo::West));
        let snapshot = engine.step([
            Err(MoveError::Invalid("up".into())),
            Err(MoveError::Invalid("".into())),
        ]);
        assert_eq!(
            snapshot.bot_outcomes(),
            Some([BotOutcome::Error, BotOutcome::Error])
        );
    }

    #[test]
    fn test_moves_update_paddles_and_history() {
        let mut engine = engine(State::serve(ServeTo::West));
        engine.step([Ok(Move::North), Ok(Move::West)]);
        let snapshot = engine.step([Ok(Move::North), Ok(Move::West)]);

        // 1.5 then 3.5
        assert_eq!(snapshot.state.p1.position, DVec2::new(-34.0, -5.0));
        assert_eq!(snapshot.state.p2.position, DVec2::new(29.0, 10.0));
        assert_eq!(snapshot.state.p1.last_move, Move::North);
        assert_eq!(snapshot.state.p2.last_move, Move::West);
        assert_eq!(engine.history(Side::P2).streak(Move::West), 2);
    }

    #[test]
    fn test_hit_snapshots_last_ball() {
        let mut state = State::serve(ServeTo::East);
        state.ball.position = DVec2::new(-28.0, -10.0);
        state.ball.angle = std::f64::consts::PI;
        let mut engine = engine(state);
        let before = engine.state().ball;

        let snapshot = engine.step(both(Move::None));
        let ball = snapshot.state.ball;
        assert_eq!(snapshot.state.last_ball, Some(before));
        assert!(ball.intercept.is_some());
        assert!((ball.speed - before.speed * 1.02).abs() < 1e-9);
        assert!(ball.angle.cos() > 0.0);
    }

    #[test]
    fn test_rally_keeps_invariants() {
        let mut engine = engine(State::serve(ServeTo::East));
        let mut speed = engine.state().ball.speed;
        let mut index = engine.state().index;

        // p1 advances, p2 retreats; whatever happens the invariants hold
        let script = [Move::West, Move::North, Move::South, Move::East, Move::None];
        for turn in 0..200 {
            let mv = script[turn % script.len()];
            let snapshot = engine.step([Ok(mv), Ok(mv)]);
            let state = &snapshot.state;

            assert_eq!(state.index, index + 1);
            index = state.index;
            assert!(state.ball.speed >= speed);
            speed = state.ball.speed;

            assert!(state.p1.position.x >= -42.0 - 1e-9 && state.p1.position.x <= -23.6 + 1e-9);
            assert!(state.p2.position.x >= 23.6 - 1e-9 && state.p2.position.x <= 42.0 + 1e-9);
        }
    }

    #[test]
    fn test_same_seed_same_match() {
        let script = [Move::North, Move::North, Move::West, Move::South, Move::None];
        let run = || {
            let mut engine = engine(State::serve(ServeTo::West));
            let mut last = None;
            for turn in 0..60 {
                let mv = script[turn % script.len()];
                last = Some(engine.step([Ok(mv), Ok(Move::South)]));
            }
            last.unwrap().state
        };
        assert_eq!(run(), run());
    }
}
