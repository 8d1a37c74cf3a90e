//! Built-in opponents
//!
//! Simple heuristics that speak the same payload protocol as external bots.
//! Directions are relative to the bot's own side: `west` heads for the net,
//! `east` backs off toward the bot's own wall.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Bot, BotError};
use crate::protocol::{Move, PayloadView, decode_payload};
use crate::sim::Side;

const ADVANCE: Move = Move::West;
const RETREAT: Move = Move::East;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Tracks the ball, then starts flailing once it has returned a shot
    Practice,
    /// Tracks the ball's height, nothing else
    BossEasy,
    /// Steps in on incoming balls, recentres and backs off otherwise
    BossMedium,
    /// Tracks tightly and keeps its distance from the opponent
    BossHard,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Practice,
        Strategy::BossEasy,
        Strategy::BossMedium,
        Strategy::BossHard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Practice => "practice",
            Strategy::BossEasy => "boss-easy",
            Strategy::BossMedium => "boss-medium",
            Strategy::BossHard => "boss-hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s.to_lowercase())
    }
}

/// Move toward the ball's height, holding still inside `tolerance`
fn track(paddle_y: f64, ball_y: f64, tolerance: f64) -> Move {
    if (ball_y - paddle_y).abs() < tolerance {
        Move::None
    } else if ball_y < paddle_y {
        Move::South
    } else {
        Move::North
    }
}

/// Drift back toward y = 0
fn recentre(paddle_y: f64) -> Move {
    if paddle_y > 0.0 { Move::South } else { Move::North }
}

pub struct ScriptedBot {
    strategy: Strategy,
    side: Side,
    rng: Pcg32,
    last_ball_x: f64,
    was_incoming: bool,
    has_returned: bool,
}

impl ScriptedBot {
    pub fn new(strategy: Strategy, side: Side, seed: u64) -> Self {
        Self {
            strategy,
            side,
            rng: Pcg32::seed_from_u64(seed),
            last_ball_x: 0.0,
            was_incoming: false,
            has_returned: false,
        }
    }

    /// Decide a move from a request payload
    pub fn decide(&mut self, payload: &str) -> Result<Move, BotError> {
        let view =
            decode_payload(payload, self.side).map_err(|e| BotError::Protocol(e.to_string()))?;

        // Ball moving toward our back wall since last turn?
        let incoming = (view.ball.x - self.last_ball_x) * self.side.forward() < 0.0;
        if !incoming && self.was_incoming {
            self.has_returned = true;
        }

        let mv = self.choose(&view, incoming);

        self.was_incoming = incoming;
        self.last_ball_x = view.ball.x;

        Ok(mv)
    }

    fn choose(&mut self, view: &PayloadView, incoming: bool) -> Move {
        let paddle = view.paddle;
        let ball = view.ball;

        match self.strategy {
            Strategy::Practice => {
                if self.has_returned && self.rng.random_bool(0.5) {
                    let wild = [Move::South, Move::North, Move::East, Move::West];
                    *wild.choose(&mut self.rng).unwrap_or(&Move::None)
                } else {
                    track(paddle.y, ball.y, 2.0)
                }
            }
            Strategy::BossEasy => track(paddle.y, ball.y, 2.0),
            Strategy::BossMedium => {
                if incoming {
                    if (paddle.y - ball.y).abs() < 1.0 {
                        if paddle.x.abs() > 5.0 { ADVANCE } else { Move::None }
                    } else {
                        track(paddle.y, ball.y, 0.0)
                    }
                } else if paddle.y.abs() > 2.0 {
                    recentre(paddle.y)
                } else if paddle.x.abs() < 40.0 {
                    RETREAT
                } else {
                    Move::None
                }
            }
            Strategy::BossHard => {
                if incoming {
                    track(paddle.y, ball.y, 1.0)
                } else if paddle.x.abs() > 10.0
                    && view
                        .opponent
                        .is_some_and(|other| (paddle.x - other.x).abs() > 30.0)
                {
                    ADVANCE
                } else if paddle.y.abs() > 2.0 {
                    recentre(paddle.y)
                } else {
                    Move::None
                }
            }
        }
    }
}

impl Bot for ScriptedBot {
    fn name(&self) -> &str {
        self.strategy.as_str()
    }

    fn request_move<'a>(&'a mut self, payload: &'a str) -> BoxFuture<'a, Result<String, BotError>> {
        let response = self.decide(payload).map(|mv| mv.as_str().to_string());
        async move { response }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names() {
        for strategy in Strategy::ALL {
            assert_eq!(Strategy::from_str(strategy.as_str()), Some(strategy));
        }
        assert_eq!(Strategy::from_str("Boss-Hard"), Some(Strategy::BossHard));
        assert_eq!(Strategy::from_str("boss"), None);
    }

    #[test]
    fn test_easy_tracks_ball() {
        let mut bot = ScriptedBot::new(Strategy::BossEasy, Side::P1, 0);
        assert_eq!(bot.decide("-34,-10,34,10,0,0").unwrap(), Move::North);
        assert_eq!(bot.decide("-34,-10,34,10,-5,-20").unwrap(), Move::South);
        assert_eq!(bot.decide("-34,-10,34,10,-8,-9").unwrap(), Move::None);
    }

    #[test]
    fn test_reads_own_paddle_from_duel_payload() {
        let mut bot = ScriptedBot::new(Strategy::BossEasy, Side::P2, 0);
        // p2 sits at y=10, ball well below it
        assert_eq!(bot.decide("-34,-10,34,10,0,0").unwrap(), Move::South);
    }

    #[test]
    fn test_practice_payload() {
        let mut bot = ScriptedBot::new(Strategy::BossHard, Side::P2, 0);
        // Four fields: own paddle and ball only
        assert_eq!(bot.decide("34,10,5,20").unwrap(), Move::North);
    }

    #[test]
    fn test_medium_steps_in_when_aligned() {
        let mut bot = ScriptedBot::new(Strategy::BossMedium, Side::P1, 0);
        bot.decide("-34,0,34,0,0,0").unwrap();
        // Ball now heading toward p1 and level with the paddle
        assert_eq!(bot.decide("-34,0,34,0,-5,0.5").unwrap(), ADVANCE);
    }

    #[test]
    fn test_medium_backs_off_when_ball_leaves() {
        let mut bot = ScriptedBot::new(Strategy::BossMedium, Side::P2, 0);
        bot.decide("-34,0,30,1,5,0").unwrap();
        // Ball moving away from p2 (toward -x), paddle centred
        assert_eq!(bot.decide("-34,0,30,1,0,0").unwrap(), RETREAT);
    }

    #[test]
    fn test_hard_closes_distance() {
        let mut bot = ScriptedBot::new(Strategy::BossHard, Side::P1, 0);
        bot.decide("-40,0,34,0,-5,0").unwrap();
        // Ball receding, 74 units from the opponent
        assert_eq!(bot.decide("-40,0,34,0,0,0").unwrap(), ADVANCE);
    }

    #[test]
    fn test_rejects_bad_payload() {
        let mut bot = ScriptedBot::new(Strategy::Practice, Side::P1, 0);
        assert!(matches!(bot.decide("hello"), Err(BotError::Protocol(_))));
    }

    #[test]
    fn test_practice_only_tracks_before_first_return() {
        let mut bot = ScriptedBot::new(Strategy::Practice, Side::P1, 3);
        // Ball keeps coming at p1: no return yet, so pure tracking
        for step in 0..20 {
            let x = -(step as f64);
            let payload = format!("-34,0,34,0,{x},10");
            assert_eq!(bot.decide(&payload).unwrap(), Move::North);
        }
    }
}
