//! Match driver
//!
//! Queries both bots concurrently each turn, hands their moves to the
//! `TurnEngine` and yields the resulting snapshots. Nothing happens until a
//! turn is asked for.

use futures_util::Stream;
use futures_util::stream;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::bot::Bot;
use crate::protocol::{Move, MoveError, encode_payload};
use crate::settings::MatchConfig;
use crate::sim::{Side, Snapshot, State, TurnEngine, TurnOutcome};

/// Final result of `Match::play`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// First side to reach `points_to_win`, if anyone did
    pub winner: Option<Side>,
    /// Rallies won, p1 first
    pub score: [u32; 2],
    pub turns: u64,
}

pub struct Match {
    config: MatchConfig,
    engine: TurnEngine,
    bots: [Box<dyn Bot>; 2],
}

impl Match {
    pub fn new(config: MatchConfig, bots: [Box<dyn Bot>; 2]) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let serve_to = config.serve_to.resolve(&mut rng);

        log::info!(
            "Match {} vs {} (seed {seed}, {}, serving {})",
            bots[0].name(),
            bots[1].name(),
            config.kind.as_str(),
            serve_to.as_str()
        );

        Self {
            engine: TurnEngine::new(State::serve(serve_to), rng),
            config,
            bots,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn state(&self) -> &State {
        self.engine.state()
    }

    /// Request both moves, resolve the turn, return the new snapshot
    pub async fn next_turn(&mut self) -> Snapshot {
        let kind = self.config.kind;
        let payloads = Side::BOTH.map(|side| encode_payload(self.engine.state(), kind, side));

        let [p1, p2] = &mut self.bots;
        let (r1, r2) = tokio::join!(
            p1.request_move(&payloads[0]),
            p2.request_move(&payloads[1])
        );

        let moves = [r1, r2].map(|response| {
            response
                .map_err(MoveError::from)
                .and_then(|token| token.parse::<Move>())
        });

        self.engine.step(moves)
    }

    /// Serve again, keeping the score
    pub fn new_rally(&mut self) {
        let wins = Side::BOTH.map(|side| self.engine.state().player(side).wins);
        let serve_to = self.config.serve_to.resolve(self.engine.rng_mut());

        let mut state = State::serve(serve_to);
        for side in Side::BOTH {
            state.player_mut(side).wins = wins[side.index()];
        }

        log::info!("New rally, serving {}", serve_to.as_str());
        self.engine.reset(state);
    }

    /// Endless stream of snapshots; dropping it ends the match
    pub fn into_stream(self) -> impl Stream<Item = Snapshot> {
        stream::unfold(self, |mut game| async move {
            let snapshot = game.next_turn().await;
            Some((snapshot, game))
        })
    }

    /// Play rallies until a side reaches `points_to_win` or `max_turns` pass
    pub async fn play<F>(&mut self, max_turns: u64, mut on_turn: F) -> MatchResult
    where
        F: FnMut(&Snapshot),
    {
        let target = self.config.points_to_win.max(1);
        let mut turns = 0;

        while turns < max_turns {
            let snapshot = self.next_turn().await;
            turns += 1;
            on_turn(&snapshot);

            if let Some(TurnOutcome::Point { .. }) = snapshot.outcome {
                let wins = [snapshot.state.p1.wins, snapshot.state.p2.wins];
                if wins.iter().any(|&w| w >= target) {
                    break;
                }
                self.new_rally();
            }
        }

        let score = Side::BOTH.map(|side| self.engine.state().player(side).wins);
        let winner = Side::BOTH
            .into_iter()
            .find(|side| score[side.index()] >= target);

        MatchResult {
            winner,
            score,
            turns,
        }
    }
}
