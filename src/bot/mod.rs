//! Move-producing agents
//!
//! The engine only knows the contract: hand a bot a payload string, get a
//! response string back. How the bot decides is its own business.

pub mod process;
pub mod scripted;

use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::sim::Side;

pub use process::ProcessBot;
pub use scripted::{ScriptedBot, Strategy};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BotError {
    #[error("failed to start {command:?}: {reason}")]
    Spawn { command: String, reason: String },

    #[error("i/o error: {0}")]
    Io(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("bot closed its output")]
    Closed,

    #[error("bot rejected payload: {0}")]
    Protocol(String),

    #[error("unknown bot {0:?}")]
    Unknown(String),
}

impl From<std::io::Error> for BotError {
    fn from(err: std::io::Error) -> Self {
        BotError::Io(err.to_string())
    }
}

/// A participant that answers one move request per turn
pub trait Bot: Send {
    /// Name for logs
    fn name(&self) -> &str;

    /// Respond to a request payload with a move token
    fn request_move<'a>(&'a mut self, payload: &'a str) -> BoxFuture<'a, Result<String, BotError>>;
}

/// Build a bot from a command-line style spec.
///
/// Built-in strategies are named directly (`boss-hard`); anything prefixed
/// with `cmd:` is spawned as a subprocess (`cmd:python3 bot.py`).
pub fn from_spec(
    spec: &str,
    side: Side,
    seed: u64,
    timeout: Duration,
) -> Result<Box<dyn Bot>, BotError> {
    if let Some(command) = spec.strip_prefix("cmd:") {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| BotError::Unknown(spec.to_string()))?;
        let args: Vec<String> = parts.map(str::to_string).collect();
        return Ok(Box::new(ProcessBot::spawn(program, &args, timeout)?));
    }

    let strategy = Strategy::from_str(spec).ok_or_else(|| BotError::Unknown(spec.to_string()))?;
    Ok(Box::new(ScriptedBot::new(strategy, side, seed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_spec() {
        let bot = from_spec("boss-medium", Side::P2, 1, Duration::from_millis(10)).unwrap();
        assert_eq!(bot.name(), "boss-medium");
    }

    #[test]
    fn test_unknown_spec() {
        let err = from_spec("grandmaster", Side::P1, 1, Duration::from_millis(10))
            .err()
            .unwrap();
        assert_eq!(err, BotError::Unknown("grandmaster".to_string()));

        let err = from_spec("cmd:", Side::P1, 1, Duration::from_millis(10))
            .err()
            .unwrap();
        assert_eq!(err, BotError::Unknown("cmd:".to_string()));
    }
}
