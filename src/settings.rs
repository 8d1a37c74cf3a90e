//! Match configuration
//!
//! Read once at match start, from JSON or built in code.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which paddle receives the serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServeTo {
    East,
    West,
    #[default]
    Random,
}

impl ServeTo {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServeTo::East => "east",
            ServeTo::West => "west",
            ServeTo::Random => "random",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "east" => Some(ServeTo::East),
            "west" => Some(ServeTo::West),
            "random" => Some(ServeTo::Random),
            _ => None,
        }
    }

    /// Pick a concrete direction (coin flip for `Random`)
    pub fn resolve<R: Rng>(self, rng: &mut R) -> ServeTo {
        match self {
            ServeTo::Random => {
                if rng.random_bool(0.5) {
                    ServeTo::East
                } else {
                    ServeTo::West
                }
            }
            fixed => fixed,
        }
    }
}

/// Payload shape agreed for the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Both bots see both paddles and the ball (six fields)
    #[default]
    Duel,
    /// Each bot sees only its own paddle and the ball (four fields)
    Practice,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Duel => "duel",
            MatchKind::Practice => "practice",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "duel" => Some(MatchKind::Duel),
            "practice" => Some(MatchKind::Practice),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Serve direction
    pub serve_to: ServeTo,
    /// Payload shape sent to bots
    pub kind: MatchKind,
    /// RNG seed (random when absent)
    pub seed: Option<u64>,
    /// How long a bot may take to answer before its move counts as failed
    pub move_timeout_ms: u64,
    /// Rallies needed to win when running a full match
    pub points_to_win: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            serve_to: ServeTo::Random,
            kind: MatchKind::Duel,
            seed: None,
            move_timeout_ms: 1000,
            points_to_win: 5,
        }
    }
}

impl MatchConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config: {}", config.summary());
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// One-line description for logs and match listings
    pub fn summary(&self) -> String {
        format!("serve to {} paddle", self.serve_to.as_str())
    }
}
