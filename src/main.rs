//! Paddle Duel entry point
//!
//! Sets up two bots, plays a match and reports the score.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use paddle_duel::bot;
use paddle_duel::sim::Side;
use paddle_duel::{Match, MatchConfig, ServeTo};

#[derive(Parser)]
#[command(name = "paddle-duel")]
#[command(about = "Play a turn-based table tennis match between two bots", long_about = None)]
struct Cli {
    /// Match config JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// First bot: practice, boss-easy, boss-medium, boss-hard or cmd:<program> [args]
    #[arg(long, default_value = "boss-medium")]
    p1: String,

    /// Second bot, same choices as --p1
    #[arg(long, default_value = "boss-hard")]
    p2: String,

    /// RNG seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Serve direction: east, west or random (overrides the config)
    #[arg(long)]
    serve_to: Option<String>,

    /// Stop after this many turns even if nobody has won
    #[arg(long, default_value = "5000")]
    max_turns: u64,

    /// Print every snapshot as a JSON line
    #[arg(long, default_value = "false")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => MatchConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => MatchConfig::default(),
    };

    if let Some(serve_to) = &cli.serve_to {
        config.serve_to =
            ServeTo::from_str(serve_to).ok_or_else(|| anyhow!("unknown serve direction {serve_to:?}"))?;
    }

    // Fix the seed up front so the bots and the match share it
    let seed = cli.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);

    let timeout = Duration::from_millis(config.move_timeout_ms);
    let p1 = bot::from_spec(&cli.p1, Side::P1, seed.wrapping_add(1), timeout)
        .with_context(|| format!("starting p1 bot {:?}", cli.p1))?;
    let p2 = bot::from_spec(&cli.p2, Side::P2, seed.wrapping_add(2), timeout)
        .with_context(|| format!("starting p2 bot {:?}", cli.p2))?;

    log::info!("Paddle Duel starting: {}", config.summary());

    let json = cli.json;
    let mut game = Match::new(config, [p1, p2]);
    let result = game
        .play(cli.max_turns, |snapshot| {
            if json {
                let line = serde_json::json!({
                    "state": snapshot.state,
                    "outcome": snapshot.bot_outcomes(),
                });
                println!("{line}");
            }
        })
        .await;

    match result.winner {
        Some(winner) => log::info!(
            "{winner} wins {} - {} after {} turns",
            result.score[0],
            result.score[1],
            result.turns
        ),
        None => log::info!(
            "No winner after {} turns ({} - {})",
            result.turns,
            result.score[0],
            result.score[1]
        ),
    }

    if !json {
        println!("{}", serde_json::to_string(&result)?);
    }

    Ok(())
}
