//! hex-selfplay - batch self-play transcript generator
//!
//! Plays a batch of Hex games between rollout MCTS engines, then writes the
//! transcripts as NPY arrays plus a JSON manifest.
//!
//! Every flag can also be set with a `HEX_` environment variable
//! (e.g. `HEX_BOARD_SIZE=9`); flags win over the environment.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use hex_core::Player;
use hex_selfplay::{run_games, save_transcripts, Opponent, SelfPlayConfig};
use tracing::{info, warn};

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OpponentArg {
    /// A second MCTS engine
    Mcts,
    /// Uniformly random legal moves
    Random,
}

impl From<OpponentArg> for Opponent {
    fn from(arg: OpponentArg) -> Self {
        match arg {
            OpponentArg::Mcts => Opponent::Mcts,
            OpponentArg::Random => Opponent::Random,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "hex-selfplay")]
#[command(about = "Generate Hex self-play transcripts with rollout MCTS")]
struct Args {
    /// Board edge length
    #[arg(long, env = "HEX_BOARD_SIZE", default_value_t = 11)]
    board_size: usize,

    /// MCTS playouts per move
    #[arg(long, env = "HEX_ITERATIONS", default_value_t = 1000)]
    iterations: u32,

    /// Number of games to play
    #[arg(long, env = "HEX_GAMES", default_value_t = 10)]
    games: usize,

    /// Worker threads (defaults to available parallelism)
    #[arg(long, env = "HEX_WORKERS", default_value_t = default_workers())]
    workers: usize,

    /// Base RNG seed
    #[arg(long, env = "HEX_SEED", default_value_t = 0)]
    seed: u64,

    /// UCB1 exploration constant
    #[arg(long, env = "HEX_EXPLORATION", default_value_t = std::f32::consts::SQRT_2)]
    exploration: f32,

    /// Extra attempts for a failed game
    #[arg(long, env = "HEX_MAX_RETRIES", default_value_t = 1)]
    max_retries: u32,

    /// Who plays the second seat
    #[arg(long, env = "HEX_OPPONENT", value_enum, default_value_t = OpponentArg::Mcts)]
    opponent: OpponentArg,

    /// Base path for output files (without extension)
    #[arg(long, env = "HEX_OUTPUT", default_value = "selfplay")]
    output: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HEX_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log progress every N games (0 to disable)
    #[arg(long, env = "HEX_LOG_INTERVAL", default_value_t = 10)]
    log_interval: usize,
}

impl Args {
    fn to_config(&self) -> SelfPlayConfig {
        SelfPlayConfig {
            board_size: self.board_size,
            iterations: self.iterations,
            exploration: self.exploration,
            game_count: self.games,
            worker_count: self.workers,
            seed: self.seed,
            max_retries: self.max_retries,
            opponent: self.opponent.into(),
            log_interval: self.log_interval,
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = args.to_config();
    config.validate()?;

    init_tracing(&args.log_level)?;
    info!(log_level = %args.log_level, output = %args.output, "Tracing initialized");

    let outcome = run_games(&config)?;

    for failure in &outcome.failures {
        warn!(
            game_index = failure.game_index,
            attempts = failure.attempts,
            error = %failure.error,
            "game dropped from batch"
        );
    }

    if outcome.records.is_empty() {
        bail!("all {} games failed; nothing to save", config.game_count);
    }

    save_transcripts(&outcome.records, &config, &args.output)?;
    info!(
        games = outcome.records.len(),
        path = %args.output,
        "transcripts saved"
    );

    println!(
        "{} games ({} failed), A wins {}, B wins {}, mean length {:.1}",
        outcome.records.len(),
        outcome.failures.len(),
        outcome.wins(Player::A),
        outcome.wins(Player::B),
        outcome.mean_length()
    );

    Ok(())
}
