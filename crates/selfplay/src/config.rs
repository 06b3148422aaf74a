use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use hex_mcts::MctsConfig;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// Who plays the second seat (B)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opponent {
    /// Another MCTS engine with the same settings
    Mcts,
    /// Uniformly random legal moves
    Random,
}

impl fmt::Display for Opponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opponent::Mcts => write!(f, "mcts"),
            Opponent::Random => write!(f, "random"),
        }
    }
}

impl FromStr for Opponent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mcts" => Ok(Opponent::Mcts),
            "random" => Ok(Opponent::Random),
            other => bail!("unknown opponent '{other}' (expected mcts or random)"),
        }
    }
}

/// Settings for a batch of self-play games
///
/// Serialized verbatim into the manifest written next to the transcripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfPlayConfig {
    /// Board edge length N
    pub board_size: usize,

    /// MCTS playouts per decision
    pub iterations: u32,

    /// UCB1 exploration constant
    pub exploration: f32,

    /// Number of games in the batch
    pub game_count: usize,

    /// Worker threads; games are distributed over them
    pub worker_count: usize,

    /// Base seed; game `i` derives its own from `seed + i`
    pub seed: u64,

    /// Extra attempts for a failed game before it is reported
    pub max_retries: u32,

    pub opponent: Opponent,

    /// Log progress every N completed games (0 to disable)
    pub log_interval: usize,
}

impl SelfPlayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.board_size == 0 {
            bail!("board_size must be greater than 0");
        }

        if self.iterations == 0 {
            bail!("iterations must be greater than 0");
        }

        if !self.exploration.is_finite() || self.exploration < 0.0 {
            bail!(
                "exploration must be a finite non-negative number, got {}",
                self.exploration
            );
        }

        if self.game_count == 0 {
            bail!("game_count must be greater than 0");
        }

        if self.worker_count == 0 {
            bail!("worker_count must be greater than 0");
        }

        Ok(())
    }

    /// Engine settings for one seat, seeded with `seed`
    pub fn mcts_config(&self, seed: u64) -> MctsConfig {
        MctsConfig::new()
            .with_iterations(self.iterations)
            .with_exploration(self.exploration)
            .with_seed(seed)
    }
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            board_size: 11,
            iterations: 1000,
            exploration: std::f32::consts::SQRT_2,
            game_count: 10,
            worker_count: 1,
            seed: 0,
            max_retries: 1,
            opponent: Opponent::Mcts,
            log_interval: 10,
        }
    }
}

/// Independent 64-bit seed for `stream` under `base`
pub(crate) fn derive_seed(base: u64, stream: u64) -> u64 {
    let mut rng = ChaCha20Rng::seed_from_u64(base);
    rng.set_stream(stream);
    rng.next_u64()
}

/// Seed for one attempt at game `index`
pub(crate) fn game_seed(base: u64, index: usize, attempt: u32) -> u64 {
    derive_seed(base.wrapping_add(index as u64), u64::from(attempt))
}
