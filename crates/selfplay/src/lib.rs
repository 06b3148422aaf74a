//! Self-play transcript generation for Hex
//!
//! This crate provides functionality for:
//! - Playing games between two rollout MCTS engines (or one engine and a random baseline)
//! - Running batches of games across worker threads with per-game retries
//! - Saving transcripts to NPY files with a JSON manifest, and loading them back
//!
//! # Example
//!
//! ```no_run
//! use hex_selfplay::{run_games, save_transcripts, Opponent, SelfPlayConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = SelfPlayConfig {
//!     board_size: 7,
//!     iterations: 500,
//!     game_count: 20,
//!     worker_count: 4,
//!     opponent: Opponent::Mcts,
//!     ..Default::default()
//! };
//!
//! // Play the batch
//! let outcome = run_games(&config)?;
//! println!("{} games finished, {} failed", outcome.records.len(), outcome.failures.len());
//!
//! // Save to files
//! save_transcripts(&outcome.records, &config, "selfplay_data")?;
//! # Ok(())
//! # }
//! ```

mod config;
mod data;
mod game;
mod runner;
pub mod storage;

// Re-export public API
pub use config::{Opponent, SelfPlayConfig};
pub use data::GameRecord;
pub use game::play_game;
pub use runner::{run_games, BatchOutcome, GameFailure};
pub use storage::{load_manifest, load_transcripts, save_transcripts, TranscriptManifest};
