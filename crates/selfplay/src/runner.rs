use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::unbounded;
use hex_core::Player;
use tracing::{info, trace, warn};

use crate::config::{game_seed, SelfPlayConfig};
use crate::data::GameRecord;
use crate::game::play_game;

/// A game that failed on every attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFailure {
    pub game_index: usize,
    /// Attempts made, including the first
    pub attempts: u32,
    /// Error (or panic message) from the final attempt
    pub error: String,
}

/// Everything a batch produced
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Finished games, ordered by game index
    pub records: Vec<GameRecord>,
    /// Games that could not be completed, ordered by game index
    pub failures: Vec<GameFailure>,
}

impl BatchOutcome {
    /// Number of finished games won by `player`
    pub fn wins(&self, player: Player) -> usize {
        self.records.iter().filter(|r| r.winner == player).count()
    }

    /// Mean number of plies over finished games
    pub fn mean_length(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let total: usize = self.records.iter().map(GameRecord::len).sum();
        total as f64 / self.records.len() as f64
    }
}

type GameOutcome = std::result::Result<GameRecord, GameFailure>;

/// Play `config.game_count` games on `config.worker_count` threads
///
/// Workers pull game indices from a shared queue. A game that errors or
/// panics is retried with a fresh seed up to `config.max_retries` times and
/// then reported in [`BatchOutcome::failures`]; the rest of the batch is
/// unaffected.
pub fn run_games(config: &SelfPlayConfig) -> Result<BatchOutcome> {
    run_games_with(config, play_game)
}

fn run_games_with<F>(config: &SelfPlayConfig, play: F) -> Result<BatchOutcome>
where
    F: Fn(&SelfPlayConfig, u64) -> Result<GameRecord> + Sync,
{
    config.validate()?;

    let total = config.game_count;
    let workers = config.worker_count.min(total);

    info!(
        games = total,
        workers,
        board_size = config.board_size,
        iterations = config.iterations,
        opponent = %config.opponent,
        seed = config.seed,
        "starting self-play batch"
    );

    let (job_tx, job_rx) = unbounded::<usize>();
    for index in 0..total {
        job_tx.send(index).context("failed to queue game")?;
    }
    drop(job_tx);

    let (result_tx, result_rx) = unbounded::<(usize, GameOutcome)>();
    let play = &play;

    let slots = thread::scope(|scope| {
        for worker_id in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for index in job_rx.iter() {
                    let outcome = play_with_retries(config, index, play);
                    if result_tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
                trace!(worker_id, "worker finished");
            });
        }
        drop(result_tx);

        let mut slots: Vec<Option<GameOutcome>> = (0..total).map(|_| None).collect();
        let mut completed = 0;
        for (index, outcome) in result_rx.iter() {
            slots[index] = Some(outcome);
            completed += 1;
            if config.log_interval > 0 && completed % config.log_interval == 0 {
                info!(completed, total, "self-play progress");
            }
        }
        slots
    });

    let mut outcome = BatchOutcome::default();
    for (index, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(Ok(record)) => outcome.records.push(record),
            Some(Err(failure)) => outcome.failures.push(failure),
            None => outcome.failures.push(GameFailure {
                game_index: index,
                attempts: 0,
                error: "worker exited before reporting".to_string(),
            }),
        }
    }

    info!(
        finished = outcome.records.len(),
        failed = outcome.failures.len(),
        a_wins = outcome.wins(Player::A),
        b_wins = outcome.wins(Player::B),
        mean_length = outcome.mean_length(),
        "self-play batch complete"
    );

    Ok(outcome)
}

fn play_with_retries<F>(config: &SelfPlayConfig, index: usize, play: &F) -> GameOutcome
where
    F: Fn(&SelfPlayConfig, u64) -> Result<GameRecord>,
{
    let attempts = config.max_retries.saturating_add(1);
    let mut last_error = String::new();

    for attempt in 0..attempts {
        let seed = game_seed(config.seed, index, attempt);
        let error = match panic::catch_unwind(AssertUnwindSafe(|| play(config, seed))) {
            Ok(Ok(record)) => return Ok(record),
            Ok(Err(err)) => format!("{err:#}"),
            Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
        };

        warn!(
            game_index = index,
            attempt = attempt + 1,
            attempts,
            seed,
            error = %error,
            "self-play game failed"
        );
        last_error = error;
    }

    Err(GameFailure {
        game_index: index,
        attempts,
        error: last_error,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
