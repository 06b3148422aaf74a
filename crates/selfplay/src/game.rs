use anyhow::{bail, Context, Result};
use hex_core::{Action, Board, Player};
use hex_mcts::{Mcts, RolloutPolicy, UniformRollout};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::config::{derive_seed, Opponent, SelfPlayConfig};
use crate::data::GameRecord;

/// One side of the board
enum Seat {
    /// Search engine that keeps its tree across turns
    Engine {
        mcts: Box<Mcts>,
        own_last: Option<Action>,
    },
    /// Random baseline
    Random {
        policy: UniformRollout,
        rng: ChaCha20Rng,
    },
}

impl Seat {
    fn engine(config: &SelfPlayConfig, seed: u64) -> Self {
        Seat::Engine {
            mcts: Box::new(Mcts::new(config.mcts_config(seed))),
            own_last: None,
        }
    }

    fn random(seed: u64) -> Self {
        Seat::Random {
            policy: UniformRollout::new(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Pick a move for the side to play on `board`
    ///
    /// `opponent_last` is the move played just before this turn, if any.
    fn decide(&mut self, board: &Board, opponent_last: Option<Action>) -> Result<Action> {
        match self {
            Seat::Engine { mcts, own_last } => {
                let result = match (*own_last, opponent_last) {
                    (Some(own), Some(reply)) => mcts.consume_action(own, reply)?,
                    _ => mcts.start(board)?,
                };

                // The reused tree has to sit exactly on the real position.
                if mcts.root_state() != Some(board) {
                    bail!("search root diverged from the game board");
                }

                *own_last = Some(result.best_move);
                Ok(result.best_move)
            }
            Seat::Random { policy, rng } => Ok(policy.choose(board, rng)?),
        }
    }
}

/// Play a single self-play game
///
/// Player A is always an MCTS engine; B is either a second engine or the
/// random baseline, per `config.opponent`. Both seats derive their own seed
/// from `seed`, so a game is fully reproducible.
///
/// # Returns
/// The move transcript and winner
pub fn play_game(config: &SelfPlayConfig, seed: u64) -> Result<GameRecord> {
    let mut board = Board::new(config.board_size)?;

    let second_seed = derive_seed(seed, Player::B.index() as u64);
    let mut seats = [
        Seat::engine(config, derive_seed(seed, Player::A.index() as u64)),
        match config.opponent {
            Opponent::Mcts => Seat::engine(config, second_seed),
            Opponent::Random => Seat::random(second_seed),
        },
    ];

    let mut moves: Vec<Action> = Vec::with_capacity(board.num_cells());

    while !board.is_done() {
        let player = board.active();
        let action = seats[player.index()]
            .decide(&board, moves.last().copied())
            .with_context(|| format!("player {player} failed to move at ply {}", moves.len()))?;

        board
            .play(action)
            .with_context(|| format!("player {player} chose illegal move {action}"))?;
        moves.push(action);
    }

    let winner = board
        .winner()
        .context("game ended without a winner")?;

    debug!(
        seed,
        plies = moves.len(),
        winner = %winner,
        "game finished"
    );

    Ok(GameRecord::new(config.board_size, moves, winner))
}
