use hex_core::{Action, Board, BoardError, Cell, Player};
use rand::Rng;

use crate::error::{MctsError, Result};

/// Move choice used during the simulation phase
///
/// Implementations must only ever return an empty cell of a non-terminal
/// board, and must report `BoardError::GameOver` on a finished one.
pub trait RolloutPolicy {
    fn choose<R: Rng + ?Sized>(&self, state: &Board, rng: &mut R) -> std::result::Result<Action, BoardError>;
}

/// Uniformly random choice among the empty cells
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRollout;

impl UniformRollout {
    pub fn new() -> Self {
        Self
    }
}

impl RolloutPolicy for UniformRollout {
    fn choose<R: Rng + ?Sized>(&self, state: &Board, rng: &mut R) -> std::result::Result<Action, BoardError> {
        if state.is_done() {
            return Err(BoardError::GameOver);
        }

        // Pick the k-th empty cell without building the full legal move list.
        let k = rng.gen_range(0..state.empty_count());
        state
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Empty)
            .nth(k)
            .map(|(idx, _)| idx)
            .ok_or(BoardError::GameOver)
    }
}

/// Play `state` out to the end with `policy` and return the winner
///
/// Works on a private copy; no tree nodes are created.
pub fn simulate<P, R>(state: &Board, policy: &P, rng: &mut R) -> Result<Player>
where
    P: RolloutPolicy,
    R: Rng + ?Sized,
{
    if let Some(winner) = state.winner() {
        return Ok(winner);
    }

    let mut board = state.clone();
    loop {
        let action = policy.choose(&board, rng)?;
        board.play(action)?;
        if let Some(winner) = board.winner() {
            return Ok(winner);
        }
        if board.empty_count() == 0 {
            // A filled Hex board always has a winner.
            return Err(MctsError::Board(BoardError::GameOver));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_uniform_choice_is_always_empty() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let board = Board::from_moves(3, &[0, 4, 8]).unwrap();
        let policy = UniformRollout::new();

        for _ in 0..200 {
            let action = policy.choose(&board, &mut rng).unwrap();
            assert_eq!(board.cell(action), Some(Cell::Empty));
        }
    }

    #[test]
    fn test_uniform_choice_covers_all_empty_cells() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let board = Board::from_moves(3, &[0, 4]).unwrap();
        let policy = UniformRollout::new();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(policy.choose(&board, &mut rng).unwrap());
        }
        let expected: std::collections::HashSet<_> =
            board.legal_actions().unwrap().into_iter().collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_uniform_choice_on_finished_board() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let board = Board::new(1).unwrap().apply_move(0, Player::A).unwrap();
        assert_eq!(
            UniformRollout.choose(&board, &mut rng).unwrap_err(),
            BoardError::GameOver
        );
    }

    #[test]
    fn test_simulate_terminal_returns_winner() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let board = Board::from_moves(3, &[1, 0, 4, 3, 7]).unwrap();
        assert_eq!(
            simulate(&board, &UniformRollout, &mut rng).unwrap(),
            Player::A
        );
    }

    #[test]
    fn test_simulate_leaves_input_untouched() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let board = Board::from_moves(5, &[12]).unwrap();
        let before = board.clone();

        for _ in 0..20 {
            simulate(&board, &UniformRollout, &mut rng).unwrap();
        }
        assert_eq!(board, before);
    }

    /// Always takes the lowest empty cell
    struct LowestEmpty;

    impl RolloutPolicy for LowestEmpty {
        fn choose<R: Rng + ?Sized>(&self, state: &Board, _rng: &mut R) -> std::result::Result<Action, BoardError> {
            state
                .legal_actions()?
                .first()
                .copied()
                .ok_or(BoardError::GameOver)
        }
    }

    #[test]
    fn test_simulate_with_custom_policy() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        // A takes 0, 2, 4, 6 and links (0,2)-(1,1)-(2,0).
        assert_eq!(
            simulate(&Board::new(3).unwrap(), &LowestEmpty, &mut rng).unwrap(),
            Player::A
        );
    }

    #[test]
    fn test_simulate_is_reproducible_with_seed() {
        let board = Board::new(6).unwrap();
        let run = |seed| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            (0..30)
                .map(|_| simulate(&board, &UniformRollout, &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
    }
}
