use thiserror::Error;

use crate::board::{Action, Player};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board size must be at least 1, got {0}")]
    InvalidSize(usize),

    #[error("Action {action} is outside the {size}x{size} board")]
    OutOfBounds { action: Action, size: usize },

    #[error("Cell {action} is already occupied")]
    Occupied { action: Action },

    #[error("Player {got} cannot move, it is {expected}'s turn")]
    OutOfTurn { expected: Player, got: Player },

    #[error("Game is already over")]
    GameOver,
}

impl BoardError {
    /// True for errors caused by addressing a cell that cannot be played.
    pub fn is_illegal_move(&self) -> bool {
        matches!(
            self,
            BoardError::OutOfBounds { .. } | BoardError::Occupied { .. } | BoardError::OutOfTurn { .. }
        )
    }

    /// True when an operation needing legal moves was invoked on a finished game.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BoardError::GameOver)
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;
