use hex_core::{Action, Board, Player};

/// Transcript of a single finished game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    /// Board edge length N
    pub board_size: usize,
    /// Moves in play order, starting with A
    pub moves: Vec<Action>,
    /// Player who connected their edges
    pub winner: Player,
}

impl GameRecord {
    /// Create a new game record
    pub fn new(board_size: usize, moves: Vec<Action>, winner: Player) -> Self {
        Self {
            board_size,
            moves,
            winner,
        }
    }

    /// Get the number of moves in this game
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Check if the record is empty
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Replay the moves on an empty board
    pub fn replay(&self) -> hex_core::Result<Board> {
        Board::from_moves(self.board_size, &self.moves)
    }

    /// Replay and check that the game ends exactly on the last move with the recorded winner
    pub fn is_consistent(&self) -> bool {
        match self.replay() {
            Ok(board) => board.winner() == Some(self.winner),
            Err(_) => false,
        }
    }
}
