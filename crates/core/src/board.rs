use std::fmt;

use crate::connectivity::Connectivity;
use crate::error::{BoardError, Result};

/// Row-major cell index, `row * size + col`.
pub type Action = usize;

/// One of the two sides.
///
/// `A` moves first and connects the top and bottom rows.
/// `B` connects the left and right columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    A,
    B,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// 0 for A, 1 for B.
    pub fn index(self) -> usize {
        match self {
            Player::A => 0,
            Player::B => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::A => write!(f, "A"),
            Player::B => write!(f, "B"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Stone(Player),
}

/// An N×N Hex position.
///
/// Moves through [`Board::apply_move`] return a new board and leave the
/// receiver untouched. [`Board::play`] mutates in place and is meant for
/// scratch copies such as rollouts.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
    active: Player,
    winner: Option<Player>,
    empty: usize,
    links: Connectivity,
}

impl Board {
    /// Empty board with player A to move.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(BoardError::InvalidSize(size));
        }

        Ok(Self {
            size,
            cells: vec![Cell::Empty; size * size],
            active: Player::A,
            winner: None,
            empty: size * size,
            links: Connectivity::new(size),
        })
    }

    /// Replay a transcript from the empty board.
    pub fn from_moves(size: usize, moves: &[Action]) -> Result<Self> {
        let mut board = Self::new(size)?;
        for &action in moves {
            board.play(action)?;
        }
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells, also the number of distinct actions.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, action: Action) -> Option<Cell> {
        self.cells.get(action).copied()
    }

    /// Player who moves next.
    pub fn active(&self) -> Player {
        self.active
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_done(&self) -> bool {
        self.winner.is_some()
    }

    pub fn empty_count(&self) -> usize {
        self.empty
    }

    pub fn index(&self, row: usize, col: usize) -> Action {
        row * self.size + col
    }

    pub fn coords(&self, action: Action) -> (usize, usize) {
        (action / self.size, action % self.size)
    }

    /// Every empty cell, in ascending index order.
    pub fn legal_actions(&self) -> Result<Vec<Action>> {
        if self.is_done() {
            return Err(BoardError::GameOver);
        }

        Ok(self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Empty)
            .map(|(idx, _)| idx)
            .collect())
    }

    /// Successor position after `player` takes `action`.
    pub fn apply_move(&self, action: Action, player: Player) -> Result<Self> {
        if player != self.active && !self.is_done() {
            return Err(BoardError::OutOfTurn {
                expected: self.active,
                got: player,
            });
        }

        let mut next = self.clone();
        next.play(action)?;
        Ok(next)
    }

    /// Place a stone for the active player in place.
    pub fn play(&mut self, action: Action) -> Result<()> {
        if self.is_done() {
            return Err(BoardError::GameOver);
        }
        if action >= self.cells.len() {
            return Err(BoardError::OutOfBounds {
                action,
                size: self.size,
            });
        }
        if self.cells[action] != Cell::Empty {
            return Err(BoardError::Occupied { action });
        }

        let player = self.active;
        self.cells[action] = Cell::Stone(player);
        self.empty -= 1;

        let cells = &self.cells;
        let won = self
            .links
            .connect(action, player, |n| cells[n] == Cell::Stone(player));

        if won {
            self.winner = Some(player);
        }
        self.active = player.opponent();

        Ok(())
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.active == other.active
            && self.winner == other.winner
            && self.cells == other.cells
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            write!(f, "{}", " ".repeat(row))?;
            for col in 0..self.size {
                let symbol = match self.cells[self.index(row, col)] {
                    Cell::Empty => '.',
                    Cell::Stone(Player::A) => 'A',
                    Cell::Stone(Player::B) => 'B',
                };
                write!(f, "{symbol} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
