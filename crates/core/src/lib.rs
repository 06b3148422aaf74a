//! Hex board state for self-play search.
//!
//! - [`Board`]: N×N position, active player and winner
//! - [`Connectivity`]: union-find win detection, updated per stone
//! - [`BoardError`]: illegal-move and finished-game errors

mod board;
mod connectivity;
mod error;

pub use board::{Action, Board, Cell, Player};
pub use connectivity::{neighbors, Connectivity, HEX_NEIGHBORS};
pub use error::{BoardError, Result};
