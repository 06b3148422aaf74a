//! Rollout Monte Carlo Tree Search for Hex
//!
//! The engine keeps its tree between decisions: after each search the two
//! moves actually played are followed down the tree and the surviving
//! subtree becomes the next root.

// Module declarations
mod backup;
mod config;
mod error;
mod expansion;
mod mcts;
mod rollout;
mod search_result;
mod selection;
mod tree;

// Public exports
pub use config::MctsConfig;
pub use error::{MctsError, Result};
pub use mcts::{Mcts, SearchPhase};
pub use rollout::{simulate, RolloutPolicy, UniformRollout};
pub use search_result::SearchResult;
pub use tree::{MctsNode, MctsTree, NodeId};
