use hex_core::{Action, Board};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace};

use crate::backup::backup;
use crate::config::MctsConfig;
use crate::error::{MctsError, Result};
use crate::expansion::{expand, expand_action};
use crate::rollout::{simulate, RolloutPolicy, UniformRollout};
use crate::search_result::SearchResult;
use crate::selection::select;
use crate::tree::{MctsNode, MctsTree, NodeId};

/// Where the engine is in its decide/advance cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// No tree yet; only `start` is accepted
    Idle,
    /// Running playouts
    Searching,
    /// A decision is available and the tree can be advanced
    Decided,
}

/// Rollout Monte Carlo Tree Search for one side of a Hex game
///
/// One instance lives for a whole game. The first decision comes from
/// [`Mcts::start`]; later ones from [`Mcts::consume_action`], which follows
/// the two real moves down the existing tree instead of starting over.
pub struct Mcts<P: RolloutPolicy = UniformRollout> {
    config: MctsConfig,
    policy: P,
    tree: MctsTree,
    rng: ChaCha20Rng,
    phase: SearchPhase,
}

impl Mcts<UniformRollout> {
    /// Create an engine with uniform random rollouts
    pub fn new(config: MctsConfig) -> Self {
        Self::with_policy(config, UniformRollout)
    }
}

impl<P: RolloutPolicy> Mcts<P> {
    /// Create an engine with a custom rollout policy
    pub fn with_policy(config: MctsConfig, policy: P) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(config.seed);
        Self {
            config,
            policy,
            tree: MctsTree::new(),
            rng,
            phase: SearchPhase::Idle,
        }
    }

    /// Search a fresh tree rooted at `board`
    ///
    /// The RNG is reseeded from the config, so identical boards give
    /// identical decisions and root statistics.
    pub fn start(&mut self, board: &Board) -> Result<SearchResult> {
        if board.is_done() {
            return Err(MctsError::TerminalPosition);
        }

        self.rng = ChaCha20Rng::seed_from_u64(self.config.seed);
        self.tree.initialize_root(board.clone());
        self.run_search()
    }

    /// Follow our own move and the opponent's reply, then search again
    ///
    /// Both actions are checked before the tree is touched, so an illegal
    /// action or a game that would end leaves the engine as it was. An
    /// opponent move that was never explored is expanded on the spot.
    pub fn consume_action(
        &mut self,
        self_action: Action,
        opponent_action: Action,
    ) -> Result<SearchResult> {
        if self.phase == SearchPhase::Idle {
            return Err(MctsError::NotStarted);
        }
        let root_state = self.root_state().ok_or(MctsError::NotStarted)?;
        if root_state.is_done() {
            return Err(MctsError::TerminalRoot);
        }

        let after_self = root_state
            .apply_move(self_action, root_state.active())
            .map_err(|source| MctsError::IllegalTransition {
                action: self_action,
                source,
            })?;
        if after_self.is_done() {
            return Err(MctsError::TerminalRoot);
        }
        let after_opponent = after_self
            .apply_move(opponent_action, after_self.active())
            .map_err(|source| MctsError::IllegalTransition {
                action: opponent_action,
                source,
            })?;
        if after_opponent.is_done() {
            return Err(MctsError::TerminalRoot);
        }

        self.advance(self_action)?;
        self.advance(opponent_action)?;
        self.run_search()
    }

    /// Move the root one ply down along `action`, discarding the rest
    pub fn advance(&mut self, action: Action) -> Result<()> {
        if self.phase == SearchPhase::Idle || self.tree.size() == 0 {
            return Err(MctsError::NotStarted);
        }

        let root_id = self.tree.root_id;
        let child_id = expand_action(&mut self.tree, root_id, action)?;
        let before = self.tree.size();
        self.tree.reroot(child_id);

        trace!(
            action,
            kept = self.tree.size(),
            dropped = before - self.tree.size(),
            "advanced search root"
        );
        Ok(())
    }

    fn run_search(&mut self) -> Result<SearchResult> {
        self.phase = SearchPhase::Searching;
        let root_id = self.tree.root_id;
        let iterations = self.config.iterations.max(1);

        for _ in 0..iterations {
            if let Err(err) = self.playout(root_id) {
                self.phase = SearchPhase::Idle;
                return Err(err);
            }
        }

        let result = self.create_search_result(root_id, iterations)?;
        self.phase = SearchPhase::Decided;

        debug!(
            best_move = result.best_move,
            visits = result.visit_count_for_move(result.best_move),
            root_value = result.root_value,
            iterations,
            tree_size = result.tree_size,
            "search decided"
        );
        Ok(result)
    }

    /// One select/expand/simulate/backup pass; returns the node it backed up from
    fn playout(&mut self, root_id: NodeId) -> Result<NodeId> {
        let selected = select(&self.tree, root_id, self.config.exploration);
        let leaf_id = expand(&mut self.tree, selected)?;
        let winner = simulate(&self.tree.nodes[leaf_id].state, &self.policy, &mut self.rng)?;
        backup(&mut self.tree, leaf_id, winner);
        Ok(leaf_id)
    }

    /// Robust-child decision from root statistics
    fn create_search_result(&self, root_id: NodeId, iterations: u32) -> Result<SearchResult> {
        let root = &self.tree.nodes[root_id];

        let mut root_visit_counts: Vec<(Action, u32)> = root
            .children
            .iter()
            .map(|&(action, id)| (action, self.tree.nodes[id].visit_count))
            .collect();
        root_visit_counts.sort_unstable_by_key(|(action, _)| *action);

        let best_move = root_visit_counts
            .iter()
            .max_by(|(a1, v1), (a2, v2)| v1.cmp(v2).then(a2.cmp(a1)))
            .map(|(action, _)| *action)
            .ok_or(MctsError::TerminalPosition)?;

        Ok(SearchResult::new(
            best_move,
            root.mean_value(),
            iterations,
            root_visit_counts,
            self.tree.size(),
        ))
    }

    /// Root node of the current tree, if a search has run
    pub fn root(&self) -> Option<&MctsNode> {
        self.tree.root()
    }

    /// Position at the root of the current tree
    pub fn root_state(&self) -> Option<&Board> {
        self.tree.root().map(|node| &node.state)
    }

    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }

    /// Get the number of nodes in the tree
    pub fn tree_size(&self) -> usize {
        self.tree.size()
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Drop the tree and return to `Idle`
    pub fn reset(&mut self) {
        self.tree.clear();
        self.phase = SearchPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_core::Player;

    #[test]
    fn test_mcts_creation() {
        let mcts = Mcts::new(MctsConfig::for_testing());
        assert_eq!(mcts.tree_size(), 0);
        assert_eq!(mcts.phase(), SearchPhase::Idle);
        assert!(mcts.root().is_none());
    }

    #[test]
    fn test_mcts_reset() {
        let mut mcts = Mcts::new(MctsConfig::for_testing());
        mcts.start(&Board::new(3).unwrap()).unwrap();
        assert_eq!(mcts.phase(), SearchPhase::Decided);

        mcts.reset();
        assert_eq!(mcts.tree_size(), 0);
        assert_eq!(mcts.phase(), SearchPhase::Idle);
    }

    #[test]
    fn test_consume_before_start() {
        let mut mcts = Mcts::new(MctsConfig::for_testing());
        let err = mcts.consume_action(0, 1).unwrap_err();
        assert_eq!(err, MctsError::NotStarted);
        assert!(err.is_invalid_transition());
        assert_eq!(mcts.advance(0).unwrap_err(), MctsError::NotStarted);
    }

    #[test]
    fn test_start_on_terminal_board() {
        let mut mcts = Mcts::new(MctsConfig::for_testing());
        let board = Board::new(1).unwrap().apply_move(0, Player::A).unwrap();
        assert_eq!(
            mcts.start(&board).unwrap_err(),
            MctsError::TerminalPosition
        );
    }

    #[test]
    fn test_playout_updates_path_by_exactly_one() {
        let mut mcts = Mcts::new(MctsConfig::for_testing().with_iterations(40));
        mcts.start(&Board::new(3).unwrap()).unwrap();

        for _ in 0..25 {
            let before: Vec<(u32, f32)> = mcts
                .tree
                .nodes
                .iter()
                .map(|n| (n.visit_count, n.total_value))
                .collect();

            let leaf = mcts.playout(0).unwrap();

            let mut on_path = vec![false; mcts.tree.size()];
            let mut cursor = Some(leaf);
            while let Some(id) = cursor {
                on_path[id] = true;
                cursor = mcts.tree.nodes[id].parent;
            }

            for (id, node) in mcts.tree.nodes.iter().enumerate() {
                let (visits, value) = before.get(id).copied().unwrap_or((0, 0.0));
                if on_path[id] {
                    assert_eq!(node.visit_count, visits + 1);
                    assert_eq!((node.total_value - value).abs(), 1.0);
                } else {
                    assert_eq!(node.visit_count, visits);
                    assert_eq!(node.total_value, value);
                }
            }
        }
    }

    #[test]
    fn test_root_visits_match_iterations() {
        let mut mcts = Mcts::new(MctsConfig::for_testing().with_iterations(120));
        let result = mcts.start(&Board::new(4).unwrap()).unwrap();

        assert_eq!(mcts.root().unwrap().visit_count, 120);
        assert_eq!(result.total_visits(), 120);
        assert_eq!(result.iterations_run, 120);
        assert_eq!(result.tree_size, mcts.tree_size());
    }

    #[test]
    fn test_best_move_breaks_ties_by_lowest_action() {
        let mut mcts = Mcts::new(MctsConfig::for_testing());
        let board = Board::new(2).unwrap();
        mcts.tree.initialize_root(board.clone());

        for action in [3, 1, 2] {
            let state = board.apply_move(action, Player::A).unwrap();
            let id = mcts
                .tree
                .add_child(0, action, MctsNode::new_child(state, action, 0));
            mcts.tree.nodes[id].visit_count = 5;
        }

        let result = mcts.create_search_result(0, 15).unwrap();
        assert_eq!(result.best_move, 1);
        assert_eq!(result.root_visit_counts, vec![(1, 5), (2, 5), (3, 5)]);
    }

    #[test]
    fn test_illegal_consume_leaves_tree_untouched() {
        let mut mcts = Mcts::new(MctsConfig::for_testing());
        let result = mcts.start(&Board::new(3).unwrap()).unwrap();
        let size = mcts.tree_size();

        let err = mcts
            .consume_action(result.best_move, result.best_move)
            .unwrap_err();
        assert!(matches!(
            err,
            MctsError::IllegalTransition { action, .. } if action == result.best_move
        ));
        assert_eq!(mcts.tree_size(), size);
        assert_eq!(mcts.phase(), SearchPhase::Decided);
    }

    #[test]
    fn test_game_ending_reply_leaves_tree_untouched() {
        // B to move; after B takes 2, A completes the middle column with 7.
        let board = Board::from_moves(3, &[1, 0, 4]).unwrap();
        let mut mcts = Mcts::new(MctsConfig::for_testing());
        mcts.start(&board).unwrap();
        let size = mcts.tree_size();
        let root_visits = mcts.root().unwrap().visit_count;

        let err = mcts.consume_action(2, 7).unwrap_err();
        assert_eq!(err, MctsError::TerminalRoot);

        assert_eq!(mcts.root_state(), Some(&board));
        assert_eq!(mcts.tree_size(), size);
        assert_eq!(mcts.root().unwrap().visit_count, root_visits);
        assert_eq!(mcts.phase(), SearchPhase::Decided);
    }

    #[test]
    fn test_game_ending_own_move_leaves_tree_untouched() {
        let board = Board::from_moves(3, &[1, 0, 4, 3]).unwrap();
        let mut mcts = Mcts::new(MctsConfig::for_testing());
        mcts.start(&board).unwrap();
        let size = mcts.tree_size();

        assert_eq!(mcts.consume_action(7, 2).unwrap_err(), MctsError::TerminalRoot);
        assert_eq!(mcts.root_state(), Some(&board));
        assert_eq!(mcts.tree_size(), size);
    }
}
