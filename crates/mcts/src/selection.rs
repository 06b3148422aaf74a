use crate::tree::{MctsTree, NodeId};

/// Select a node to expand using UCB1
///
/// Descends from root while the current node is non-terminal, has no untried
/// actions and has at least one child. The first node that fails any of those
/// is returned.
pub fn select(tree: &MctsTree, root_id: NodeId, exploration: f32) -> NodeId {
    let mut current_id = root_id;

    loop {
        let node = &tree.nodes[current_id];

        if node.is_terminal() || !node.is_fully_expanded() || node.children.is_empty() {
            return current_id;
        }

        let ln_parent = (node.visit_count.max(1) as f32).ln();

        // Strict comparison keeps the earliest child on ties.
        let mut best_id = node.children[0].1;
        let mut best_score = f32::NEG_INFINITY;
        for &(_, child_id) in &node.children {
            let score = ucb1_value(tree, child_id, ln_parent, exploration);
            if score > best_score {
                best_score = score;
                best_id = child_id;
            }
        }

        current_id = best_id;
    }
}

/// Calculate UCB1 value for a node
///
/// UCB1 = W/N + C * sqrt(ln(N_parent) / N)
///
/// Unvisited nodes score +inf so they are always tried first. The mean is
/// measured for the player who moved into the node, which is the player
/// choosing among the parent's children.
pub(crate) fn ucb1_value(tree: &MctsTree, node_id: NodeId, ln_parent: f32, exploration: f32) -> f32 {
    let node = &tree.nodes[node_id];

    if node.visit_count == 0 {
        return f32::INFINITY;
    }

    let exploit = node.mean_value();
    let explore = exploration * (ln_parent / node.visit_count as f32).sqrt();

    exploit + explore
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MctsNode;
    use approx::assert_relative_eq;
    use hex_core::Board;

    /// Root on a 2x2 board with all four children expanded.
    fn full_root() -> MctsTree {
        let mut tree = MctsTree::new();
        let board = Board::new(2).unwrap();
        tree.initialize_root(board.clone());

        while let Some(action) = tree.nodes[0].untried_actions.pop() {
            let child = board.apply_move(action, board.active()).unwrap();
            tree.add_child(0, action, MctsNode::new_child(child, action, 0));
        }
        tree
    }

    #[test]
    fn test_ucb1_value_visited() {
        let mut tree = full_root();
        tree.nodes[0].visit_count = 100;
        tree.nodes[1].visit_count = 10;
        tree.nodes[1].total_value = 4.0;

        let ln_parent = (100f32).ln();
        let ucb = ucb1_value(&tree, 1, ln_parent, 1.5);

        // 0.4 + 1.5 * sqrt(ln(100) / 10) = 0.4 + 1.5 * 0.6786
        assert_relative_eq!(ucb, 1.4179, epsilon = 1e-3);
    }

    #[test]
    fn test_ucb1_value_unvisited_is_infinite() {
        let tree = full_root();
        assert!(ucb1_value(&tree, 2, 1.0, 1.0).is_infinite());
    }

    #[test]
    fn test_select_stops_at_node_with_untried_actions() {
        let mut tree = MctsTree::new();
        tree.initialize_root(Board::new(2).unwrap());
        assert_eq!(select(&tree, 0, 1.0), 0);
    }

    #[test]
    fn test_select_prefers_unvisited_child() {
        let mut tree = full_root();
        tree.nodes[0].visit_count = 3;
        for id in 1..=3 {
            tree.nodes[id].visit_count = 1;
            tree.nodes[id].total_value = 1.0;
        }
        // Child 4 unvisited.
        assert_eq!(select(&tree, 0, 1.0), 4);
    }

    #[test]
    fn test_select_exploits_with_zero_exploration() {
        let mut tree = full_root();
        tree.nodes[0].visit_count = 8;
        let values = [-2.0, 1.0, 2.0, 0.0];
        for (i, v) in values.iter().enumerate() {
            tree.nodes[i + 1].visit_count = 2;
            tree.nodes[i + 1].total_value = *v;
        }
        assert_eq!(select(&tree, 0, 0.0), 3);
    }

    #[test]
    fn test_select_ties_pick_first_child() {
        let mut tree = full_root();
        tree.nodes[0].visit_count = 4;
        for id in 1..=4 {
            tree.nodes[id].visit_count = 1;
        }
        assert_eq!(select(&tree, 0, 1.0), 1);
    }
}
