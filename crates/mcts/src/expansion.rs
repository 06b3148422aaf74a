use hex_core::Action;

use crate::error::{MctsError, Result};
use crate::tree::{MctsNode, MctsTree, NodeId};

/// Expand one untried action of `leaf`.
///
/// Returns the new child, or `leaf` itself when it is terminal or already
/// fully expanded. The lowest-index untried action is always taken first.
pub fn expand(tree: &mut MctsTree, leaf_id: NodeId) -> Result<NodeId> {
    let leaf = &mut tree.nodes[leaf_id];
    if leaf.is_terminal() {
        return Ok(leaf_id);
    }

    let Some(action) = leaf.untried_actions.pop() else {
        return Ok(leaf_id);
    };

    let state = leaf.state.apply_move(action, leaf.state.active())?;
    let child = MctsNode::new_child(state, action, leaf_id);
    Ok(tree.add_child(leaf_id, action, child))
}

/// Expand the specific `action` of `node_id`, or return the existing child.
///
/// Used when a real move has to be followed through the tree even though the
/// search never explored it.
pub fn expand_action(tree: &mut MctsTree, node_id: NodeId, action: Action) -> Result<NodeId> {
    if let Some(child_id) = tree.nodes[node_id].child(action) {
        return Ok(child_id);
    }

    let node = &mut tree.nodes[node_id];
    if node.is_terminal() {
        return Err(MctsError::TerminalRoot);
    }

    let state = node
        .state
        .apply_move(action, node.state.active())
        .map_err(|source| MctsError::IllegalTransition { action, source })?;

    if let Some(pos) = node.untried_actions.iter().position(|&a| a == action) {
        node.untried_actions.remove(pos);
    }

    let child = MctsNode::new_child(state, action, node_id);
    Ok(tree.add_child(node_id, action, child))
}
