use hex_core::Player;

use crate::tree::{MctsTree, NodeId};

/// Backup a finished playout from `leaf_id` to the root
///
/// Each node on the path is credited +1 if `winner` is the player who moved
/// into it and -1 otherwise. Perspective comes from the node's own state
/// rather than a sign flipped per level, so paths of any parity stay correct.
pub fn backup(tree: &mut MctsTree, leaf_id: NodeId, winner: Player) {
    let mut current_id = Some(leaf_id);

    while let Some(node_id) = current_id {
        let node = &mut tree.nodes[node_id];

        node.visit_count += 1;
        node.total_value += if node.mover() == winner { 1.0 } else { -1.0 };

        current_id = node.parent;
    }
}
