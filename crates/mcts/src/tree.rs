use hex_core::{Action, Board, Cell, Player};

/// Node ID in the arena-style tree
pub type NodeId = usize;

/// A single node in the MCTS tree
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Board state at this node
    pub state: Board,

    /// Move that led to this state (None for root)
    pub move_action: Option<Action>,

    /// Parent node ID
    pub parent: Option<NodeId>,

    /// Expanded children keyed by the action that reaches them
    pub children: Vec<(Action, NodeId)>,

    /// Legal actions not yet expanded, highest index first so `pop` yields the lowest
    pub untried_actions: Vec<Action>,

    /// Number of times this node has been visited
    pub visit_count: u32,

    /// Sum of outcomes backed up through this node, from the mover's perspective
    pub total_value: f32,
}

impl MctsNode {
    /// Create a new root node
    pub fn new_root(state: Board) -> Self {
        Self::build(state, None, None)
    }

    /// Create a new child node
    pub fn new_child(state: Board, move_action: Action, parent: NodeId) -> Self {
        Self::build(state, Some(move_action), Some(parent))
    }

    fn build(state: Board, move_action: Option<Action>, parent: Option<NodeId>) -> Self {
        let untried_actions = if state.is_done() {
            Vec::new()
        } else {
            state
                .cells()
                .iter()
                .enumerate()
                .rev()
                .filter(|(_, cell)| **cell == Cell::Empty)
                .map(|(idx, _)| idx)
                .collect()
        };

        Self {
            state,
            move_action,
            parent,
            children: Vec::new(),
            untried_actions,
            visit_count: 0,
            total_value: 0.0,
        }
    }

    /// Average outcome, 0 when unvisited
    pub fn mean_value(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.total_value / self.visit_count as f32
        }
    }

    /// Player whose move produced this state; values are measured for them
    pub fn mover(&self) -> Player {
        self.state.active().opponent()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_done()
    }

    /// Every legal action has a child
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions.is_empty()
    }

    pub fn child(&self, action: Action) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, id)| *id)
    }
}

/// MCTS tree using arena allocation
#[derive(Debug, Clone)]
pub struct MctsTree {
    /// Arena of all nodes
    pub nodes: Vec<MctsNode>,

    /// Root node ID (0 after initialization or reroot)
    pub root_id: NodeId,
}

impl MctsTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(10000),
            root_id: 0,
        }
    }

    /// Initialize the tree with a root node
    pub fn initialize_root(&mut self, board: Board) -> NodeId {
        self.nodes.clear();
        let root = MctsNode::new_root(board);
        self.nodes.push(root);
        self.root_id = 0;
        self.root_id
    }

    /// Add a new node and return its ID
    pub fn add_node(&mut self, node: MctsNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        id
    }

    /// Add `node` as the child of `parent` reached by `action`
    pub fn add_child(&mut self, parent: NodeId, action: Action, node: MctsNode) -> NodeId {
        let id = self.add_node(node);
        self.nodes[parent].children.push((action, id));
        id
    }

    pub fn root(&self) -> Option<&MctsNode> {
        self.nodes.get(self.root_id)
    }

    pub fn get(&self, id: NodeId) -> Option<&MctsNode> {
        self.nodes.get(id)
    }

    /// Make `new_root` the root and drop every node outside its subtree.
    ///
    /// Surviving nodes are renumbered breadth-first, so the new root ends up
    /// at index 0 and children keep their relative order.
    pub fn reroot(&mut self, new_root: NodeId) {
        let mut old: Vec<Option<MctsNode>> = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(Some)
            .collect();

        let mut remap = vec![usize::MAX; old.len()];
        let mut order = vec![new_root];
        remap[new_root] = 0;

        let mut cursor = 0;
        while cursor < order.len() {
            let id = order[cursor];
            if let Some(node) = &old[id] {
                for &(_, child) in &node.children {
                    remap[child] = order.len();
                    order.push(child);
                }
            }
            cursor += 1;
        }

        let mut nodes = Vec::with_capacity(order.len().max(10000));
        for &id in &order {
            if let Some(mut node) = old[id].take() {
                node.parent = node.parent.map(|p| remap[p]);
                for (_, child) in node.children.iter_mut() {
                    *child = remap[*child];
                }
                nodes.push(node);
            }
        }

        if let Some(root) = nodes.first_mut() {
            root.parent = None;
            root.move_action = None;
        }

        self.nodes = nodes;
        self.root_id = 0;
    }

    /// Get the number of nodes in the tree
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Clear the tree
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root_id = 0;
    }
}

impl Default for MctsTree {
    fn default() -> Self {
        Self::new()
    }
}
