use hex_core::Action;

/// Result of one MCTS decision
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Most-visited root action (ties go to the lowest index)
    pub best_move: Action,

    /// Mean value of the root, from the perspective of the player who moved into it
    pub root_value: f32,

    /// Number of playouts run for this decision
    pub iterations_run: u32,

    /// Visit counts for each expanded root action, sorted by action
    pub root_visit_counts: Vec<(Action, u32)>,

    /// Nodes in the tree after the search
    pub tree_size: usize,
}

impl SearchResult {
    /// Create a new search result
    pub fn new(
        best_move: Action,
        root_value: f32,
        iterations_run: u32,
        root_visit_counts: Vec<(Action, u32)>,
        tree_size: usize,
    ) -> Self {
        Self {
            best_move,
            root_value,
            iterations_run,
            root_visit_counts,
            tree_size,
        }
    }

    /// Get the visit count for a specific move
    pub fn visit_count_for_move(&self, action: Action) -> u32 {
        self.root_visit_counts
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }

    /// Sum of visits over all root children
    pub fn total_visits(&self) -> u32 {
        self.root_visit_counts.iter().map(|(_, v)| v).sum()
    }
}
