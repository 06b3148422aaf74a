/// Configuration for MCTS search
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of playouts run per decision
    pub iterations: u32,

    /// UCB1 exploration constant C (sqrt(2) is the textbook value)
    pub exploration: f32,

    /// Seed for the rollout RNG; every `start` reseeds from it
    pub seed: u64,
}

impl MctsConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Fast config for tests
    pub fn for_testing() -> Self {
        Self {
            iterations: 64,
            ..Self::default()
        }
    }

    /// Stronger config for evaluation games
    pub fn for_evaluation() -> Self {
        Self {
            iterations: 5000,
            ..Self::default()
        }
    }

    /// Set number of playouts per decision
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = n.max(1);
        self
    }

    /// Set UCB1 exploration constant
    pub fn with_exploration(mut self, c: f32) -> Self {
        self.exploration = c;
        self
    }

    /// Set RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            exploration: std::f32::consts::SQRT_2,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.exploration, std::f32::consts::SQRT_2);
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_iterations(250)
            .with_exploration(0.7)
            .with_seed(42);

        assert_eq!(config.iterations, 250);
        assert_eq!(config.exploration, 0.7);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_zero_iterations_clamped() {
        let config = MctsConfig::new().with_iterations(0);
        assert_eq!(config.iterations, 1);
    }
}
