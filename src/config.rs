//! Configuration management for the clustering pipeline

use serde::{Deserialize, Serialize};

/// Tunables for the Markov clustering executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MclConfig {
    /// Element-wise power applied after each expansion
    pub inflation: f64,

    /// Matrix power used for the expansion step
    pub expansion: u32,

    /// Largest node count for which the dense attempt is made
    pub dense_node_limit: usize,

    /// Iteration cap for the expansion/inflation loop
    pub max_iterations: usize,

    /// Entries below this value are pruned after each iteration
    pub pruning_threshold: f64,

    /// Relative tolerance of the convergence check
    pub tolerance: f64,

    /// Weight of the self-loops added before the first normalization
    pub loop_value: f64,
}

impl Default for MclConfig {
    fn default() -> Self {
        Self {
            inflation: 2.0,
            expansion: 2,
            dense_node_limit: 2000,
            max_iterations: 100,
            pruning_threshold: 0.001,
            tolerance: 1e-5,
            loop_value: 1.0,
        }
    }
}

/// Default configuration for the clustering pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub mcl: MclConfig,

    /// Random-walk length for Walktrap
    pub walktrap_steps: usize,

    /// Modularity resolution for Leiden
    pub resolution: f64,

    /// Maximum aggregation levels for Leiden
    pub max_levels: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mcl: MclConfig::default(),
            walktrap_steps: 4,
            resolution: 1.0,
            max_levels: 32,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(mcl: MclConfig, walktrap_steps: usize, resolution: f64) -> Self {
        Self {
            mcl,
            walktrap_steps,
            resolution,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_hyperparameters() {
        let config = Config::default();
        assert_eq!(config.mcl.inflation, 2.0);
        assert_eq!(config.mcl.expansion, 2);
        assert_eq!(config.mcl.dense_node_limit, 2000);
        assert_eq!(config.walktrap_steps, 4);
        assert_eq!(config.resolution, 1.0);
    }

    #[test]
    fn test_new_keeps_level_limits() {
        let mcl = MclConfig {
            dense_node_limit: 10,
            ..MclConfig::default()
        };
        let config = Config::new(mcl, 3, 0.5);
        assert_eq!(config.mcl.dense_node_limit, 10);
        assert_eq!(config.walktrap_steps, 3);
        assert_eq!(config.max_levels, Config::default().max_levels);

        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
