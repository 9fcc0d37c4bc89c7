// Configuration module for reading Agent.toml
// Every tunable of the forager bot and the simulation harness lives here

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub history: HistoryConfig,
    pub combat: CombatConfig,
    pub phase: PhaseConfig,
    pub debug: DebugConfig,
    pub simulation: SimulationConfig,
}

/// BFS depth caps
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub default_bfs_depth: u32,
    pub escape_bfs_depth: u32,
}

/// Position history and loop detection
#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    pub history_length: usize,
    pub stuck_threshold: usize,
    pub long_term_stuck_threshold: u32,
}

/// Combat constants
#[derive(Debug, Deserialize, Clone)]
pub struct CombatConfig {
    /// A bot is only hunted if our strength exceeds its strength plus this margin
    pub hunt_margin: u32,
}

/// Early vs. mid/late game split
#[derive(Debug, Deserialize, Clone)]
pub struct PhaseConfig {
    pub total_game_moves: u32,
    pub early_game_fraction: f64,
}

impl PhaseConfig {
    /// Last turn (inclusive) of the early game
    pub fn early_game_turn_limit(&self) -> u32 {
        (self.total_game_moves as f64 * self.early_game_fraction) as u32
    }

    pub fn is_early_game(&self, turn: u32) -> bool {
        turn <= self.early_game_turn_limit()
    }
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub map_view_radius: i32,
    /// Fixed seed for the bot's RNG. Unset means seeded from the OS.
    pub rng_seed: Option<u64>,
}

/// Headless world and batch run parameters
#[derive(Debug, Deserialize, Clone)]
pub struct SimulationConfig {
    pub num_simulations: u32,
    pub max_game_moves: u32,
    pub rows: usize,
    pub cols: usize,
    pub num_bots: usize,
    pub baseline_bots: usize,
    pub obstacle_probability: f64,
    pub initial_food_fraction: f64,
    pub max_food_fraction: f64,
    pub food_per_bot: usize,
    /// Chebyshev radius a bot can see; unset means the full board
    pub vision_radius: Option<i32>,
    pub seed: Option<u64>,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Agent.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Agent.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Agent.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Agent.toml
    pub fn default_hardcoded() -> Self {
        Config {
            search: SearchConfig {
                default_bfs_depth: 15,
                escape_bfs_depth: 5,
            },
            history: HistoryConfig {
                history_length: 8,
                stuck_threshold: 4,
                long_term_stuck_threshold: 10,
            },
            combat: CombatConfig { hunt_margin: 5 },
            phase: PhaseConfig {
                total_game_moves: 1000,
                early_game_fraction: 0.10,
            },
            debug: DebugConfig {
                enabled: false,
                map_view_radius: 2,
                rng_seed: None,
            },
            simulation: SimulationConfig {
                num_simulations: 300,
                max_game_moves: 1000,
                rows: 40,
                cols: 40,
                num_bots: 4,
                baseline_bots: 2,
                obstacle_probability: 0.12,
                initial_food_fraction: 0.05,
                max_food_fraction: 0.15,
                food_per_bot: 1,
                vision_radius: None,
                seed: None,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Agent.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_early_game_limit_calculation() {
        let config = Config::default_hardcoded();
        assert_eq!(config.phase.early_game_turn_limit(), 100);
        assert!(config.phase.is_early_game(100));
        assert!(!config.phase.is_early_game(101));
    }

    #[test]
    fn test_zero_fraction_has_no_early_game() {
        let phase = PhaseConfig {
            total_game_moves: 1000,
            early_game_fraction: 0.0,
        };
        assert!(!phase.is_early_game(1));
    }

    #[test]
    fn test_agent_toml_can_be_parsed() {
        let result = Config::from_file("Agent.toml");
        assert!(result.is_ok(), "Failed to parse Agent.toml: {:?}", result.err());
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Agent.toml").expect("Agent.toml should be parseable");
        let hardcoded_config = Config::default_hardcoded();

        // Search
        assert_eq!(file_config.search.default_bfs_depth, hardcoded_config.search.default_bfs_depth);
        assert_eq!(file_config.search.escape_bfs_depth, hardcoded_config.search.escape_bfs_depth);

        // History
        assert_eq!(file_config.history.history_length, hardcoded_config.history.history_length);
        assert_eq!(file_config.history.stuck_threshold, hardcoded_config.history.stuck_threshold);
        assert_eq!(
            file_config.history.long_term_stuck_threshold,
            hardcoded_config.history.long_term_stuck_threshold
        );

        // Combat and phase
        assert_eq!(file_config.combat.hunt_margin, hardcoded_config.combat.hunt_margin);
        assert_eq!(file_config.phase.total_game_moves, hardcoded_config.phase.total_game_moves);
        assert_eq!(file_config.phase.early_game_fraction, hardcoded_config.phase.early_game_fraction);

        // Debug
        assert_eq!(file_config.debug.enabled, hardcoded_config.debug.enabled);
        assert_eq!(file_config.debug.rng_seed, hardcoded_config.debug.rng_seed);

        // Simulation
        assert_eq!(file_config.simulation.rows, hardcoded_config.simulation.rows);
        assert_eq!(file_config.simulation.cols, hardcoded_config.simulation.cols);
        assert_eq!(file_config.simulation.num_bots, hardcoded_config.simulation.num_bots);
        assert_eq!(file_config.simulation.max_food_fraction, hardcoded_config.simulation.max_food_fraction);
        assert_eq!(file_config.simulation.vision_radius, hardcoded_config.simulation.vision_radius);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
