//! Batch simulation harness
//!
//! Plays many independent games in parallel and aggregates per-bot results.
//! Every game gets its own seed derived from the batch seed, so a batch is
//! reproducible regardless of how rayon schedules it.

use log::info;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::types::AgentId;
use crate::world::{BotStatus, GameOutcome, World};

/// Aggregated results for one lineup slot
#[derive(Debug, Clone, Default, Serialize)]
pub struct BotStats {
    pub name: String,
    pub games: u32,
    pub wins: u32,
    pub losses_killed: u32,
    pub losses_score: u32,
    pub total_food: u64,
}

impl BotStats {
    pub fn win_rate(&self) -> f64 {
        percentage(self.wins, self.games)
    }

    pub fn killed_rate(&self) -> f64 {
        percentage(self.losses_killed, self.games)
    }

    pub fn score_loss_rate(&self) -> f64 {
        percentage(self.losses_score, self.games)
    }

    pub fn average_food(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_food as f64 / self.games as f64
        }
    }

    fn record(&mut self, id: AgentId, outcome: &GameOutcome) {
        self.games += 1;
        self.total_food += outcome.final_food.get(&id).copied().unwrap_or(0) as u64;
        if outcome.winner == Some(id) {
            self.wins += 1;
            return;
        }
        match outcome.final_status.get(&id) {
            Some(BotStatus::Dead) => self.losses_killed += 1,
            _ => self.losses_score += 1,
        }
    }
}

fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Summary of a finished batch
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub games: u32,
    pub seed: u64,
    pub timeouts: u32,
    pub draws: u32,
    pub average_game_length: f64,
    pub bots: BTreeMap<AgentId, BotStats>,
}

impl SimulationReport {
    /// Folds finished games into per-bot statistics
    pub fn from_outcomes(seed: u64, outcomes: &[GameOutcome]) -> Self {
        let mut bots: BTreeMap<AgentId, BotStats> = BTreeMap::new();
        for outcome in outcomes {
            for (&id, name) in &outcome.names {
                let stats = bots.entry(id).or_insert_with(|| BotStats {
                    name: name.clone(),
                    ..BotStats::default()
                });
                stats.record(id, outcome);
            }
        }

        let games = outcomes.len() as u32;
        let total_turns: u64 = outcomes.iter().map(|o| o.turns_lasted as u64).sum();
        SimulationReport {
            games,
            seed,
            timeouts: outcomes.iter().filter(|o| o.timed_out).count() as u32,
            draws: outcomes.iter().filter(|o| o.winner.is_none()).count() as u32,
            average_game_length: if games == 0 {
                0.0
            } else {
                total_turns as f64 / games as f64
            },
            bots,
        }
    }

    pub fn print(&self) {
        println!("\n═══════════════════════════════════════════════════════════");
        println!("        PACMAN WARS SIMULATION RESULTS");
        println!("═══════════════════════════════════════════════════════════");
        println!("Games played:        {}", self.games);
        println!("Base seed:           {}", self.seed);
        println!("Timeouts:            {}", self.timeouts);
        println!("Draws:               {}", self.draws);
        println!("Average game length: {:.1} turns", self.average_game_length);
        println!("═══════════════════════════════════════════════════════════\n");

        for (id, stats) in &self.bots {
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("Bot {} ({})", id, stats.name);
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("  Wins:              {} ({:.1}%)", stats.wins, stats.win_rate());
            println!(
                "  Killed:            {} ({:.1}%)",
                stats.losses_killed,
                stats.killed_rate()
            );
            println!(
                "  Lost on score:     {} ({:.1}%)",
                stats.losses_score,
                stats.score_loss_rate()
            );
            println!("  Average food:      {:.2}", stats.average_food());
        }
        println!();
    }
}

/// Runs a batch of games described by `config.simulation`
pub struct SimulationRunner {
    config: Config,
    seed: u64,
}

impl SimulationRunner {
    pub fn new(config: Config, seed: u64) -> Self {
        SimulationRunner { config, seed }
    }

    /// Seed of game `index` within the batch
    pub fn game_seed(&self, index: u32) -> u64 {
        self.seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(index as u64)
    }

    /// Plays one game of the batch
    pub fn play_game(&self, index: u32) -> GameOutcome {
        World::generate(&self.config, self.game_seed(index)).run()
    }

    /// Plays every game and aggregates the results
    ///
    /// # Arguments
    /// * `games` - Number of games to play
    ///
    /// # Returns
    /// * `SimulationReport` - Per-bot statistics, in lineup order
    pub fn run(&self, games: u32) -> SimulationReport {
        info!(
            "Running {} games on a {}x{} map with {} bots ({} baseline), {} threads",
            games,
            self.config.simulation.rows,
            self.config.simulation.cols,
            self.config.simulation.num_bots,
            self.config.simulation.baseline_bots,
            rayon::current_num_threads()
        );

        let outcomes: Vec<GameOutcome> = (0..games)
            .into_par_iter()
            .map(|index| self.play_game(index))
            .collect();

        SimulationReport::from_outcomes(self.seed, &outcomes)
    }
}
