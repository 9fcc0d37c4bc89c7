//! Headless Pacman Wars world
//!
//! Owns the board, every bot's position and food, and resolves all moves of a
//! turn at once. Bots only ever see copies of the board.

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use crate::bot::Bot;
use crate::config::{Config, SimulationConfig};
use crate::types::{AgentId, Cell, Coord, Grid, Move, StrengthTable};

/// Anything that can play: receives a snapshot, returns one move
pub trait Contestant: Send {
    fn name(&self) -> &str;

    fn decide(&mut self, current: Coord, grid: &Grid, strengths: &StrengthTable) -> Move;
}

impl Contestant for Bot {
    fn name(&self) -> &str {
        "Forager"
    }

    fn decide(&mut self, current: Coord, grid: &Grid, strengths: &StrengthTable) -> Move {
        Bot::decide(self, current, grid, strengths)
    }
}

/// Baseline opponent: uniform over moves that do not walk into terrain
pub struct RandomWalker {
    rng: SmallRng,
}

impl RandomWalker {
    pub fn new(seed: u64) -> Self {
        RandomWalker {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Contestant for RandomWalker {
    fn name(&self) -> &str {
        "RandomWalker"
    }

    fn decide(&mut self, current: Coord, grid: &Grid, _strengths: &StrengthTable) -> Move {
        let open: Vec<Move> = Move::cardinal()
            .into_iter()
            .filter(|m| grid.get(m.apply(current)).is_some_and(|c| c.is_open()))
            .collect();
        open.choose(&mut self.rng).copied().unwrap_or(Move::Halt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BotStatus {
    Alive,
    Dead,
}

/// Result of one finished game
#[derive(Debug, Clone, Serialize)]
pub struct GameOutcome {
    pub winner: Option<AgentId>,
    pub turns_lasted: u32,
    pub timed_out: bool,
    pub final_food: BTreeMap<AgentId, u32>,
    pub final_status: BTreeMap<AgentId, BotStatus>,
    pub names: BTreeMap<AgentId, String>,
}

struct Player {
    contestant: Box<dyn Contestant>,
    position: Coord,
    status: BotStatus,
}

/// One game in progress
pub struct World {
    grid: Grid,
    players: BTreeMap<AgentId, Player>,
    strengths: StrengthTable,
    config: SimulationConfig,
    rng: SmallRng,
    turn: u32,
}

impl World {
    /// Generates a board from `config.simulation` and places the lineup on it.
    /// Forager bots come first, then baseline walkers.
    pub fn generate(config: &Config, seed: u64) -> Self {
        let sim = &config.simulation;
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut grid = Grid::filled(sim.rows, sim.cols, Cell::Walkable);

        for x in 0..sim.rows as i32 {
            for y in 0..sim.cols as i32 {
                let roll: f64 = rng.random();
                if roll < sim.obstacle_probability {
                    grid.set(Coord::new(x, y), Cell::Obstacle);
                } else if roll < sim.obstacle_probability + sim.initial_food_fraction {
                    grid.set(Coord::new(x, y), Cell::Food);
                }
            }
        }

        let mut world = World {
            grid,
            players: BTreeMap::new(),
            strengths: StrengthTable::new(),
            config: sim.clone(),
            rng,
            turn: 0,
        };

        let foragers = sim.num_bots.saturating_sub(sim.baseline_bots);
        for n in 0..sim.num_bots {
            let Some(start) = world.random_cell(Cell::Walkable) else {
                break;
            };
            let id = AgentId(n as u32 + 1);
            let agent_seed = seed.wrapping_mul(31).wrapping_add(id.0 as u64);
            let contestant: Box<dyn Contestant> = if n < foragers {
                Box::new(
                    Bot::new(id, start, world.grid.clone(), sim.rows, sim.cols, config.clone())
                        .with_rng_seed(agent_seed),
                )
            } else {
                Box::new(RandomWalker::new(agent_seed))
            };
            world.add_player(id, start, contestant);
        }

        world
    }

    /// Builds a world around an existing board. Cells under the players become their tags.
    pub fn from_grid(grid: Grid, config: SimulationConfig, seed: u64) -> Self {
        World {
            grid,
            players: BTreeMap::new(),
            strengths: StrengthTable::new(),
            config,
            rng: SmallRng::seed_from_u64(seed),
            turn: 0,
        }
    }

    /// Places a player with the starting strength of 1
    pub fn add_player(&mut self, id: AgentId, start: Coord, contestant: Box<dyn Contestant>) {
        self.grid.set(start, Cell::Occupant(id));
        self.strengths.set(id, StrengthTable::DEFAULT_STRENGTH);
        self.players.insert(
            id,
            Player {
                contestant,
                position: start,
                status: BotStatus::Alive,
            },
        );
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn strengths(&self) -> &StrengthTable {
        &self.strengths
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn position_of(&self, id: AgentId) -> Option<Coord> {
        self.players.get(&id).map(|p| p.position)
    }

    pub fn status_of(&self, id: AgentId) -> Option<BotStatus> {
        self.players.get(&id).map(|p| p.status)
    }

    pub fn alive_count(&self) -> usize {
        self.players
            .values()
            .filter(|p| p.status == BotStatus::Alive)
            .count()
    }

    pub fn is_over(&self) -> bool {
        self.turn >= self.config.max_game_moves || self.alive_count() <= 1
    }

    /// What a bot at `at` is shown: the full board, or Unknown beyond its vision radius
    fn view_from(&self, at: Coord) -> Grid {
        let Some(radius) = self.config.vision_radius else {
            return self.grid.clone();
        };
        let mut view = self.grid.clone();
        for (c, _) in self.grid.iter() {
            if (c.x - at.x).abs().max((c.y - at.y).abs()) > radius {
                view.set(c, Cell::Unknown);
            }
        }
        view
    }

    /// Asks every live bot for a move and resolves them together
    pub fn step(&mut self) {
        self.turn += 1;

        let ids: Vec<AgentId> = self
            .players
            .iter()
            .filter(|(_, p)| p.status == BotStatus::Alive)
            .map(|(&id, _)| id)
            .collect();

        let mut moves: Vec<(AgentId, Move)> = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(position) = self.position_of(id) else {
                continue;
            };
            let view = self.view_from(position);
            if let Some(player) = self.players.get_mut(&id) {
                let mv = player.contestant.decide(position, &view, &self.strengths);
                moves.push((id, mv));
            }
        }

        self.resolve_moves(&moves);
        self.spawn_food();
    }

    /// Applies moves simultaneously.
    ///
    /// Moves into terrain or off the board leave the bot in place. Bots that
    /// end on the same cell fight: a unique strongest bot survives and absorbs
    /// the others' food; if the top strength is shared, every bot there dies.
    /// A survivor standing on food eats it.
    pub fn resolve_moves(&mut self, moves: &[(AgentId, Move)]) {
        let mut destinations: HashMap<Coord, Vec<AgentId>> = HashMap::new();

        for (&id, player) in &self.players {
            if player.status != BotStatus::Alive {
                continue;
            }
            let mv = moves
                .iter()
                .find(|(mover, _)| *mover == id)
                .map_or(Move::Halt, |(_, m)| *m);
            let next = mv.apply(player.position);
            let target = match self.grid.get(next) {
                Some(Cell::Obstacle) | Some(Cell::OutOfBounds) | None => player.position,
                Some(_) => next,
            };
            destinations.entry(target).or_default().push(id);
        }

        // Vacate old cells before occupying new ones
        for player in self.players.values() {
            if player.status == BotStatus::Alive {
                self.grid.set(player.position, Cell::Walkable);
            }
        }

        for (cell, occupants) in destinations {
            let was_food = self.grid.get(cell) == Some(Cell::Food);
            let survivor = self.fight(&occupants);

            for &id in &occupants {
                if let Some(player) = self.players.get_mut(&id) {
                    player.position = cell;
                    if Some(id) != survivor {
                        player.status = BotStatus::Dead;
                        debug!("Bot {} died at {} on turn {}", id, cell, self.turn);
                    }
                }
            }

            match survivor {
                Some(winner) => {
                    if was_food {
                        let food = self.strengths.strength_of(winner);
                        self.strengths.set(winner, food + 1);
                    }
                    self.grid.set(cell, Cell::Occupant(winner));
                }
                None if was_food => self.grid.set(cell, Cell::Food),
                None => self.grid.set(cell, Cell::Walkable),
            }
        }
    }

    /// Returns the unique strongest bot and hands it the losers' food
    fn fight(&mut self, occupants: &[AgentId]) -> Option<AgentId> {
        if let [only] = occupants {
            return Some(*only);
        }
        let top = occupants
            .iter()
            .map(|&id| self.strengths.strength_of(id))
            .max()?;
        let strongest: Vec<AgentId> = occupants
            .iter()
            .copied()
            .filter(|&id| self.strengths.strength_of(id) == top)
            .collect();
        let &[winner] = strongest.as_slice() else {
            return None;
        };
        let spoils: u32 = occupants
            .iter()
            .filter(|&&id| id != winner)
            .map(|&id| self.strengths.strength_of(id))
            .sum();
        self.strengths.set(winner, top + spoils);
        Some(winner)
    }

    /// Tops food back up while it covers less than the configured share of the board
    pub fn spawn_food(&mut self) {
        let total = self.grid.rows() * self.grid.cols();
        if total == 0 {
            return;
        }
        let food = self.grid.count(Cell::Food);
        if (food as f64 / total as f64) >= self.config.max_food_fraction {
            return;
        }
        let quantity = self.alive_count() * self.config.food_per_bot;
        for _ in 0..quantity {
            match self.random_cell(Cell::Walkable) {
                Some(c) => self.grid.set(c, Cell::Food),
                None => break,
            }
        }
    }

    fn random_cell(&mut self, kind: Cell) -> Option<Coord> {
        let candidates: Vec<Coord> = self
            .grid
            .iter()
            .filter(|&(_, cell)| cell == kind)
            .map(|(c, _)| c)
            .collect();
        candidates.choose(&mut self.rng).copied()
    }

    /// Highest food count; ties go to the lowest id
    fn strongest(&self, ids: impl Iterator<Item = AgentId>) -> Option<AgentId> {
        ids.max_by_key(|&id| (self.strengths.strength_of(id), Reverse(id)))
    }

    /// Plays until the turn limit or until at most one bot is left
    pub fn run(mut self) -> GameOutcome {
        while !self.is_over() {
            self.step();
        }
        self.outcome()
    }

    /// Winner: strongest survivor on timeout, the last one standing otherwise,
    /// or the strongest overall if nobody survived
    pub fn outcome(&self) -> GameOutcome {
        let timed_out = self.turn >= self.config.max_game_moves;
        let alive: Vec<AgentId> = self
            .players
            .iter()
            .filter(|(_, p)| p.status == BotStatus::Alive)
            .map(|(&id, _)| id)
            .collect();

        let winner = if timed_out && !alive.is_empty() {
            self.strongest(alive.iter().copied())
        } else if alive.len() == 1 {
            alive.first().copied()
        } else if alive.is_empty() {
            self.strongest(self.players.keys().copied())
        } else {
            None
        };

        let outcome = GameOutcome {
            winner,
            turns_lasted: self.turn,
            timed_out,
            final_food: self
                .players
                .keys()
                .map(|&id| (id, self.strengths.strength_of(id)))
                .collect(),
            final_status: self.players.iter().map(|(&id, p)| (id, p.status)).collect(),
            names: self
                .players
                .iter()
                .map(|(&id, p)| (id, p.contestant.name().to_string()))
                .collect(),
        };
        info!(
            "Game over after {} turns: winner={}",
            outcome.turns_lasted,
            outcome.winner.map_or("DRAW".to_string(), |id| id.to_string())
        );
        outcome
    }
}
