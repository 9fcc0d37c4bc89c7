// Pacman Wars forager bot
//
// The world driver creates one Bot per player and calls `decide` once per turn
// with a fresh snapshot. The bot never writes to the snapshot; it keeps its
// own copy as this turn's ground truth.

use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::error::TurnError;
use crate::state::AgentState;
use crate::strategy::{Decision, StrategySelector, TurnContext};
use crate::types::{AgentId, Bounds, Coord, Grid, Move, StrengthTable};

/// One forager with its persistent state
pub struct Bot {
    id: AgentId,
    bounds: Bounds,
    config: Config,
    state: AgentState,
    map: Grid,
    strengths: StrengthTable,
    rng: SmallRng,
    last_decision: Option<Decision>,
}

impl Bot {
    /// Creates a new Bot
    ///
    /// # Arguments
    /// * `id` - Our tag on the board
    /// * `start` - Initial position
    /// * `initial_grid` - Board as first seen
    /// * `map_length` / `map_breadth` - Row and column counts; fixed for the bot's lifetime
    /// * `config` - Static configuration, including the debug switch and optional RNG seed
    pub fn new(
        id: AgentId,
        start: Coord,
        initial_grid: Grid,
        map_length: usize,
        map_breadth: usize,
        config: Config,
    ) -> Self {
        let rng = match config.debug.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        let bounds = Bounds::new(map_length as i32, map_breadth as i32);
        debug!(
            "Bot {} initialized at {}. Map size ({}, {}). Early game limit: {} turns.",
            id,
            start,
            bounds.length,
            bounds.breadth,
            config.phase.early_game_turn_limit()
        );

        Bot {
            id,
            bounds,
            state: AgentState::new(start, &config.history),
            config,
            map: initial_grid,
            strengths: StrengthTable::new(),
            rng,
            last_decision: None,
        }
    }

    /// Replaces the RNG with a seeded one so runs are reproducible
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    /// Branch that produced the most recent move
    pub fn last_decision(&self) -> Option<Decision> {
        self.last_decision
    }

    /// Computes this turn's move
    ///
    /// # Arguments
    /// * `current` - Authoritative position for this turn
    /// * `grid` - Fresh board snapshot; possibly fogged with Unknown cells
    /// * `strengths` - Food count per bot
    ///
    /// # Returns
    /// * `Move` - Always one of the five moves; Halt when the input is unusable
    pub fn decide(&mut self, current: Coord, grid: &Grid, strengths: &StrengthTable) -> Move {
        self.state.turn_counter += 1;

        if let Err(e) = self.accept_snapshot(current, grid, strengths) {
            warn!(
                "Bot {} turn {}: rejected turn input: {}",
                self.id, self.state.turn_counter, e
            );
            self.state.last_action = Some(Move::Halt);
            self.last_decision = Some(Decision::Rejected);
            return Move::Halt;
        }

        let is_stuck = self.state.observe(current);
        if self.config.debug.enabled {
            self.log_map_view();
        }

        let ctx = TurnContext {
            me: self.id,
            position: current,
            bounds: self.bounds,
            grid: &self.map,
            strengths: &self.strengths,
        };
        let selector = StrategySelector::new(&ctx, &self.state, &self.config);
        let phase = selector.phase();
        let (chosen, decision) = selector.select(is_stuck, &mut self.rng);

        if decision.resets_stuck_streak() {
            self.state.stuck_streak = 0;
        }

        debug!(
            "Bot {} turn {} at {} ({:?}): decision='{}', move={}",
            self.id,
            self.state.turn_counter,
            current,
            phase,
            decision.as_str(),
            chosen.as_str()
        );

        self.state.last_action = Some(chosen);
        self.last_decision = Some(decision);
        chosen
    }

    /// Validates the snapshot and adopts it as ground truth
    fn accept_snapshot(
        &mut self,
        current: Coord,
        grid: &Grid,
        strengths: &StrengthTable,
    ) -> Result<(), TurnError> {
        if grid.is_empty() {
            return Err(TurnError::EmptyGrid);
        }
        if !self.bounds.contains(current) {
            return Err(TurnError::PositionOutOfBounds {
                position: current,
                bounds: self.bounds,
            });
        }

        self.map.clone_from(grid);
        self.strengths.clone_from(strengths);
        Ok(())
    }

    fn log_map_view(&self) {
        let pos = self.state.position;
        let last = self
            .state
            .last_action
            .map_or("None", |m| m.as_str());
        debug!(
            "Bot {} state: Pos={}, Food={}, Map=({},{}) StuckTurns:{} LastAct:{}\n{}",
            self.id,
            pos,
            self.strengths.strength_of(self.id),
            self.bounds.length,
            self.bounds.breadth,
            self.state.stuck_streak,
            last,
            self.map
                .render_window(&self.bounds, pos, self.config.debug.map_view_radius)
        );
    }
}
