// Priority chain that turns one snapshot into one move
//
// Order: escape, then hunt/food depending on game phase, perimeter patrol,
// stuck exploration and finally a random safe move. The first branch that
// yields a move wins; nothing carries over between turns except what
// AgentState records.

use log::debug;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::Serialize;

use crate::bfs::{BoundedBfs, FoodCell, Killable, OpenGround};
use crate::config::Config;
use crate::state::AgentState;
use crate::threat::Surroundings;
use crate::types::{AgentId, Bounds, Coord, Grid, Move, StrengthTable};

/// Game phase, derived from the turn counter alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Early,
    MidLate,
}

/// Which branch produced the turn's move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    Escape,
    Trapped,
    Hunt,
    Food,
    Patrol,
    Explore,
    RandomFallback,
    /// The turn's input was unusable
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Escape => "escape",
            Decision::Trapped => "trapped",
            Decision::Hunt => "hunt",
            Decision::Food => "food",
            Decision::Patrol => "perimeter",
            Decision::Explore => "explore",
            Decision::RandomFallback => "random_fallback",
            Decision::Rejected => "rejected",
        }
    }

    /// Escaping, hunting and eating count as progress and clear the stuck streak
    pub fn resets_stuck_streak(&self) -> bool {
        matches!(
            self,
            Decision::Escape | Decision::Trapped | Decision::Hunt | Decision::Food
        )
    }
}

/// Read-only view of one turn, built fresh from the driver's snapshot
pub struct TurnContext<'a> {
    pub me: AgentId,
    pub position: Coord,
    pub bounds: Bounds,
    pub grid: &'a Grid,
    pub strengths: &'a StrengthTable,
}

impl TurnContext<'_> {
    pub fn my_strength(&self) -> u32 {
        self.strengths.strength_of(self.me)
    }
}

/// Evaluates the priority chain for one turn
pub struct StrategySelector<'a> {
    ctx: &'a TurnContext<'a>,
    state: &'a AgentState,
    config: &'a Config,
}

impl<'a> StrategySelector<'a> {
    pub fn new(ctx: &'a TurnContext<'a>, state: &'a AgentState, config: &'a Config) -> Self {
        StrategySelector { ctx, state, config }
    }

    pub fn phase(&self) -> Phase {
        if self.config.phase.is_early_game(self.state.turn_counter) {
            Phase::Early
        } else {
            Phase::MidLate
        }
    }

    /// Runs the full chain. `is_stuck` is this turn's loop detection result.
    pub fn select<R: Rng + ?Sized>(&self, is_stuck: bool, rng: &mut R) -> (Move, Decision) {
        if let Some(mv) = self.escape_move(rng) {
            let decision = if mv == Move::Halt {
                Decision::Trapped
            } else {
                Decision::Escape
            };
            return (mv, decision);
        }

        if self.phase() == Phase::MidLate {
            if let Some(mv) = self.hunt_move(rng) {
                return (mv, Decision::Hunt);
            }
        } else {
            debug!("  Skipping hunt check in early game");
        }

        if let Some(mv) = self.food_move(rng) {
            return (mv, Decision::Food);
        }

        if let Some(mv) = self.perimeter_move() {
            return (mv, Decision::Patrol);
        }

        if is_stuck {
            let long_term =
                self.state.stuck_streak >= self.config.history.long_term_stuck_threshold;
            if let Some(mv) = self.exploration_move(long_term, rng) {
                return (mv, Decision::Explore);
            }
        }

        (self.random_safe_move(rng), Decision::RandomFallback)
    }

    fn surroundings(&self) -> Surroundings<'a> {
        Surroundings::new(self.ctx.grid, self.ctx.bounds, self.ctx.position)
    }

    fn bfs(&self) -> BoundedBfs<'a> {
        BoundedBfs::new(self.ctx.grid, self.ctx.bounds)
    }

    /// `None` when nothing adjacent threatens us; `Some(Halt)` when trapped
    pub fn escape_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        let around = self.surroundings();
        let threats = around.find_threats(self.ctx.me, self.ctx.my_strength(), self.ctx.strengths);
        if threats.is_empty() {
            return None;
        }
        debug!("  Threats adjacent: {:?}", threats);

        // Straight away from a threat, food first
        let mut away: Vec<Move> = Vec::new();
        for threat in &threats {
            let Some(esc) = threat.opposite() else {
                continue;
            };
            if !around.is_safe(esc) {
                continue;
            }
            if around.is_food(esc) {
                return Some(esc);
            }
            if !away.contains(&esc) {
                away.push(esc);
            }
        }
        if let Some(&mv) = away.choose(rng) {
            return Some(mv);
        }

        // Any other safe side step
        let sideways: Vec<Move> = Move::cardinal()
            .into_iter()
            .filter(|dir| !threats.contains(dir) && around.is_safe(*dir))
            .collect();
        if let Some(&mv) = sideways.iter().find(|dir| around.is_food(**dir)) {
            return Some(mv);
        }
        if let Some(&mv) = sideways.choose(rng) {
            return Some(mv);
        }

        debug!("  No safe adjacent escape. Trying BFS...");
        let via_bfs = self.bfs().search(
            self.ctx.position,
            &OpenGround,
            &OpenGround,
            self.config.search.escape_bfs_depth,
            rng,
        );
        if via_bfs.is_some() {
            return via_bfs;
        }

        debug!(
            "Bot {} at {}: Trapped! Halting.",
            self.ctx.me, self.ctx.position
        );
        Some(Move::Halt)
    }

    /// First step toward the nearest bot weak enough to attack
    pub fn hunt_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        let prey = Killable {
            me: self.ctx.me,
            my_strength: self.ctx.my_strength(),
            margin: self.config.combat.hunt_margin,
            strengths: self.ctx.strengths,
        };
        let mv = self.bfs().search(
            self.ctx.position,
            &prey,
            &prey,
            self.config.search.default_bfs_depth,
            rng,
        );
        if let Some(mv) = mv {
            debug!("  BFS (hunt): target reachable via {}", mv.as_str());
        }
        mv
    }

    /// First step toward the nearest food
    pub fn food_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        let mv = self.bfs().search(
            self.ctx.position,
            &FoodCell,
            &OpenGround,
            self.config.search.default_bfs_depth,
            rng,
        );
        if let Some(mv) = mv {
            debug!("  BFS (food): target reachable via {}", mv.as_str());
        }
        mv
    }

    /// Clockwise wall following while on the map edge
    pub fn perimeter_move(&self) -> Option<Move> {
        let bounds = self.ctx.bounds;
        if bounds.length <= 0 || bounds.breadth <= 0 {
            return None;
        }
        let Coord { x, y } = self.ctx.position;
        let on_top = x == 0;
        let on_bottom = x == bounds.length - 1;
        let on_left = y == 0;
        let on_right = y == bounds.breadth - 1;

        let primary = if on_top && on_left {
            Move::Right
        } else if on_top && on_right {
            Move::Down
        } else if on_bottom && on_right {
            Move::Left
        } else if on_bottom && on_left {
            Move::Up
        } else if on_top {
            Move::Right
        } else if on_right {
            Move::Down
        } else if on_bottom {
            Move::Left
        } else if on_left {
            Move::Up
        } else {
            return None;
        };

        if primary.reverses(self.state.last_action) {
            debug!(
                "  Perimeter Patrol: {} reverses last move. Skipping.",
                primary.as_str()
            );
            return None;
        }
        if !self.surroundings().is_safe(primary) {
            debug!("  Perimeter Patrol: {} blocked.", primary.as_str());
            return None;
        }
        Some(primary)
    }

    /// Breaks out of a loop.
    ///
    /// Long-term stuck bots move as far as possible from the centroid of their
    /// recent positions. Otherwise new cells beat revisited ones, and
    /// non-reversing moves beat reversing ones.
    pub fn exploration_move<R: Rng + ?Sized>(&self, long_term: bool, rng: &mut R) -> Option<Move> {
        let mut safe = self.surroundings().safe_moves();
        if safe.is_empty() {
            debug!(
                "  Exploration failed: No safe moves from {}.",
                self.ctx.position
            );
            return None;
        }
        let last = self.state.last_action;

        if long_term {
            if let Some((cx, cy)) = self.state.history.centroid() {
                debug!("  Centroid: ({:.2}, {:.2})", cx, cy);
                safe.shuffle(rng);
                let mut farthest: Option<(Move, f64)> = None;
                let mut reversal: Option<Move> = None;
                for &(dir, dest) in &safe {
                    let dist = dest.distance_sq(cx, cy);
                    if dir.reverses(last) {
                        reversal = Some(dir);
                    } else if farthest.map_or(true, |(_, best)| dist > best) {
                        farthest = Some((dir, dist));
                    }
                }
                if let Some((dir, _)) = farthest {
                    return Some(dir);
                }
                if reversal.is_some() {
                    return reversal;
                }
            }
        }

        let mut new_forward = Vec::new();
        let mut old_forward = Vec::new();
        let mut new_reverse = None;
        let mut old_reverse = None;
        for &(dir, dest) in &safe {
            let is_new = !self.state.history.contains(&dest);
            match (is_new, dir.reverses(last)) {
                (true, false) => new_forward.push(dir),
                (false, false) => old_forward.push(dir),
                (true, true) => new_reverse = Some(dir),
                (false, true) => old_reverse = Some(dir),
            }
        }

        if let Some(&dir) = new_forward.choose(rng) {
            return Some(dir);
        }
        if let Some(&dir) = old_forward.choose(rng) {
            return Some(dir);
        }
        new_reverse.or(old_reverse)
    }

    /// Uniform over safe moves, avoiding an immediate reversal when possible
    pub fn random_safe_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Move {
        let safe: Vec<Move> = self
            .surroundings()
            .safe_moves()
            .into_iter()
            .map(|(dir, _)| dir)
            .collect();
        if safe.is_empty() {
            debug!(
                "Bot {} at {}: No safe fallback moves. Halting.",
                self.ctx.me, self.ctx.position
            );
            return Move::Halt;
        }

        let last = self.state.last_action;
        let preferred: Vec<Move> = safe.iter().copied().filter(|dir| !dir.reverses(last)).collect();
        preferred
            .choose(rng)
            .or_else(|| safe.choose(rng))
            .copied()
            .unwrap_or(Move::Halt)
    }
}
