//! Bounded breadth-first search over the board
//!
//! The engine answers one question: which first step leads toward the nearest
//! cell accepted by a [`TargetPredicate`], walking only through cells accepted
//! by a [`WalkablePredicate`]? Neighbor order is shuffled on every expansion so
//! equidistant targets are not biased toward one direction.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashSet, VecDeque};

use crate::types::{AgentId, Bounds, Cell, Coord, Grid, Move, StrengthTable};

/// Decides whether a reached cell ends the search
pub trait TargetPredicate {
    fn is_target(&self, at: Coord, cell: Cell) -> bool;
}

/// Decides whether a cell may be entered during the search
pub trait WalkablePredicate {
    fn is_walkable(&self, at: Coord, cell: Cell) -> bool;
}

impl<F> TargetPredicate for F
where
    F: Fn(Coord, Cell) -> bool,
{
    fn is_target(&self, at: Coord, cell: Cell) -> bool {
        self(at, cell)
    }
}

impl<F> WalkablePredicate for F
where
    F: Fn(Coord, Cell) -> bool,
{
    fn is_walkable(&self, at: Coord, cell: Cell) -> bool {
        self(at, cell)
    }
}

/// Walkable or Food. Used both as target and walkable set when escaping.
#[derive(Debug, Clone, Copy)]
pub struct OpenGround;

impl TargetPredicate for OpenGround {
    fn is_target(&self, _at: Coord, cell: Cell) -> bool {
        cell.is_open()
    }
}

impl WalkablePredicate for OpenGround {
    fn is_walkable(&self, _at: Coord, cell: Cell) -> bool {
        cell.is_open()
    }
}

/// Food cells
#[derive(Debug, Clone, Copy)]
pub struct FoodCell;

impl TargetPredicate for FoodCell {
    fn is_target(&self, _at: Coord, cell: Cell) -> bool {
        cell == Cell::Food
    }
}

/// Bots weak enough to be attacked: our strength must exceed theirs plus the margin
#[derive(Debug, Clone, Copy)]
pub struct Killable<'a> {
    pub me: AgentId,
    pub my_strength: u32,
    pub margin: u32,
    pub strengths: &'a StrengthTable,
}

impl Killable<'_> {
    fn accepts(&self, cell: Cell) -> bool {
        match cell.other_agent(self.me) {
            Some(other) => {
                self.my_strength > self.strengths.strength_of(other).saturating_add(self.margin)
            }
            None => false,
        }
    }
}

impl TargetPredicate for Killable<'_> {
    fn is_target(&self, _at: Coord, cell: Cell) -> bool {
        self.accepts(cell)
    }
}

/// Open ground plus killable bots, so a hunt may path through weaker prey
impl WalkablePredicate for Killable<'_> {
    fn is_walkable(&self, _at: Coord, cell: Cell) -> bool {
        cell.is_open() || self.accepts(cell)
    }
}

/// Search engine over one turn's snapshot
pub struct BoundedBfs<'a> {
    grid: &'a Grid,
    bounds: Bounds,
}

impl<'a> BoundedBfs<'a> {
    pub fn new(grid: &'a Grid, bounds: Bounds) -> Self {
        BoundedBfs { grid, bounds }
    }

    /// Returns the first move on a shortest path from `start` to the nearest target.
    ///
    /// # Arguments
    /// * `start` - Search origin; never itself a target
    /// * `target` - Accepts the cell that ends the search
    /// * `walkable` - Accepts cells that may be entered
    /// * `max_depth` - Nodes at this depth are not expanded
    /// * `rng` - Shuffles neighbor order per expansion
    ///
    /// # Returns
    /// * `Option<Move>` - A cardinal move, or `None` when nothing was found within budget
    pub fn search<T, W, R>(
        &self,
        start: Coord,
        target: &T,
        walkable: &W,
        max_depth: u32,
        rng: &mut R,
    ) -> Option<Move>
    where
        T: TargetPredicate + ?Sized,
        W: WalkablePredicate + ?Sized,
        R: Rng + ?Sized,
    {
        let mut queue: VecDeque<(Coord, Option<Move>, u32)> = VecDeque::new();
        let mut visited: HashSet<Coord> = HashSet::new();
        queue.push_back((start, None, 0));
        visited.insert(start);

        let mut directions = Move::cardinal();

        while let Some((at, first_move, depth)) = queue.pop_front() {
            let Some(cell) = self.grid.cell_within(&self.bounds, at) else {
                continue;
            };

            if depth > 0 && target.is_target(at, cell) {
                return first_move;
            }

            if depth >= max_depth {
                continue;
            }

            directions.shuffle(rng);
            for dir in directions {
                let next = dir.apply(at);
                if visited.contains(&next) {
                    continue;
                }
                let Some(next_cell) = self.grid.cell_within(&self.bounds, next) else {
                    continue;
                };
                if walkable.is_walkable(next, next_cell) {
                    visited.insert(next);
                    queue.push_back((next, first_move.or(Some(dir)), depth + 1));
                }
            }
        }

        None
    }
}
