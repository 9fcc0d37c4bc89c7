//! Per-bot memory that survives between turns
//!
//! Only the bot itself mutates this. Everything else it decides with is
//! rebuilt from the driver's snapshot every turn.

use std::collections::{HashSet, VecDeque};

use crate::config::HistoryConfig;
use crate::types::{Coord, Move};

/// Fixed-capacity ring buffer of recent positions, oldest first
#[derive(Debug, Clone)]
pub struct PositionHistory {
    positions: VecDeque<Coord>,
    capacity: usize,
}

impl PositionHistory {
    pub fn new(capacity: usize) -> Self {
        PositionHistory {
            positions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `pos`, evicting the oldest entry when full
    pub fn push(&mut self, pos: Coord) {
        if self.capacity == 0 {
            return;
        }
        if self.positions.len() == self.capacity {
            self.positions.pop_front();
        }
        self.positions.push_back(pos);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.positions.len() == self.capacity
    }

    pub fn contains(&self, pos: &Coord) -> bool {
        self.positions.contains(pos)
    }

    pub fn distinct(&self) -> usize {
        self.positions.iter().collect::<HashSet<_>>().len()
    }

    /// Mean position, or `None` for an empty history
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.positions.is_empty() {
            return None;
        }
        let n = self.positions.len() as f64;
        let (sx, sy) = self
            .positions
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x as f64, sy + p.y as f64));
        Some((sx / n, sy / n))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coord> {
        self.positions.iter()
    }
}

/// Persistent state of one bot
#[derive(Debug, Clone)]
pub struct AgentState {
    pub position: Coord,
    pub history: PositionHistory,
    pub last_action: Option<Move>,
    pub turn_counter: u32,
    pub stuck_streak: u32,
    stuck_threshold: usize,
}

impl AgentState {
    pub fn new(start: Coord, config: &HistoryConfig) -> Self {
        AgentState {
            position: start,
            history: PositionHistory::new(config.history_length),
            last_action: None,
            turn_counter: 0,
            stuck_streak: 0,
            stuck_threshold: config.stuck_threshold,
        }
    }

    /// Low positional diversity over a full history window
    pub fn is_stuck(&self) -> bool {
        self.history.is_full() && self.history.distinct() <= self.stuck_threshold
    }

    /// Applies the driver's position as ground truth and updates loop bookkeeping.
    /// Returns whether the bot is currently stuck.
    pub fn observe(&mut self, position: Coord) -> bool {
        self.position = position;
        self.history.push(position);
        let stuck = self.is_stuck();
        if stuck {
            self.stuck_streak += 1;
        } else {
            self.stuck_streak = 0;
        }
        stuck
    }
}
