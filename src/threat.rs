// Threat assessment around the bot's current cell
//
// Only the four adjacent cells matter here. An adjacent bot at least as strong
// as we are is a threat: equal-strength fights are treated as losing.

use crate::types::{AgentId, Bounds, Cell, Coord, Grid, Move, StrengthTable};

/// Adjacent cells as seen from one position
pub struct Surroundings<'a> {
    grid: &'a Grid,
    bounds: Bounds,
    at: Coord,
}

impl<'a> Surroundings<'a> {
    pub fn new(grid: &'a Grid, bounds: Bounds, at: Coord) -> Self {
        Surroundings { grid, bounds, at }
    }

    /// The cell one step away in `dir`, or `None` outside the known map
    pub fn cell(&self, dir: Move) -> Option<Cell> {
        self.grid.cell_within(&self.bounds, dir.apply(self.at))
    }

    /// Walkable or Food, inside the stored dimensions
    pub fn is_safe(&self, dir: Move) -> bool {
        self.cell(dir).is_some_and(|cell| cell.is_open())
    }

    pub fn is_food(&self, dir: Move) -> bool {
        self.cell(dir) == Some(Cell::Food)
    }

    /// Cardinal moves whose destination is safe, with destinations
    pub fn safe_moves(&self) -> Vec<(Move, Coord)> {
        Move::cardinal()
            .into_iter()
            .filter(|&dir| self.is_safe(dir))
            .map(|dir| (dir, dir.apply(self.at)))
            .collect()
    }

    /// Directions holding another bot whose strength is >= `my_strength`
    ///
    /// # Arguments
    /// * `me` - Our own id; our own cell tag is never a threat
    /// * `my_strength` - Our current food count
    /// * `strengths` - Unseen bots count as the default strength
    pub fn find_threats(&self, me: AgentId, my_strength: u32, strengths: &StrengthTable) -> Vec<Move> {
        Move::cardinal()
            .into_iter()
            .filter(|&dir| {
                self.cell(dir)
                    .and_then(|cell| cell.other_agent(me))
                    .is_some_and(|other| strengths.strength_of(other) >= my_strength)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(u32, u32)]) -> StrengthTable {
        entries.iter().map(|&(id, food)| (AgentId(id), food)).collect()
    }

    #[test]
    fn test_equal_strength_is_a_threat() {
        let grid = Grid::parse("G 2 G\n3 1 4\nG 5 G").unwrap();
        let strengths = table(&[(1, 3), (2, 3), (3, 2), (4, 9)]);
        let around = Surroundings::new(&grid, Bounds::new(3, 3), Coord::new(1, 1));

        let threats = around.find_threats(AgentId(1), 3, &strengths);
        // 2 ties us, 4 is stronger, 3 is weaker, 5 is unseen and defaults to 1
        assert_eq!(threats, vec![Move::Up, Move::Right]);
    }

    #[test]
    fn test_unseen_bot_threatens_weakest_self() {
        let grid = Grid::parse("1 7").unwrap();
        let around = Surroundings::new(&grid, Bounds::new(1, 2), Coord::new(0, 0));
        let threats = around.find_threats(AgentId(1), 1, &StrengthTable::new());
        assert_eq!(threats, vec![Move::Right]);
    }

    #[test]
    fn test_own_tag_and_terrain_are_not_threats() {
        let grid = Grid::parse("O 1 R\nU F G").unwrap();
        let around = Surroundings::new(&grid, Bounds::new(2, 3), Coord::new(0, 1));
        assert!(around.find_threats(AgentId(1), 0, &StrengthTable::new()).is_empty());
    }

    #[test]
    fn test_safe_moves_exclude_blocked_and_off_map() {
        let grid = Grid::parse("G 1 O\nU F G").unwrap();
        let around = Surroundings::new(&grid, Bounds::new(2, 3), Coord::new(0, 1));
        let safe: Vec<Move> = around.safe_moves().into_iter().map(|(m, _)| m).collect();
        assert_eq!(safe, vec![Move::Down, Move::Left]);
        assert!(around.is_food(Move::Down));
        assert!(!around.is_safe(Move::Up));
    }
}
