// Pacman Wars grid types
// Cell tags follow the game's single-character encoding: G, F, O, R, U or a bot id

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of a bot on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D coordinate on the board. `x` is the row, `y` the column.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    pub fn distance_sq(&self, cx: f64, cy: f64) -> f64 {
        let dx = self.x as f64 - cx;
        let dy = self.y as f64 - cy;
        dx * dx + dy * dy
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// One of the five moves a bot may return each turn
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
    Halt,
}

impl Move {
    /// Returns the four cardinal moves. `Halt` is never a search edge.
    pub fn cardinal() -> [Move; 4] {
        [Move::Up, Move::Down, Move::Left, Move::Right]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
            Move::Halt => "halt",
        }
    }

    /// Row/column delta. Up decreases the row index.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
            Move::Halt => (0, 0),
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: Coord) -> Coord {
        let (dx, dy) = self.delta();
        Coord {
            x: coord.x + dx,
            y: coord.y + dy,
        }
    }

    /// The reversing move, if any. Halt has no opposite.
    pub fn opposite(&self) -> Option<Move> {
        match self {
            Move::Up => Some(Move::Down),
            Move::Down => Some(Move::Up),
            Move::Left => Some(Move::Right),
            Move::Right => Some(Move::Left),
            Move::Halt => None,
        }
    }

    /// True if `self` exactly undoes `last`
    pub fn reverses(&self, last: Option<Move>) -> bool {
        last.and_then(|m| m.opposite()) == Some(*self)
    }
}

/// Decoded content of one board cell
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Walkable,
    Food,
    Obstacle,
    OutOfBounds,
    Unknown,
    Occupant(AgentId),
}

impl Cell {
    /// Walkable or Food: a bot may step here without a fight
    pub fn is_open(&self) -> bool {
        matches!(self, Cell::Walkable | Cell::Food)
    }

    /// Returns the occupying bot unless it is `me`
    pub fn other_agent(&self, me: AgentId) -> Option<AgentId> {
        match self {
            Cell::Occupant(id) if *id != me => Some(*id),
            _ => None,
        }
    }
}

impl FromStr for Cell {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "G" => Ok(Cell::Walkable),
            "F" => Ok(Cell::Food),
            "O" => Ok(Cell::Obstacle),
            "R" => Ok(Cell::OutOfBounds),
            "U" => Ok(Cell::Unknown),
            other => other
                .parse::<u32>()
                .map(|id| Cell::Occupant(AgentId(id)))
                .map_err(|_| format!("Invalid cell tag: '{}'", other)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Walkable => write!(f, "G"),
            Cell::Food => write!(f, "F"),
            Cell::Obstacle => write!(f, "O"),
            Cell::OutOfBounds => write!(f, "R"),
            Cell::Unknown => write!(f, "U"),
            Cell::Occupant(id) => write!(f, "{}", id),
        }
    }
}

/// Map dimensions fixed when a bot is created
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub length: i32,
    pub breadth: i32,
}

impl Bounds {
    pub fn new(length: i32, breadth: i32) -> Self {
        Bounds { length, breadth }
    }

    /// Fails closed on degenerate dimensions
    pub fn contains(&self, c: Coord) -> bool {
        self.length > 0 && self.breadth > 0 && c.x >= 0 && c.x < self.length && c.y >= 0 && c.y < self.breadth
    }
}

/// Row-major board snapshot
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// A `length x breadth` grid filled with `fill`
    pub fn filled(length: usize, breadth: usize, fill: Cell) -> Self {
        Grid {
            cells: vec![vec![fill; breadth]; length],
        }
    }

    /// Parses whitespace-separated tags, one row per line.
    /// Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, String> {
        let cells = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split_whitespace().map(str::parse).collect::<Result<Vec<Cell>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Grid { cells })
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }

    /// Cell at `c`, or `None` when the backing array does not reach it
    pub fn get(&self, c: Coord) -> Option<Cell> {
        if c.x < 0 || c.y < 0 {
            return None;
        }
        self.cells.get(c.x as usize)?.get(c.y as usize).copied()
    }

    /// Cell at `c` checked against the stored dimensions first
    pub fn cell_within(&self, bounds: &Bounds, c: Coord) -> Option<Cell> {
        if !bounds.contains(c) {
            return None;
        }
        self.get(c)
    }

    /// Writes `cell` at `c`. Out-of-range writes are ignored.
    pub fn set(&mut self, c: Coord, cell: Cell) {
        if c.x < 0 || c.y < 0 {
            return;
        }
        if let Some(slot) = self.cells.get_mut(c.x as usize).and_then(|row| row.get_mut(c.y as usize)) {
            *slot = cell;
        }
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().flatten().filter(|&&c| c == cell).count()
    }

    /// Iterates every coordinate with its cell
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(x, row)| {
            row.iter()
                .enumerate()
                .map(move |(y, &cell)| (Coord::new(x as i32, y as i32), cell))
        })
    }

    /// Text view of the square window around `center`, marking the center with `>..<`
    pub fn render_window(&self, bounds: &Bounds, center: Coord, radius: i32) -> String {
        let mut out = String::new();
        for x in (center.x - radius).max(0)..=(center.x + radius).min(bounds.length - 1) {
            out.push_str(&format!("{:2}: ", x));
            for y in (center.y - radius)..=(center.y + radius) {
                let at = Coord::new(x, y);
                match self.cell_within(bounds, at) {
                    Some(cell) if at == center => out.push_str(&format!(">{:<3}<", cell.to_string())),
                    Some(cell) => out.push_str(&format!(" {:<3} ", cell.to_string())),
                    None => out.push_str("  OOB "),
                }
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: Vec<String> = row.iter().map(Cell::to_string).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Food count per bot. Unseen bots count as the default strength, never zero.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct StrengthTable {
    food: HashMap<AgentId, u32>,
}

impl StrengthTable {
    pub const DEFAULT_STRENGTH: u32 = 1;

    pub fn new() -> Self {
        StrengthTable::default()
    }

    pub fn set(&mut self, id: AgentId, food: u32) {
        self.food.insert(id, food);
    }

    pub fn get(&self, id: AgentId) -> Option<u32> {
        self.food.get(&id).copied()
    }

    pub fn strength_of(&self, id: AgentId) -> u32 {
        self.get(id).unwrap_or(Self::DEFAULT_STRENGTH)
    }
}

impl FromIterator<(AgentId, u32)> for StrengthTable {
    fn from_iter<I: IntoIterator<Item = (AgentId, u32)>>(iter: I) -> Self {
        StrengthTable {
            food: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_tags_decode() {
        assert_eq!("G".parse::<Cell>().unwrap(), Cell::Walkable);
        assert_eq!("F".parse::<Cell>().unwrap(), Cell::Food);
        assert_eq!("O".parse::<Cell>().unwrap(), Cell::Obstacle);
        assert_eq!("R".parse::<Cell>().unwrap(), Cell::OutOfBounds);
        assert_eq!("U".parse::<Cell>().unwrap(), Cell::Unknown);
        assert_eq!("12".parse::<Cell>().unwrap(), Cell::Occupant(AgentId(12)));
        assert!("W".parse::<Cell>().is_err());
        assert!("-3".parse::<Cell>().is_err());
    }

    #[test]
    fn test_opposites_and_reversal() {
        for m in Move::cardinal() {
            let back = m.opposite().unwrap();
            assert_eq!(back.apply(m.apply(Coord::new(3, 3))), Coord::new(3, 3));
            assert!(back.reverses(Some(m)));
        }
        assert_eq!(Move::Halt.opposite(), None);
        assert!(!Move::Up.reverses(None));
        assert!(!Move::Up.reverses(Some(Move::Halt)));
    }

    #[test]
    fn test_grid_access_fails_closed() {
        let grid = Grid::parse("G F\nO 2").unwrap();
        let bounds = Bounds::new(3, 3);
        assert_eq!(grid.get(Coord::new(0, 1)), Some(Cell::Food));
        assert_eq!(grid.get(Coord::new(-1, 0)), None);
        // Stored dimensions are larger than the snapshot
        assert_eq!(grid.cell_within(&bounds, Coord::new(2, 2)), None);
        // Snapshot is larger than the stored dimensions
        assert_eq!(grid.cell_within(&Bounds::new(1, 1), Coord::new(1, 1)), None);
        assert_eq!(grid.cell_within(&bounds, Coord::new(1, 1)), Some(Cell::Occupant(AgentId(2))));
    }

    #[test]
    fn test_unseen_strength_defaults_to_one() {
        let mut table = StrengthTable::new();
        table.set(AgentId(1), 0);
        assert_eq!(table.strength_of(AgentId(1)), 0);
        assert_eq!(table.strength_of(AgentId(9)), 1);
    }

    #[test]
    fn test_render_window_marks_center() {
        let grid = Grid::filled(3, 3, Cell::Walkable);
        let view = grid.render_window(&Bounds::new(3, 3), Coord::new(0, 0), 1);
        assert!(view.contains(">G"));
        assert!(view.contains("OOB"));
        assert_eq!(view.lines().count(), 2);
    }
}
