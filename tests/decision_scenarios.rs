//! End-to-end decision scenarios for the forager bot
//!
//! Each test drives `Bot::decide` the way the world driver does: a fresh
//! position and board every turn, with the bot's RNG seeded.

use pacman_wars::bot::Bot;
use pacman_wars::config::Config;
use pacman_wars::strategy::Decision;
use pacman_wars::types::{AgentId, Cell, Coord, Grid, Move, StrengthTable};

const ME: AgentId = AgentId(1);

fn config() -> Config {
    let mut config = Config::default_hardcoded();
    config.debug.rng_seed = Some(2024);
    config
}

fn open_grid(rows: usize, cols: usize) -> Grid {
    Grid::filled(rows, cols, Cell::Walkable)
}

#[test]
fn test_walks_straight_to_nearby_food() {
    let mut grid = open_grid(10, 10);
    grid.set(Coord::new(5, 7), Cell::Food);
    let strengths = StrengthTable::new();
    let mut bot = Bot::new(ME, Coord::new(5, 5), grid.clone(), 10, 10, config());

    let mut pos = Coord::new(5, 5);
    for _ in 0..2 {
        grid.set(pos, Cell::Occupant(ME));
        let mv = bot.decide(pos, &grid, &strengths);
        assert_eq!(mv, Move::Right);
        assert_eq!(bot.last_decision(), Some(Decision::Food));
        grid.set(pos, Cell::Walkable);
        pos = mv.apply(pos);
    }
    assert_eq!(pos, Coord::new(5, 7));
}

#[test]
fn test_never_steps_toward_stronger_neighbor() {
    let mut grid = open_grid(10, 10);
    grid.set(Coord::new(0, 0), Cell::Occupant(ME));
    grid.set(Coord::new(0, 1), Cell::Occupant(AgentId(2)));
    let strengths: StrengthTable = [(ME, 3), (AgentId(2), 5)].into_iter().collect();

    // Different seeds exercise different shuffles
    for seed in 0..20 {
        let mut bot = Bot::new(ME, Coord::new(0, 0), grid.clone(), 10, 10, config())
            .with_rng_seed(seed);
        let mv = bot.decide(Coord::new(0, 0), &grid, &strengths);
        assert_ne!(mv, Move::Right);
        assert_ne!(mv, Move::Halt);
        assert_eq!(mv, Move::Down, "Down is the only safe move");
        assert_eq!(bot.last_decision(), Some(Decision::Escape));
    }
}

#[test]
fn test_escape_prefers_food_when_fleeing() {
    let grid = Grid::parse(
        "G G G G G
         G G 2 G G
         G F 1 F G
         G G G G G",
    )
    .unwrap();
    let strengths: StrengthTable = [(ME, 2), (AgentId(2), 4)].into_iter().collect();
    let mut bot = Bot::new(ME, Coord::new(2, 2), grid.clone(), 4, 5, config());
    let mv = bot.decide(Coord::new(2, 2), &grid, &strengths);
    // Straight away is Down (plain ground); side steps with food lose to it
    assert_eq!(mv, Move::Down);
}

#[test]
fn test_walled_pocket_halts() {
    let grid = Grid::parse(
        "G O G
         O 1 O
         G O G",
    )
    .unwrap();
    let mut bot = Bot::new(ME, Coord::new(1, 1), grid.clone(), 3, 3, config());
    for _ in 0..10 {
        assert_eq!(bot.decide(Coord::new(1, 1), &grid, &StrengthTable::new()), Move::Halt);
    }
}

#[test]
fn test_stuck_bot_explores_onto_open_ground() {
    let grid = open_grid(10, 10);
    let strengths = StrengthTable::new();
    let mut bot = Bot::new(ME, Coord::new(5, 5), grid.clone(), 10, 10, config());

    // The driver keeps reporting the same cell, as if every move bounced
    for turn in 1..=20 {
        let mv = bot.decide(Coord::new(5, 5), &grid, &strengths);
        assert!(Move::cardinal().contains(&mv), "turn {} halted", turn);
        assert_eq!(grid.get(mv.apply(Coord::new(5, 5))), Some(Cell::Walkable));
        if turn >= 8 {
            assert_eq!(bot.last_decision(), Some(Decision::Explore));
            assert!(bot.state().is_stuck());
        }
    }
    assert!(bot.state().stuck_streak >= 10);
}

#[test]
fn test_hunting_waits_for_mid_game() {
    let grid = Grid::parse("1 G G 2 G G G").unwrap();
    let strengths: StrengthTable = [(ME, 10), (AgentId(2), 1)].into_iter().collect();

    let mut early = config();
    early.phase.total_game_moves = 1000;
    let mut bot = Bot::new(ME, Coord::new(0, 0), grid.clone(), 1, 7, early);
    bot.decide(Coord::new(0, 0), &grid, &strengths);
    assert_ne!(bot.last_decision(), Some(Decision::Hunt));

    let mut late = config();
    late.phase.early_game_fraction = 0.0;
    let mut bot = Bot::new(ME, Coord::new(0, 0), grid.clone(), 1, 7, late);
    let mv = bot.decide(Coord::new(0, 0), &grid, &strengths);
    assert_eq!(mv, Move::Right);
    assert_eq!(bot.last_decision(), Some(Decision::Hunt));
}

#[test]
fn test_prey_within_margin_is_left_alone() {
    let grid = Grid::parse("1 G 2 G").unwrap();
    // 6 > 1 + 5 is false, so no hunt
    let strengths: StrengthTable = [(ME, 6), (AgentId(2), 1)].into_iter().collect();
    let mut config = config();
    config.phase.early_game_fraction = 0.0;
    let mut bot = Bot::new(ME, Coord::new(0, 0), grid.clone(), 1, 4, config);
    bot.decide(Coord::new(0, 0), &grid, &strengths);
    assert_ne!(bot.last_decision(), Some(Decision::Hunt));
}

#[test]
fn test_perimeter_patrol_runs_clockwise() {
    let grid = open_grid(6, 6);
    let strengths = StrengthTable::new();
    let mut bot = Bot::new(ME, Coord::new(0, 0), grid.clone(), 6, 6, config());

    let mut pos = Coord::new(0, 0);
    let mut moves = Vec::new();
    for _ in 0..10 {
        let mv = bot.decide(pos, &grid, &strengths);
        assert_eq!(bot.last_decision(), Some(Decision::Patrol));
        moves.push(mv);
        pos = mv.apply(pos);
    }
    let expected: Vec<Move> = std::iter::repeat(Move::Right)
        .take(5)
        .chain(std::iter::repeat(Move::Down).take(5))
        .collect();
    assert_eq!(moves, expected);
    assert_eq!(pos, Coord::new(5, 5));
}

#[test]
fn test_fogged_cells_are_not_entered() {
    let grid = Grid::parse(
        "U U U
         U 1 G
         U U U",
    )
    .unwrap();
    let mut bot = Bot::new(ME, Coord::new(1, 1), grid.clone(), 3, 3, config());
    for _ in 0..5 {
        let mv = bot.decide(Coord::new(1, 1), &grid, &StrengthTable::new());
        assert_eq!(mv, Move::Right);
    }
}
