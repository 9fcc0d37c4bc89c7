//! Full games between forager bots and random walkers

use pacman_wars::config::Config;
use pacman_wars::simulation::SimulationRunner;
use pacman_wars::types::{AgentId, Cell};
use pacman_wars::world::{BotStatus, World};

fn small_config() -> Config {
    let mut config = Config::default_hardcoded();
    config.simulation.rows = 15;
    config.simulation.cols = 15;
    config.simulation.max_game_moves = 150;
    config.phase.total_game_moves = 150;
    config
}

#[test]
fn test_game_ends_with_consistent_outcome() {
    let config = small_config();
    let outcome = World::generate(&config, 8).run();

    assert!(outcome.turns_lasted <= 150);
    assert_eq!(outcome.final_status.len(), config.simulation.num_bots);
    let alive = outcome
        .final_status
        .values()
        .filter(|&&s| s == BotStatus::Alive)
        .count();
    if !outcome.timed_out {
        assert!(alive <= 1);
    }
    if let Some(winner) = outcome.winner {
        assert!(outcome.final_status.contains_key(&winner));
    }
    assert_eq!(outcome.names[&AgentId(1)], "Forager");
    assert_eq!(outcome.names[&AgentId(4)], "RandomWalker");
}

#[test]
fn test_board_stays_consistent_between_turns() {
    let config = small_config();
    let mut world = World::generate(&config, 3);
    for _ in 0..60 {
        if world.is_over() {
            break;
        }
        world.step();
        let tags = world
            .grid()
            .iter()
            .filter(|(_, c)| matches!(c, Cell::Occupant(_)))
            .count();
        assert_eq!(tags, world.alive_count());
        for n in 1..=config.simulation.num_bots as u32 {
            let id = AgentId(n);
            if world.status_of(id) == Some(BotStatus::Alive) {
                let pos = world.position_of(id).unwrap();
                assert_eq!(world.grid().get(pos), Some(Cell::Occupant(id)));
            }
        }
    }
}

#[test]
fn test_batch_statistics_add_up() {
    let runner = SimulationRunner::new(small_config(), 21);
    let report = runner.run(6);

    assert_eq!(report.games, 6);
    for stats in report.bots.values() {
        assert_eq!(stats.games, 6);
        assert_eq!(stats.wins + stats.losses_killed + stats.losses_score, stats.games);
    }
    let wins: u32 = report.bots.values().map(|s| s.wins).sum();
    assert_eq!(wins + report.draws, report.games);
}

#[test]
fn test_batch_is_reproducible() {
    let a = SimulationRunner::new(small_config(), 77).run(4);
    let b = SimulationRunner::new(small_config(), 77).run(4);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}
