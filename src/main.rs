//! Pacman Wars simulation runner
//!
//! Plays a batch of headless games between forager bots and random walkers
//! and prints per-bot statistics.
//!
//! Usage:
//!   pacman-wars [--games N] [--seed S] [--config PATH] [--json]

use log::info;
use pacman_wars::config::Config;
use pacman_wars::simulation::SimulationRunner;
use std::env;

struct Args {
    games: Option<u32>,
    seed: Option<u64>,
    config_path: Option<String>,
    json: bool,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [--games N] [--seed S] [--config PATH] [--json]", program);
    eprintln!("  --games N       Number of games to play (default: simulation.num_simulations)");
    eprintln!("  --seed S        Base seed for map generation and bots");
    eprintln!("  --config PATH   Configuration file (default: Agent.toml)");
    eprintln!("  --json          Print the report as JSON");
    eprintln!("Example: {} --games 50 --seed 7", program);
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        games: None,
        seed: None,
        config_path: None,
        json: false,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--games" => {
                let value = iter.next().ok_or("--games needs a value")?;
                parsed.games = Some(
                    value
                        .parse()
                        .map_err(|e| format!("Invalid game count '{}': {}", value, e))?,
                );
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                parsed.seed = Some(
                    value
                        .parse()
                        .map_err(|e| format!("Invalid seed '{}': {}", value, e))?,
                );
            }
            "--config" => {
                let value = iter.next().ok_or("--config needs a value")?;
                parsed.config_path = Some(value.clone());
            }
            "--json" => parsed.json = true,
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(parsed)
}

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("pacman-wars", String::as_str);

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage(program);
        return;
    }

    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(program);
            std::process::exit(1);
        }
    };

    let config = match &parsed.config_path {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::load_or_default(),
    };

    let games = parsed.games.unwrap_or(config.simulation.num_simulations);
    let seed = parsed
        .seed
        .or(config.simulation.seed)
        .unwrap_or_else(rand::random);
    info!("Base seed: {}", seed);

    let report = SimulationRunner::new(config, seed).run(games);

    if parsed.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to serialize report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        report.print();
    }
}
