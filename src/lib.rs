// Library exports for the Pacman Wars forager bot
// The simulation binary and the integration tests drive the bot through these

pub mod bfs;
pub mod bot;
pub mod config;
pub mod error;
pub mod simulation;
pub mod state;
pub mod strategy;
pub mod threat;
pub mod types;
pub mod world;
