//! Monte-Carlo battles built on [`Board::roll`](crate::combat::Board::roll).

pub mod config;
pub mod runner;

pub use config::SimulationConfig;
pub use runner::{simulate, SimulationReport};
