//! Simulation engine for RAMPAGE.
//!
//! Owns the hecs ECS world of adversaries and bystanders, runs every system
//! once per frame in a fixed order, and reports events for the host.

pub mod collaborators;
pub mod engine;
pub mod player;
pub mod probe;
pub mod systems;

pub use engine::{SimConfig, SimulationEngine, TickReport};
pub use rampage_core as core;

#[cfg(test)]
mod tests;
