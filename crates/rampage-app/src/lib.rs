//! RAMPAGE headless host.
//!
//! Wires the simulation crates to a real-time loop thread and a demo town,
//! standing in for the scene and UI layers.

pub mod city;
pub mod game_loop;
pub mod state;

pub use rampage_core as core;
