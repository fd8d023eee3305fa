//! Adversary AI for RAMPAGE.
//!
//! Implements the per-agent chase/attack state machine, wanted-level
//! attack selection, and class-driven behavior profiles.

pub mod fsm;
pub mod profiles;

pub use rampage_core as core;
