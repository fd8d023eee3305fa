//! Per-tick systems run by the engine, in tick order.
//!
//! Systems are functions (or small controllers) that take the world and the
//! stats blackboard by reference. Cross-entity state lives in the engine.

pub mod action;
pub mod adversary_ai;
pub mod cleanup;
pub mod combat;
pub mod crowd;
pub mod rampage;
pub mod scoring;
pub mod snapshot;
pub mod spawner;
pub mod tier;
