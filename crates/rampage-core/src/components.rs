//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Opaque handle to a body owned by the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

/// Law-enforcement agent hunting the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adversary {
    pub class: AdversaryClass,
    pub phase: AiPhase,
    pub health: f32,
    pub max_health: f32,
    /// Seconds until another attack may start.
    pub attack_cooldown: f32,
    /// Seconds of hit stun remaining.
    pub hit_stun: f32,
    /// Hit taken during an attack animation; applied when it ends.
    pub stun_pending: bool,
    /// Attack currently playing (meaningful while Attacking).
    pub attack_kind: AttackKind,
    /// Seconds into the current attack animation.
    pub attack_elapsed: f32,
    /// Whether the current attack already dealt its damage.
    pub attack_dealt: bool,
    /// Seconds of terminal animation left once Dead.
    pub death_anim: f32,
    /// Decaying impulse from hits, added on top of steering.
    pub knockback: Vec2,
    /// Seconds of white flash remaining.
    pub flash: f32,
    /// Facing direction (unit vector).
    pub facing: Vec2,
    pub body: Option<BodyHandle>,
}

/// Civilian wandering the streets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bystander {
    pub health: f32,
    /// Seconds of panic remaining. Panicked bystanders flee the player.
    pub panic: f32,
    pub wander_target: Vec2,
    pub knockback: Vec2,
    pub flash: f32,
    pub dead: bool,
    pub body: Option<BodyHandle>,
}
