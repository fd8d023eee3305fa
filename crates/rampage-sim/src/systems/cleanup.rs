//! Cleanup: removes finished entities and releases their physics bodies.

use glam::Vec2;
use hecs::{Entity, World};

use rampage_core::components::{Adversary, Bystander};
use rampage_core::constants::CROWD_DESPAWN_RADIUS;
use rampage_core::enums::{AdversaryClass, AiPhase};
use rampage_core::types::Position;

use crate::collaborators::PhysicsMut;

/// Purge dead adversaries of `class` whose death animation has finished.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn purge_finished(
    world: &mut World,
    class: AdversaryClass,
    mut physics: PhysicsMut<'_>,
    despawn_buffer: &mut Vec<Entity>,
) -> usize {
    despawn_buffer.clear();
    for (entity, adversary) in world.query_mut::<&Adversary>() {
        if adversary.class != class
            || adversary.phase != AiPhase::Dead
            || adversary.death_anim > 0.0
        {
            continue;
        }
        if let (Some(physics), Some(body)) = (physics.as_deref_mut(), adversary.body) {
            physics.remove_body(body);
        }
        despawn_buffer.push(entity);
    }
    despawn(world, despawn_buffer)
}

/// Purge dead bystanders and those that wandered too far from `center`.
pub fn purge_bystanders(
    world: &mut World,
    center: Vec2,
    mut physics: PhysicsMut<'_>,
    despawn_buffer: &mut Vec<Entity>,
) -> usize {
    despawn_buffer.clear();
    for (entity, (pos, bystander)) in world.query_mut::<(&Position, &Bystander)>() {
        if !bystander.dead && pos.0.distance(center) <= CROWD_DESPAWN_RADIUS {
            continue;
        }
        if let (Some(physics), Some(body)) = (physics.as_deref_mut(), bystander.body) {
            physics.remove_body(body);
        }
        despawn_buffer.push(entity);
    }
    despawn(world, despawn_buffer)
}

/// Remove every adversary and bystander, e.g. when a new run starts.
pub fn clear_all(world: &mut World, mut physics: PhysicsMut<'_>) {
    if let Some(physics) = physics.as_deref_mut() {
        for (_entity, adversary) in world.query_mut::<&Adversary>() {
            if let Some(body) = adversary.body {
                physics.remove_body(body);
            }
        }
        for (_entity, bystander) in world.query_mut::<&Bystander>() {
            if let Some(body) = bystander.body {
                physics.remove_body(body);
            }
        }
    }
    world.clear();
}

fn despawn(world: &mut World, despawn_buffer: &mut Vec<Entity>) -> usize {
    let count = despawn_buffer.len();
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    count
}
