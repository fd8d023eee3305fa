//! Bystander crowd: keeps a population of civilians around the player,
//! wanders them about and makes them flee from nearby kills.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rampage_core::components::Bystander;
use rampage_core::constants::*;
use rampage_core::types::{heading, Position, Velocity};

use crate::collaborators::{ColliderGroup, CollisionFilter, PhysicsMut};
use crate::probe;
use crate::systems::cleanup;
use crate::systems::combat::KillRecord;

/// Closest a new bystander may appear to the player.
const CROWD_MIN_SPAWN_DISTANCE: f32 = 6.0;
/// How far a wander target may lie from the bystander.
const WANDER_RANGE: f32 = 6.0;

#[derive(Debug, Clone)]
pub struct CrowdController {
    target_size: usize,
}

impl Default for CrowdController {
    fn default() -> Self {
        Self::new(CROWD_SIZE)
    }
}

impl CrowdController {
    pub fn new(target_size: usize) -> Self {
        Self { target_size }
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }

    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        player_position: Vec2,
        kills: &[KillRecord],
        mut physics: PhysicsMut<'_>,
        despawn_buffer: &mut Vec<Entity>,
        dt: f32,
    ) {
        cleanup::purge_bystanders(world, player_position, physics.as_deref_mut(), despawn_buffer);

        let mut living = 0;
        for (_entity, (pos, bystander)) in world.query_mut::<(&Position, &mut Bystander)>() {
            if kills.iter().any(|k| k.position.distance(pos.0) <= PANIC_RADIUS) {
                bystander.panic = PANIC_SECS;
            }
            living += 1;
        }

        for _ in living..self.target_size {
            spawn_bystander(world, rng, player_position, physics.as_deref_mut());
        }

        if dt <= 0.0 {
            return;
        }
        let damping = (1.0 - KNOCKBACK_DAMPING * dt).max(0.0);
        for (_entity, (pos, vel, bystander)) in
            world.query_mut::<(&mut Position, &mut Velocity, &mut Bystander)>()
        {
            bystander.flash = (bystander.flash - dt).max(0.0);
            bystander.panic = (bystander.panic - dt).max(0.0);

            vel.0 = if bystander.panic > 0.0 {
                (pos.0 - player_position).normalize_or_zero() * BYSTANDER_FLEE_SPEED
            } else {
                if pos.0.distance(bystander.wander_target) < 0.5 {
                    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                    let reach = rng.gen_range(1.0..WANDER_RANGE);
                    bystander.wander_target = pos.0 + heading(angle) * reach;
                }
                (bystander.wander_target - pos.0).normalize_or_zero() * BYSTANDER_WALK_SPEED
            };

            let displacement = (vel.0 + bystander.knockback) * dt;
            let moved = match (physics.as_deref_mut(), bystander.body) {
                (Some(physics), Some(body)) => {
                    physics.compute_movement(body, pos.0, displacement, CollisionFilter::world())
                }
                _ => displacement,
            };
            pos.0 += moved;
            bystander.knockback *= damping;
        }
    }
}

fn spawn_bystander(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    around: Vec2,
    physics: PhysicsMut<'_>,
) -> Entity {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let distance = rng.gen_range(CROWD_MIN_SPAWN_DISTANCE..=CROWD_RADIUS);
    let candidate = around + heading(angle) * distance;

    let (position, body) = match physics {
        Some(physics) => {
            let position = probe::relocate(Some(&*physics), candidate);
            let body =
                physics.create_body(ColliderGroup::Bystander, position, PLAYER_COLLIDER_RADIUS);
            (position, Some(body))
        }
        None => (candidate, None),
    };

    world.spawn((
        Position(position),
        Velocity::default(),
        Bystander {
            health: BYSTANDER_HEALTH,
            panic: 0.0,
            wander_target: position,
            knockback: Vec2::ZERO,
            flash: 0.0,
            dead: false,
            body,
        },
    ))
}
