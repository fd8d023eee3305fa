//! Adversary AI system: runs the state machine for every adversary and
//! integrates their movement.
//!
//! Calls the FSM from rampage-ai, writes the results back onto the
//! component, then steers chasing agents toward the player. Attacks that
//! connect are reported to the caller, which decides what they hit.

use glam::Vec2;
use hecs::World;

use rampage_core::components::Adversary;
use rampage_core::constants::KNOCKBACK_DAMPING;
use rampage_core::enums::{AdversaryClass, AiPhase, AttackKind};
use rampage_core::types::{Position, Velocity};

use rampage_ai::fsm::{evaluate, AdversaryContext};
use rampage_ai::profiles::get_profile;

use crate::collaborators::{CollisionFilter, PhysicsMut, Steering};

/// Per-tick inputs shared by every agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiFrame {
    pub target: Vec2,
    pub wanted_stars: u8,
    pub target_immune: bool,
    /// Adversary-scaled seconds.
    pub dt: f32,
}

/// An attack that connected this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackLanded {
    pub class: AdversaryClass,
    pub kind: AttackKind,
    pub from: Vec2,
}

/// Run the AI for every adversary. Landed attacks are appended to `landed`.
pub fn run(
    world: &mut World,
    frame: &AiFrame,
    steering: &mut dyn Steering,
    mut physics: PhysicsMut<'_>,
    landed: &mut Vec<AttackLanded>,
) {
    let dt = frame.dt;
    if dt <= 0.0 {
        return;
    }
    let damping = (1.0 - KNOCKBACK_DAMPING * dt).max(0.0);

    for (_entity, (pos, vel, adversary)) in
        world.query_mut::<(&mut Position, &mut Velocity, &mut Adversary)>()
    {
        adversary.flash = (adversary.flash - dt).max(0.0);

        if adversary.phase == AiPhase::Dead {
            adversary.death_anim = (adversary.death_anim - dt).max(0.0);
        } else {
            let update = evaluate(&AdversaryContext {
                class: adversary.class,
                phase: adversary.phase,
                health: adversary.health,
                distance_to_target: pos.0.distance(frame.target),
                wanted_stars: frame.wanted_stars,
                target_immune: frame.target_immune,
                attack_cooldown: adversary.attack_cooldown,
                hit_stun: adversary.hit_stun,
                stun_pending: adversary.stun_pending,
                attack_kind: adversary.attack_kind,
                attack_elapsed: adversary.attack_elapsed,
                attack_dealt: adversary.attack_dealt,
                dt,
            });

            adversary.phase = update.new_phase;
            adversary.attack_cooldown = update.attack_cooldown;
            adversary.hit_stun = update.hit_stun;
            adversary.stun_pending = update.stun_pending;
            adversary.attack_kind = update.attack_kind;
            adversary.attack_elapsed = update.attack_elapsed;
            adversary.attack_dealt = update.attack_dealt;
            if adversary.phase == AiPhase::Dead {
                adversary.death_anim = get_profile(adversary.class).death_anim_secs;
            }

            let to_target = (frame.target - pos.0).normalize_or_zero();
            if to_target != Vec2::ZERO && (update.moves || adversary.phase == AiPhase::Attacking) {
                adversary.facing = to_target;
            }
            if let Some(kind) = update.landed {
                landed.push(AttackLanded {
                    class: adversary.class,
                    kind,
                    from: pos.0,
                });
            }

            let desired = if update.moves {
                let speed = get_profile(adversary.class).move_speed;
                steering.desired_velocity(pos.0, frame.target, speed)
            } else {
                Vec2::ZERO
            };
            vel.0 = desired;
        }

        if adversary.phase == AiPhase::Dead {
            vel.0 = Vec2::ZERO;
        }
        let displacement = (vel.0 + adversary.knockback) * dt;
        let moved = match (physics.as_deref_mut(), adversary.body) {
            (Some(physics), Some(body)) => {
                physics.compute_movement(body, pos.0, displacement, CollisionFilter::world())
            }
            _ => displacement,
        };
        pos.0 += moved;
        adversary.knockback *= damping;
    }
}
