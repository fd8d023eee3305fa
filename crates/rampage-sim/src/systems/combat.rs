//! Combat resolution: area damage against adversaries and bystanders.
//!
//! One query covers melee, vehicle rams and the rampage blast. The resolver
//! only mutates the victims; score and effects are the caller's business.

use glam::Vec2;
use hecs::World;

use rampage_core::components::{Adversary, Bystander};
use rampage_core::constants::*;
use rampage_core::enums::{AiPhase, KillMethod, Tier, VictimKind};
use rampage_core::types::{angle_to, Position};

use rampage_ai::fsm::{hit_reaction, HitReaction};
use rampage_ai::profiles::get_profile;

/// Which pools a query may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetFilter {
    pub adversaries: bool,
    pub bystanders: bool,
}

impl TargetFilter {
    pub const ALL: TargetFilter = TargetFilter {
        adversaries: true,
        bystanders: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageQuery {
    pub origin: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Stop after this many kills; `None` is unbounded.
    pub max_kills: Option<u32>,
    /// Restrict hits to a cone around this direction.
    pub direction: Option<Vec2>,
    /// Half-angle of the cone in radians.
    pub cone_half_angle: f32,
    pub knockback: f32,
    pub method: KillMethod,
    pub targets: TargetFilter,
}

impl DamageQuery {
    /// Single-target swing in front of the player.
    pub fn melee(origin: Vec2, facing: Vec2) -> Self {
        Self {
            origin,
            radius: MELEE_RADIUS,
            damage: MELEE_DAMAGE,
            max_kills: Some(1),
            direction: Some(facing),
            cone_half_angle: MELEE_HALF_ANGLE_DEG.to_radians(),
            knockback: MELEE_KNOCKBACK,
            method: KillMethod::Melee,
            targets: TargetFilter::ALL,
        }
    }

    /// Everything in front of a moving vehicle.
    pub fn ram(origin: Vec2, velocity: Vec2, tier: Tier) -> Self {
        Self {
            origin,
            radius: ram_radius(tier),
            damage: RAM_DAMAGE,
            max_kills: None,
            direction: Some(velocity),
            cone_half_angle: RAM_HALF_ANGLE_DEG.to_radians(),
            knockback: RAM_KNOCKBACK,
            method: KillMethod::VehicleRam,
            targets: TargetFilter::ALL,
        }
    }

    /// 360 degree rampage blast.
    pub fn blast(origin: Vec2) -> Self {
        Self {
            origin,
            radius: BLAST_RADIUS,
            damage: BLAST_DAMAGE,
            max_kills: None,
            direction: None,
            cone_half_angle: std::f32::consts::PI,
            knockback: BLAST_KNOCKBACK,
            method: KillMethod::Blast,
            targets: TargetFilter::ALL,
        }
    }

    /// Whether a target at `point` is inside the radius and cone.
    pub fn covers(&self, point: Vec2) -> bool {
        if self.origin.distance(point) >= self.radius {
            return false;
        }
        match self.direction {
            Some(direction) => angle_to(self.origin, direction, point) <= self.cone_half_angle,
            None => true,
        }
    }

    fn impulse(&self, point: Vec2) -> Vec2 {
        let away = (point - self.origin).normalize_or_zero();
        let away = if away == Vec2::ZERO {
            self.direction.map(Vec2::normalize_or_zero).unwrap_or(Vec2::ZERO)
        } else {
            away
        };
        away * self.knockback
    }
}

/// Ram reach grows with the vehicle.
pub fn ram_radius(tier: Tier) -> f32 {
    match tier {
        Tier::Foot => 0.0,
        Tier::Bike => 1.5,
        Tier::Moto => 1.8,
        Tier::Sedan => 2.4,
        Tier::Truck => 3.0,
    }
}

/// A kill produced by a damage query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillRecord {
    pub victim: VictimKind,
    pub position: Vec2,
    pub method: KillMethod,
    /// The victim was a panicking bystander.
    pub panicked: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatOutcome {
    pub hits: u32,
    pub kills: u32,
}

/// Apply `query` to every living entity it covers, in pool order.
///
/// Kills are appended to `kills`. An entity that is already dead is never hit
/// again, so each victim is reported exactly once.
pub fn damage_in_radius(
    world: &mut World,
    query: &DamageQuery,
    kills: &mut Vec<KillRecord>,
) -> CombatOutcome {
    let mut outcome = CombatOutcome::default();
    let limit_reached = |o: &CombatOutcome| query.max_kills.is_some_and(|max| o.kills >= max);

    if query.targets.adversaries {
        for (_entity, (pos, adversary)) in world.query_mut::<(&Position, &mut Adversary)>() {
            if limit_reached(&outcome) {
                return outcome;
            }
            if !query.covers(pos.0) {
                continue;
            }
            let reaction = hit_reaction(adversary.phase);
            if reaction == HitReaction::Ignore {
                continue;
            }
            outcome.hits += 1;

            let profile = get_profile(adversary.class);
            adversary.health -= query.damage;
            adversary.flash = HIT_FLASH_SECS;
            adversary.knockback += query.impulse(pos.0);

            if adversary.health <= 0.0 {
                adversary.health = 0.0;
                adversary.phase = AiPhase::Dead;
                adversary.death_anim = profile.death_anim_secs;
                adversary.stun_pending = false;
                outcome.kills += 1;
                kills.push(KillRecord {
                    victim: VictimKind::Adversary(adversary.class),
                    position: pos.0,
                    method: query.method,
                    panicked: false,
                });
                continue;
            }

            match reaction {
                HitReaction::Stun => {
                    adversary.phase = AiPhase::HitStunned;
                    adversary.hit_stun = profile.hit_stun_secs;
                }
                HitReaction::Defer => adversary.stun_pending = true,
                HitReaction::Ignore => {}
            }
        }
    }

    if query.targets.bystanders {
        for (_entity, (pos, bystander)) in world.query_mut::<(&Position, &mut Bystander)>() {
            if limit_reached(&outcome) {
                return outcome;
            }
            if bystander.dead || !query.covers(pos.0) {
                continue;
            }
            outcome.hits += 1;
            bystander.health -= query.damage;
            bystander.flash = HIT_FLASH_SECS;
            bystander.knockback += query.impulse(pos.0);
            if bystander.health <= 0.0 {
                bystander.health = 0.0;
                bystander.dead = true;
                outcome.kills += 1;
                kills.push(KillRecord {
                    victim: VictimKind::Bystander,
                    position: pos.0,
                    method: query.method,
                    panicked: bystander.panic > 0.0,
                });
            }
        }
    }

    outcome
}
