//! Tier progression: unlocking, spawning, swapping and disposing of vehicles.
//!
//! The player climbs FOOT -> BIKE -> MOTO -> SEDAN -> TRUCK by score. At most
//! one current vehicle (the one the player owns) and one awaiting vehicle
//! (the next tier, parked nearby with a pulsing glow) exist at a time.

use glam::Vec2;
use hecs::World;

use rampage_core::components::{Adversary, BodyHandle};
use rampage_core::config::TierTuning;
use rampage_core::constants::*;
use rampage_core::enums::{AdversaryClass, AiPhase, EffectKind, Tier};
use rampage_core::events::GameEvent;
use rampage_core::state::GameStats;
use rampage_core::types::Position;

use rampage_ai::profiles::get_profile;

use crate::collaborators::{ColliderGroup, PhysicsMut};
use crate::player::Player;
use crate::probe;

/// Per-tier ride characteristics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSpec {
    pub max_health: f32,
    pub speed: f32,
    pub collider_radius: f32,
}

pub fn vehicle_spec(tier: Tier) -> VehicleSpec {
    match tier {
        Tier::Foot => VehicleSpec {
            max_health: 0.0,
            speed: PLAYER_FOOT_SPEED,
            collider_radius: PLAYER_COLLIDER_RADIUS,
        },
        Tier::Bike => VehicleSpec {
            max_health: 60.0,
            speed: 9.0,
            collider_radius: 0.6,
        },
        Tier::Moto => VehicleSpec {
            max_health: 90.0,
            speed: 14.0,
            collider_radius: 0.7,
        },
        Tier::Sedan => VehicleSpec {
            max_health: 200.0,
            speed: 16.0,
            collider_radius: 1.2,
        },
        Tier::Truck => VehicleSpec {
            max_health: 400.0,
            speed: 13.0,
            collider_radius: 1.6,
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: u32,
    pub tier: Tier,
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub destroyed: bool,
    pub body: Option<BodyHandle>,
}

impl Vehicle {
    pub fn health_percent(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health * 100.0).clamp(0.0, 100.0)
    }
}

/// Glow registered on an awaiting vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub vehicle_id: u32,
    pub base_intensity: f32,
}

#[derive(Debug, Clone)]
struct PendingDisposal {
    vehicle: Vehicle,
    remaining: f32,
}

/// Next tier to unlock, if `score` has reached it.
pub fn check_tier_progression(score: u64, effective: Tier, tuning: &TierTuning) -> Option<Tier> {
    let next = effective.next()?;
    (score >= tuning.threshold(next)).then_some(next)
}

#[derive(Debug, Default)]
pub struct TierProgression {
    current: Option<Vehicle>,
    awaiting: Option<Vehicle>,
    ever_spawned: bool,
    respawn_cooldown: f32,
    disposal: Vec<PendingDisposal>,
    glows: Vec<Glow>,
    glow_clock: f32,
    next_vehicle_id: u32,
}

impl TierProgression {
    pub fn current(&self) -> Option<&Vehicle> {
        self.current.as_ref()
    }

    pub fn awaiting(&self) -> Option<&Vehicle> {
        self.awaiting.as_ref()
    }

    pub fn glows(&self) -> &[Glow] {
        &self.glows
    }

    pub fn pending_disposals(&self) -> usize {
        self.disposal.len()
    }

    pub fn respawn_cooldown(&self) -> f32 {
        self.respawn_cooldown
    }

    /// Tier of the current vehicle, or FOOT without one.
    pub fn effective_tier(&self) -> Tier {
        self.current.as_ref().map_or(Tier::Foot, |v| v.tier)
    }

    pub fn near_current(&self, point: Vec2) -> bool {
        self.current
            .as_ref()
            .is_some_and(|v| v.position.distance(point) <= ENTER_VEHICLE_RANGE)
    }

    pub fn near_awaiting(&self, point: Vec2) -> bool {
        self.awaiting
            .as_ref()
            .is_some_and(|v| v.position.distance(point) <= SWITCH_VEHICLE_RANGE)
    }

    /// Body the player moves with: the vehicle while riding.
    pub fn ridden_body(&self, player: &Player) -> Option<BodyHandle> {
        if player.riding {
            self.current.as_ref().and_then(|v| v.body)
        } else {
            player.body
        }
    }

    /// Top speed for the player's current mode of travel.
    pub fn player_speed(&self, player: &Player) -> f32 {
        match (&self.current, player.riding) {
            (Some(vehicle), true) => vehicle_spec(vehicle.tier).speed,
            _ => PLAYER_FOOT_SPEED,
        }
    }

    /// Route damage to the ridden vehicle.
    pub fn damage_current(&mut self, amount: f32) {
        if let Some(vehicle) = self.current.as_mut() {
            vehicle.health -= amount;
        }
    }

    /// One progression step.
    pub fn run(
        &mut self,
        stats: &mut GameStats,
        tuning: &TierTuning,
        player: &mut Player,
        mut physics: PhysicsMut<'_>,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        self.respawn_cooldown = (self.respawn_cooldown - dt).max(0.0);
        self.tick_disposal(physics.as_deref_mut(), dt);
        self.check_destroyed(player, tuning, events);

        if player.riding {
            if let Some(vehicle) = self.current.as_mut() {
                vehicle.position = player.position;
            }
        }

        if let Some(next) = check_tier_progression(stats.score, self.effective_tier(), tuning) {
            if self.awaiting.is_none() {
                if self.current.is_none() {
                    if !self.ever_spawned || self.respawn_cooldown <= 0.0 {
                        let vehicle = self.spawn_vehicle(next, player, physics.as_deref_mut());
                        log::info!("Unlocked {next:?} at score {}", stats.score);
                        events.push(GameEvent::TierUnlocked {
                            tier: next,
                            as_awaiting: false,
                        });
                        self.current = Some(vehicle);
                    }
                } else if player.riding {
                    let vehicle = self.spawn_vehicle(next, player, physics.as_deref_mut());
                    log::info!("{next:?} waiting beside the player at score {}", stats.score);
                    events.push(GameEvent::TierUnlocked {
                        tier: next,
                        as_awaiting: true,
                    });
                    self.glows.push(Glow {
                        vehicle_id: vehicle.id,
                        base_intensity: GLOW_BASE_INTENSITY,
                    });
                    self.awaiting = Some(vehicle);
                }
            }
        }

        self.glow_clock += dt;
        let pulse = 0.75 + 0.25 * (std::f32::consts::TAU * GLOW_PULSE_HZ * self.glow_clock).sin();
        for glow in &self.glows {
            events.push(GameEvent::GlowIntensity {
                vehicle_id: glow.vehicle_id,
                intensity: glow.base_intensity * pulse,
            });
        }

        stats.tier = self.effective_tier();
    }

    /// Promote the awaiting vehicle. Returns the tiers left and entered.
    pub fn swap(
        &mut self,
        player: &mut Player,
        tuning: &TierTuning,
        events: &mut Vec<GameEvent>,
    ) -> Option<(Tier, Tier)> {
        let next = self.awaiting.take()?;
        self.glows.retain(|g| g.vehicle_id != next.id);

        let from = self.effective_tier();
        if let Some(previous) = self.current.take() {
            self.queue_disposal(previous, tuning.disposal_delay_secs);
        }
        let to = next.tier;
        player.position = next.position;
        player.riding = true;
        player.stuck_secs = 0.0;
        self.current = Some(next);

        log::info!("Swapped {from:?} for {to:?}");
        events.push(GameEvent::VehicleSwapped { from, to });
        Some((from, to))
    }

    /// Climb into the current vehicle.
    pub fn enter(&mut self, player: &mut Player) -> bool {
        let Some(vehicle) = self.current.as_ref() else {
            return false;
        };
        if player.riding || vehicle.position.distance(player.position) > ENTER_VEHICLE_RANGE {
            return false;
        }
        player.position = vehicle.position;
        player.riding = true;
        player.stuck_secs = 0.0;
        true
    }

    /// Leave a vehicle that cannot move, landing on clear ground beside it.
    pub fn exit_stuck(&mut self, player: &mut Player, physics: PhysicsMut<'_>) {
        let Some(vehicle) = self.current.as_ref() else {
            return;
        };
        let side = player.facing.perp() * (vehicle_spec(vehicle.tier).collider_radius + 1.0);
        player.riding = false;
        player.stuck_secs = 0.0;
        player.position = probe::relocate(physics.as_deref(), vehicle.position + side);
    }

    /// Move the ridden vehicle with the player after a relocation.
    pub fn follow_player(&mut self, player: &Player) {
        if player.riding {
            if let Some(vehicle) = self.current.as_mut() {
                vehicle.position = player.position;
            }
        }
    }

    /// Drop every vehicle and release their bodies.
    pub fn reset(&mut self, mut physics: PhysicsMut<'_>) {
        let vehicles = self
            .current
            .take()
            .into_iter()
            .chain(self.awaiting.take())
            .chain(self.disposal.drain(..).map(|d| d.vehicle));
        for vehicle in vehicles {
            if let (Some(physics), Some(body)) = (physics.as_deref_mut(), vehicle.body) {
                physics.remove_body(body);
            }
        }
        *self = Self::default();
    }

    fn check_destroyed(
        &mut self,
        player: &mut Player,
        tuning: &TierTuning,
        events: &mut Vec<GameEvent>,
    ) {
        let destroyed = self.current.as_ref().is_some_and(|v| v.health <= 0.0);
        if !destroyed {
            return;
        }
        let Some(mut vehicle) = self.current.take() else {
            return;
        };
        vehicle.destroyed = true;
        if player.riding {
            player.riding = false;
            player.stuck_secs = 0.0;
        }
        log::info!("{:?} destroyed", vehicle.tier);
        events.push(GameEvent::VehicleDestroyed { tier: vehicle.tier });
        events.push(GameEvent::SpawnEffect {
            kind: EffectKind::VehicleWreck,
            position: vehicle.position,
        });
        self.respawn_cooldown = tuning.respawn_cooldown_secs;
        self.queue_disposal(vehicle, tuning.disposal_delay_secs);
    }

    fn queue_disposal(&mut self, vehicle: Vehicle, delay: f32) {
        self.disposal.push(PendingDisposal {
            vehicle,
            remaining: delay,
        });
    }

    fn tick_disposal(&mut self, mut physics: PhysicsMut<'_>, dt: f32) {
        for pending in &mut self.disposal {
            pending.remaining -= dt;
        }
        let mut i = 0;
        while i < self.disposal.len() {
            if self.disposal[i].remaining > 0.0 {
                i += 1;
                continue;
            }
            let done = self.disposal.swap_remove(i);
            if let (Some(physics), Some(body)) = (physics.as_deref_mut(), done.vehicle.body) {
                physics.remove_body(body);
            }
            log::debug!("Disposed of {:?} #{}", done.vehicle.tier, done.vehicle.id);
        }
    }

    fn spawn_vehicle(&mut self, tier: Tier, player: &Player, physics: PhysicsMut<'_>) -> Vehicle {
        let spec = vehicle_spec(tier);
        let beside = player.position + player.facing.perp() * VEHICLE_SPAWN_OFFSET;

        let (position, body) = match physics {
            Some(physics) => {
                let position = probe::relocate(Some(&*physics), beside);
                let body =
                    physics.create_body(ColliderGroup::Vehicle, position, spec.collider_radius);
                (position, Some(body))
            }
            None => (beside, None),
        };

        let id = self.next_vehicle_id;
        self.next_vehicle_id += 1;
        self.ever_spawned = true;
        Vehicle {
            id,
            tier,
            position,
            health: spec.max_health,
            max_health: spec.max_health,
            destroyed: false,
            body,
        }
    }
}

/// Turn every living adversary tied to `left` but not active at `entered`
/// into a foot adversary where it stands. Returns how many dismounted.
pub fn dismount_tied_adversaries(
    world: &mut World,
    left: Tier,
    entered: Tier,
    mut physics: PhysicsMut<'_>,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let foot = get_profile(AdversaryClass::Foot);
    let mut count = 0;
    for (_entity, (pos, adversary)) in world.query_mut::<(&Position, &mut Adversary)>() {
        let class = adversary.class;
        if adversary.phase == AiPhase::Dead
            || !class.is_tied_to(left)
            || class.activation_tiers().contains(&entered)
        {
            continue;
        }
        if let Some(physics) = physics.as_deref_mut() {
            if let Some(body) = adversary.body.take() {
                physics.remove_body(body);
            }
            adversary.body = Some(physics.create_body(
                ColliderGroup::Adversary(AdversaryClass::Foot),
                pos.0,
                foot.collider_radius,
            ));
        }
        adversary.class = AdversaryClass::Foot;
        adversary.health = foot.max_health;
        adversary.max_health = foot.max_health;
        adversary.phase = AiPhase::Chasing;
        adversary.attack_elapsed = 0.0;
        adversary.attack_dealt = false;
        adversary.stun_pending = false;
        adversary.hit_stun = 0.0;

        events.push(GameEvent::AdversaryDismounted {
            from: class,
            position: pos.0,
        });
        events.push(GameEvent::SpawnEffect {
            kind: EffectKind::Dismount,
            position: pos.0,
        });
        count += 1;
    }
    if count > 0 {
        log::debug!("{count} adversaries dismounted leaving {left:?} for {entered:?}");
    }
    count
}
