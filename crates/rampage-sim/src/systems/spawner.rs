//! Adversary spawn controllers.
//!
//! One controller per class keeps that class's population in line with heat:
//! each heat step adds one to the desired population, capped by the class
//! maximum. Classes tied to a vehicle tier only spawn while the player is at
//! that tier, and the faster classes trickle in one at a time on a cooldown.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rampage_core::components::Adversary;
use rampage_core::enums::{AdversaryClass, AiPhase, AttackKind};
use rampage_core::state::GameStats;
use rampage_core::types::{heading, Position, Velocity};

use rampage_ai::profiles::get_profile;

use crate::collaborators::{ColliderGroup, PhysicsMut};
use crate::probe;
use crate::systems::cleanup;

/// Static spawn parameters for one class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnSettings {
    pub class: AdversaryClass,
    pub max_population: u32,
    /// Spawn distance band around the player (min, max).
    pub spawn_radius: (f32, f32),
    /// Minimum seconds between spawns, for classes that must not burst in.
    pub spawn_cooldown: Option<f32>,
    /// `(heat at or above, desired population)`, ascending.
    pub heat_steps: &'static [(f32, u32)],
}

impl SpawnSettings {
    pub fn for_class(class: AdversaryClass) -> Self {
        match class {
            AdversaryClass::Foot => Self {
                class,
                max_population: 4,
                spawn_radius: (12.0, 18.0),
                spawn_cooldown: None,
                heat_steps: &[(25.0, 1), (50.0, 2), (75.0, 3)],
            },
            AdversaryClass::Bike => Self {
                class,
                max_population: 2,
                spawn_radius: (14.0, 20.0),
                spawn_cooldown: Some(2.0),
                heat_steps: &[(20.0, 1), (60.0, 2)],
            },
            AdversaryClass::Moto => Self {
                class,
                max_population: 2,
                spawn_radius: (16.0, 24.0),
                spawn_cooldown: Some(3.0),
                heat_steps: &[(30.0, 1), (70.0, 2)],
            },
            AdversaryClass::Car => Self {
                class,
                max_population: 3,
                spawn_radius: (20.0, 30.0),
                spawn_cooldown: Some(4.0),
                heat_steps: &[(25.0, 1), (55.0, 2), (85.0, 3)],
            },
        }
    }

    /// Population the current heat calls for, before the class cap.
    pub fn desired_population(&self, heat: f32) -> u32 {
        self.heat_steps
            .iter()
            .take_while(|(min_heat, _)| heat >= *min_heat)
            .last()
            .map_or(0, |(_, desired)| *desired)
    }
}

/// Living adversaries of `class`.
pub fn active_count(world: &World, class: AdversaryClass) -> u32 {
    let mut query = world.query::<&Adversary>();
    let count = query
        .iter()
        .filter(|(_, a)| a.class == class && a.phase != AiPhase::Dead)
        .count();
    count as u32
}

#[derive(Debug, Clone)]
pub struct SpawnController {
    settings: SpawnSettings,
    cooldown_remaining: f32,
}

impl SpawnController {
    pub fn new(class: AdversaryClass) -> Self {
        Self {
            settings: SpawnSettings::for_class(class),
            cooldown_remaining: 0.0,
        }
    }

    pub fn settings(&self) -> &SpawnSettings {
        &self.settings
    }

    pub fn reset(&mut self) {
        self.cooldown_remaining = 0.0;
    }

    /// Purge finished agents, then spawn toward the desired population.
    /// Returns how many were spawned.
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        stats: &GameStats,
        player_position: Vec2,
        mut physics: PhysicsMut<'_>,
        despawn_buffer: &mut Vec<Entity>,
        dt: f32,
    ) -> u32 {
        let class = self.settings.class;
        cleanup::purge_finished(world, class, physics.as_deref_mut(), despawn_buffer);

        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
        if !class.activation_tiers().contains(&stats.tier) {
            return 0;
        }

        let active = active_count(world, class);
        let desired = self.settings.desired_population(stats.heat());
        let mut to_spawn = desired
            .saturating_sub(active)
            .min(self.settings.max_population.saturating_sub(active));
        if to_spawn == 0 {
            return 0;
        }
        if let Some(cooldown) = self.settings.spawn_cooldown {
            if self.cooldown_remaining > 0.0 {
                return 0;
            }
            to_spawn = 1;
            self.cooldown_remaining = cooldown;
        }

        for _ in 0..to_spawn {
            self.spawn_one(world, rng, player_position, physics.as_deref_mut());
        }
        log::debug!("Spawned {to_spawn} {class:?} (active {active}, desired {desired})");
        to_spawn
    }

    fn spawn_one(
        &self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        around: Vec2,
        physics: PhysicsMut<'_>,
    ) -> Entity {
        let class = self.settings.class;
        let profile = get_profile(class);
        let (min_r, max_r) = self.settings.spawn_radius;
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = rng.gen_range(min_r..=max_r);
        let candidate = around + heading(angle) * distance;

        let (position, body) = match physics {
            Some(physics) => {
                let position = probe::relocate(Some(&*physics), candidate);
                let group = ColliderGroup::Adversary(class);
                let body = physics.create_body(group, position, profile.collider_radius);
                (position, Some(body))
            }
            None => (candidate, None),
        };

        world.spawn((
            Position(position),
            Velocity::default(),
            Adversary {
                class,
                phase: AiPhase::Chasing,
                health: profile.max_health,
                max_health: profile.max_health,
                attack_cooldown: 0.0,
                hit_stun: 0.0,
                stun_pending: false,
                attack_kind: AttackKind::Strike,
                attack_elapsed: 0.0,
                attack_dealt: false,
                death_anim: 0.0,
                knockback: Vec2::ZERO,
                flash: 0.0,
                facing: (around - position).normalize_or_zero(),
                body,
            },
        ))
    }
}
