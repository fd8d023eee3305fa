//! Class-specific behavioral profiles.
//!
//! Consolidates per-class parameters for the adversary FSM and for the
//! economy systems that reward killing each class.

use rampage_core::enums::{AdversaryClass, AttackKind};

/// Behavioral profile for an adversary class.
#[derive(Debug, Clone, Copy)]
pub struct AdversaryProfile {
    pub max_health: f32,
    /// Chase speed (units/s).
    pub move_speed: f32,
    /// Engagement ranges per attack kind.
    pub strike_range: f32,
    pub taser_range: f32,
    pub projectile_range: f32,
    pub strike_damage: f32,
    pub projectile_damage: f32,
    /// Full length of an attack animation (s).
    pub attack_duration_secs: f32,
    /// Fraction of the animation at which the attack lands.
    pub attack_hit_point: f32,
    pub attack_cooldown_secs: f32,
    pub hit_stun_secs: f32,
    pub death_anim_secs: f32,
    pub collider_radius: f32,
    // --- Economy ---
    pub base_points: u32,
    pub heat_gain: f32,
    pub fuel_refund: f32,
    pub kill_message: &'static str,
}

impl AdversaryProfile {
    pub fn range_for(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Strike => self.strike_range,
            AttackKind::Taser => self.taser_range,
            AttackKind::Projectile => self.projectile_range,
        }
    }

    /// Damage dealt to the player's active body. Tasers immobilise instead.
    pub fn damage_for(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Strike => self.strike_damage,
            AttackKind::Taser => 0.0,
            AttackKind::Projectile => self.projectile_damage,
        }
    }
}

/// Get the behavioral profile for a given class.
pub fn get_profile(class: AdversaryClass) -> AdversaryProfile {
    match class {
        AdversaryClass::Foot => AdversaryProfile {
            max_health: 100.0,
            move_speed: 4.5,
            strike_range: 1.6,
            taser_range: 7.0,
            projectile_range: 12.0,
            strike_damage: 8.0,
            projectile_damage: 6.0,
            attack_duration_secs: 0.6,
            attack_hit_point: 0.5,
            attack_cooldown_secs: 1.2,
            hit_stun_secs: 0.35,
            death_anim_secs: 1.2,
            collider_radius: 0.4,
            base_points: 50,
            heat_gain: 5.0,
            fuel_refund: 6.0,
            kill_message: "COP DOWN",
        },
        AdversaryClass::Bike => AdversaryProfile {
            max_health: 80.0,
            move_speed: 7.0,
            strike_range: 1.8,
            taser_range: 7.0,
            projectile_range: 12.0,
            strike_damage: 10.0,
            projectile_damage: 6.0,
            attack_duration_secs: 0.5,
            attack_hit_point: 0.5,
            attack_cooldown_secs: 1.4,
            hit_stun_secs: 0.35,
            death_anim_secs: 1.0,
            collider_radius: 0.6,
            base_points: 75,
            heat_gain: 6.0,
            fuel_refund: 8.0,
            kill_message: "BIKE COP WIPED OUT",
        },
        AdversaryClass::Moto => AdversaryProfile {
            max_health: 120.0,
            move_speed: 10.0,
            strike_range: 2.0,
            taser_range: 8.0,
            projectile_range: 14.0,
            strike_damage: 12.0,
            projectile_damage: 8.0,
            attack_duration_secs: 0.5,
            attack_hit_point: 0.4,
            attack_cooldown_secs: 1.5,
            hit_stun_secs: 0.3,
            death_anim_secs: 1.4,
            collider_radius: 0.7,
            base_points: 100,
            heat_gain: 8.0,
            fuel_refund: 10.0,
            kill_message: "MOTO COP DOWN",
        },
        AdversaryClass::Car => AdversaryProfile {
            max_health: 250.0,
            move_speed: 11.0,
            strike_range: 2.8,
            taser_range: 8.0,
            projectile_range: 16.0,
            strike_damage: 20.0,
            projectile_damage: 10.0,
            attack_duration_secs: 0.8,
            attack_hit_point: 0.5,
            attack_cooldown_secs: 2.0,
            hit_stun_secs: 0.25,
            death_anim_secs: 2.0,
            collider_radius: 1.2,
            base_points: 150,
            heat_gain: 10.0,
            fuel_refund: 12.0,
            kill_message: "CRUISER TOTALED",
        },
    }
}
