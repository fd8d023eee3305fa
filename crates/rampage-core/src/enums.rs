//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// The player's mobility class. Declaration order is the escalation order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Tier {
    #[default]
    Foot,
    Bike,
    Moto,
    Sedan,
    Truck,
}

impl Tier {
    pub const ALL: [Tier; 5] = [Tier::Foot, Tier::Bike, Tier::Moto, Tier::Sedan, Tier::Truck];

    /// The tier unlocked after this one, or `None` at the top.
    pub fn next(self) -> Option<Tier> {
        match self {
            Tier::Foot => Some(Tier::Bike),
            Tier::Bike => Some(Tier::Moto),
            Tier::Moto => Some(Tier::Sedan),
            Tier::Sedan => Some(Tier::Truck),
            Tier::Truck => None,
        }
    }

    /// Whether this tier is a vehicle the player can ride.
    pub fn is_vehicle(self) -> bool {
        self != Tier::Foot
    }
}

/// Adversary class. Each class has its own spawn controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdversaryClass {
    /// Officer on foot.
    Foot,
    /// Bicycle patrol.
    Bike,
    /// Motorcycle unit.
    Moto,
    /// Patrol car.
    Car,
}

impl AdversaryClass {
    pub const ALL: [AdversaryClass; 4] = [
        AdversaryClass::Foot,
        AdversaryClass::Bike,
        AdversaryClass::Moto,
        AdversaryClass::Car,
    ];

    /// Player tiers during which this class may spawn.
    pub fn activation_tiers(self) -> &'static [Tier] {
        match self {
            AdversaryClass::Foot => &Tier::ALL,
            AdversaryClass::Bike => &[Tier::Bike],
            AdversaryClass::Moto => &[Tier::Moto],
            AdversaryClass::Car => &[Tier::Sedan, Tier::Truck],
        }
    }

    /// Whether this class is balanced against the given tier and must
    /// dismount when the player leaves it.
    pub fn is_tied_to(self, tier: Tier) -> bool {
        self != AdversaryClass::Foot && self.activation_tiers().contains(&tier)
    }
}

/// Adversary behavior phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiPhase {
    /// Closing distance on the player.
    #[default]
    Chasing,
    /// Playing a non-interruptible attack.
    Attacking,
    /// Reeling from a hit; cannot move or start attacks.
    HitStunned,
    /// Terminal. Plays the death animation until purged.
    Dead,
}

/// Attack chosen from the current wanted level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    /// Short-range strike.
    #[default]
    Strike,
    /// Ranged stun that immobilises an on-foot player.
    Taser,
    /// Ranged shot.
    Projectile,
}

/// How a kill was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillMethod {
    Melee,
    VehicleRam,
    Blast,
}

/// What was killed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictimKind {
    Bystander,
    Adversary(AdversaryClass),
}

impl VictimKind {
    pub fn adversary_class(self) -> Option<AdversaryClass> {
        match self {
            VictimKind::Adversary(class) => Some(class),
            VictimKind::Bystander => None,
        }
    }
}

/// Discrete player actions, in descending priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    EscapeTaser,
    ExitStuckVehicle,
    SwitchVehicle,
    EnterVehicle,
    Attack,
}

/// Which rampage entry predicate fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RampagePath {
    Domination,
    Desperation,
}

/// Visual effect requests for the scene collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Blood,
    HitFlash,
    Shockwave,
    Dismount,
    VehicleWreck,
    Taser,
    MuzzleFlash,
}

/// Top-level run state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Ready,
    Active,
    Paused,
    GameOver,
}
