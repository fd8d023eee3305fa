//! The stats blackboard shared by every stage of the tick, and the read-only
//! views handed to the UI.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{HEAT_MAX, PLAYER_MAX_HEALTH, RAMPAGE_FUEL_MAX};
use crate::enums::{AdversaryClass, GamePhase, Tier};
use crate::types::SimTime;

/// Single authoritative record of the run.
///
/// `heat` and `rampage_fuel` are private so every write goes through the
/// clamping setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    /// Every kill, bystanders included.
    pub kills: u32,
    pub bystander_kills: u32,
    pub adversary_kills: u32,
    /// Never decreases within a run.
    pub score: u64,
    /// Effective tier of the player.
    pub tier: Tier,
    pub combo: u32,
    /// Seconds left before the combo resets.
    pub combo_timer: f32,
    /// Adversary kills made during the current combo.
    pub combo_adversary_kills: u32,
    /// Adversary kills made while at or below the desperation health line.
    pub desperation_adversary_kills: u32,
    heat: f32,
    pub wanted_stars: u8,
    /// Adversary kills counted toward the next wanted star.
    pub wanted_progress_kills: u32,
    pub secs_since_kill: f32,
    pub secs_since_adversary_kill: f32,
    pub in_pursuit: bool,
    pub rampage_active: bool,
    rampage_fuel: f32,
    pub rampage_duration: f32,
    pub health: f32,
    pub max_health: f32,
}

impl Default for GameStats {
    fn default() -> Self {
        Self {
            kills: 0,
            bystander_kills: 0,
            adversary_kills: 0,
            score: 0,
            tier: Tier::Foot,
            combo: 0,
            combo_timer: 0.0,
            combo_adversary_kills: 0,
            desperation_adversary_kills: 0,
            heat: 0.0,
            wanted_stars: 0,
            wanted_progress_kills: 0,
            secs_since_kill: 0.0,
            secs_since_adversary_kill: 0.0,
            in_pursuit: false,
            rampage_active: false,
            rampage_fuel: 0.0,
            rampage_duration: 0.0,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
        }
    }
}

impl GameStats {
    pub fn heat(&self) -> f32 {
        self.heat
    }

    pub fn set_heat(&mut self, heat: f32) {
        self.heat = heat.clamp(0.0, HEAT_MAX);
    }

    pub fn add_heat(&mut self, delta: f32) {
        self.set_heat(self.heat + delta);
    }

    pub fn rampage_fuel(&self) -> f32 {
        self.rampage_fuel
    }

    pub fn set_rampage_fuel(&mut self, fuel: f32) {
        self.rampage_fuel = fuel.clamp(0.0, RAMPAGE_FUEL_MAX);
    }

    pub fn add_rampage_fuel(&mut self, delta: f32) {
        self.set_rampage_fuel(self.rampage_fuel + delta);
    }

    /// Zero the combo and its sub-counters in one step.
    pub fn reset_combo(&mut self) {
        self.combo = 0;
        self.combo_timer = 0.0;
        self.combo_adversary_kills = 0;
    }

    pub fn player_health_percent(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health * 100.0).clamp(0.0, 100.0)
    }

    pub fn is_player_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// UI-facing copy of the stats, pushed every few ticks and on game over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub kills: u32,
    pub adversary_kills: u32,
    pub score: u64,
    pub tier: Tier,
    pub combo: u32,
    pub combo_timer: f32,
    pub heat: f32,
    pub wanted_stars: u8,
    pub in_pursuit: bool,
    pub rampage_active: bool,
    pub rampage_fuel: f32,
    pub health_percent: f32,
    /// Present while riding.
    pub vehicle_health_percent: Option<f32>,
    pub active_adversaries: u32,
    pub health_bars: Vec<HealthBarView>,
}

/// Screen-space health bar over a damaged adversary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthBarView {
    pub class: AdversaryClass,
    /// Pixels from the top-left of the viewport.
    pub screen: Vec2,
    /// Remaining health in 0..=1.
    pub fraction: f32,
}
