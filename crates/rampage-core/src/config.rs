//! Gameplay tuning. Defaults come from `constants`; hosts may override any
//! subset from JSON, e.g. `{"scoring": {"combo_duration_secs": 3.0}}`.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::TuningError;

/// All designer-adjustable numbers, grouped by the system that reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    pub scoring: ScoringTuning,
    pub tiers: TierTuning,
    pub rampage: RampageTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub combo_duration_secs: f32,
    pub combo_scale: u32,
    pub combo_max_multiplier: f32,
    pub pursuit_multiplier: f32,
    pub panic_multiplier: f32,
    pub heat_decay_per_sec: f32,
    pub heat_idle_secs: f32,
    pub heat_idle_decay_factor: f32,
    pub wanted_star_thresholds: [u32; 2],
    pub wanted_decay_secs: f32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            combo_duration_secs: COMBO_DURATION_SECS,
            combo_scale: COMBO_SCALE,
            combo_max_multiplier: COMBO_MAX_MULTIPLIER,
            pursuit_multiplier: PURSUIT_MULTIPLIER,
            panic_multiplier: PANIC_MULTIPLIER,
            heat_decay_per_sec: HEAT_DECAY_PER_SEC,
            heat_idle_secs: HEAT_IDLE_SECS,
            heat_idle_decay_factor: HEAT_IDLE_DECAY_FACTOR,
            wanted_star_thresholds: WANTED_STAR_THRESHOLDS,
            wanted_decay_secs: WANTED_DECAY_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierTuning {
    /// Score required for Bike, Moto, Sedan, Truck.
    pub thresholds: [u64; 4],
    pub respawn_cooldown_secs: f32,
    pub disposal_delay_secs: f32,
}

impl Default for TierTuning {
    fn default() -> Self {
        Self {
            thresholds: TIER_THRESHOLDS,
            respawn_cooldown_secs: VEHICLE_RESPAWN_COOLDOWN_SECS,
            disposal_delay_secs: VEHICLE_DISPOSAL_DELAY_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampageTuning {
    pub domination_combo: u32,
    pub domination_adversary_kills: u32,
    pub domination_heat: f32,
    pub desperation_health_percent: f32,
    pub desperation_adversary_kills: u32,
    pub adversary_time_scale: f32,
    pub hit_stop_secs: f32,
    pub slowmo_secs: f32,
    pub slowmo_floor: f32,
    pub drain_band_ends: [f32; 3],
    pub drain_rates: [f32; 4],
}

impl Default for RampageTuning {
    fn default() -> Self {
        Self {
            domination_combo: DOMINATION_COMBO,
            domination_adversary_kills: DOMINATION_ADVERSARY_KILLS,
            domination_heat: DOMINATION_HEAT,
            desperation_health_percent: DESPERATION_HEALTH_PERCENT,
            desperation_adversary_kills: DESPERATION_ADVERSARY_KILLS,
            adversary_time_scale: RAMPAGE_ADVERSARY_TIME_SCALE,
            hit_stop_secs: RAMPAGE_HIT_STOP_SECS,
            slowmo_secs: RAMPAGE_SLOWMO_SECS,
            slowmo_floor: RAMPAGE_SLOWMO_FLOOR,
            drain_band_ends: FUEL_DRAIN_BAND_ENDS,
            drain_rates: FUEL_DRAIN_RATES,
        }
    }
}

impl TierTuning {
    /// Score needed to unlock `tier`. Foot is always unlocked.
    pub fn threshold(&self, tier: crate::enums::Tier) -> u64 {
        use crate::enums::Tier;
        match tier {
            Tier::Foot => 0,
            Tier::Bike => self.thresholds[0],
            Tier::Moto => self.thresholds[1],
            Tier::Sedan => self.thresholds[2],
            Tier::Truck => self.thresholds[3],
        }
    }
}

impl GameTuning {
    /// Parse and validate a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: GameTuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Like `from_json`, but logs and falls back to defaults on any error.
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Reject values that would break the simulation's invariants.
    pub fn validate(&self) -> Result<(), TuningError> {
        let s = &self.scoring;
        if s.combo_duration_secs <= 0.0 {
            return Err(TuningError::invalid("scoring.combo_duration_secs", "must be positive"));
        }
        if s.combo_scale == 0 {
            return Err(TuningError::invalid("scoring.combo_scale", "must be at least 1"));
        }
        if s.wanted_star_thresholds[0] == 0
            || s.wanted_star_thresholds[0] >= s.wanted_star_thresholds[1]
        {
            return Err(TuningError::invalid(
                "scoring.wanted_star_thresholds",
                "must be positive and strictly increasing",
            ));
        }
        if s.wanted_decay_secs <= 0.0 {
            return Err(TuningError::invalid("scoring.wanted_decay_secs", "must be positive"));
        }

        if !self.tiers.thresholds.windows(2).all(|w| w[0] < w[1]) {
            return Err(TuningError::invalid(
                "tiers.thresholds",
                format!("must be strictly increasing, got {:?}", self.tiers.thresholds),
            ));
        }

        let r = &self.rampage;
        if !(0.0..=100.0).contains(&r.desperation_health_percent) {
            return Err(TuningError::invalid(
                "rampage.desperation_health_percent",
                "must be within 0..=100",
            ));
        }
        if !(r.adversary_time_scale > 0.0 && r.adversary_time_scale < 1.0) {
            return Err(TuningError::invalid(
                "rampage.adversary_time_scale",
                "must be within (0, 1)",
            ));
        }
        if !r.drain_band_ends.windows(2).all(|w| w[0] < w[1]) || r.drain_band_ends[0] <= 0.0 {
            return Err(TuningError::invalid(
                "rampage.drain_band_ends",
                "must be positive and strictly increasing",
            ));
        }
        if !r.drain_rates.windows(2).all(|w| w[0] < w[1]) || r.drain_rates[0] <= 0.0 {
            return Err(TuningError::invalid(
                "rampage.drain_rates",
                "must be positive and strictly increasing",
            ));
        }
        Ok(())
    }
}
