//! Rampage mode: a fuel-limited power state the player earns either by
//! dominating (long combo against adversaries at high heat) or out of
//! desperation (killing adversaries while close to death).
//!
//! Fuel and duration live on `GameStats`; the session here carries the
//! presentation timers that only exist while a rampage runs.

use rampage_core::config::RampageTuning;
use rampage_core::constants::RAMPAGE_FUEL_MAX;
use rampage_core::enums::RampagePath;
use rampage_core::events::GameEvent;
use rampage_core::state::GameStats;

use rampage_ai::profiles::get_profile;

use crate::collaborators::PhysicsRef;
use crate::player::Player;
use crate::probe;
use crate::systems::combat::KillRecord;

/// Fuel drained per second `duration` seconds into a rampage.
pub fn fuel_drain_rate(duration: f32, tuning: &RampageTuning) -> f32 {
    let band = tuning
        .drain_band_ends
        .iter()
        .position(|&end| duration < end)
        .unwrap_or(tuning.drain_band_ends.len());
    tuning.drain_rates[band]
}

pub fn domination_ready(stats: &GameStats, tuning: &RampageTuning) -> bool {
    stats.combo >= tuning.domination_combo
        && stats.combo_adversary_kills >= tuning.domination_adversary_kills
        && stats.heat() >= tuning.domination_heat
}

pub fn desperation_ready(stats: &GameStats, health_percent: f32, tuning: &RampageTuning) -> bool {
    health_percent <= tuning.desperation_health_percent
        && stats.desperation_adversary_kills >= tuning.desperation_adversary_kills
}

/// Which entry predicate holds, domination first.
pub fn entry_path(
    stats: &GameStats,
    health_percent: f32,
    tuning: &RampageTuning,
) -> Option<RampagePath> {
    if domination_ready(stats, tuning) {
        Some(RampagePath::Domination)
    } else if desperation_ready(stats, health_percent, tuning) {
        Some(RampagePath::Desperation)
    } else {
        None
    }
}

/// Timers that exist only while a rampage is running.
#[derive(Debug, Clone, PartialEq)]
pub struct RampageSession {
    pub path: RampagePath,
    pub adversary_time_scale: f32,
    /// One-shot freeze, handed to the engine on the next pull.
    pub hit_stop: f32,
    pub slowmo_remaining: f32,
    pub slowmo_total: f32,
    pub slowmo_floor: f32,
}

impl RampageSession {
    /// World time scale from the entry slow-motion, easing back to 1.
    pub fn slowmo_scale(&self) -> f32 {
        if self.slowmo_remaining <= 0.0 || self.slowmo_total <= 0.0 {
            return 1.0;
        }
        let t = 1.0 - self.slowmo_remaining / self.slowmo_total;
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        self.slowmo_floor + (1.0 - self.slowmo_floor) * eased
    }
}

/// What changed during one rampage step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RampageOutcome {
    pub entered: Option<RampagePath>,
    pub exited: bool,
}

#[derive(Debug, Default)]
pub struct RampageController {
    session: Option<RampageSession>,
    /// Set on exit; entry stays closed until no entry predicate holds.
    awaiting_rearm: bool,
}

impl RampageController {
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&RampageSession> {
        self.session.as_ref()
    }

    pub fn adversary_time_scale(&self) -> f32 {
        self.session.as_ref().map_or(1.0, |s| s.adversary_time_scale)
    }

    pub fn slowmo_scale(&self) -> f32 {
        self.session.as_ref().map_or(1.0, RampageSession::slowmo_scale)
    }

    /// Advance the slow-motion timer by real (unscaled) seconds.
    pub fn tick_slowmo(&mut self, real_dt: f32) {
        if let Some(session) = self.session.as_mut() {
            session.slowmo_remaining = (session.slowmo_remaining - real_dt).max(0.0);
        }
    }

    /// Take the pending hit-stop, leaving zero behind.
    pub fn take_hit_stop(&mut self) -> f32 {
        self.session
            .as_mut()
            .map_or(0.0, |s| std::mem::take(&mut s.hit_stop))
    }

    /// Start a rampage. A no-op while one is already running.
    pub fn enter(
        &mut self,
        stats: &mut GameStats,
        tuning: &RampageTuning,
        path: RampagePath,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if self.session.is_some() {
            return false;
        }
        stats.rampage_active = true;
        stats.set_rampage_fuel(RAMPAGE_FUEL_MAX);
        stats.rampage_duration = 0.0;
        stats.desperation_adversary_kills = 0;
        self.session = Some(RampageSession {
            path,
            adversary_time_scale: tuning.adversary_time_scale,
            hit_stop: tuning.hit_stop_secs,
            slowmo_remaining: tuning.slowmo_secs,
            slowmo_total: tuning.slowmo_secs,
            slowmo_floor: tuning.slowmo_floor,
        });

        log::info!("Rampage started ({path:?}) at score {}", stats.score);
        events.push(GameEvent::RampageStarted { path });
        events.push(GameEvent::SceneryVisibility { visible: false });
        true
    }

    /// End the rampage and pull the player out onto open ground.
    /// `forced` is true when the fuel ran out.
    pub fn exit(
        &mut self,
        stats: &mut GameStats,
        player: &mut Player,
        physics: PhysicsRef<'_>,
        forced: bool,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if self.session.take().is_none() {
            return false;
        }
        self.awaiting_rearm = true;
        stats.rampage_active = false;
        stats.set_rampage_fuel(0.0);
        player.position = probe::relocate(physics, player.position);

        log::info!("Rampage ended after {:.1}s", stats.rampage_duration);
        events.push(GameEvent::SceneryVisibility { visible: true });
        events.push(GameEvent::RampageEnded { forced });
        true
    }

    /// One rampage step: drain and refund while active, otherwise track the
    /// desperation counter and check both entry paths.
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &mut self,
        stats: &mut GameStats,
        tuning: &RampageTuning,
        kills: &[KillRecord],
        health_percent: f32,
        player: &mut Player,
        physics: PhysicsRef<'_>,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) -> RampageOutcome {
        let mut outcome = RampageOutcome::default();

        if self.is_active() {
            let rate = fuel_drain_rate(stats.rampage_duration, tuning);
            stats.rampage_duration += dt;
            stats.add_rampage_fuel(-rate * dt);
            let refund: f32 = kills
                .iter()
                .filter_map(|k| k.victim.adversary_class())
                .map(|class| get_profile(class).fuel_refund)
                .sum();
            stats.add_rampage_fuel(refund);

            if stats.rampage_fuel() <= 0.0 {
                outcome.exited = self.exit(stats, player, physics, true, events);
            }
            return outcome;
        }

        if health_percent <= tuning.desperation_health_percent {
            stats.desperation_adversary_kills +=
                kills.iter().filter(|k| k.victim.adversary_class().is_some()).count() as u32;
        } else {
            stats.desperation_adversary_kills = 0;
        }

        let ready = entry_path(stats, health_percent, tuning);
        if self.awaiting_rearm {
            if ready.is_none() {
                self.awaiting_rearm = false;
            }
            return outcome;
        }
        if let Some(path) = ready {
            if self.enter(stats, tuning, path, events) {
                outcome.entered = Some(path);
            }
        }
        outcome
    }

    /// Whether a previous exit is still holding entry closed.
    pub fn awaiting_rearm(&self) -> bool {
        self.awaiting_rearm
    }

    pub fn reset(&mut self) {
        self.session = None;
        self.awaiting_rearm = false;
    }
}
