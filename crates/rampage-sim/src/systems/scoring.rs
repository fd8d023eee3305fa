//! Scoring economy: score, combo, heat and wanted stars.
//!
//! Timers tick first, then this tick's kills are applied, so a kill landing
//! on the frame the combo runs out starts a fresh combo.

use rampage_core::config::ScoringTuning;
use rampage_core::constants::*;
use rampage_core::enums::{EffectKind, VictimKind};
use rampage_core::events::GameEvent;
use rampage_core::state::GameStats;

use rampage_ai::profiles::get_profile;

use crate::systems::combat::KillRecord;

/// `1 + min(combo, scale) / scale * max`.
pub fn combo_multiplier(combo: u32, tuning: &ScoringTuning) -> f32 {
    let scale = tuning.combo_scale.max(1);
    1.0 + combo.min(scale) as f32 / scale as f32 * tuning.combo_max_multiplier
}

/// Points for one kill at the given combo (already including this kill).
pub fn points_for(
    base: u32,
    in_pursuit: bool,
    panicked: bool,
    combo: u32,
    tuning: &ScoringTuning,
) -> u64 {
    let pursuit = if in_pursuit { tuning.pursuit_multiplier } else { 1.0 };
    let panic = if panicked { tuning.panic_multiplier } else { 1.0 };
    (base as f32 * pursuit * panic * combo_multiplier(combo, tuning)).floor() as u64
}

/// Star level reached by `progress` adversary kills.
pub fn wanted_level(progress: u32, thresholds: &[u32; 2]) -> u8 {
    thresholds.iter().filter(|&&t| progress >= t).count() as u8
}

fn star_threshold(stars: u8, thresholds: &[u32; 2]) -> u32 {
    match stars {
        0 => 0,
        n => thresholds[(n as usize - 1).min(thresholds.len() - 1)],
    }
}

fn base_points_and_heat(victim: VictimKind) -> (u32, f32, &'static str) {
    match victim {
        VictimKind::Bystander => (BYSTANDER_BASE_POINTS, BYSTANDER_HEAT_GAIN, "SPLAT"),
        VictimKind::Adversary(class) => {
            let profile = get_profile(class);
            (profile.base_points, profile.heat_gain, profile.kill_message)
        }
    }
}

/// Run one scoring step: decay timers, then credit `kills`.
pub fn run(
    stats: &mut GameStats,
    tuning: &ScoringTuning,
    kills: &[KillRecord],
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    tick_timers(stats, tuning, dt);
    for kill in kills {
        apply_kill(stats, tuning, kill, events);
    }
}

fn tick_timers(stats: &mut GameStats, tuning: &ScoringTuning, dt: f32) {
    if stats.combo > 0 {
        stats.combo_timer -= dt;
        if stats.combo_timer <= 0.0 {
            stats.reset_combo();
        }
    }

    stats.secs_since_kill += dt;
    stats.secs_since_adversary_kill += dt;

    let mut decay = tuning.heat_decay_per_sec;
    if stats.secs_since_kill > tuning.heat_idle_secs {
        decay *= tuning.heat_idle_decay_factor;
    }
    stats.add_heat(-decay * dt);

    if stats.wanted_stars > 0 && stats.secs_since_adversary_kill >= tuning.wanted_decay_secs {
        stats.wanted_stars -= 1;
        stats.wanted_progress_kills =
            star_threshold(stats.wanted_stars, &tuning.wanted_star_thresholds);
        stats.secs_since_adversary_kill = 0.0;
        log::debug!("Wanted level decayed to {}", stats.wanted_stars);
    }
}

fn apply_kill(
    stats: &mut GameStats,
    tuning: &ScoringTuning,
    kill: &KillRecord,
    events: &mut Vec<GameEvent>,
) {
    stats.kills += 1;
    stats.combo += 1;
    stats.combo_timer = tuning.combo_duration_secs;
    stats.secs_since_kill = 0.0;

    match kill.victim {
        VictimKind::Bystander => stats.bystander_kills += 1,
        VictimKind::Adversary(_) => {
            stats.adversary_kills += 1;
            stats.combo_adversary_kills += 1;
            stats.wanted_progress_kills += 1;
            stats.secs_since_adversary_kill = 0.0;
            let level = wanted_level(stats.wanted_progress_kills, &tuning.wanted_star_thresholds)
                .min(WANTED_MAX_STARS);
            stats.wanted_stars = stats.wanted_stars.max(level);
        }
    }

    let (base, heat, message) = base_points_and_heat(kill.victim);
    stats.add_heat(heat);

    let points = points_for(base, stats.in_pursuit, kill.panicked, stats.combo, tuning);
    stats.score += points;

    events.push(GameEvent::SpawnEffect {
        kind: EffectKind::Blood,
        position: kill.position,
    });
    events.push(GameEvent::KillNotification {
        message: message.to_string(),
        is_pursuit: stats.in_pursuit,
        points,
        combo: stats.combo,
    });
}
