//! Snapshot system: projects the stats blackboard and the world into the
//! read-only view the UI consumes.
//!
//! Read-only: it never modifies the world.

use hecs::World;

use rampage_core::commands::CameraView;
use rampage_core::components::Adversary;
use rampage_core::enums::{AiPhase, GamePhase};
use rampage_core::state::{GameStats, HealthBarView, StatsSnapshot};
use rampage_core::types::{Position, SimTime};

use crate::systems::tier::Vehicle;

/// Build a `StatsSnapshot`. Health bars need a camera to place them.
pub fn build_snapshot(
    world: &World,
    stats: &GameStats,
    time: &SimTime,
    phase: GamePhase,
    ridden: Option<&Vehicle>,
    camera: Option<&CameraView>,
) -> StatsSnapshot {
    StatsSnapshot {
        time: *time,
        phase,
        kills: stats.kills,
        adversary_kills: stats.adversary_kills,
        score: stats.score,
        tier: stats.tier,
        combo: stats.combo,
        combo_timer: stats.combo_timer,
        heat: stats.heat(),
        wanted_stars: stats.wanted_stars,
        in_pursuit: stats.in_pursuit,
        rampage_active: stats.rampage_active,
        rampage_fuel: stats.rampage_fuel(),
        health_percent: stats.player_health_percent(),
        vehicle_health_percent: ridden.map(Vehicle::health_percent),
        active_adversaries: count_living(world),
        health_bars: camera.map(|c| build_health_bars(world, c)).unwrap_or_default(),
    }
}

/// Living adversaries of every class.
pub fn count_living(world: &World) -> u32 {
    let mut query = world.query::<&Adversary>();
    let count = query.iter().filter(|(_, a)| a.phase != AiPhase::Dead).count();
    count as u32
}

/// Bars over damaged, living adversaries that are on screen.
fn build_health_bars(world: &World, camera: &CameraView) -> Vec<HealthBarView> {
    let mut query = world.query::<(&Position, &Adversary)>();
    let bars = query
        .iter()
        .filter(|(_, (_, a))| {
            a.phase != AiPhase::Dead && a.health < a.max_health && a.max_health > 0.0
        })
        .filter_map(|(_, (pos, a))| {
            let screen = camera.project(pos.0);
            camera.is_on_screen(screen).then(|| HealthBarView {
                class: a.class,
                screen,
                fraction: (a.health / a.max_health).clamp(0.0, 1.0),
            })
        })
        .collect();
    bars
}
