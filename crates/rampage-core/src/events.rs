//! One-way events emitted by the simulation for the scene and the UI.
//!
//! The engine collects these into a queue during the tick and hands them to
//! the host in the `TickReport`; nothing calls back into the host mid-tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::state::StatsSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A kill worth announcing.
    KillNotification {
        message: String,
        is_pursuit: bool,
        points: u64,
        combo: u32,
    },
    /// Throttled stats push.
    StatsUpdate(StatsSnapshot),
    /// The player died. Emitted once per run.
    GameOver(StatsSnapshot),
    /// Spawn a one-shot visual effect.
    SpawnEffect { kind: EffectKind, position: Vec2 },
    /// Show or hide non-essential scenery.
    SceneryVisibility { visible: bool },
    /// Pulse the glow on an awaiting vehicle.
    GlowIntensity { vehicle_id: u32, intensity: f32 },
    TierUnlocked { tier: Tier, as_awaiting: bool },
    VehicleSwapped { from: Tier, to: Tier },
    VehicleDestroyed { tier: Tier },
    RampageStarted { path: RampagePath },
    RampageEnded { forced: bool },
    AdversaryDismounted { from: AdversaryClass, position: Vec2 },
    PlayerTased { secs: f32 },
}
