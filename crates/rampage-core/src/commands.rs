//! Inputs the host feeds into the simulation.
//!
//! `HostCommand`s are queued and processed at the next tick boundary.
//! `PlayerInput` is the raw controller state sampled for the frame.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Run-level control from the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostCommand {
    /// Reset stats and pools and begin a run.
    StartRun,
    Pause,
    Resume,
    /// End an active rampage early.
    EndRampage,
}

/// Raw controller state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Desired movement direction; length is clamped to 1.
    pub movement: Vec2,
    /// Whether the action button is held this frame.
    pub action_held: bool,
}

/// Camera pose queried back from the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub position: Vec3,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    /// Pixels per world unit at ground level.
    pub pixels_per_unit: f32,
}

impl CameraView {
    /// Project a ground-plane point to screen pixels (top-down camera).
    pub fn project(&self, point: Vec2) -> Vec2 {
        let offset = point - Vec2::new(self.position.x, self.position.z);
        // Screen y grows downward while world north grows upward.
        Vec2::new(
            self.viewport.x * 0.5 + offset.x * self.pixels_per_unit,
            self.viewport.y * 0.5 - offset.y * self.pixels_per_unit,
        )
    }

    pub fn is_on_screen(&self, screen: Vec2) -> bool {
        screen.x >= 0.0
            && screen.y >= 0.0
            && screen.x <= self.viewport.x
            && screen.y <= self.viewport.y
    }
}

/// Everything the host supplies for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Real seconds since the previous frame.
    pub dt: f32,
    pub input: PlayerInput,
    pub camera: Option<CameraView>,
}
