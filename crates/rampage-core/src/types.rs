//! Fundamental geometric and simulation types.
//!
//! The play field is a top-down plane. `Vec2::x` is East and `Vec2::y` is
//! North. Physics collaborators work in 3D with Y up, so a planar point
//! `(x, y)` maps to `(x, height, y)`.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Planar position component (world units).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// Planar velocity component (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

/// Simulation time tracking. Frames are variable-length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each simulated tick).
    pub tick: u64,
    /// Elapsed scaled simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += dt as f64;
    }
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        self.0.distance(other.0)
    }
}

/// Lift a planar point into physics space at the given height.
pub fn to_world(point: Vec2, height: f32) -> Vec3 {
    Vec3::new(point.x, height, point.y)
}

/// Drop the vertical component of a physics-space vector.
pub fn to_plane(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Unit vector for a planar angle in radians (0 = East, counter-clockwise).
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle in radians between `direction` and the vector from `origin` to `point`.
///
/// Returns 0 when either vector is degenerate, so a target standing exactly on
/// the origin always counts as "in front".
pub fn angle_to(origin: Vec2, direction: Vec2, point: Vec2) -> f32 {
    let to_point = point - origin;
    if to_point.length_squared() <= f32::EPSILON || direction.length_squared() <= f32::EPSILON {
        return 0.0;
    }
    let cos = direction.normalize().dot(to_point.normalize());
    cos.clamp(-1.0, 1.0).acos()
}
