//! Ground probe: finds a point on open ground near a requested position.
//!
//! Used to place spawned adversaries and vehicles, and to pull the player
//! out of structures when a rampage ends.

use glam::{Vec2, Vec3};

use rampage_core::constants::*;
use rampage_core::types::{heading, to_world};

use crate::collaborators::{ColliderGroup, CollisionFilter, PhysicsRef};

/// Whether `point` is on ground with clearance on all four sides.
///
/// A downward ray must hit GROUND first (not a roof), and short rays toward
/// the four cardinal directions must not hit a BUILDING.
pub fn is_clear_ground(physics: PhysicsRef<'_>, point: Vec2) -> bool {
    let Some(physics) = physics else {
        return true;
    };

    let down = physics.cast_ray(
        to_world(point, PROBE_HEIGHT),
        Vec3::NEG_Y,
        PROBE_HEIGHT * 2.0,
        CollisionFilter::world(),
    );
    if down.and_then(|hit| hit.group()) != Some(ColliderGroup::Ground) {
        return false;
    }

    let origin = to_world(point, PROBE_CHEST_HEIGHT);
    let buildings = CollisionFilter::of(&[ColliderGroup::Building]);
    [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z]
        .into_iter()
        .all(|dir| {
            physics
                .cast_ray(origin, dir, PROBE_CLEARANCE, buildings)
                .and_then(|hit| hit.group())
                != Some(ColliderGroup::Building)
        })
}

/// Spiral outward from `center`, returning the first clear point.
///
/// The center itself is tried first, then radii 2, 4, .. 20 at eight evenly
/// spaced angles each. `None` when every candidate is blocked.
pub fn find_clear_ground(physics: PhysicsRef<'_>, center: Vec2) -> Option<Vec2> {
    if is_clear_ground(physics, center) {
        return Some(center);
    }
    let rings = (PROBE_MAX_RADIUS / PROBE_RADIUS_STEP).round() as u32;
    for ring in 1..=rings {
        let radius = ring as f32 * PROBE_RADIUS_STEP;
        for i in 0..PROBE_ANGLES {
            let angle = i as f32 * std::f32::consts::TAU / PROBE_ANGLES as f32;
            let candidate = center + heading(angle) * radius;
            if is_clear_ground(physics, candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// `find_clear_ground`, falling back to `center` when the spiral is exhausted.
pub fn relocate(physics: PhysicsRef<'_>, center: Vec2) -> Vec2 {
    find_clear_ground(physics, center).unwrap_or_else(|| {
        log::warn!("No clear ground within {PROBE_MAX_RADIUS} of {center}, staying put");
        center
    })
}
