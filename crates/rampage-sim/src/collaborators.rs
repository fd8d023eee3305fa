//! Interfaces to the collaborators the simulation does not own: the physics
//! wrapper and the steering library.
//!
//! `StaticWorld` is a small box-city physics implementation used by the
//! headless host and by tests; a real host plugs its engine in behind the
//! same trait.

use std::collections::HashMap;

use glam::{Vec2, Vec3};

use rampage_core::components::BodyHandle;
use rampage_core::enums::AdversaryClass;
use rampage_core::types::to_plane;

/// Physics slot handed to stages. `None` means the physics world is not up
/// yet and the stage skips its physics step.
pub type PhysicsMut<'a> = Option<&'a mut (dyn Physics + 'static)>;
pub type PhysicsRef<'a> = Option<&'a (dyn Physics + 'static)>;

/// Collider membership groups, identified on the wire by small integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderGroup {
    Ground,
    Building,
    Player,
    Vehicle,
    Bystander,
    Adversary(AdversaryClass),
}

impl ColliderGroup {
    pub fn id(self) -> u32 {
        match self {
            ColliderGroup::Ground => 1,
            ColliderGroup::Building => 2,
            ColliderGroup::Player => 3,
            ColliderGroup::Vehicle => 4,
            ColliderGroup::Bystander => 5,
            ColliderGroup::Adversary(AdversaryClass::Foot) => 6,
            ColliderGroup::Adversary(AdversaryClass::Bike) => 7,
            ColliderGroup::Adversary(AdversaryClass::Moto) => 8,
            ColliderGroup::Adversary(AdversaryClass::Car) => 9,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Some(match id {
            1 => ColliderGroup::Ground,
            2 => ColliderGroup::Building,
            3 => ColliderGroup::Player,
            4 => ColliderGroup::Vehicle,
            5 => ColliderGroup::Bystander,
            6 => ColliderGroup::Adversary(AdversaryClass::Foot),
            7 => ColliderGroup::Adversary(AdversaryClass::Bike),
            8 => ColliderGroup::Adversary(AdversaryClass::Moto),
            9 => ColliderGroup::Adversary(AdversaryClass::Car),
            _ => return None,
        })
    }
}

/// Bit mask of groups a query or movement interacts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionFilter(u32);

impl CollisionFilter {
    pub const ALL: CollisionFilter = CollisionFilter(u32::MAX);

    pub fn of(groups: &[ColliderGroup]) -> Self {
        CollisionFilter(groups.iter().fold(0, |mask, g| mask | (1 << g.id())))
    }

    pub fn contains(self, group: ColliderGroup) -> bool {
        self.0 & (1 << group.id()) != 0
    }

    /// Static geometry only; what movement is clipped against.
    pub fn world() -> Self {
        Self::of(&[ColliderGroup::Ground, ColliderGroup::Building])
    }
}

/// Result of a ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub group_id: u32,
    pub distance: f32,
}

impl RayHit {
    pub fn group(&self) -> Option<ColliderGroup> {
        ColliderGroup::from_id(self.group_id)
    }
}

/// Physics engine wrapper.
pub trait Physics {
    /// Cast a ray and return the first hit within `max_distance`.
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: CollisionFilter,
    ) -> Option<RayHit>;

    /// Create a rigid body with a circular collider at `position`.
    fn create_body(&mut self, group: ColliderGroup, position: Vec2, radius: f32) -> BodyHandle;

    /// Release a body. Unknown handles are ignored.
    fn remove_body(&mut self, body: BodyHandle);

    /// Character-controller step: returns `desired` corrected for collisions.
    fn compute_movement(
        &mut self,
        body: BodyHandle,
        position: Vec2,
        desired: Vec2,
        filter: CollisionFilter,
    ) -> Vec2;
}

/// Steering library: turns a target point into a desired velocity.
pub trait Steering {
    fn desired_velocity(&mut self, position: Vec2, target: Vec2, max_speed: f32) -> Vec2;
}

/// Plain seek at full speed, slowing inside one unit of the target.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeekSteering;

impl Steering for SeekSteering {
    fn desired_velocity(&mut self, position: Vec2, target: Vec2, max_speed: f32) -> Vec2 {
        let to_target = target - position;
        let distance = to_target.length();
        if distance <= f32::EPSILON {
            return Vec2::ZERO;
        }
        to_target / distance * max_speed * distance.min(1.0)
    }
}

/// Axis-aligned building footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Building {
    pub min: Vec2,
    pub max: Vec2,
    pub height: f32,
}

impl Building {
    pub fn contains(&self, point: Vec2, margin: f32) -> bool {
        point.x >= self.min.x - margin
            && point.x <= self.max.x + margin
            && point.y >= self.min.y - margin
            && point.y <= self.max.y + margin
    }
}

/// Flat ground at height 0 with box buildings on it.
#[derive(Debug, Default)]
pub struct StaticWorld {
    buildings: Vec<Building>,
    bodies: HashMap<BodyHandle, f32>,
    next_body: u64,
}

/// Ray-march step for `StaticWorld::cast_ray`.
const RAY_STEP: f32 = 0.05;

impl StaticWorld {
    /// Open ground with no structures.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn with_buildings(buildings: Vec<Building>) -> Self {
        Self {
            buildings,
            ..Self::default()
        }
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn blocked(&self, point: Vec2, radius: f32) -> bool {
        self.buildings.iter().any(|b| b.contains(point, radius))
    }
}

impl Physics for StaticWorld {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: CollisionFilter,
    ) -> Option<RayHit> {
        let dir = direction.try_normalize()?;
        let steps = (max_distance / RAY_STEP).ceil() as u32;
        for i in 0..=steps {
            let t = (i as f32 * RAY_STEP).min(max_distance);
            let p = origin + dir * t;
            let planar = to_plane(p);
            if filter.contains(ColliderGroup::Building)
                && self
                    .buildings
                    .iter()
                    .any(|b| b.contains(planar, 0.0) && p.y <= b.height)
            {
                return Some(RayHit {
                    group_id: ColliderGroup::Building.id(),
                    distance: t,
                });
            }
            if filter.contains(ColliderGroup::Ground) && p.y <= 0.0 {
                return Some(RayHit {
                    group_id: ColliderGroup::Ground.id(),
                    distance: t,
                });
            }
        }
        None
    }

    fn create_body(&mut self, _group: ColliderGroup, _position: Vec2, radius: f32) -> BodyHandle {
        let handle = BodyHandle(self.next_body);
        self.next_body += 1;
        self.bodies.insert(handle, radius);
        handle
    }

    fn remove_body(&mut self, body: BodyHandle) {
        self.bodies.remove(&body);
    }

    fn compute_movement(
        &mut self,
        body: BodyHandle,
        position: Vec2,
        desired: Vec2,
        filter: CollisionFilter,
    ) -> Vec2 {
        if !filter.contains(ColliderGroup::Building) {
            return desired;
        }
        let radius = self.bodies.get(&body).copied().unwrap_or(0.0);
        if !self.blocked(position + desired, radius) {
            return desired;
        }
        // Slide along whichever axis is free.
        let along_x = Vec2::new(desired.x, 0.0);
        if !self.blocked(position + along_x, radius) {
            return along_x;
        }
        let along_y = Vec2::new(0.0, desired.y);
        if !self.blocked(position + along_y, radius) {
            return along_y;
        }
        Vec2::ZERO
    }
}
