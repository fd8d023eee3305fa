//! The player character: position, mobility state and timers.
//!
//! Health lives in `GameStats` so every stage reads the same number; the
//! player struct only carries what movement and the action resolver need.

use glam::Vec2;

use rampage_core::commands::PlayerInput;
use rampage_core::components::BodyHandle;
use rampage_core::constants::*;

use crate::collaborators::{CollisionFilter, PhysicsMut};

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec2,
    /// Unit vector; keeps its last value while standing still.
    pub facing: Vec2,
    pub velocity: Vec2,
    pub riding: bool,
    /// Seconds of taser immobilisation left.
    pub immobilized: f32,
    /// Seconds of taser immunity left after breaking free.
    pub taser_immunity: f32,
    /// Seconds the ridden vehicle has been making almost no progress.
    pub stuck_secs: f32,
    pub body: Option<BodyHandle>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            facing: Vec2::Y,
            velocity: Vec2::ZERO,
            riding: false,
            immobilized: 0.0,
            taser_immunity: 0.0,
            stuck_secs: 0.0,
            body: None,
        }
    }
}

impl Player {
    pub fn is_immobilized(&self) -> bool {
        self.immobilized > 0.0
    }

    /// Whether a taser would fail against the player right now.
    pub fn is_taser_immune(&self, rampage_active: bool) -> bool {
        self.riding || rampage_active || self.taser_immunity > 0.0
    }

    pub fn is_stuck(&self) -> bool {
        self.riding && self.stuck_secs >= STUCK_EXIT_SECS
    }

    /// Count down immobilisation and the immunity window.
    pub fn tick_timers(&mut self, dt: f32) {
        self.taser_immunity = (self.taser_immunity - dt).max(0.0);
        if self.is_immobilized() {
            self.reduce_immobilization(dt);
        }
    }

    /// One escape press. Returns true when the player broke free.
    pub fn escape_taser(&mut self) -> bool {
        if !self.is_immobilized() {
            return false;
        }
        self.reduce_immobilization(TASER_ESCAPE_PER_PRESS_SECS)
    }

    /// Apply a taser hit unless immune. Returns true when it took effect.
    pub fn tase(&mut self, secs: f32, rampage_active: bool) -> bool {
        if self.is_taser_immune(rampage_active) {
            return false;
        }
        self.immobilized = self.immobilized.max(secs);
        self.velocity = Vec2::ZERO;
        true
    }

    fn reduce_immobilization(&mut self, secs: f32) -> bool {
        self.immobilized -= secs;
        if self.immobilized <= 0.0 {
            self.immobilized = 0.0;
            self.taser_immunity = TASER_IMMUNITY_SECS;
            return true;
        }
        false
    }

    /// Integrate movement for one tick at `max_speed`, moving `body`.
    ///
    /// The physics collaborator corrects the displacement against static
    /// geometry. While riding, a correction that keeps the player under a
    /// tenth of the intended distance accumulates stuck time.
    pub fn integrate(
        &mut self,
        input: &PlayerInput,
        max_speed: f32,
        body: Option<BodyHandle>,
        physics: PhysicsMut<'_>,
        dt: f32,
    ) {
        if dt <= 0.0 {
            return;
        }
        if self.is_immobilized() {
            self.velocity = Vec2::ZERO;
            return;
        }

        let intent = input.movement.clamp_length_max(1.0);
        if intent.length_squared() > f32::EPSILON {
            self.facing = intent.normalize();
        }
        let desired = intent * max_speed * dt;

        let moved = match (physics, body) {
            (Some(physics), Some(body)) => {
                physics.compute_movement(body, self.position, desired, CollisionFilter::world())
            }
            _ => desired,
        };
        self.position += moved;
        self.velocity = moved / dt;

        let intended = desired.length();
        let stalled = moved.length() < intended * STUCK_PROGRESS_RATIO;
        if self.riding && intended > f32::EPSILON && stalled {
            self.stuck_secs += dt;
        } else {
            self.stuck_secs = 0.0;
        }
    }
}
