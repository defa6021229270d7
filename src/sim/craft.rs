//! The player craft
//!
//! The craft always has a position, but it only becomes collidable once a
//! model has loaded and its transform has been committed by one step.

use glam::{Vec2, Vec3};

use super::boundary::Bounds;
use super::collision::Sphere;
use crate::consts::COLLISION_SHRINK;
use crate::lerp;
use crate::renderer::ModelHandle;
use crate::tuning::Tuning;

/// Resting pitch: the model is authored nose-up and laid flat
pub const BASE_PITCH: f32 = std::f32::consts::FRAC_PI_2;

/// Model availability for the craft
#[derive(Debug, Clone, PartialEq)]
pub enum ModelState {
    /// No model loaded (yet, or the load failed)
    Absent,
    /// Loaded, waiting for the first transform commit
    Committing(ModelHandle),
    /// Collision sphere known
    Ready { handle: ModelHandle, radius: f32 },
}

#[derive(Debug, Clone)]
pub struct Craft {
    pub pos: Vec3,
    /// Bank around the depth axis (radians)
    pub roll: f32,
    /// Nose attitude (radians, [`BASE_PITCH`] when level)
    pub pitch: f32,
    model: ModelState,
}

impl Craft {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec3::new(0.0, 0.0, tuning.craft_entry_z),
            roll: 0.0,
            pitch: BASE_PITCH,
            model: ModelState::Absent,
        }
    }

    /// Back to the entry coordinates, level; the model is kept
    pub fn reset(&mut self, tuning: &Tuning) {
        self.pos = Vec3::new(0.0, 0.0, tuning.craft_entry_z);
        self.roll = 0.0;
        self.pitch = BASE_PITCH;
    }

    pub fn model_state(&self) -> &ModelState {
        &self.model
    }

    /// Install a freshly loaded model; the radius is derived on commit
    pub fn attach_model(&mut self, handle: ModelHandle) {
        self.model = ModelState::Committing(handle);
    }

    /// First committed transform after a load: derive the radius once
    ///
    /// Returns the radius the first time it becomes known for this load.
    pub fn commit_transform(&mut self) -> Option<f32> {
        let ModelState::Committing(handle) = &self.model else {
            return None;
        };
        let radius = handle.local_radius * handle.scale * COLLISION_SHRINK;
        self.model = ModelState::Ready {
            handle: handle.clone(),
            radius,
        };
        Some(radius)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.model, ModelState::Ready { .. })
    }

    /// World collision sphere, once the model radius is known
    pub fn collision_sphere(&self) -> Option<Sphere> {
        match self.model {
            ModelState::Ready { radius, .. } => Some(Sphere::new(self.pos, radius)),
            _ => None,
        }
    }

    /// Entry maneuver; true once the resting depth is reached
    pub fn fly_in(&mut self, step: f32, rest_z: f32) -> bool {
        self.pos.z += step;
        if self.pos.z >= rest_z {
            self.pos.z = rest_z;
            return true;
        }
        false
    }

    /// Apply movement intent and pointer drag, then clamp to `bounds`
    pub fn translate(&mut self, delta: Vec2, bounds: &Bounds) {
        self.pos.x += delta.x;
        self.pos.y += delta.y;
        self.pos = bounds.clamp(self.pos);
    }

    /// Ease bank and pitch toward the attitude implied by `movement`
    ///
    /// `frames` is the number of reference frames covered; the per-frame
    /// factor compounds so the easing is rate independent.
    pub fn orient(&mut self, movement: Vec2, tuning: &Tuning, frames: f32) {
        let t = 1.0 - (1.0 - tuning.tilt_lerp).powf(frames);
        self.roll = lerp(self.roll, -movement.x * tuning.tilt_factor, t);
        self.pitch = lerp(self.pitch, BASE_PITCH - movement.y * tuning.tilt_factor, t);
    }
}
