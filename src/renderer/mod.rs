//! Renderer and model loader seams
//!
//! The simulation never draws. The scheduler mirrors spawn/despawn events
//! into a [`Renderer`] scene graph and asks it to draw after each step that
//! moved the world. Models arrive through a [`ModelLoader`] that is polled
//! once per frame.

mod loader;
mod recorder;

pub use loader::{LoadScript, StaticModelLoader};
pub use recorder::SceneRecorder;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::GameError;
use crate::sim::{EntityId, EntityKind, Simulation};

/// A loaded, transform-bearing model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelHandle {
    /// Asset identifier the model was loaded from
    pub asset: String,
    /// Bounding radius of the mesh in model space
    pub local_radius: f32,
    /// Uniform scale applied when placed in the world
    pub scale: f32,
}

/// Scene-graph side of the renderer
pub trait Renderer {
    /// An entity entered the world
    fn add(&mut self, id: EntityId, kind: EntityKind, pos: Vec3);
    /// An entity left the world
    fn remove(&mut self, id: EntityId, kind: EntityKind);
    /// Draw the current transforms
    fn draw(&mut self, sim: &Simulation);
    /// Viewport changed; recompute the projection
    fn resize(&mut self, width: u32, height: u32);
}

/// Asynchronous model source, polled by the scheduler
pub trait ModelLoader {
    /// Begin loading `asset`; a new request replaces any pending one
    fn request(&mut self, asset: &str);
    /// Completed load, if one finished since the last poll
    fn poll(&mut self) -> Option<Result<ModelHandle, GameError>>;
}
