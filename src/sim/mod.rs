//! Simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic for a
//! given seed and frame sequence:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No drawing or host access; collaborators sit behind traits

pub mod boundary;
pub mod collision;
pub mod craft;
pub mod difficulty;
pub mod machine;
pub mod registry;
pub mod spawner;
pub mod starfield;
pub mod state;
pub mod tick;

pub use boundary::{Bounds, Viewport};
pub use collision::{Hit, Sphere, player_hit, projectile_hits};
pub use craft::{Craft, ModelState};
pub use machine::{Command, RunStateMachine, Transition};
pub use registry::{EntityRegistry, ObstacleSpawn};
pub use starfield::{Star, Starfield};
pub use state::{
    EntityId, EntityKind, GameEvent, Geometry, Obstacle, Projectile, RunContext, RunPhase, RunSummary, Tint,
};
pub use tick::{Simulation, StepOutcome, StepReport};
