//! Simulation state and core entity types
//!
//! All state a run mutates lives here, owned by [`super::Simulation`].

use std::cell::OnceCell;

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::COLLISION_SHRINK;

/// Registry-unique entity identifier
pub type EntityId = u32;

/// Lifecycle phase of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// Before the first start, nothing simulated
    #[default]
    Idle,
    /// Craft is flying to its resting depth; input and collision disabled
    FlyingIn,
    /// Full simulation
    Active,
    /// Entities frozen, resumable
    Paused,
    /// Run ended, score finalized
    GameOver,
}

impl RunPhase {
    /// Whether a step advances the world in this phase
    pub fn is_simulating(self) -> bool {
        matches!(self, RunPhase::FlyingIn | RunPhase::Active)
    }
}

/// Registry-owned entity populations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle,
    Projectile,
}

/// Collision-relevant geometry of an entity (centered on its origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Regular dodecahedron with the given circumradius
    Dodecahedron { radius: f32 },
    /// UV sphere
    Sphere { radius: f32, segments: u32 },
}

impl Geometry {
    /// Mesh vertices in local space
    pub fn vertices(&self) -> Vec<Vec3> {
        match *self {
            Geometry::Dodecahedron { radius } => {
                let phi = (1.0 + 5f32.sqrt()) / 2.0;
                let inv = 1.0 / phi;
                let mut verts = Vec::with_capacity(20);
                for x in [-1.0, 1.0] {
                    for y in [-1.0, 1.0] {
                        for z in [-1.0, 1.0] {
                            verts.push(Vec3::new(x, y, z));
                        }
                    }
                }
                for a in [-1.0, 1.0] {
                    for b in [-1.0, 1.0] {
                        verts.push(Vec3::new(0.0, a * inv, b * phi));
                        verts.push(Vec3::new(a * inv, b * phi, 0.0));
                        verts.push(Vec3::new(a * phi, 0.0, b * inv));
                    }
                }
                let scale = radius / 3f32.sqrt();
                verts.into_iter().map(|v| v * scale).collect()
            }
            Geometry::Sphere { radius, segments } => {
                let segments = segments.max(3);
                let mut verts = Vec::with_capacity(((segments + 1) * (segments + 1)) as usize);
                for iy in 0..=segments {
                    let v = iy as f32 / segments as f32;
                    for ix in 0..=segments {
                        let u = ix as f32 / segments as f32;
                        let (sin_v, cos_v) = (v * std::f32::consts::PI).sin_cos();
                        let (sin_u, cos_u) = (u * std::f32::consts::TAU).sin_cos();
                        verts.push(Vec3::new(-radius * cos_u * sin_v, radius * cos_v, radius * sin_u * sin_v));
                    }
                }
                verts
            }
        }
    }

    /// Radius of the bounding sphere around the box center of the vertices
    pub fn bounding_radius(&self) -> f32 {
        let verts = self.vertices();
        let (min, max) = verts.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), v| (min.min(*v), max.max(*v)),
        );
        let center = (min + max) * 0.5;
        verts
            .iter()
            .map(|v| v.distance_squared(center))
            .fold(0.0f32, f32::max)
            .sqrt()
    }
}

/// Cosmetic obstacle color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A drifting rock the player must dodge or shoot
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: EntityId,
    pub pos: Vec3,
    /// Euler rotation (radians)
    pub rotation: Vec3,
    /// Rotation added per reference frame at difficulty 1
    pub spin: Vec3,
    pub tint: Tint,
    pub geometry: Geometry,
    radius: OnceCell<f32>,
}

impl Obstacle {
    pub fn new(id: EntityId, pos: Vec3, geometry: Geometry) -> Self {
        Self {
            id,
            pos,
            rotation: Vec3::ZERO,
            spin: Vec3::ZERO,
            tint: Tint { r: 128, g: 118, b: 108 },
            geometry,
            radius: OnceCell::new(),
        }
    }

    /// Local bounding radius, computed from the geometry on first use
    pub fn bounding_radius(&self) -> f32 {
        *self.radius.get_or_init(|| self.geometry.bounding_radius())
    }

    /// Radius used for collision (shrunk to forgive near misses)
    pub fn collision_radius(&self) -> f32 {
        self.bounding_radius() * COLLISION_SHRINK
    }

    pub fn radius_cached(&self) -> bool {
        self.radius.get().is_some()
    }

    /// Move toward the camera and tumble
    pub fn advance(&mut self, speed: f32, spin_scale: f32) {
        self.pos.z += speed;
        self.rotation += self.spin * spin_scale;
    }
}

/// A shot fired by the craft, travelling away from the camera
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec3,
    pub geometry: Geometry,
    radius: OnceCell<f32>,
}

impl Projectile {
    pub fn new(id: EntityId, pos: Vec3, geometry: Geometry) -> Self {
        Self {
            id,
            pos,
            geometry,
            radius: OnceCell::new(),
        }
    }

    pub fn bounding_radius(&self) -> f32 {
        *self.radius.get_or_init(|| self.geometry.bounding_radius())
    }

    pub fn radius_cached(&self) -> bool {
        self.radius.get().is_some()
    }
}

/// Per-run counters, reset on every start
#[derive(Debug, Clone)]
pub struct RunContext {
    pub score: u64,
    /// Simulation clock (seconds) when the run started
    pub started_at: f64,
    pub difficulty: f32,
    /// Milliseconds since the last obstacle spawn
    pub spawn_timer_ms: f32,
    /// Number of runs started this session
    pub runs_started: u32,
    pub rng: Pcg32,
}

impl RunContext {
    pub fn new(seed: u64) -> Self {
        Self {
            score: 0,
            started_at: 0.0,
            difficulty: 1.0,
            spawn_timer_ms: 0.0,
            runs_started: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Begin a new run at clock time `now`
    pub fn reset(&mut self, now: f64) {
        self.score = 0;
        self.started_at = now;
        self.difficulty = 1.0;
        self.spawn_timer_ms = 0.0;
        self.runs_started += 1;
    }

    pub fn elapsed_secs(&self, now: f64) -> f64 {
        (now - self.started_at).max(0.0)
    }
}

/// Final numbers of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    /// Whole seconds played
    pub elapsed_secs: u64,
    /// High score after this run
    pub high_score: u64,
    pub new_high_score: bool,
}

/// Things that happened during a step, for presentation layers
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: RunPhase, to: RunPhase },
    Spawned { id: EntityId, kind: EntityKind, pos: Vec3 },
    Despawned { id: EntityId, kind: EntityKind },
    ObstacleDestroyed { obstacle: EntityId, projectile: EntityId, score: u64 },
    /// The craft's collision sphere is known
    CraftReady { radius: f32 },
    CraftModelFailed { asset: String },
    GameOver(RunSummary),
}
