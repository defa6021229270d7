//! Obstacle spawner
//!
//! Accumulates frame time and drops one obstacle into the far field whenever
//! the difficulty-scaled interval has passed.

use glam::Vec3;
use rand::Rng;

use super::boundary::Bounds;
use super::difficulty;
use super::registry::{EntityRegistry, ObstacleSpawn};
use super::state::{EntityId, GameEvent, Geometry, RunContext, Tint};
use crate::tuning::Tuning;

/// Roll a fresh obstacle in the far field
pub fn roll_obstacle(rng: &mut impl Rng, bounds: &Bounds, tuning: &Tuning) -> ObstacleSpawn {
    let x = (rng.random::<f32>() - 0.5) * (bounds.x_limit + tuning.spawn_margin);
    let y = (rng.random::<f32>() - 0.5) * (bounds.y_limit + tuning.spawn_margin);
    let tau = std::f32::consts::TAU;
    let rotation = Vec3::new(
        rng.random::<f32>() * tau,
        rng.random::<f32>() * tau,
        rng.random::<f32>() * tau,
    );
    let range = tuning.obstacle_spin_range;
    let spin = Vec3::new(
        (rng.random::<f32>() - 0.5) * range,
        (rng.random::<f32>() - 0.5) * range,
        (rng.random::<f32>() - 0.5) * range,
    );
    // Dusty browns
    let tint = Tint {
        r: rng.random_range(100..150),
        g: rng.random_range(90..140),
        b: rng.random_range(80..130),
    };

    ObstacleSpawn {
        pos: Vec3::new(x, y, tuning.obstacle_spawn_z),
        rotation,
        spin,
        tint,
        geometry: Geometry::Dodecahedron {
            radius: tuning.obstacle_radius,
        },
    }
}

/// Advance the spawn timer by `dt_ms`, spawning at most one obstacle
pub fn advance(
    run: &mut RunContext,
    dt_ms: f32,
    bounds: &Bounds,
    tuning: &Tuning,
    registry: &mut EntityRegistry,
    events: &mut Vec<GameEvent>,
) -> Option<EntityId> {
    run.spawn_timer_ms += dt_ms;
    let interval = difficulty::spawn_interval_ms(
        run.difficulty,
        tuning.base_spawn_interval_ms,
        tuning.min_spawn_interval_ms,
    );
    if run.spawn_timer_ms <= interval {
        return None;
    }

    let spawn = roll_obstacle(&mut run.rng, bounds, tuning);
    run.spawn_timer_ms = 0.0;
    let id = registry.spawn_obstacle(spawn, events);
    log::debug!(
        "Spawned obstacle {} at ({:.1}, {:.1}) interval={:.0}ms",
        id,
        spawn.pos.x,
        spawn.pos.y,
        interval
    );
    Some(id)
}
