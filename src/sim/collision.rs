//! Bounding-sphere collision detection
//!
//! Every collidable is approximated by a sphere. Local radii are cached on
//! the entities; world spheres are rebuilt from the current transform each
//! frame, so they are cheap values rather than stored state.

use glam::Vec3;

use super::state::{EntityId, Obstacle, Projectile};

/// World-space bounding sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Touching or overlapping
    pub fn intersects(&self, other: &Sphere) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }

    /// Strictly overlapping (centers closer than the sum of radii)
    pub fn overlaps(&self, other: &Sphere) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }
}

/// Collision sphere of an obstacle at its current position
pub fn obstacle_sphere(obstacle: &Obstacle) -> Sphere {
    Sphere::new(obstacle.pos, obstacle.collision_radius())
}

/// Collision sphere of a projectile at its current position
pub fn projectile_sphere(projectile: &Projectile) -> Sphere {
    Sphere::new(projectile.pos, projectile.bounding_radius())
}

/// First obstacle the player sphere strictly overlaps, if any
pub fn player_hit(player: &Sphere, obstacles: &[Obstacle]) -> Option<EntityId> {
    obstacles
        .iter()
        .find(|o| player.overlaps(&obstacle_sphere(o)))
        .map(|o| o.id)
}

/// A projectile that struck an obstacle this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub projectile: EntityId,
    pub obstacle: EntityId,
}

/// Resolve projectile/obstacle overlaps for one frame
///
/// Each projectile destroys at most one obstacle and each obstacle is
/// claimed by at most one projectile. Projectiles are resolved in slice
/// order; the first overlapping obstacle in slice order wins.
pub fn projectile_hits(projectiles: &[Projectile], obstacles: &[Obstacle]) -> Vec<Hit> {
    let spheres: Vec<Sphere> = obstacles.iter().map(obstacle_sphere).collect();
    let mut claimed = vec![false; obstacles.len()];
    let mut hits = Vec::new();

    for projectile in projectiles {
        let shot = projectile_sphere(projectile);
        for (j, sphere) in spheres.iter().enumerate() {
            if claimed[j] || !shot.intersects(sphere) {
                continue;
            }
            claimed[j] = true;
            hits.push(Hit {
                projectile: projectile.id,
                obstacle: obstacles[j].id,
            });
            break;
        }
    }

    hits
}
