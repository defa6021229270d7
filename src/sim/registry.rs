//! Entity registry
//!
//! Sole owner of the obstacle and projectile collections. Every creation and
//! destruction goes through here and is reported as a [`GameEvent`] so the
//! renderer can mirror the scene graph.

use glam::Vec3;

use super::state::{EntityId, EntityKind, GameEvent, Geometry, Obstacle, Projectile, Tint};

/// Everything needed to create an obstacle (id assigned by the registry)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleSpawn {
    pub pos: Vec3,
    pub rotation: Vec3,
    pub spin: Vec3,
    pub tint: Tint,
    pub geometry: Geometry,
}

#[derive(Debug)]
pub struct EntityRegistry {
    /// Live obstacles (ascending id)
    obstacles: Vec<Obstacle>,
    /// Live projectiles (ascending id)
    projectiles: Vec<Projectile>,
    next_id: EntityId,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            next_id: 1,
        }
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Mutable view for motion updates; the collection itself stays fixed
    pub(crate) fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    pub(crate) fn projectiles_mut(&mut self) -> &mut [Projectile] {
        &mut self.projectiles
    }

    pub fn obstacle(&self, id: EntityId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty() && self.projectiles.is_empty()
    }

    pub fn spawn_obstacle(&mut self, spawn: ObstacleSpawn, events: &mut Vec<GameEvent>) -> EntityId {
        let id = self.next_entity_id();
        let mut obstacle = Obstacle::new(id, spawn.pos, spawn.geometry);
        obstacle.rotation = spawn.rotation;
        obstacle.spin = spawn.spin;
        obstacle.tint = spawn.tint;
        self.obstacles.push(obstacle);
        events.push(GameEvent::Spawned {
            id,
            kind: EntityKind::Obstacle,
            pos: spawn.pos,
        });
        id
    }

    pub fn spawn_projectile(&mut self, pos: Vec3, geometry: Geometry, events: &mut Vec<GameEvent>) -> EntityId {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile::new(id, pos, geometry));
        events.push(GameEvent::Spawned {
            id,
            kind: EntityKind::Projectile,
            pos,
        });
        id
    }

    pub fn remove_obstacle(&mut self, id: EntityId, events: &mut Vec<GameEvent>) -> Option<Obstacle> {
        let index = self.obstacles.iter().position(|o| o.id == id)?;
        let obstacle = self.obstacles.remove(index);
        events.push(GameEvent::Despawned {
            id,
            kind: EntityKind::Obstacle,
        });
        Some(obstacle)
    }

    pub fn remove_projectile(&mut self, id: EntityId, events: &mut Vec<GameEvent>) -> Option<Projectile> {
        let index = self.projectiles.iter().position(|p| p.id == id)?;
        let projectile = self.projectiles.remove(index);
        events.push(GameEvent::Despawned {
            id,
            kind: EntityKind::Projectile,
        });
        Some(projectile)
    }

    /// Keep only obstacles matching `keep`, reporting the rest as despawned
    pub fn retain_obstacles(&mut self, mut keep: impl FnMut(&Obstacle) -> bool, events: &mut Vec<GameEvent>) {
        self.obstacles.retain(|o| {
            let kept = keep(o);
            if !kept {
                events.push(GameEvent::Despawned {
                    id: o.id,
                    kind: EntityKind::Obstacle,
                });
            }
            kept
        });
    }

    pub fn retain_projectiles(&mut self, mut keep: impl FnMut(&Projectile) -> bool, events: &mut Vec<GameEvent>) {
        self.projectiles.retain(|p| {
            let kept = keep(p);
            if !kept {
                events.push(GameEvent::Despawned {
                    id: p.id,
                    kind: EntityKind::Projectile,
                });
            }
            kept
        });
    }

    /// Drop every entity
    pub fn clear(&mut self, events: &mut Vec<GameEvent>) {
        self.retain_obstacles(|_| false, events);
        self.retain_projectiles(|_| false, events);
    }
}
