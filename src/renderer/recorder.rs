//! Headless renderer that records the scene graph

use std::collections::BTreeMap;

use glam::Vec3;

use super::Renderer;
use crate::sim::{EntityId, EntityKind, Simulation};

/// Keeps the live scene and counts draws instead of drawing
#[derive(Debug, Default, Clone)]
pub struct SceneRecorder {
    /// Live entities and the position they were added at
    pub scene: BTreeMap<EntityId, (EntityKind, Vec3)>,
    pub draws: u64,
    pub added: u64,
    pub removed: u64,
    pub size: (u32, u32),
    /// Entities the step said to remove that the scene didn't know
    pub unknown_removals: u64,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self, kind: EntityKind) -> usize {
        self.scene.values().filter(|(k, _)| *k == kind).count()
    }
}

impl Renderer for SceneRecorder {
    fn add(&mut self, id: EntityId, kind: EntityKind, pos: Vec3) {
        self.scene.insert(id, (kind, pos));
        self.added += 1;
    }

    fn remove(&mut self, id: EntityId, kind: EntityKind) {
        if self.scene.remove(&id).is_none() {
            log::warn!("Renderer asked to remove unknown {:?} {}", kind, id);
            self.unknown_removals += 1;
        }
        self.removed += 1;
    }

    fn draw(&mut self, sim: &Simulation) {
        self.draws += 1;
        log::trace!(
            "draw #{}: {} obstacles, {} projectiles, craft at {:?}",
            self.draws,
            sim.registry().obstacles().len(),
            sim.registry().projectiles().len(),
            sim.craft().pos
        );
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_scene() {
        let mut recorder = SceneRecorder::new();
        recorder.add(1, EntityKind::Obstacle, Vec3::ZERO);
        recorder.add(2, EntityKind::Projectile, Vec3::ONE);
        assert_eq!(recorder.live(EntityKind::Obstacle), 1);
        recorder.remove(1, EntityKind::Obstacle);
        recorder.remove(1, EntityKind::Obstacle);
        assert_eq!(recorder.live(EntityKind::Obstacle), 0);
        assert_eq!(recorder.unknown_removals, 1);
        recorder.resize(800, 600);
        assert_eq!(recorder.size, (800, 600));
    }
}
