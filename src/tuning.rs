//! Data-driven game balance
//!
//! Every gameplay constant lives here so balance passes can happen in JSON
//! without touching the simulation. Speeds are world units per reference
//! (60 Hz) frame; see [`crate::frame_scale`].

use serde::{Deserialize, Serialize};

use crate::GameError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Camera / playfield ===
    /// Vertical field of view (degrees)
    pub camera_fov_deg: f32,
    /// Camera distance from the play plane (camera sits at this z)
    pub camera_z: f32,
    /// Horizontal padding inside the visible frustum
    pub padding_x: f32,
    /// Vertical padding inside the visible frustum
    pub padding_y: f32,

    // === Craft ===
    /// Lateral speed at difficulty 1
    pub craft_speed: f32,
    /// Depth the craft starts its entry maneuver from
    pub craft_entry_z: f32,
    /// Resting depth once the entry maneuver completes
    pub craft_rest_z: f32,
    /// Depth covered per frame while flying in
    pub fly_in_step: f32,
    /// Target tilt per unit of movement intent (radians)
    pub tilt_factor: f32,
    /// Per-frame interpolation factor toward the target tilt
    pub tilt_lerp: f32,

    // === Obstacles ===
    pub obstacle_speed: f32,
    /// Circumradius of the obstacle dodecahedron
    pub obstacle_radius: f32,
    pub obstacle_spawn_z: f32,
    /// Full width of the random per-axis spin range (radians per frame)
    pub obstacle_spin_range: f32,
    /// Extra lateral room added to the boundary when placing spawns
    pub spawn_margin: f32,
    pub base_spawn_interval_ms: f32,
    pub min_spawn_interval_ms: f32,

    // === Projectiles ===
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    /// Projectiles past this depth are dropped
    pub projectile_far_z: f32,
    /// Forward offset from the craft where projectiles appear
    pub muzzle_offset: f32,

    // === Background ===
    pub star_speed: f32,
    /// Edge length of the cube stars are scattered in
    pub star_spread: f32,
    pub star_reset_z: f32,

    /// Entities further than this past the camera are behind it
    pub behind_camera_margin: f32,
    /// Seconds of play per +1 difficulty
    pub difficulty_ramp_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            camera_fov_deg: 75.0,
            camera_z: 10.0,
            padding_x: 6.0,
            padding_y: 5.0,

            craft_speed: 0.15,
            craft_entry_z: -120.0,
            craft_rest_z: 5.0,
            fly_in_step: 1.0,
            tilt_factor: std::f32::consts::PI / 12.0,
            tilt_lerp: 0.2,

            obstacle_speed: 0.3,
            obstacle_radius: 1.5,
            obstacle_spawn_z: -200.0,
            obstacle_spin_range: 0.02,
            spawn_margin: 5.0,
            base_spawn_interval_ms: 1000.0,
            min_spawn_interval_ms: 100.0,

            projectile_speed: 0.5,
            projectile_radius: 0.1,
            projectile_far_z: -200.0,
            muzzle_offset: 1.0,

            star_speed: 0.5,
            star_spread: 200.0,
            star_reset_z: -200.0,

            behind_camera_margin: 5.0,
            difficulty_ramp_secs: 30.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), GameError> {
        if !(self.camera_fov_deg > 0.0 && self.camera_fov_deg < 180.0) {
            return Err(GameError::Config(format!(
                "camera_fov_deg must be in (0, 180), got {}",
                self.camera_fov_deg
            )));
        }
        if self.difficulty_ramp_secs <= 0.0 {
            return Err(GameError::Config("difficulty_ramp_secs must be positive".into()));
        }
        if self.min_spawn_interval_ms <= 0.0 || self.base_spawn_interval_ms < self.min_spawn_interval_ms {
            return Err(GameError::Config(
                "spawn intervals must satisfy 0 < min <= base".into(),
            ));
        }
        if self.craft_rest_z <= self.craft_entry_z || self.fly_in_step <= 0.0 {
            return Err(GameError::Config(
                "craft must fly forward from entry depth to rest depth".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.tilt_lerp) {
            return Err(GameError::Config("tilt_lerp must be in [0, 1]".into()));
        }
        Ok(())
    }

    /// Depth past which obstacles and stars are behind the camera
    pub fn behind_camera_z(&self) -> f32 {
        self.camera_z + self.behind_camera_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
        assert_eq!(Tuning::default().behind_camera_z(), 15.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "obstacle_speed": 0.6 }"#).unwrap();
        assert_eq!(tuning.obstacle_speed, 0.6);
        assert_eq!(tuning.base_spawn_interval_ms, 1000.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "camera_fov_deg": 200.0 }"#),
            Err(GameError::Config(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "min_spawn_interval_ms": 0.0 }"#),
            Err(GameError::Config(_))
        ));
        assert!(matches!(Tuning::from_json("not json"), Err(GameError::Json(_))));
    }
}
