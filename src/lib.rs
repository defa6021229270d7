//! Void Drift - A 3D asteroid-dodging arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, collisions, difficulty, run state)
//! - `scheduler`: Frame driver wiring the simulation to its collaborators
//! - `renderer`: Renderer and model loader seams
//! - `platform`: Input normalization and host visibility
//! - `highscores`: Persisted high score
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod error;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::GameError;
pub use highscores::{MemoryScoreStore, ScoreStore};
pub use scheduler::{FrameOutcome, ScheduleHandle, Scheduler};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frame rate the per-frame gameplay constants were tuned against
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Largest frame delta the scheduler accepts from the host (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Fixed simulation timestep, one reference frame
    pub const SIM_DT: f32 = 1.0 / REFERENCE_FPS;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Multiplier applied to computed bounding radii to make hits forgiving
    pub const COLLISION_SHRINK: f32 = 0.8;
    /// Score awarded per destroyed obstacle
    pub const OBSTACLE_SCORE: u64 = 10;

    /// Storage key of the persisted high score
    pub const HIGH_SCORE_KEY: &str = "highScore";
    /// Asset identifier of the player craft model
    pub const CRAFT_ASSET: &str = "assets/models/space-ship.glb";
}

/// Linear interpolation from `a` toward `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// How many reference frames a delta of `dt` seconds covers
///
/// Per-frame constants are multiplied by this so a 60 Hz host reproduces
/// them exactly and other rates move at the same speed per second.
#[inline]
pub fn frame_scale(dt: f32) -> f32 {
    dt * consts::REFERENCE_FPS
}

/// Install the platform logger
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already initialized");
    }
}

/// Install the platform logger
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Seed for a fresh session, taken from the host clock
#[cfg(target_arch = "wasm32")]
pub fn default_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed for a fresh session, taken from the host clock
#[cfg(not(target_arch = "wasm32"))]
pub fn default_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
