//! Difficulty curve
//!
//! A single multiplier, derived from whole seconds of run time, scales every
//! speed in the game and divides the obstacle spawn interval.

/// Difficulty multiplier after `elapsed_secs` of play
///
/// Only whole seconds count, so the multiplier steps once per second.
pub fn multiplier(elapsed_secs: f64, ramp_secs: f32) -> f32 {
    let whole = elapsed_secs.max(0.0).floor() as f32;
    1.0 + whole / ramp_secs
}

/// Milliseconds between obstacle spawns at `difficulty`
pub fn spawn_interval_ms(difficulty: f32, base_ms: f32, floor_ms: f32) -> f32 {
    (base_ms / difficulty).max(floor_ms)
}
