//! Error taxonomy
//!
//! Nothing in the simulation core is fatal. Asset failures leave the run
//! going without a player model, rejected commands are ignored, and storage
//! trouble only costs the persisted high score.

use thiserror::Error;

use crate::sim::{Command, RunPhase};

#[derive(Debug, Error)]
pub enum GameError {
    /// A model could not be loaded; gameplay continues without it
    #[error("failed to load asset `{asset}`: {reason}")]
    AssetLoad { asset: String, reason: String },

    /// The run state machine rejected a command
    #[error("command {command:?} is not valid while {phase:?}")]
    InvalidTransition { phase: RunPhase, command: Command },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("storage unavailable: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GameError {
    /// Whether this error is a rejected command (expected, never surfaced)
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, GameError::InvalidTransition { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = GameError::AssetLoad {
            asset: "ship.glb".into(),
            reason: "404".into(),
        };
        assert_eq!(err.to_string(), "failed to load asset `ship.glb`: 404");

        let err = GameError::InvalidTransition {
            phase: RunPhase::GameOver,
            command: Command::Pause,
        };
        assert!(err.is_invalid_transition());
        assert_eq!(err.to_string(), "command Pause is not valid while GameOver");
    }
}
