//! Run state machine
//!
//! Decides which lifecycle commands are legal in which phase. It only moves
//! the phase; the side effects of entering a phase (resetting the run,
//! persisting the high score) belong to the simulation step.

use serde::{Deserialize, Serialize};

use super::state::RunPhase;
use crate::GameError;

/// Lifecycle commands, queued and drained once per step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Start (or restart) a run
    Start,
    Pause,
    Resume,
    /// Pause when active, resume when paused
    TogglePause,
    /// Host reported itself hidden/backgrounded
    Hidden,
    /// Craft reached its resting depth (issued by the step)
    EntryComplete,
    /// Player struck an obstacle (issued by the step)
    Collision,
}

/// An accepted phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: RunPhase,
    pub to: RunPhase,
    pub command: Command,
}

impl Transition {
    /// Whether this transition begins a new run
    pub fn starts_run(&self) -> bool {
        self.command == Command::Start
    }

    pub fn ends_run(&self) -> bool {
        self.to == RunPhase::GameOver
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStateMachine {
    phase: RunPhase,
}

impl RunStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Target phase for `command`, or `None` if it is not legal now
    pub fn target(phase: RunPhase, command: Command) -> Option<RunPhase> {
        use Command::*;
        use RunPhase::*;

        match (phase, command) {
            (_, Start) => Some(FlyingIn),
            (FlyingIn, EntryComplete) => Some(Active),
            (Active, Pause | TogglePause | Hidden) => Some(Paused),
            (Paused, Resume | TogglePause) => Some(Active),
            (Active, Collision) => Some(GameOver),
            _ => None,
        }
    }

    /// Apply one command, moving at most one step through the table
    pub fn apply(&mut self, command: Command) -> Result<Transition, GameError> {
        let from = self.phase;
        let to = Self::target(from, command).ok_or(GameError::InvalidTransition {
            phase: from,
            command,
        })?;
        self.phase = to;
        Ok(Transition { from, to, command })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PHASES: [RunPhase; 5] = [
        RunPhase::Idle,
        RunPhase::FlyingIn,
        RunPhase::Active,
        RunPhase::Paused,
        RunPhase::GameOver,
    ];

    const ALL_COMMANDS: [Command; 7] = [
        Command::Start,
        Command::Pause,
        Command::Resume,
        Command::TogglePause,
        Command::Hidden,
        Command::EntryComplete,
        Command::Collision,
    ];

    fn machine_in(phase: RunPhase) -> RunStateMachine {
        RunStateMachine { phase }
    }

    #[test]
    fn test_happy_path() {
        let mut machine = RunStateMachine::new();
        assert_eq!(machine.phase(), RunPhase::Idle);
        assert!(machine.apply(Command::Start).unwrap().starts_run());
        machine.apply(Command::EntryComplete).unwrap();
        machine.apply(Command::Pause).unwrap();
        assert_eq!(machine.phase(), RunPhase::Paused);
        machine.apply(Command::Resume).unwrap();
        let t = machine.apply(Command::Collision).unwrap();
        assert!(t.ends_run());
        assert_eq!(machine.phase(), RunPhase::GameOver);
    }

    #[test]
    fn test_only_start_leaves_game_over() {
        for command in ALL_COMMANDS {
            let mut machine = machine_in(RunPhase::GameOver);
            let result = machine.apply(command);
            if command == Command::Start {
                assert_eq!(machine.phase(), RunPhase::FlyingIn);
            } else {
                assert!(result.unwrap_err().is_invalid_transition());
                assert_eq!(machine.phase(), RunPhase::GameOver);
            }
        }
    }

    #[test]
    fn test_pause_and_resume_only_from_source_state() {
        for phase in ALL_PHASES {
            let mut machine = machine_in(phase);
            let paused = machine.apply(Command::Pause).is_ok();
            assert_eq!(paused, phase == RunPhase::Active);

            let mut machine = machine_in(phase);
            let resumed = machine.apply(Command::Resume).is_ok();
            assert_eq!(resumed, phase == RunPhase::Paused);
            if !resumed {
                assert_eq!(machine.phase(), phase);
            }
        }
    }

    #[test]
    fn test_double_resume_is_idempotent() {
        let mut machine = machine_in(RunPhase::Active);
        assert!(machine.apply(Command::Resume).is_err());
        assert!(machine.apply(Command::Resume).is_err());
        assert_eq!(machine.phase(), RunPhase::Active);
    }

    #[test]
    fn test_pause_while_flying_in_is_ignored() {
        let mut machine = machine_in(RunPhase::FlyingIn);
        assert!(machine.apply(Command::Pause).is_err());
        assert!(machine.apply(Command::TogglePause).is_err());
        assert!(machine.apply(Command::Hidden).is_err());
        assert_eq!(machine.phase(), RunPhase::FlyingIn);
    }

    #[test]
    fn test_hidden_never_toggles_back() {
        let mut machine = machine_in(RunPhase::Paused);
        assert!(machine.apply(Command::Hidden).is_err());
        assert_eq!(machine.phase(), RunPhase::Paused);
    }

    #[test]
    fn test_start_restarts_from_anywhere() {
        for phase in ALL_PHASES {
            let mut machine = machine_in(phase);
            let t = machine.apply(Command::Start).unwrap();
            assert_eq!(t.from, phase);
            assert_eq!(t.to, RunPhase::FlyingIn);
        }
    }
}
