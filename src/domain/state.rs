//! Run state of a loop and the control transitions between states
//!
//! A loop starts `Idle`, runs, may be paused and resumed any number of times,
//! and ends in exactly one terminal state: `Finished` when its driving step
//! ran out of elements, `Stopped` when it was terminated early.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LoopError, Result};

/// Status of a loop's execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopState {
    /// Constructed, not started
    Idle,
    /// Engine task is delivering elements
    Running,
    /// Engine task parks at the next element boundary
    Paused,
    /// Terminated early by a callback, the strategy, or `stop()`
    Stopped,
    /// Driving step exhausted normally
    Finished,
}

/// Control operation requested against a loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Start,
    Pause,
    Resume,
    Stop,
}

impl LoopState {
    /// Returns true if the loop is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Stopped | LoopState::Finished)
    }

    /// Returns true if the loop can be resumed
    pub fn is_resumable(&self) -> bool {
        matches!(self, LoopState::Paused)
    }

    /// Apply a control operation, returning the next state.
    ///
    /// Fails with `IllegalState` for any combination the state machine does
    /// not allow. Terminal states reject every operation.
    pub fn apply(self, control: Control) -> Result<LoopState> {
        match (self, control) {
            (LoopState::Idle, Control::Start) => Ok(LoopState::Running),
            (LoopState::Running, Control::Pause) => Ok(LoopState::Paused),
            (LoopState::Paused, Control::Resume) => Ok(LoopState::Running),
            (LoopState::Running | LoopState::Paused, Control::Stop) => Ok(LoopState::Stopped),
            (state, control) => Err(LoopError::IllegalState(format!(
                "cannot {} a {} loop",
                control, state
            ))),
        }
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoopState::Idle => "idle",
            LoopState::Running => "running",
            LoopState::Paused => "paused",
            LoopState::Stopped => "stopped",
            LoopState::Finished => "finished",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Control::Start => "start",
            Control::Pause => "pause",
            Control::Resume => "resume",
            Control::Stop => "stop",
        };
        f.write_str(s)
    }
}
