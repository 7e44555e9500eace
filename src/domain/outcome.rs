//! Loop execution outcome types.

use super::state::LoopState;

/// Why a loop ended in `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCause {
    /// `stop()` was called on the loop
    Requested,
    /// A callback in the chain returned `false`
    Callback,
    /// The strategy halted on its own
    Strategy,
}

/// Outcome of a loop execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    /// Driving step exhausted its elements
    Finished { processed: u64 },
    /// Loop was terminated early
    Stopped { processed: u64, cause: StopCause },
}

impl LoopOutcome {
    /// Number of elements delivered to the callback chain
    pub fn processed(&self) -> u64 {
        match self {
            LoopOutcome::Finished { processed } | LoopOutcome::Stopped { processed, .. } => *processed,
        }
    }

    /// Terminal state matching this outcome
    pub fn state(&self) -> LoopState {
        match self {
            LoopOutcome::Finished { .. } => LoopState::Finished,
            LoopOutcome::Stopped { .. } => LoopState::Stopped,
        }
    }
}
