//! Domain types for loopctl
//!
//! - LoopState: the run state machine (Idle, Running, Paused, Stopped, Finished)
//! - Control: operations that move a loop between states
//! - LoopOutcome: result of a completed run, with its StopCause when stopped

pub mod outcome;
pub mod state;

pub use outcome::{LoopOutcome, StopCause};
pub use state::{Control, LoopState};
