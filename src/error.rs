//! Error types for loopctl
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur while building or driving a loop
#[derive(Debug, Error)]
pub enum LoopError {
    /// A required argument was absent
    #[error("Null argument: {0}")]
    NullArgument(String),

    /// Control operation invoked from a state that does not permit it
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// A callback or strategy panicked on the engine task
    #[error("Loop panicked: {0}")]
    Panicked(String),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias for loopctl operations
pub type Result<T> = std::result::Result<T, LoopError>;
