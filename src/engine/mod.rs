//! Loop engine module - owns run state, the callback chain, and control.
//!
//! This module provides:
//! - Loop, the engine handle parameterized by its driving strategy
//! - Driver, the step handle strategies use to deliver elements
//! - CallbackChain, the ordered per-element callbacks

mod chain;
mod loop_engine;

pub use chain::{Callback, CallbackChain};
pub use loop_engine::{Driver, Loop};
