//! Driving strategies.
//!
//! A strategy produces elements and hands each one to the engine through
//! `Driver::next`. The engine owns state, callbacks and control; the strategy
//! only decides what the elements are and in which order they come.

use async_trait::async_trait;

use crate::engine::Driver;

mod foreach;

pub use foreach::{Each, Foreach, ForeachBuilder, Source};

/// How a strategy's driving procedure ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drive {
    /// Ran out of elements
    Exhausted,
    /// Stopped early because `next` returned false or the strategy gave up
    Halted,
}

/// A driving procedure the engine runs on its own task.
#[async_trait]
pub trait Strategy: Send + Sized + 'static {
    /// Element type delivered to callbacks.
    type Item: Send + Sync + 'static;

    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Produce elements, calling `driver.next` for each. Must return
    /// `Drive::Halted` as soon as `next` returns false.
    async fn drive(&mut self, driver: &mut Driver<'_, Self>) -> Drive;
}
