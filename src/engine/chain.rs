//! Ordered chain of per-element callbacks.
//!
//! Callbacks run in registration order for every element. The chain's
//! decision is the logical AND of the callbacks' decisions, evaluated with
//! short-circuit: once a callback returns `false`, later callbacks do not see
//! that element.

use std::sync::{Arc, PoisonError, RwLock};

use super::loop_engine::Loop;
use crate::strategy::Strategy;

/// A registered callback: receives the owning loop and the current element,
/// returns `true` to continue and `false` to stop.
pub type Callback<S> = Arc<dyn Fn(&Loop<S>, &<S as Strategy>::Item) -> bool + Send + Sync>;

/// Append-only, thread-safe list of callbacks.
pub struct CallbackChain<S: Strategy> {
    callbacks: RwLock<Vec<Callback<S>>>,
}

impl<S: Strategy> CallbackChain<S> {
    pub fn new() -> Self {
        Self {
            callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Register a callback at the end of the chain.
    pub fn push(&self, callback: Callback<S>) {
        self.callbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(callback);
    }

    pub fn len(&self) -> usize {
        self.callbacks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every callback against `item` in order.
    ///
    /// Works on a snapshot so a callback may append to its own loop; the new
    /// callback applies from the next element on.
    pub fn invoke(&self, owner: &Loop<S>, item: &S::Item) -> bool {
        let snapshot = self.snapshot();
        snapshot.iter().all(|callback| callback(owner, item))
    }

    fn snapshot(&self) -> Vec<Callback<S>> {
        self.callbacks.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl<S: Strategy> Default for CallbackChain<S> {
    fn default() -> Self {
        Self::new()
    }
}
