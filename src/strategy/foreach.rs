//! Foreach strategy - loop once over every element of a sequence.
//!
//! The sequence is a vector, any `Send` iterator (possibly infinite), or an
//! async stream. It is consumed lazily, in order, at most once per loop.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{BoxStream, Stream, StreamExt};

use super::{Drive, Strategy};
use crate::config::LoopConfig;
use crate::engine::{Callback, Driver, Loop};
use crate::error::{LoopError, Result};

/// Where a Foreach takes its elements from.
pub enum Source<I> {
    Items(Vec<I>),
    Iter(Box<dyn Iterator<Item = I> + Send>),
    Stream(BoxStream<'static, I>),
}

impl<I> Source<I> {
    pub fn iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = I>,
        T::IntoIter: Send + 'static,
    {
        Source::Iter(Box::new(iter.into_iter()))
    }

    pub fn stream<St>(stream: St) -> Self
    where
        St: Stream<Item = I> + Send + 'static,
    {
        Source::Stream(stream.boxed())
    }
}

impl<I> std::fmt::Debug for Source<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Items(items) => f.debug_tuple("Items").field(&items.len()).finish(),
            Source::Iter(_) => f.write_str("Iter"),
            Source::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// Foreach driving procedure.
pub struct Each<I> {
    source: Option<Source<I>>,
}

impl<I> Each<I> {
    pub fn new(source: Source<I>) -> Self {
        Self { source: Some(source) }
    }
}

/// A loop over each element of a sequence.
///
/// `append` on a `Foreach<I>` returns `&Foreach<I>`, and callbacks receive
/// the `Foreach<I>` itself, so they can pause or stop it directly.
pub type Foreach<I> = Loop<Each<I>>;

#[async_trait]
impl<I: Send + Sync + 'static> Strategy for Each<I> {
    type Item = I;

    fn name(&self) -> &'static str {
        "foreach"
    }

    async fn drive(&mut self, driver: &mut Driver<'_, Self>) -> Drive {
        let Some(source) = self.source.take() else {
            return Drive::Exhausted;
        };

        match source {
            Source::Items(items) => {
                for item in items {
                    if !driver.next(&item).await {
                        return Drive::Halted;
                    }
                }
            }
            Source::Iter(iter) => {
                for item in iter {
                    if !driver.next(&item).await {
                        return Drive::Halted;
                    }
                }
            }
            Source::Stream(mut stream) => {
                while let Some(item) = stream.next().await {
                    if !driver.next(&item).await {
                        return Drive::Halted;
                    }
                }
            }
        }

        Drive::Exhausted
    }
}

impl<I: Send + Sync + 'static> Loop<Each<I>> {
    /// Loop over a fixed collection.
    pub fn new(items: Vec<I>) -> Self {
        Self::from_strategy(Each::new(Source::Items(items)), LoopConfig::default())
    }

    /// Loop over a fixed collection with a first callback registered.
    pub fn with_callback<F>(items: Vec<I>, callback: F) -> Self
    where
        F: Fn(&Foreach<I>, &I) -> bool + Send + Sync + 'static,
    {
        Self::seeded(Source::Items(items), Arc::new(callback))
    }

    /// Loop over any iterable; the iterator is only advanced while running.
    pub fn over<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = I>,
        T::IntoIter: Send + 'static,
    {
        Self::from_strategy(Each::new(Source::iter(iter)), LoopConfig::default())
    }

    /// Loop over any iterable with a first callback registered.
    pub fn over_with<T, F>(iter: T, callback: F) -> Self
    where
        T: IntoIterator<Item = I>,
        T::IntoIter: Send + 'static,
        F: Fn(&Foreach<I>, &I) -> bool + Send + Sync + 'static,
    {
        Self::seeded(Source::iter(iter), Arc::new(callback))
    }

    /// Loop over an async stream.
    pub fn from_stream<St>(stream: St) -> Self
    where
        St: Stream<Item = I> + Send + 'static,
    {
        Self::from_strategy(Each::new(Source::stream(stream)), LoopConfig::default())
    }

    pub fn builder() -> ForeachBuilder<I> {
        ForeachBuilder::new()
    }

    fn seeded(source: Source<I>, callback: Callback<Each<I>>) -> Self {
        let lp = Self::from_strategy(Each::new(source), LoopConfig::default());
        lp.seed(callback);
        lp
    }
}

/// Builder that validates every argument before a Foreach exists.
pub struct ForeachBuilder<I: Send + Sync + 'static> {
    source: Option<Source<I>>,
    callback: Option<Option<Callback<Each<I>>>>,
    config: LoopConfig,
}

impl<I: Send + Sync + 'static> ForeachBuilder<I> {
    pub fn new() -> Self {
        Self {
            source: None,
            callback: None,
            config: LoopConfig::default(),
        }
    }

    pub fn items(mut self, items: Vec<I>) -> Self {
        self.source = Some(Source::Items(items));
        self
    }

    pub fn iter<T>(mut self, iter: T) -> Self
    where
        T: IntoIterator<Item = I>,
        T::IntoIter: Send + 'static,
    {
        self.source = Some(Source::iter(iter));
        self
    }

    pub fn stream<St>(mut self, stream: St) -> Self
    where
        St: Stream<Item = I> + Send + 'static,
    {
        self.source = Some(Source::stream(stream));
        self
    }

    /// Set the source from a value that may be absent.
    pub fn source(mut self, source: Option<Source<I>>) -> Self {
        self.source = source;
        self
    }

    /// Register the first callback.
    pub fn callback<F>(self, callback: F) -> Self
    where
        F: Fn(&Foreach<I>, &I) -> bool + Send + Sync + 'static,
    {
        self.maybe_callback(Some(callback))
    }

    /// Register the first callback from a value that may be absent. An
    /// explicit `None` makes `build` fail.
    pub fn maybe_callback<F>(mut self, callback: Option<F>) -> Self
    where
        F: Fn(&Foreach<I>, &I) -> bool + Send + Sync + 'static,
    {
        self.callback = Some(callback.map(|f| Arc::new(f) as Callback<Each<I>>));
        self
    }

    pub fn config(mut self, config: LoopConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the loop, failing with `NullArgument` when the source or an
    /// explicitly supplied first callback is absent.
    pub fn build(self) -> Result<Foreach<I>> {
        let source = self
            .source
            .ok_or_else(|| LoopError::NullArgument("source".to_string()))?;
        let callback = match self.callback {
            Some(None) => return Err(LoopError::NullArgument("callback".to_string())),
            Some(Some(callback)) => Some(callback),
            None => None,
        };
        self.config.validate()?;

        let lp = Loop::from_strategy(Each::new(source), self.config);
        if let Some(callback) = callback {
            lp.seed(callback);
        }
        Ok(lp)
    }
}

impl<I: Send + Sync + 'static> Default for ForeachBuilder<I> {
    fn default() -> Self {
        Self::new()
    }
}
