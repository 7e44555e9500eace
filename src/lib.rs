//! loopctl - a cooperative loop engine
//!
//! A `Loop` runs a driving strategy on its own tokio task, hands every element
//! it produces to an ordered chain of callbacks, and can be paused, resumed,
//! or stopped from any other task or thread between elements. `Foreach` is
//! the strategy that walks a vector, an iterator, or a stream.
//!
//! ```no_run
//! use loopctl::Foreach;
//!
//! # async fn demo() -> loopctl::Result<()> {
//! let lp = Foreach::new(vec![10, 20, 30]);
//! lp.append(|_lp: &Foreach<i32>, x: &i32| *x != 20)?;
//! let outcome = lp.run().await?;
//! assert_eq!(outcome.processed(), 2);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod id;
pub mod strategy;

pub use config::LoopConfig;
pub use domain::{LoopOutcome, LoopState, StopCause};
pub use engine::{Callback, Driver, Loop};
pub use error::{LoopError, Result};
pub use strategy::{Drive, Foreach, ForeachBuilder, Source, Strategy};
