//! Loop engine implementation - drives a strategy on its own tokio task.
//!
//! A `Loop` is a cheap, clonable handle. Every clone addresses the same
//! engine, so one clone can be moved into the engine task while others are
//! kept by external actors to pause, resume, stop, or append callbacks.
//!
//! Control requests change the state immediately. The engine task observes
//! them only at element boundaries, inside `Driver::next`.
//!
//! The engine task holds its own reference to the shared state, which does
//! not count as a handle. Once the last handle is dropped a paused loop can
//! never be resumed, so it is stopped and its task allowed to end.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};

use super::chain::{Callback, CallbackChain};
use crate::config::LoopConfig;
use crate::domain::{Control, LoopOutcome, LoopState, StopCause};
use crate::error::{LoopError, Result};
use crate::id::generate_loop_id;
use crate::strategy::{Drive, Strategy};

/// State shared between the engine task and external actors
struct ControlBlock {
    state: LoopState,
    cause: Option<StopCause>,
    /// Engine task is parked waiting for resume or stop
    suspended: bool,
}

struct Inner<S: Strategy> {
    id: String,
    config: LoopConfig,
    control: Mutex<ControlBlock>,
    wake: Notify,
    chain: CallbackChain<S>,
    /// Taken by the engine task on start
    strategy: Mutex<Option<S>>,
    task: Mutex<Option<JoinHandle<LoopOutcome>>>,
    processed: AtomicU64,
    /// Live handles, excluding the engine task's own
    handles: AtomicUsize,
}

/// The loop engine, parameterized by its driving strategy.
pub struct Loop<S: Strategy> {
    inner: Arc<Inner<S>>,
    /// False only for the engine task's reference
    handle: bool,
}

impl<S: Strategy> Clone for Loop<S> {
    fn clone(&self) -> Self {
        self.inner.handles.fetch_add(1, Ordering::SeqCst);
        Self {
            inner: self.inner.clone(),
            handle: true,
        }
    }
}

impl<S: Strategy> Drop for Loop<S> {
    fn drop(&mut self) {
        if self.handle && self.inner.handles.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.release();
        }
    }
}

impl<S: Strategy> std::fmt::Debug for Loop<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loop")
            .field("id", &self.inner.id)
            .field("state", &self.state())
            .field("callbacks", &self.callbacks())
            .field("processed", &self.processed())
            .finish()
    }
}

impl<S: Strategy> Loop<S> {
    /// Create an idle loop around `strategy`.
    pub fn from_strategy(strategy: S, config: LoopConfig) -> Self {
        let id = config.name.clone().unwrap_or_else(generate_loop_id);
        debug!(loop_id = %id, strategy = strategy.name(), "Loop::from_strategy: called");

        Self {
            inner: Arc::new(Inner {
                id,
                config,
                control: Mutex::new(ControlBlock {
                    state: LoopState::Idle,
                    cause: None,
                    suspended: false,
                }),
                wake: Notify::new(),
                chain: CallbackChain::new(),
                strategy: Mutex::new(Some(strategy)),
                task: Mutex::new(None),
                processed: AtomicU64::new(0),
                handles: AtomicUsize::new(1),
            }),
            handle: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Current run state. Reflects control requests immediately, before the
    /// engine task has reached the next element boundary.
    pub fn state(&self) -> LoopState {
        self.control().state
    }

    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Why the loop stopped, once it has. `None` while not `Stopped`.
    pub fn stop_cause(&self) -> Option<StopCause> {
        self.control().cause
    }

    /// True while the engine task is parked inside `next` waiting for resume.
    pub fn is_suspended(&self) -> bool {
        self.control().suspended
    }

    /// Number of elements delivered to the callback chain so far.
    pub fn processed(&self) -> u64 {
        self.inner.processed.load(Ordering::SeqCst)
    }

    /// Number of registered callbacks.
    pub fn callbacks(&self) -> usize {
        self.inner.chain.len()
    }

    /// Register `callback` at the end of the chain.
    ///
    /// Allowed before start and while running or paused. A callback added
    /// mid-run applies to every element after the one in flight.
    ///
    /// Callbacks that control the loop should use the `&Loop` they are
    /// handed. A clone captured by the closure is a handle owned by the
    /// chain: it forms a reference cycle, and the loop and its chain are
    /// never freed.
    pub fn append<F>(&self, callback: F) -> Result<&Self>
    where
        F: Fn(&Loop<S>, &S::Item) -> bool + Send + Sync + 'static,
    {
        self.append_callback(Arc::new(callback))
    }

    /// Like `append`, for callbacks whose presence is only known at runtime.
    /// `None` fails with `NullArgument` and leaves the chain untouched.
    pub fn try_append<F>(&self, callback: Option<F>) -> Result<&Self>
    where
        F: Fn(&Loop<S>, &S::Item) -> bool + Send + Sync + 'static,
    {
        let callback = callback.ok_or_else(|| LoopError::NullArgument("callback".to_string()))?;
        self.append(callback)
    }

    /// Register the first callback of a loop that has not been handed out yet.
    pub(crate) fn seed(&self, callback: Callback<S>) {
        self.inner.chain.push(callback);
    }

    fn append_callback(&self, callback: Callback<S>) -> Result<&Self> {
        let state = self.state();
        if state.is_terminal() {
            return Err(LoopError::IllegalState(format!(
                "cannot append to a {} loop",
                state
            )));
        }
        self.inner.chain.push(callback);
        debug!(loop_id = %self.id(), callbacks = self.callbacks(), "Callback appended");
        Ok(self)
    }

    /// Start the engine task. Valid only from `Idle`; must be called within a
    /// tokio runtime.
    pub fn start(&self) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| LoopError::IllegalState(format!("start requires a tokio runtime: {}", e)))?;

        // Held across the transition so no joiner sees a started loop without its task
        let mut task = self.inner.task.lock().unwrap_or_else(PoisonError::into_inner);
        self.transition(Control::Start)?;

        let strategy = self
            .inner
            .strategy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| LoopError::IllegalState(format!("loop {} has no strategy to drive", self.id())))?;

        let engine = Loop {
            inner: self.inner.clone(),
            handle: false,
        };
        *task = Some(runtime.spawn(async move { engine.drive_to_end(strategy).await }));

        Ok(())
    }

    /// Ask the engine to park at the next element boundary.
    pub fn pause(&self) -> Result<()> {
        self.transition(Control::Pause)?;
        debug!(loop_id = %self.id(), "Pause requested");
        Ok(())
    }

    /// Wake a paused engine.
    pub fn resume(&self) -> Result<()> {
        self.transition(Control::Resume)?;
        debug!(loop_id = %self.id(), "Resume requested");
        self.inner.wake.notify_waiters();
        Ok(())
    }

    /// Terminate at the next element boundary. A running callback is never
    /// interrupted; a parked engine wakes and halts without resuming.
    pub fn stop(&self) -> Result<()> {
        self.transition(Control::Stop)?;
        debug!(loop_id = %self.id(), "Stop requested");
        self.inner.wake.notify_waiters();
        Ok(())
    }

    /// Await the engine task and return how the run ended.
    pub async fn join(&self) -> Result<LoopOutcome> {
        let handle = self
            .inner
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| LoopError::IllegalState(format!("loop {} has no engine task to join", self.id())))?;

        match handle.await {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_panic() => Err(LoopError::Panicked(panic_message(e.into_panic().as_ref()))),
            Err(e) => Err(LoopError::IllegalState(format!("engine task for {} cancelled: {}", self.id(), e))),
        }
    }

    /// Start the loop and wait for it to end.
    pub async fn run(&self) -> Result<LoopOutcome> {
        self.start()?;
        self.join().await
    }

    fn control(&self) -> MutexGuard<'_, ControlBlock> {
        self.inner.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, control: Control) -> Result<LoopState> {
        let mut block = self.control();
        let next = block.state.apply(control)?;
        block.state = next;
        if control == Control::Stop {
            block.cause.get_or_insert(StopCause::Requested);
        }
        Ok(next)
    }

    /// Move to `Stopped` unless already terminal.
    fn halt(&self, cause: StopCause) {
        let mut block = self.control();
        if !block.state.is_terminal() {
            block.state = LoopState::Stopped;
            block.cause = Some(cause);
        }
    }

    /// Stop a paused loop that no handle can resume any more.
    fn release(&self) {
        {
            let mut block = self.control();
            if !block.state.is_resumable() {
                return;
            }
            block.state = LoopState::Stopped;
            block.cause.get_or_insert(StopCause::Requested);
        }
        debug!(loop_id = %self.id(), "Last handle dropped while paused, stopping");
        self.inner.wake.notify_waiters();
    }

    /// Block the engine task while paused. Returns false once stopped.
    async fn checkpoint(&self) -> bool {
        loop {
            let notified = self.inner.wake.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut block = self.control();
                match block.state {
                    LoopState::Paused if self.inner.handles.load(Ordering::SeqCst) == 0 => {
                        block.state = LoopState::Stopped;
                        block.cause.get_or_insert(StopCause::Requested);
                        block.suspended = false;
                        debug!(loop_id = %self.id(), "Paused with no handles left, stopping");
                        return false;
                    }
                    LoopState::Paused => {
                        if !block.suspended {
                            block.suspended = true;
                            debug!(loop_id = %self.id(), processed = self.processed(), "Engine parked");
                        }
                    }
                    state => {
                        if block.suspended {
                            block.suspended = false;
                            debug!(loop_id = %self.id(), state = %state, "Engine woke");
                        }
                        return !state.is_terminal();
                    }
                }
            }

            notified.await;
        }
    }

    async fn drive_to_end(self, mut strategy: S) -> LoopOutcome {
        info!(loop_id = %self.id(), strategy = strategy.name(), "Loop started");

        let mut driver = Driver::new(&self);
        let drive = AssertUnwindSafe(strategy.drive(&mut driver)).catch_unwind().await;

        match drive {
            Ok(drive) => self.settle(drive),
            Err(panic) => {
                let cause = if driver.in_chain {
                    StopCause::Callback
                } else {
                    StopCause::Strategy
                };
                self.halt(cause);
                self.control().suspended = false;
                error!(
                    loop_id = %self.id(),
                    cause = ?cause,
                    panic = %panic_message(panic.as_ref()),
                    "Loop panicked"
                );
                std::panic::resume_unwind(panic)
            }
        }
    }

    /// Settle the terminal state once the strategy returns.
    fn settle(&self, drive: Drive) -> LoopOutcome {
        let processed = self.processed();
        let outcome = {
            let mut block = self.control();
            block.suspended = false;
            if !block.state.is_terminal() {
                match drive {
                    Drive::Exhausted => block.state = LoopState::Finished,
                    Drive::Halted => {
                        block.state = LoopState::Stopped;
                        block.cause.get_or_insert(StopCause::Strategy);
                    }
                }
            }
            match block.state {
                LoopState::Finished => LoopOutcome::Finished { processed },
                _ => LoopOutcome::Stopped {
                    processed,
                    cause: block.cause.unwrap_or(StopCause::Strategy),
                },
            }
        };

        match outcome {
            LoopOutcome::Finished { processed } => {
                info!(loop_id = %self.id(), processed, "Loop finished");
            }
            LoopOutcome::Stopped { processed, cause } => {
                info!(loop_id = %self.id(), processed, cause = ?cause, "Loop stopped");
            }
        }
        outcome
    }
}

/// Step handle given to a strategy's `drive`. Only exists on the engine
/// task; `next` takes `&mut self` so element deliveries never overlap.
pub struct Driver<'a, S: Strategy> {
    engine: &'a Loop<S>,
    since_yield: u32,
    /// Set while the callback chain runs, to attribute panics
    in_chain: bool,
}

impl<'a, S: Strategy> Driver<'a, S> {
    fn new(engine: &'a Loop<S>) -> Self {
        Self {
            engine,
            since_yield: 0,
            in_chain: false,
        }
    }

    /// Deliver one element.
    ///
    /// Parks while the loop is paused, returns `false` without touching the
    /// chain once it is stopped, otherwise runs the chain and returns its
    /// decision. A `false` from the chain stops the loop. Strategies must
    /// halt as soon as this returns `false`.
    pub async fn next(&mut self, item: &S::Item) -> bool {
        if !self.engine.checkpoint().await {
            return false;
        }

        let inner = &self.engine.inner;
        let index = inner.processed.fetch_add(1, Ordering::SeqCst) + 1;
        if inner.config.trace_elements {
            trace!(loop_id = %inner.id, element = index, "Delivering element");
        }

        self.in_chain = true;
        let proceed = inner.chain.invoke(self.engine, item);
        self.in_chain = false;
        if !proceed {
            debug!(loop_id = %inner.id, element = index, "Callback requested stop");
            self.engine.halt(StopCause::Callback);
            return false;
        }

        self.cooperate().await;
        true
    }

    async fn cooperate(&mut self) {
        let every = self.engine.inner.config.yield_every;
        if every == 0 {
            return;
        }
        self.since_yield += 1;
        if self.since_yield >= every {
            self.since_yield = 0;
            tokio::task::yield_now().await;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Foreach;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    async fn wait_until_suspended<S: Strategy>(lp: &Loop<S>) {
        for _ in 0..500 {
            if lp.is_suspended() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("engine never parked");
    }

    #[test]
    fn test_new_loop_is_idle() {
        let lp = Foreach::new(vec![1, 2, 3]);
        assert_eq!(lp.state(), LoopState::Idle);
        assert_eq!(lp.processed(), 0);
        assert_eq!(lp.callbacks(), 0);
        assert!(!lp.is_suspended());
    }

    #[test]
    fn test_config_name_becomes_id() {
        let lp = Foreach::builder()
            .items(vec![1])
            .config(LoopConfig::named("ingest"))
            .build()
            .unwrap();
        assert_eq!(lp.id(), "ingest");
    }

    #[test]
    fn test_generated_id_when_unnamed() {
        let lp = Foreach::new(vec![1]);
        assert!(lp.id().contains('-'));
    }

    #[test]
    fn test_control_on_idle_loop_is_illegal() {
        let lp = Foreach::new(vec![1]);
        assert!(matches!(lp.pause(), Err(LoopError::IllegalState(_))));
        assert!(matches!(lp.resume(), Err(LoopError::IllegalState(_))));
        assert!(matches!(lp.stop(), Err(LoopError::IllegalState(_))));
        assert_eq!(lp.state(), LoopState::Idle);
    }

    #[test]
    fn test_start_without_runtime_fails_and_stays_idle() {
        let lp = Foreach::new(vec![1]);
        assert!(matches!(lp.start(), Err(LoopError::IllegalState(_))));
        assert_eq!(lp.state(), LoopState::Idle);
    }

    #[test]
    fn test_append_returns_same_loop() {
        let lp = Foreach::new(vec![1]);
        let same = lp
            .append(|_lp: &Foreach<i32>, _x: &i32| true)
            .unwrap()
            .append(|_lp: &Foreach<i32>, _x: &i32| true)
            .unwrap();
        assert_eq!(same.id(), lp.id());
        assert_eq!(lp.callbacks(), 2);
    }

    #[test]
    fn test_try_append_none_is_null_argument() {
        let lp = Foreach::new(vec![1]);
        lp.append(|_lp: &Foreach<i32>, _x: &i32| true).unwrap();

        let result = lp.try_append(None::<fn(&Foreach<i32>, &i32) -> bool>);
        assert!(matches!(result, Err(LoopError::NullArgument(_))));
        assert_eq!(lp.callbacks(), 1);
    }

    #[tokio::test]
    async fn test_join_without_start_is_illegal() {
        let lp = Foreach::new(vec![1]);
        assert!(matches!(lp.join().await, Err(LoopError::IllegalState(_))));
    }

    #[tokio::test]
    async fn test_join_twice_is_illegal() {
        let lp = Foreach::new(vec![1, 2]);
        lp.run().await.unwrap();
        assert!(matches!(lp.join().await, Err(LoopError::IllegalState(_))));
    }

    #[tokio::test]
    async fn test_run_finishes() {
        let lp = Foreach::new(vec![1, 2, 3]);
        lp.append(|_lp: &Foreach<i32>, _x: &i32| true).unwrap();

        let outcome = lp.run().await.unwrap();
        assert_eq!(outcome, LoopOutcome::Finished { processed: 3 });
        assert_eq!(lp.state(), LoopState::Finished);
        assert_eq!(lp.processed(), 3);
    }

    #[tokio::test]
    async fn test_callback_stop_records_cause() {
        let lp = Foreach::new(vec![1, 2, 3]);
        lp.append(|_lp: &Foreach<i32>, x: &i32| *x < 2).unwrap();

        let outcome = lp.run().await.unwrap();
        assert_eq!(
            outcome,
            LoopOutcome::Stopped {
                processed: 2,
                cause: StopCause::Callback
            }
        );
    }

    #[tokio::test]
    async fn test_callback_can_stop_its_own_loop() {
        let lp = Foreach::new(vec![1, 2, 3, 4]);
        lp.append(|lp: &Foreach<i32>, x: &i32| {
            if *x == 2 {
                lp.stop().unwrap();
            }
            true
        })
        .unwrap();

        let outcome = lp.run().await.unwrap();
        assert_eq!(
            outcome,
            LoopOutcome::Stopped {
                processed: 2,
                cause: StopCause::Requested
            }
        );
    }

    #[tokio::test]
    async fn test_append_after_terminal_is_illegal() {
        let lp = Foreach::new(vec![1]);
        lp.run().await.unwrap();
        let result = lp.append(|_lp: &Foreach<i32>, _x: &i32| true);
        assert!(matches!(result, Err(LoopError::IllegalState(_))));
    }

    #[tokio::test]
    async fn test_control_after_terminal_is_illegal() {
        let lp = Foreach::new(vec![1]);
        lp.run().await.unwrap();
        assert!(lp.pause().is_err());
        assert!(lp.resume().is_err());
        assert!(lp.stop().is_err());
        assert!(lp.start().is_err());
        assert_eq!(lp.state(), LoopState::Finished);
    }

    #[tokio::test]
    async fn test_pause_parks_engine_and_resume_continues() {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let lp = Foreach::new(vec![1, 2, 3, 4]);
        let log = seen.clone();
        lp.append(move |lp: &Foreach<i32>, x: &i32| {
            log.lock().unwrap().push(*x);
            if *x == 2 {
                lp.pause().unwrap();
            }
            true
        })
        .unwrap();

        lp.start().unwrap();
        wait_until_suspended(&lp).await;
        assert_eq!(lp.state(), LoopState::Paused);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);

        lp.resume().unwrap();
        let outcome = lp.join().await.unwrap();
        assert_eq!(outcome, LoopOutcome::Finished { processed: 4 });
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
        assert!(!lp.is_suspended());
    }

    #[tokio::test]
    async fn test_stop_while_paused_terminates() {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let lp = Foreach::new(vec![1, 2, 3]);
        let log = seen.clone();
        lp.append(move |lp: &Foreach<i32>, x: &i32| {
            log.lock().unwrap().push(*x);
            if *x == 1 {
                lp.pause().unwrap();
            }
            true
        })
        .unwrap();

        lp.start().unwrap();
        wait_until_suspended(&lp).await;
        lp.stop().unwrap();

        let outcome = lp.join().await.unwrap();
        assert_eq!(
            outcome,
            LoopOutcome::Stopped {
                processed: 1,
                cause: StopCause::Requested
            }
        );
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_panicking_callback_surfaces_on_join() {
        let lp = Foreach::new(vec![1, 2]);
        lp.append(|_lp: &Foreach<i32>, x: &i32| {
            if *x == 2 {
                panic!("bad element");
            }
            true
        })
        .unwrap();

        let result = lp.run().await;
        match result {
            Err(LoopError::Panicked(msg)) => assert_eq!(msg, "bad element"),
            other => panic!("expected panic error, got {:?}", other),
        }
        assert_eq!(lp.state(), LoopState::Stopped);
        assert_eq!(lp.stop_cause(), Some(StopCause::Callback));
    }

    #[tokio::test]
    async fn test_stop_cause_unset_until_stopped() {
        let lp = Foreach::new(vec![1, 2]);
        assert_eq!(lp.stop_cause(), None);
        lp.run().await.unwrap();
        assert_eq!(lp.state(), LoopState::Finished);
        assert_eq!(lp.stop_cause(), None);
    }

    #[tokio::test]
    async fn test_dropping_last_handle_releases_paused_loop() {
        let lp = Foreach::over(0..);
        lp.append(|lp: &Foreach<i32>, x: &i32| {
            if *x == 1 {
                lp.pause().unwrap();
            }
            true
        })
        .unwrap();

        lp.start().unwrap();
        wait_until_suspended(&lp).await;

        let inner = Arc::downgrade(&lp.inner);
        drop(lp);

        for _ in 0..500 {
            if inner.upgrade().is_none() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("paused loop outlived its last handle");
    }

    #[tokio::test]
    async fn test_remaining_clone_keeps_paused_loop_resumable() {
        let lp = Foreach::new(vec![1, 2, 3]);
        lp.append(|lp: &Foreach<i32>, x: &i32| {
            if *x == 1 {
                lp.pause().unwrap();
            }
            true
        })
        .unwrap();

        lp.start().unwrap();
        wait_until_suspended(&lp).await;

        let keeper = lp.clone();
        drop(lp);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(keeper.state(), LoopState::Paused);

        keeper.resume().unwrap();
        let outcome = keeper.join().await.unwrap();
        assert_eq!(outcome, LoopOutcome::Finished { processed: 3 });
    }

    #[tokio::test]
    async fn test_callback_handle_argument_does_not_keep_loop_alive() {
        let lp = Foreach::over(0..);
        lp.append(|lp: &Foreach<i32>, x: &i32| {
            if *x == 4 {
                lp.stop().unwrap();
            }
            true
        })
        .unwrap();

        let outcome = lp.run().await.unwrap();
        assert_eq!(outcome.processed(), 5);

        let inner = Arc::downgrade(&lp.inner);
        drop(lp);
        for _ in 0..500 {
            if inner.upgrade().is_none() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("finished loop outlived its last handle");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_join_from_another_task_as_soon_as_started() {
        for _ in 0..50 {
            let lp = Foreach::new(vec![1, 2, 3]);
            let watcher = lp.clone();
            let joiner = tokio::spawn(async move {
                while watcher.state() == LoopState::Idle {
                    tokio::task::yield_now().await;
                }
                watcher.join().await
            });

            lp.start().unwrap();
            let outcome = joiner.await.unwrap().unwrap();
            assert_eq!(outcome, LoopOutcome::Finished { processed: 3 });
        }
    }

    #[test]
    fn test_panic_message_variants() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let borrowed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(borrowed.as_ref()), "static");
        let other: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
