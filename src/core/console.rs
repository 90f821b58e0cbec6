//! # Console: the public lifecycle surface of one console.
//!
//! A [`Console`] is a cheap, cloneable handle. It owns nothing itself: the state lives in a
//! [`Session`] on the owner loop, and every method is a bridged operation. Each async
//! method has a `blocking_*` twin for callers outside the runtime.
//!
//! ## Start/complete flow
//! ```text
//! start()
//!   ├─► bridge: Session::start ──► RunScope { generation, token }
//!   ├─► K::bind(RunContext)   ──► run handle (TextRun / TurtleRun)
//!   ├─► Routine::spawn        ──► JoinHandle<anyhow::Result<()>>
//!   └─► supervise (detached):
//!          Ok(())            ──► Succeeded
//!          Err(e)            ──► classify(e): None | Failed(msg) | Failed("Unknown Error")
//!          panic (JoinError) ──► Failed("Unknown Error")
//!          └─► bridge: Session::complete(generation, outcome)
//! ```
//!
//! `start()` returns as soon as the run is scheduled; it never waits for the routine.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::time::Instant;

use super::bridge::Bridge;
use super::builder::ConsoleBuilder;
use super::routine::Routine;
use super::session::{ConsoleKind, ConsoleStatus, RunContext, Session};
use super::state::{RunScope, RunState};
use crate::config::Config;
use crate::error::{BridgeError, LifecycleError, UNKNOWN_ERROR, classify};
use crate::events::{Bus, Event};

/// Handle to a console of kind `K`.
pub struct Console<K: ConsoleKind> {
    pub(crate) bridge: Bridge<Session<K>>,
    pub(crate) routine: Routine<K::Run>,
    pub(crate) runtime: Handle,
    pub(crate) bus: Bus,
    pub(crate) config: Arc<Config>,
}

impl<K: ConsoleKind> Clone for Console<K> {
    fn clone(&self) -> Self {
        Self {
            bridge: self.bridge.clone(),
            routine: self.routine.clone(),
            runtime: self.runtime.clone(),
            bus: self.bus.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<K: ConsoleKind> Console<K> {
    /// Returns a builder for a console with the given configuration.
    pub fn builder(cfg: Config) -> ConsoleBuilder<K> {
        ConsoleBuilder::new(cfg)
    }

    /// Creates a console with the default configuration and no subscribers.
    ///
    /// # Panics
    /// Must be called within a tokio runtime.
    pub fn new(routine: Routine<K::Run>) -> Self {
        ConsoleBuilder::new(Config::default()).build(routine)
    }

    /// Configuration this console was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Starts a new run of the routine.
    ///
    /// Fails with [`LifecycleError::AlreadyRunning`] while a run is in flight.
    pub async fn start(&self) -> Result<(), LifecycleError> {
        let scope = self.bridge.call(|s| s.start(Instant::now())).await??;
        self.launch(scope);
        Ok(())
    }

    /// Blocking twin of [`start`](Self::start).
    pub fn blocking_start(&self) -> Result<(), LifecycleError> {
        let scope = self.bridge.call_blocking(|s| s.start(Instant::now()))??;
        self.launch(scope);
        Ok(())
    }

    /// Forces the run into `Canceled`, from any state.
    ///
    /// Every operation of the interrupted run fails with `Canceled` from now on.
    pub async fn stop(&self) {
        if let Err(err) = self.bridge.call(|s| s.stop(Instant::now())).await {
            tracing::warn!(error = %err, label = err.as_label(), "stop was not applied");
        }
    }

    /// Blocking twin of [`stop`](Self::stop).
    pub fn blocking_stop(&self) {
        if let Err(err) = self.bridge.call_blocking(|s| s.stop(Instant::now())) {
            tracing::warn!(error = %err, label = err.as_label(), "stop was not applied");
        }
    }

    /// Returns to `Idle` and empties the console contents.
    ///
    /// Fails with [`LifecycleError::Running`] while a run is in flight.
    pub async fn clear(&self) -> Result<(), LifecycleError> {
        self.bridge.call(|s| s.clear()).await?
    }

    /// Blocking twin of [`clear`](Self::clear).
    pub fn blocking_clear(&self) -> Result<(), LifecycleError> {
        self.bridge.call_blocking(|s| s.clear())?
    }

    /// Clears and starts again (the "Run" button).
    pub async fn rerun(&self) -> Result<(), LifecycleError> {
        self.clear().await?;
        self.start().await
    }

    /// Blocking twin of [`rerun`](Self::rerun).
    pub fn blocking_rerun(&self) -> Result<(), LifecycleError> {
        self.blocking_clear()?;
        self.blocking_start()
    }

    /// Per-frame update: refreshes the live duration and the kind state.
    pub async fn tick(&self) {
        if let Err(err) = self.bridge.call(|s| s.tick(Instant::now())).await {
            tracing::debug!(error = %err, "tick skipped");
        }
    }

    /// Blocking twin of [`tick`](Self::tick).
    pub fn blocking_tick(&self) {
        if let Err(err) = self.bridge.call_blocking(|s| s.tick(Instant::now())) {
            tracing::debug!(error = %err, "tick skipped");
        }
    }

    /// Current run state.
    pub async fn state(&self) -> Result<RunState, BridgeError> {
        self.bridge.call(|s| s.run.state().clone()).await
    }

    /// Blocking twin of [`state`](Self::state).
    pub fn blocking_state(&self) -> Result<RunState, BridgeError> {
        self.bridge.call_blocking(|s| s.run.state().clone())
    }

    /// Presentation hints: state, duration, title and whether clear is disabled.
    pub async fn status(&self) -> Result<ConsoleStatus, BridgeError> {
        self.bridge.call(|s| s.status()).await
    }

    /// Blocking twin of [`status`](Self::status).
    pub fn blocking_status(&self) -> Result<ConsoleStatus, BridgeError> {
        self.bridge.call_blocking(|s| s.status())
    }

    /// Receiver for the events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Hands the new run to the routine and supervises its completion.
    fn launch(&self, scope: RunScope) {
        let generation = scope.generation();
        let ctx = RunContext::new(self.bridge.clone(), scope, self.runtime.clone());
        let handle = self.routine.spawn(&self.runtime, K::bind(ctx));
        let bridge = self.bridge.clone();

        self.runtime.spawn(async move {
            let outcome = match handle.await {
                Ok(Ok(())) => Some(RunState::Succeeded),
                Ok(Err(err)) => {
                    tracing::debug!(generation, error = %err, "routine returned an error");
                    classify(&err)
                }
                Err(join) => {
                    tracing::error!(generation, error = %join, "routine panicked");
                    Some(RunState::Failed(UNKNOWN_ERROR.to_string()))
                }
            };

            if let Err(err) = bridge
                .call(move |s| s.complete(generation, outcome, Instant::now()))
                .await
            {
                tracing::warn!(generation, error = %err, "run completion was not applied");
            }
        });
    }
}
