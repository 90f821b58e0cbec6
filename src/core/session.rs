//! # Session: the state owned by a console's owner context.
//!
//! A [`Session`] combines the run record with the kind-specific state (text buffer or
//! turtle scene) and the event bus. It lives inside the owner loop of a
//! [`Bridge`](super::Bridge); every method here runs on that loop.
//!
//! ## Lifecycle wiring
//! ```text
//! Console::start ──► Session::start ──► Run::begin ──► RunStarted
//!                         │
//!                         └──► (caller) Routine::spawn ──► supervise ──► Session::complete
//!
//! Console::stop  ──► Session::stop  ──► Run::stop (token.cancel) ──► K::on_stop ──► RunCanceled
//! Console::clear ──► Session::clear ──► Run::clear ──► K::on_clear ──► RunCleared
//! Console::tick  ──► Session::tick  ──► Run::tick  ──► K::on_tick
//! ```
//!
//! ## Completion rules
//! - `Ok(())` → `Succeeded`
//! - cancellation → nothing (`stop()` already moved to `Canceled`); if the run is somehow
//!   still running it is finished as `Canceled`
//! - domain error → `Failed(message)`, anything else → `Failed("Unknown Error")`
//! - completions from an older generation, or after a stop, are discarded

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;

use super::bridge::Bridge;
use super::state::{Run, RunScope, RunState};
use crate::config::Config;
use crate::error::{ConsoleError, LifecycleError};
use crate::events::{Bus, Event, EventKind};

/// A console variant: the state and hooks a console kind adds to the shared lifecycle.
///
/// Implemented by [`TextBuffer`](crate::TextBuffer) and [`TurtleScene`](crate::TurtleScene).
pub trait ConsoleKind: Send + Sized + 'static {
    /// Handle the user routine receives for one run.
    type Run: Send + 'static;

    /// Title shown by the presentation layer.
    const TITLE: &'static str;

    /// Creates the empty kind state.
    fn from_config(config: &Config) -> Self;

    /// Binds a run handle for the routine of a freshly started run.
    fn bind(ctx: RunContext<Self>) -> Self::Run;

    /// True when there is nothing meaningful to clear.
    fn disable_clear(&self) -> bool;

    /// Per-frame update, driven by `tick()`.
    fn on_tick(&mut self, _now: Instant) {}

    /// Called right after the run was forced into `Canceled`.
    ///
    /// `run` is the generation that was interrupted, if one was in flight.
    fn on_stop(&mut self, _now: Instant, _run: Option<u64>, _bus: &Bus) {}

    /// Resets the kind state; only reachable while not running.
    fn on_clear(&mut self);
}

/// Owner-context state of one console.
pub struct Session<K> {
    pub(crate) run: Run,
    pub(crate) kind: K,
    pub(crate) bus: Bus,
    pub(crate) config: Arc<Config>,
}

impl<K: ConsoleKind> Session<K> {
    pub(crate) fn new(config: Arc<Config>, bus: Bus) -> Self {
        Self {
            run: Run::default(),
            kind: K::from_config(&config),
            bus,
            config,
        }
    }

    /// Fails with [`ConsoleError::Canceled`] unless `scope`'s run is current and running.
    pub(crate) fn checkpoint(&self, scope: &RunScope) -> Result<(), ConsoleError> {
        if self.run.accepts(scope) {
            Ok(())
        } else {
            Err(ConsoleError::Canceled)
        }
    }

    /// Publishes an event tagged with the console title.
    pub(crate) fn publish(&self, ev: Event) {
        self.bus.publish(ev.with_console(K::TITLE));
    }

    pub(crate) fn start(&mut self, now: Instant) -> Result<RunScope, LifecycleError> {
        let scope = self.run.begin(now)?;
        self.publish(Event::new(EventKind::RunStarted).with_run(scope.generation()));
        Ok(scope)
    }

    pub(crate) fn stop(&mut self, now: Instant) {
        let generation = (self.run.generation() > 0).then(|| self.run.generation());
        let was_running = self.run.state().is_running();
        self.run.stop(now);
        self.kind
            .on_stop(now, was_running.then_some(self.run.generation()), &self.bus);

        let mut ev = Event::new(EventKind::RunCanceled);
        if let Some(generation) = generation {
            ev = ev.with_run(generation);
        }
        self.publish(ev);
    }

    pub(crate) fn clear(&mut self) -> Result<(), LifecycleError> {
        self.run.clear()?;
        self.kind.on_clear();
        self.publish(Event::new(EventKind::RunCleared));
        Ok(())
    }

    pub(crate) fn tick(&mut self, now: Instant) {
        self.run.tick(now);
        self.kind.on_tick(now);
    }

    /// Applies the outcome of the routine of run `generation`.
    pub(crate) fn complete(&mut self, generation: u64, outcome: Option<RunState>, now: Instant) {
        if generation != self.run.generation() || !self.run.state().is_running() {
            tracing::debug!(
                generation,
                current = self.run.generation(),
                state = self.run.state().as_label(),
                "discarding completion of a finished run"
            );
            return;
        }

        let state = outcome.unwrap_or(RunState::Canceled);
        self.run.finish(state.clone(), now);

        let elapsed = self.run.elapsed(now).unwrap_or(Duration::ZERO);
        let ev = match state {
            RunState::Succeeded => Event::new(EventKind::RunSucceeded),
            RunState::Failed(message) => Event::new(EventKind::RunFailed).with_reason(message),
            _ => Event::new(EventKind::RunCanceled),
        };
        self.publish(ev.with_run(generation).with_duration(elapsed));
    }

    pub(crate) fn status(&self) -> ConsoleStatus {
        ConsoleStatus {
            state: self.run.state().clone(),
            duration: self.run.duration_string(),
            title: K::TITLE,
            disable_clear: self.kind.disable_clear(),
        }
    }
}

/// Snapshot of the presentation hints of a console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleStatus {
    pub state: RunState,
    /// Final duration once the run ended, otherwise the last ticked value.
    pub duration: String,
    pub title: &'static str,
    pub disable_clear: bool,
}

impl ConsoleStatus {
    /// Badge text: label plus duration, or the failure message alone.
    ///
    /// # Example
    /// ```
    /// use consolevisor::{ConsoleStatus, RunState};
    ///
    /// let status = ConsoleStatus {
    ///     state: RunState::Succeeded,
    ///     duration: "1.25s".into(),
    ///     title: "Console",
    ///     disable_clear: false,
    /// };
    /// assert_eq!(status.status_line(), "Success in 1.25s");
    /// ```
    pub fn status_line(&self) -> String {
        if self.state.is_failure() {
            self.state.label().to_string()
        } else {
            format!("{}{}", self.state.label(), self.duration)
        }
    }
}

/// Everything a run-bound handle needs: the bridge, its run scope and the runtime.
///
/// Every call made through a context passes the run checkpoint first.
pub struct RunContext<K> {
    bridge: Bridge<Session<K>>,
    scope: RunScope,
    runtime: Handle,
}

impl<K> Clone for RunContext<K> {
    fn clone(&self) -> Self {
        Self {
            bridge: self.bridge.clone(),
            scope: self.scope.clone(),
            runtime: self.runtime.clone(),
        }
    }
}

impl<K: ConsoleKind> RunContext<K> {
    pub(crate) fn new(bridge: Bridge<Session<K>>, scope: RunScope, runtime: Handle) -> Self {
        Self {
            bridge,
            scope,
            runtime,
        }
    }

    pub fn scope(&self) -> &RunScope {
        &self.scope
    }

    /// Runs `op` on the owner context after the checkpoint.
    pub(crate) async fn call<R, F>(&self, op: F) -> Result<R, ConsoleError>
    where
        F: FnOnce(&mut Session<K>, &RunScope) -> Result<R, ConsoleError> + Send + 'static,
        R: Send + 'static,
    {
        let scope = self.scope.clone();
        self.bridge
            .call(move |session| {
                session.checkpoint(&scope)?;
                op(session, &scope)
            })
            .await?
    }

    /// Blocking twin of [`call`](Self::call).
    pub(crate) fn blocking_call<R, F>(&self, op: F) -> Result<R, ConsoleError>
    where
        F: FnOnce(&mut Session<K>, &RunScope) -> Result<R, ConsoleError> + Send + 'static,
        R: Send + 'static,
    {
        let scope = self.scope.clone();
        self.bridge.call_blocking(move |session| {
            session.checkpoint(&scope)?;
            op(session, &scope)
        })?
    }

    /// Suspends for `duration`, or fails with `Canceled` as soon as the run is stopped.
    pub(crate) async fn pause(&self, duration: Duration) -> Result<(), ConsoleError> {
        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = self.scope.cancelled() => Err(ConsoleError::Canceled),
        }
    }

    /// Blocking twin of [`pause`](Self::pause).
    pub(crate) fn blocking_pause(&self, duration: Duration) -> Result<(), ConsoleError> {
        self.runtime.block_on(self.pause(duration))
    }
}
