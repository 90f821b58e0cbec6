//! # Run-state machine.
//!
//! [`RunState`] is the single source of truth for a console's run. The internal [`Run`]
//! record owns the timestamps, the live duration string and the cancellation handle of
//! the in-flight routine.
//!
//! ## Transitions
//! ```text
//!            start()                finish(..)
//!   Idle ───────────► Running ───────────────► Succeeded | Failed(msg)
//!    ▲                  │
//!    │                  │ stop()  (from any state)
//!    │                  ▼
//!    └───── clear() ─ Canceled / any terminal state
//! ```
//!
//! ## Rules
//! - `Running` is left only through `finish` or `stop`, never through `clear`
//! - `stop()` always ends in `Canceled`, even when nothing is in flight
//! - each `start()` opens a new **generation**; handles of older runs never pass a checkpoint

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::clock::format_duration;
use crate::error::LifecycleError;

/// State of a console run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunState {
    /// Nothing has run since the last clear.
    #[default]
    Idle,
    /// A routine is in flight.
    Running,
    /// The routine returned normally.
    Succeeded,
    /// The run was stopped.
    Canceled,
    /// The routine failed; carries the message shown to the user.
    Failed(String),
}

/// Presentation hint for a state (the color tag of the status badge).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Idle or running.
    Neutral,
    /// The run succeeded.
    Success,
    /// The run was canceled.
    Warning,
    /// The run failed.
    Error,
}

impl RunState {
    /// Status label: a prefix for the duration, or the failure message itself.
    pub fn label(&self) -> &str {
        match self {
            RunState::Running => "Running for ",
            RunState::Idle => "Idle for ",
            RunState::Succeeded => "Success in ",
            RunState::Canceled => "Canceled in ",
            RunState::Failed(message) => message,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Succeeded => "succeeded",
            RunState::Canceled => "canceled",
            RunState::Failed(_) => "failed",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RunState::Idle | RunState::Running => Severity::Neutral,
            RunState::Succeeded => Severity::Success,
            RunState::Canceled => Severity::Warning,
            RunState::Failed(_) => Severity::Error,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, RunState::Failed(_))
    }

    /// True for `Succeeded`, `Canceled` and `Failed`.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Succeeded | RunState::Canceled | RunState::Failed(_)
        )
    }
}

/// Binds an operation to one specific run.
///
/// Handed to the routine (inside its console handle). A scope passes the checkpoint only
/// while its run is the current one and is still running.
#[derive(Clone, Debug)]
pub struct RunScope {
    generation: u64,
    token: CancellationToken,
}

impl RunScope {
    /// Run generation this scope belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True once `stop()` was requested for this run.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves when `stop()` is requested for this run.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

/// Run record owned by the session on the owner context.
#[derive(Debug, Default)]
pub(crate) struct Run {
    state: RunState,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    live: String,
    generation: u64,
    handle: Option<CancellationToken>,
}

impl Run {
    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Moves to `Running` and opens a new generation.
    pub fn begin(&mut self, now: Instant) -> Result<RunScope, LifecycleError> {
        if self.state.is_running() {
            return Err(LifecycleError::AlreadyRunning);
        }
        let token = CancellationToken::new();
        self.generation += 1;
        self.state = RunState::Running;
        self.started_at = Some(now);
        self.ended_at = None;
        self.live = format_duration(now, now);
        self.handle = Some(token.clone());

        Ok(RunScope {
            generation: self.generation,
            token,
        })
    }

    /// Refreshes the live duration while running; no-op otherwise.
    pub fn tick(&mut self, now: Instant) {
        if let (RunState::Running, Some(start)) = (&self.state, self.started_at) {
            self.live = format_duration(start, now);
        }
    }

    /// Sets a terminal state, drops the task handle and records the end timestamp.
    pub fn finish(&mut self, state: RunState, now: Instant) {
        self.state = state;
        self.handle = None;
        self.ended_at = Some(now);
    }

    /// Cancels the in-flight routine (if any) and forces `Canceled`.
    ///
    /// Returns true when a routine was in flight.
    pub fn stop(&mut self, now: Instant) -> bool {
        let in_flight = match self.handle.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        };
        self.finish(RunState::Canceled, now);
        in_flight
    }

    /// Resets timestamps and returns to `Idle`.
    pub fn clear(&mut self) -> Result<(), LifecycleError> {
        if self.state.is_running() {
            return Err(LifecycleError::Running);
        }
        self.state = RunState::Idle;
        self.started_at = None;
        self.ended_at = None;
        self.live.clear();
        Ok(())
    }

    /// True while `scope`'s run is the current one and still running.
    pub fn accepts(&self, scope: &RunScope) -> bool {
        self.state.is_running() && scope.generation == self.generation
    }

    /// Final duration once ended, otherwise the last live value.
    pub fn duration_string(&self) -> String {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => format_duration(start, end),
            _ => self.live.clone(),
        }
    }

    pub fn elapsed(&self, now: Instant) -> Option<std::time::Duration> {
        let start = self.started_at?;
        Some(self.ended_at.unwrap_or(now).saturating_duration_since(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_start_then_finish() {
        let mut run = Run::default();
        let t0 = Instant::now();
        let scope = run.begin(t0).unwrap();
        assert!(run.accepts(&scope));

        run.finish(RunState::Succeeded, t0 + Duration::from_millis(250));
        assert_eq!(run.state(), &RunState::Succeeded);
        assert!(!run.accepts(&scope));
        assert_eq!(run.duration_string(), "250ms");
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let mut run = Run::default();
        let now = Instant::now();
        run.begin(now).unwrap();
        assert_eq!(run.begin(now).unwrap_err(), LifecycleError::AlreadyRunning);
    }

    #[test]
    fn test_stop_from_idle_is_canceled() {
        let mut run = Run::default();
        assert!(!run.stop(Instant::now()));
        assert_eq!(run.state(), &RunState::Canceled);
    }

    #[test]
    fn test_stop_cancels_scope() {
        let mut run = Run::default();
        let scope = run.begin(Instant::now()).unwrap();
        assert!(run.stop(Instant::now()));
        assert!(scope.is_cancelled());
        assert!(!run.accepts(&scope));
    }

    #[test]
    fn test_clear_while_running_is_rejected() {
        let mut run = Run::default();
        run.begin(Instant::now()).unwrap();
        assert_eq!(run.clear().unwrap_err(), LifecycleError::Running);
        assert!(run.state().is_running());
    }

    #[test]
    fn test_stale_generation_is_refused() {
        let mut run = Run::default();
        let first = run.begin(Instant::now()).unwrap();
        run.stop(Instant::now());
        let second = run.begin(Instant::now()).unwrap();
        assert!(!run.accepts(&first));
        assert!(run.accepts(&second));
    }

    #[test]
    fn test_tick_only_while_running() {
        let mut run = Run::default();
        let t0 = Instant::now();
        run.begin(t0).unwrap();
        run.tick(t0 + Duration::from_millis(1500));
        assert_eq!(run.duration_string(), "1.50s");

        run.finish(RunState::Succeeded, t0 + Duration::from_secs(2));
        run.tick(t0 + Duration::from_secs(9));
        assert_eq!(run.duration_string(), "2.00s");
    }

    #[test]
    fn test_labels() {
        assert_eq!(RunState::Running.label(), "Running for ");
        assert_eq!(RunState::Canceled.label(), "Canceled in ");
        assert_eq!(RunState::Failed("boom".into()).label(), "boom");
        assert_eq!(RunState::Canceled.severity(), Severity::Warning);
    }
}
