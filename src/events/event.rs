//! # Runtime events emitted by consoles.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Run events**: lifecycle transitions (started, succeeded, failed, canceled, cleared)
//! - **Interaction events**: input requests and their resolution, turtles and motions
//! - **Subscriber events**: overflow and panic reports from subscriber workers
//!
//! The [`Event`] struct carries additional metadata such as timestamps, console title,
//! run generation, reasons and motion durations.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Events of one console are published from its owner context, in program order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use consolevisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::RunFailed)
//!     .with_console("Turtle")
//!     .with_run(3)
//!     .with_reason("Invalid radius: 0");
//!
//! assert_eq!(ev.kind, EventKind::RunFailed);
//! assert_eq!(ev.run, Some(3));
//! assert_eq!(ev.reason.as_deref(), Some("Invalid radius: 0"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Run lifecycle ===
    /// A run started and its routine was scheduled.
    ///
    /// Sets: `console`, `run`
    RunStarted,

    /// The routine returned normally.
    ///
    /// Sets: `console`, `run`, `duration_ms` (run duration)
    RunSucceeded,

    /// The routine failed.
    ///
    /// Sets: `console`, `run`, `reason` (message shown to the user), `duration_ms`
    RunFailed,

    /// `stop()` forced the run into the canceled state.
    ///
    /// Sets: `console`, `run` (absent when nothing had ever started)
    RunCanceled,

    /// The console was reset to idle.
    ///
    /// Sets: `console`
    RunCleared,

    // === Interaction ===
    /// A `read` is pending; the presentation layer should focus its input.
    ///
    /// Sets: `console`, `run`, `reason` (prompt text)
    InputRequested,

    /// A pending read was resolved with the submitted value.
    ///
    /// Sets: `console`, `run`
    InputSubmitted,

    /// A pending read was resolved without a value (forced stop).
    ///
    /// Sets: `console`, `run`
    InputAbandoned,

    /// A turtle was added to the scene.
    ///
    /// Sets: `console`, `run`, `turtle`
    TurtleAdded,

    /// A turtle committed to an animated step.
    ///
    /// Sets: `console`, `run`, `turtle`, `duration_ms` (step duration)
    MotionStarted,

    // === Subscriber events ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `console` (subscriber name), `reason`
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `console` (subscriber name), `reason` (panic info)
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Console title (or subscriber name for subscriber events).
    pub console: Option<Arc<str>>,
    /// Run generation the event belongs to.
    pub run: Option<u64>,
    /// Turtle identifier, if applicable.
    pub turtle: Option<u64>,
    /// Human-readable reason (failure messages, prompts, overflow details).
    pub reason: Option<Arc<str>>,
    /// Duration in milliseconds (compact).
    pub duration_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            console: None,
            run: None,
            turtle: None,
            reason: None,
            duration_ms: None,
        }
    }

    /// Attaches a console title.
    #[inline]
    pub fn with_console(mut self, console: impl Into<Arc<str>>) -> Self {
        self.console = Some(console.into());
        self
    }

    /// Attaches a run generation.
    #[inline]
    pub fn with_run(mut self, run: u64) -> Self {
        self.run = Some(run);
        self
    }

    /// Attaches a turtle identifier.
    #[inline]
    pub fn with_turtle(mut self, turtle: u64) -> Self {
        self.turtle = Some(turtle);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a duration (stored as milliseconds).
    #[inline]
    pub fn with_duration(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.duration_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_console(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_console(subscriber)
            .with_reason(info)
    }

    /// Returns true for the three terminal run events.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::RunSucceeded | EventKind::RunFailed | EventKind::RunCanceled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::RunStarted);
        let b = Event::new(EventKind::RunStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_duration_saturates_to_u32() {
        let ev = Event::new(EventKind::MotionStarted).with_duration(Duration::from_secs(u64::MAX));
        assert_eq!(ev.duration_ms, Some(u32::MAX));
    }
}
