//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [run-started] console="Console" run=1
//! [input-requested] console="Console" run=1 prompt="Enter a number"
//! [input-submitted] console="Console" run=1
//! [motion] console="Turtle" run=2 turtle=1 duration_ms=500
//! [run-failed] console="Turtle" run=2 reason="Invalid radius: 0"
//! [run-canceled] console="Console" run=1
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let console = e.console.as_deref().unwrap_or("?");
        let run = show(e.run);
        match e.kind {
            EventKind::RunStarted => {
                println!("[run-started] console={console:?} run={run}");
            }
            EventKind::RunSucceeded => {
                println!(
                    "[run-succeeded] console={console:?} run={run} duration_ms={}",
                    show(e.duration_ms)
                );
            }
            EventKind::RunFailed => {
                println!(
                    "[run-failed] console={console:?} run={run} reason={:?}",
                    e.reason.as_deref().unwrap_or("")
                );
            }
            EventKind::RunCanceled => {
                println!("[run-canceled] console={console:?} run={run}");
            }
            EventKind::RunCleared => {
                println!("[run-cleared] console={console:?}");
            }
            EventKind::InputRequested => {
                println!(
                    "[input-requested] console={console:?} run={run} prompt={:?}",
                    e.reason.as_deref().unwrap_or("")
                );
            }
            EventKind::InputSubmitted => {
                println!("[input-submitted] console={console:?} run={run}");
            }
            EventKind::InputAbandoned => {
                println!("[input-abandoned] console={console:?} run={run}");
            }
            EventKind::TurtleAdded => {
                println!(
                    "[turtle-added] console={console:?} run={run} turtle={}",
                    show(e.turtle)
                );
            }
            EventKind::MotionStarted => {
                println!(
                    "[motion] console={console:?} run={run} turtle={} duration_ms={}",
                    show(e.turtle),
                    show(e.duration_ms)
                );
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={console} reason={:?}",
                    e.reason.as_deref().unwrap_or("")
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={console} info={}",
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

fn show<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
