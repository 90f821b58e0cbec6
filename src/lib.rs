//! # consolevisor
//!
//! **Consolevisor** runs long-running "student" routines against an interactive console
//! (a text log or a turtle-graphics scene) while the host stays responsive: it can watch
//! progress, stop the run, and exchange input/output with the routine.
//!
//! The engine is a run-state machine that owns one cancellable unit of work, a bridge
//! that serializes every state change on a single owner context, and the console kinds
//! layered on top of it.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────────┐                     ┌──────────────────────┐
//!     │ presentation     │ start/stop/clear    │ routine (detached)   │
//!     │ (UI, ticker, ..) │ tick/submit_input   │ async task or        │
//!     └────────┬─────────┘                     │ blocking-pool thread │
//!              │                               └──────────┬───────────┘
//!              │          Console<K>                      │ TextRun / Turtle ops
//!              ▼                                          ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bridge (unbounded queue, strict arrival order, oneshot replies)  │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Owner loop: Session<K>                                           │
//! │  - Run (state, timestamps, generation, cancellation token)        │
//! │  - K: TextBuffer (lines, pending read) | TurtleScene (turtles)    │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   │ publish(Event)
//!                                   ▼
//!                        Bus (broadcast channel)
//!                       ┌───────────┴───────────┐
//!                       ▼                       ▼
//!              subscriber_listener      Console::subscribe()
//!                       ▼
//!                 SubscriberSet ──► worker per subscriber ──► on_event()
//! ```
//!
//! ### Lifecycle
//! ```text
//! start()  ──► Idle|terminal ──► Running (generation += 1) ──► spawn routine
//!
//! routine result:
//!   ├─ Ok(())                        ──► Succeeded
//!   ├─ ConsoleError::Canceled        ──► (no transition; stop() already did it)
//!   ├─ domain error (Invalid radius) ──► Failed(message)
//!   └─ anything else / panic         ──► Failed("Unknown Error")
//!
//! stop()   ──► any state ──► Canceled (token cancelled, pending read resolved to "")
//! clear()  ──► not running ──► Idle, contents emptied
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                          |
//! |-------------------|-----------------------------------------------------------------|---------------------------------------------|
//! | **Lifecycle**     | Start, stop, clear and tick a console.                          | [`Console`], [`RunState`], [`ConsoleStatus`]|
//! | **Routines**      | Async or blocking student code.                                 | [`Routine`]                                 |
//! | **Text**          | Bounded line log with a pending-read protocol.                  | [`TextConsole`], [`TextRun`]                |
//! | **Turtle**        | Animated, cancellable turtle motion with pen tracing.           | [`TurtleConsole`], [`TurtleRun`], [`Turtle`]|
//! | **Subscriber API**| Hook into console events.                                       | [`Subscribe`]                               |
//! | **Errors**        | Typed errors for console operations and lifecycle requests.     | [`ConsoleError`], [`LifecycleError`]        |
//! | **Configuration** | Buffer capacity, turtle speeds and defaults, tick interval.     | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use consolevisor::{Routine, RunState, TextConsole, TextRun};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let console = TextConsole::new(Routine::from_async(|run: TextRun| async move {
//!         for i in 0..3 {
//!             run.write(format!("{i} iteration")).await?;
//!         }
//!         Ok(())
//!     }));
//!
//!     let mut events = console.subscribe();
//!     console.start().await?;
//!     while let Ok(ev) = events.recv().await {
//!         if ev.is_terminal() {
//!             break;
//!         }
//!     }
//!
//!     assert_eq!(console.state().await?, RunState::Succeeded);
//!     assert_eq!(console.lines().await?.len(), 3);
//!     Ok(())
//! }
//! ```
pub mod clock;
mod config;
mod core;
mod error;
mod events;
mod style;
mod subscribers;
mod text;
mod turtle;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{
    BoxRoutineFuture, Bridge, Console, ConsoleBuilder, ConsoleKind, ConsoleStatus, Routine,
    RunContext, RunScope, RunState, Session, Severity,
};
pub use error::{BridgeError, ConsoleError, LifecycleError, UNKNOWN_ERROR};
pub use events::{Bus, Event, EventKind, WeakBus};
pub use style::{Color, Span, StyledText};
pub use subscribers::{Subscribe, SubscriberSet};
pub use text::{Line, LineContent, LineId, TextBuffer, TextRun};
pub use turtle::{
    Motion, PathSegment, Point, Pose, Stroke, Turtle, TurtleId, TurtleRun, TurtleScene,
    TurtleSnapshot,
};

/// Console with a bounded text log.
pub type TextConsole = Console<TextBuffer>;

/// Console with a turtle-graphics scene.
pub type TurtleConsole = Console<TurtleScene>;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
