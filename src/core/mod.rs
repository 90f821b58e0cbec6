//! Runtime core: owner context and run lifecycle.
//!
//! This module contains the engine shared by every console kind. The public API is
//! [`Console`] (plus its [`ConsoleBuilder`]) and the [`Routine`] it runs; run-bound
//! handles are created through [`ConsoleKind::bind`].
//!
//! Internal modules:
//! - [`bridge`]: owner loop and the sync-over-async call bridge;
//! - [`state`]: run-state machine, generations and run scopes;
//! - [`session`]: owner-context state and the [`ConsoleKind`] seam;
//! - [`routine`]: async/blocking user routines;
//! - [`console`]: lifecycle surface and routine supervision;
//! - [`ticker`]: opt-in frame driver.

mod bridge;
mod builder;
mod console;
mod routine;
mod session;
mod state;
mod ticker;

pub use bridge::Bridge;
pub use builder::ConsoleBuilder;
pub use console::Console;
pub use routine::{BoxRoutineFuture, Routine};
pub use session::{ConsoleKind, ConsoleStatus, RunContext, Session};
pub use state::{RunScope, RunState, Severity};

pub(crate) use bridge::panic_message;
