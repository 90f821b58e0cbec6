//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], an extension point for plugging custom event handlers into a console.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently of the owner context)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and reported as `EventKind::SubscriberPanicked`)
//!
//! ## Rules
//! - A slow subscriber only affects its own queue.
//! - Queue overflow drops the event **for this subscriber only** and publishes
//!   `EventKind::SubscriberOverflow`.
//! - Events are processed sequentially (FIFO) per subscriber.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use consolevisor::{Event, EventKind, Subscribe};
//!
//! struct FocusInput;
//!
//! #[async_trait]
//! impl Subscribe for FocusInput {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::InputRequested) {
//!             // move keyboard focus to the input field
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "focus" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for console observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, never on the owner context.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in overflow/panic events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber (clamped to at least 1).
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
