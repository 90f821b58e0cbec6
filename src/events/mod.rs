//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by a console's owner context.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`, and its non-owning [`WeakBus`]
//!
//! ## Quick reference
//! - **Publishers**: `Session` (run transitions, input requests, turtle motion) and
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the builder's subscriber listener (fans out to `SubscriberSet`) and any
//!   receiver obtained through `Console::subscribe`.

mod bus;
mod event;

pub use bus::{Bus, WeakBus};
pub use event::{Event, EventKind};
