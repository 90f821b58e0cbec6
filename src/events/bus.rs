//! # Event bus for broadcasting console events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from the owner context of a console.
//!
//! ## Architecture
//! ```text
//! Publisher (one per console):       Receivers (many):
//!                                   ┌──► subscriber_listener ──► SubscriberSet
//!   Session (owner context) ──► Bus ┤
//!                                   └──► Console::subscribe() (presentation layer)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active receivers at send time.
//! - **Closing**: receivers see `RecvError::Closed` once every [`Bus`] is dropped;
//!   a [`WeakBus`] does not keep the channel open.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for console events.
///
/// Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Returns a handle that publishes without keeping the bus open.
    pub fn downgrade(&self) -> WeakBus {
        WeakBus {
            tx: self.tx.downgrade(),
        }
    }
}

/// Publishing handle that does not keep the bus alive.
///
/// Used by subscriber workers, which must not hold open the bus they listen on.
#[derive(Clone)]
pub struct WeakBus {
    tx: broadcast::WeakSender<Event>,
}

impl WeakBus {
    /// Publishes an event if the bus still exists; otherwise drops it.
    pub fn publish(&self, ev: Event) {
        if let Some(tx) = self.tx.upgrade() {
            let _ = tx.send(ev);
        }
    }
}
