use std::marker::PhantomData;
use std::sync::Arc;

use tokio::runtime::Handle;

use super::{
    bridge::Bridge,
    console::Console,
    routine::Routine,
    session::{ConsoleKind, Session},
};
use crate::{
    config::Config,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Console`] with optional subscribers.
pub struct ConsoleBuilder<K> {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ConsoleKind> ConsoleBuilder<K> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            _kind: PhantomData,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive console events (run lifecycle, input requests, motions)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the console around `routine`.
    ///
    /// This consumes the builder and initializes all runtime components:
    /// - Event bus for broadcasting
    /// - Subscriber workers and the bus listener feeding them
    /// - Owner loop holding the session
    ///
    /// # Panics
    /// Must be called within a tokio runtime.
    pub fn build(self, routine: Routine<K::Run>) -> Console<K> {
        let config = Arc::new(self.cfg);
        let bus = Bus::new(config.bus_capacity_clamped());
        let subs = SubscriberSet::new(self.subscribers, &bus);
        if !subs.is_empty() {
            subscriber_listener(&bus, subs);
        }

        let session = Session::<K>::new(Arc::clone(&config), bus.clone());
        let (bridge, _owner) = Bridge::spawn(session);

        Console {
            bridge,
            routine,
            runtime: Handle::current(),
            bus,
            config,
        }
    }
}

/// Subscribes to the bus and forwards events to the subscriber set (fire-and-forget).
///
/// The bus closes once every console handle and the owner loop are gone; the listener
/// then shuts the set down, which releases the subscribers.
fn subscriber_listener(bus: &Bus, set: SubscriberSet) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => set.emit(&ev),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscriber listener lagged behind the bus");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
        set.shutdown().await;
    });
}
