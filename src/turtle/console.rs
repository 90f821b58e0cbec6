//! Presentation-side queries of a turtle console.

use tokio::time::Instant;

use crate::core::Console;
use crate::error::BridgeError;
use crate::turtle::{TurtleScene, TurtleSnapshot};

impl Console<TurtleScene> {
    /// Every turtle of the scene, with poses interpolated at the time of the call.
    pub async fn turtles(&self) -> Result<Vec<TurtleSnapshot>, BridgeError> {
        self.bridge
            .call(|s| s.kind.snapshots(Instant::now()))
            .await
    }

    /// Blocking twin of [`turtles`](Self::turtles).
    pub fn blocking_turtles(&self) -> Result<Vec<TurtleSnapshot>, BridgeError> {
        self.bridge.call_blocking(|s| s.kind.snapshots(Instant::now()))
    }

    /// The single turtle of the scene, or `None` when there are zero or several
    /// (camera follow only makes sense for one).
    pub async fn only_turtle(&self) -> Result<Option<TurtleSnapshot>, BridgeError> {
        self.bridge
            .call(|s| s.kind.only_turtle(Instant::now()))
            .await
    }

    /// Blocking twin of [`only_turtle`](Self::only_turtle).
    pub fn blocking_only_turtle(&self) -> Result<Option<TurtleSnapshot>, BridgeError> {
        self.bridge
            .call_blocking(|s| s.kind.only_turtle(Instant::now()))
    }
}
