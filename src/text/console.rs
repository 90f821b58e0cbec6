//! Presentation-side operations of a text console.
//!
//! These are driven by the input widget and the line renderer, not by the routine, so
//! they do not pass the run checkpoint.

use crate::core::Console;
use crate::error::BridgeError;
use crate::text::{Line, TextBuffer};

impl Console<TextBuffer> {
    /// Snapshot of the current lines, oldest first.
    pub async fn lines(&self) -> Result<Vec<Line>, BridgeError> {
        self.bridge
            .call(|s| s.kind.lines().iter().cloned().collect())
            .await
    }

    /// Blocking twin of [`lines`](Self::lines).
    pub fn blocking_lines(&self) -> Result<Vec<Line>, BridgeError> {
        self.bridge
            .call_blocking(|s| s.kind.lines().iter().cloned().collect())
    }

    /// Current scratch value of the input field.
    pub async fn input(&self) -> Result<String, BridgeError> {
        self.bridge.call(|s| s.kind.input().to_string()).await
    }

    /// Blocking twin of [`input`](Self::input).
    pub fn blocking_input(&self) -> Result<String, BridgeError> {
        self.bridge.call_blocking(|s| s.kind.input().to_string())
    }

    /// Replaces the scratch value of the input field (typing).
    pub async fn set_input(&self, value: impl Into<String>) -> Result<(), BridgeError> {
        let value = value.into();
        self.bridge.call(move |s| s.kind.set_input(value)).await
    }

    /// Blocking twin of [`set_input`](Self::set_input).
    pub fn blocking_set_input(&self, value: impl Into<String>) -> Result<(), BridgeError> {
        let value = value.into();
        self.bridge.call_blocking(move |s| s.kind.set_input(value))
    }

    /// Resolves the pending read with the input value (`commit = true`) or abandons it.
    ///
    /// Returns false when no read was pending.
    pub async fn submit_input(&self, commit: bool) -> Result<bool, BridgeError> {
        self.bridge
            .call(move |s| {
                let run = s.run.state().is_running().then(|| s.run.generation());
                s.kind.resolve(commit, run, &s.bus)
            })
            .await
    }

    /// Blocking twin of [`submit_input`](Self::submit_input).
    pub fn blocking_submit_input(&self, commit: bool) -> Result<bool, BridgeError> {
        self.bridge.call_blocking(move |s| {
            let run = s.run.state().is_running().then(|| s.run.generation());
            s.kind.resolve(commit, run, &s.bus)
        })
    }
}
