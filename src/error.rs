//! Error types used by the consolevisor runtime and console operations.
//!
//! This module defines three error enums:
//!
//! - [`ConsoleError`]: errors raised by run-bound console operations (`write`, `read`, turtle motion).
//! - [`BridgeError`]: failures of the hand-off to the owner context.
//! - [`LifecycleError`]: rejected lifecycle requests (`start`, `clear`).
//!
//! All of them provide `as_label` for logging. The run outcome of a user routine is derived
//! from its `anyhow::Error` by [`classify`].

use thiserror::Error;

use crate::core::RunState;

/// Message shown for any failure that is neither a cancellation nor a domain error.
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// # Errors produced by console operations.
///
/// A user routine propagates these with `?`. The controller maps them onto a terminal
/// [`RunState`]:
/// - [`ConsoleError::Canceled`] unwinds the routine without further transition;
/// - domain errors (see [`ConsoleError::is_domain`]) become `Failed(message)`;
/// - everything else becomes `Failed("Unknown Error")`.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsoleError {
    /// The operation was attempted while its run is not active.
    #[error("run is not active")]
    Canceled,

    /// Arc radius must be strictly positive.
    #[error("Invalid radius: {radius}")]
    InvalidRadius {
        /// The rejected radius.
        radius: f64,
    },

    /// A numeric argument was not finite (or out of range).
    #[error("Invalid {what}: {value}")]
    InvalidArgument {
        /// Argument name (`distance`, `angle`, `width`).
        what: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A second `read` was issued while another one is still pending.
    #[error("a read is already pending")]
    ReadPending,

    /// The turtle handle does not belong to the current scene.
    #[error("unknown turtle #{id}")]
    UnknownTurtle {
        /// Turtle identifier.
        id: u64,
    },

    /// Domain failure raised by user code; the message is shown verbatim.
    #[error("{message}")]
    Domain {
        /// Human-readable reason.
        message: String,
    },

    /// The owner context could not run the operation.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl ConsoleError {
    /// Creates a domain error with a user-visible message.
    ///
    /// # Example
    /// ```
    /// use consolevisor::ConsoleError;
    ///
    /// let err = ConsoleError::domain("number out of range");
    /// assert!(err.is_domain());
    /// assert_eq!(err.to_string(), "number out of range");
    /// ```
    pub fn domain(message: impl Into<String>) -> Self {
        ConsoleError::Domain {
            message: message.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConsoleError::Canceled => "console_canceled",
            ConsoleError::InvalidRadius { .. } => "console_invalid_radius",
            ConsoleError::InvalidArgument { .. } => "console_invalid_argument",
            ConsoleError::ReadPending => "console_read_pending",
            ConsoleError::UnknownTurtle { .. } => "console_unknown_turtle",
            ConsoleError::Domain { .. } => "console_domain",
            ConsoleError::Bridge(_) => "console_bridge",
        }
    }

    /// Indicates a cancellation signal (not a user-visible error).
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ConsoleError::Canceled)
    }

    /// Indicates an error whose message is shown verbatim as the failure reason.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            ConsoleError::InvalidRadius { .. }
                | ConsoleError::InvalidArgument { .. }
                | ConsoleError::ReadPending
                | ConsoleError::UnknownTurtle { .. }
                | ConsoleError::Domain { .. }
        )
    }
}

/// # Errors produced by the owner-context hand-off.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The owner loop has exited; nothing can be scheduled anymore.
    #[error("owner context closed")]
    Closed,

    /// The bridged operation panicked on the owner context.
    #[error("bridged operation panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl BridgeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            BridgeError::Closed => "bridge_closed",
            BridgeError::Panicked { .. } => "bridge_panicked",
        }
    }
}

/// # Rejected lifecycle requests.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// `start` was requested while a run is in flight.
    #[error("a run is already in progress")]
    AlreadyRunning,

    /// `clear` was requested while a run is in flight; stop it first.
    #[error("cannot clear while running")]
    Running,

    /// The owner context could not run the request.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl LifecycleError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            LifecycleError::AlreadyRunning => "lifecycle_already_running",
            LifecycleError::Running => "lifecycle_running",
            LifecycleError::Bridge(_) => "lifecycle_bridge",
        }
    }
}

/// Maps the error a routine exited with onto its terminal state.
///
/// Returns `None` for a cancellation: the transition to `Canceled` belongs to `stop()`.
pub(crate) fn classify(err: &anyhow::Error) -> Option<RunState> {
    match err.downcast_ref::<ConsoleError>() {
        Some(e) if e.is_cancellation() => None,
        Some(e) if e.is_domain() => Some(RunState::Failed(e.to_string())),
        _ => Some(RunState::Failed(UNKNOWN_ERROR.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_cancellation_is_not_a_failure() {
        let err = anyhow::Error::new(ConsoleError::Canceled);
        assert_eq!(classify(&err), None);
    }

    #[test]
    fn test_invalid_radius_message_is_verbatim() {
        let err = anyhow::Error::new(ConsoleError::InvalidRadius { radius: 0.0 });
        assert_eq!(
            classify(&err),
            Some(RunState::Failed("Invalid radius: 0".to_string()))
        );
    }

    #[test]
    fn test_domain_error_survives_context() {
        let err = Err::<(), _>(ConsoleError::domain("bad input"))
            .context("while parsing")
            .unwrap_err();
        assert_eq!(
            classify(&err),
            Some(RunState::Failed("bad input".to_string()))
        );
    }

    #[test]
    fn test_foreign_error_is_unknown() {
        let err: anyhow::Error = "x".parse::<i32>().unwrap_err().into();
        assert_eq!(
            classify(&err),
            Some(RunState::Failed(UNKNOWN_ERROR.to_string()))
        );
    }

    #[test]
    fn test_bridge_failure_is_unknown() {
        let err = anyhow::Error::new(ConsoleError::from(BridgeError::Closed));
        assert_eq!(
            classify(&err),
            Some(RunState::Failed(UNKNOWN_ERROR.to_string()))
        );
    }
}
