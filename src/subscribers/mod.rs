//! # Event subscribers for consoles.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and the
//! optional built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Session ── publish(Event) ──► Bus ──► subscriber_listener ──► SubscriberSet
//!                                                          ┌────────┼────────┐
//!                                                          ▼        ▼        ▼
//!                                                     LogWriter   Focus    Custom
//! ```

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
