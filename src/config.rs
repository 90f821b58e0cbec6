//! # Console configuration.
//!
//! Provides [`Config`], the centralized settings for a console instance.
//!
//! Config is used in two ways:
//! 1. **Console creation**: `Console::builder(config).build(routine)`
//! 2. **Turtle defaults**: every new turtle copies `line_width` and `turtle_color`
//!
//! ## Sentinel values
//! - `max_lines = 0` → clamped to 1
//! - `linear_speed`/`angular_speed` not finite or `<= 0` → built-in default
//! - `tick_interval < 1ms` → clamped to 1ms

use std::time::Duration;

use crate::style::Color;

/// Default text buffer capacity.
pub const DEFAULT_MAX_LINES: usize = 100;
/// Default turtle speed for `forward` and `arc`, in points per second.
pub const DEFAULT_LINEAR_SPEED: f64 = 200.0;
/// Default turtle speed for `rotate`, in degrees per second.
pub const DEFAULT_ANGULAR_SPEED: f64 = 90.0;

/// Configuration for one console instance.
///
/// ## Field semantics
/// - `max_lines`: text buffer capacity; older lines are evicted FIFO
/// - `linear_speed`: turtle displacement speed (points/second)
/// - `angular_speed`: turtle rotation speed (degrees/second)
/// - `line_width`: initial stroke width of each new turtle
/// - `turtle_color`: initial stroke color of each new turtle
/// - `tick_interval`: cadence for [`Console::spawn_ticker`](crate::Console::spawn_ticker)
/// - `bus_capacity`: event bus ring buffer size
///
/// All fields are public. Prefer the clamped accessors over reading fields directly.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum number of lines kept by a text console.
    pub max_lines: usize,

    /// Turtle displacement speed for `forward`/`backward`/`arc`.
    pub linear_speed: f64,

    /// Turtle rotation speed for `rotate`.
    pub angular_speed: f64,

    /// Initial stroke width of new turtles.
    pub line_width: f64,

    /// Initial stroke color of new turtles.
    pub turtle_color: Color,

    /// Interval between ticks when the built-in ticker drives the console.
    pub tick_interval: Duration,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Receivers lagging behind more than `bus_capacity` events observe `Lagged`.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the text buffer capacity clamped to a minimum of 1.
    #[inline]
    pub fn max_lines_clamped(&self) -> usize {
        self.max_lines.max(1)
    }

    /// Returns the linear speed, falling back to the default for unusable values.
    #[inline]
    pub fn linear_speed(&self) -> f64 {
        positive_or(self.linear_speed, DEFAULT_LINEAR_SPEED)
    }

    /// Returns the angular speed, falling back to the default for unusable values.
    #[inline]
    pub fn angular_speed(&self) -> f64 {
        positive_or(self.angular_speed, DEFAULT_ANGULAR_SPEED)
    }

    /// Returns the tick interval clamped to a minimum of 1ms.
    #[inline]
    pub fn tick_interval_clamped(&self) -> Duration {
        self.tick_interval.max(Duration::from_millis(1))
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `max_lines = 100`
    /// - `linear_speed = 200 pts/s`, `angular_speed = 90 °/s`
    /// - `line_width = 3`, `turtle_color = green`
    /// - `tick_interval = 10ms`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            linear_speed: DEFAULT_LINEAR_SPEED,
            angular_speed: DEFAULT_ANGULAR_SPEED,
            line_width: 3.0,
            turtle_color: Color::GREEN,
            tick_interval: Duration::from_millis(10),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unusable_speeds_fall_back() {
        let cfg = Config {
            linear_speed: 0.0,
            angular_speed: f64::NAN,
            ..Config::default()
        };
        assert_eq!(cfg.linear_speed(), DEFAULT_LINEAR_SPEED);
        assert_eq!(cfg.angular_speed(), DEFAULT_ANGULAR_SPEED);
    }

    #[test]
    fn test_zero_sentinels_are_clamped() {
        let cfg = Config {
            max_lines: 0,
            bus_capacity: 0,
            tick_interval: Duration::ZERO,
            ..Config::default()
        };
        assert_eq!(cfg.max_lines_clamped(), 1);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.tick_interval_clamped(), Duration::from_millis(1));
    }
}
