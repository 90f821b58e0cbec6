//! # Motion geometry.
//!
//! Headings are stored in radians, counter-clockwise from the positive x axis; the public
//! turtle API takes degrees. A [`Motion`] is a pure description of one animated step: it
//! knows its duration and the pose at any elapsed time, nothing else.
//!
//! ## Arc construction
//! ```text
//! d      = +1 for angle >= 0 (left, counter-clockwise), -1 otherwise
//! center = p + r·(-d·sin θ, d·cos θ)          (perpendicular to the heading)
//! α0     = θ - d·π/2                          (angle of p as seen from the center)
//! pose(φ): position = center + r·(cos(α0+φ), sin(α0+φ)), heading = θ + φ
//! ```
//! The heading stays tangent to the circle for the whole sweep.

use std::f64::consts::{FRAC_PI_2, PI};
use std::time::Duration;

use crate::error::ConsoleError;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Position plus heading (radians).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Point,
    pub heading: f64,
}

impl Pose {
    /// Heading in degrees, normalized to `[0, 360)`.
    pub fn heading_degrees(&self) -> f64 {
        self.heading.to_degrees().rem_euclid(360.0)
    }
}

/// One animated step of a turtle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Straight displacement along the heading.
    Line {
        from: Pose,
        to: Point,
        duration: Duration,
    },
    /// Turn in place by `delta` radians.
    Rotate {
        from: Pose,
        delta: f64,
        duration: Duration,
    },
    /// Circular sweep of `sweep` radians around `center`.
    Arc {
        from: Pose,
        center: Point,
        radius: f64,
        start_angle: f64,
        sweep: f64,
        duration: Duration,
    },
}

impl Motion {
    /// Moves `distance` along the heading; negative distances move backward.
    pub fn line(from: Pose, distance: f64, speed: f64) -> Self {
        let to = Point::new(
            from.position.x + distance * from.heading.cos(),
            from.position.y + distance * from.heading.sin(),
        );
        Motion::Line {
            from,
            to,
            duration: seconds(distance.abs() / speed),
        }
    }

    /// Turns by `degrees` (positive is counter-clockwise).
    pub fn rotate(from: Pose, degrees: f64, angular_speed: f64) -> Self {
        Motion::Rotate {
            from,
            delta: degrees.to_radians(),
            duration: seconds(degrees.abs() / angular_speed),
        }
    }

    /// Sweeps `degrees` along a circle of `radius`; the radius must already be validated.
    pub fn arc(from: Pose, radius: f64, degrees: f64, speed: f64) -> Self {
        let d = if degrees >= 0.0 { 1.0 } else { -1.0 };
        let (sin, cos) = from.heading.sin_cos();
        let center = Point::new(
            from.position.x - d * sin * radius,
            from.position.y + d * cos * radius,
        );
        let arc_length = (2.0 * PI * radius * degrees / 360.0).abs();

        Motion::Arc {
            from,
            center,
            radius,
            start_angle: from.heading - d * FRAC_PI_2,
            sweep: degrees.to_radians(),
            duration: seconds(arc_length / speed),
        }
    }

    pub fn duration(&self) -> Duration {
        match *self {
            Motion::Line { duration, .. }
            | Motion::Rotate { duration, .. }
            | Motion::Arc { duration, .. } => duration,
        }
    }

    /// Final pose, computed exactly (no interpolation error).
    pub fn end(&self) -> Pose {
        match *self {
            Motion::Line { from, to, .. } => Pose {
                position: to,
                heading: from.heading,
            },
            Motion::Rotate { from, delta, .. } => Pose {
                position: from.position,
                heading: from.heading + delta,
            },
            Motion::Arc {
                from,
                center,
                radius,
                start_angle,
                sweep,
                ..
            } => arc_pose(center, radius, start_angle, from.heading, sweep),
        }
    }

    /// Pose after `elapsed` of this motion; clamps to the end pose.
    pub fn pose_at(&self, elapsed: Duration) -> Pose {
        let total = self.duration();
        if total.is_zero() || elapsed >= total {
            return self.end();
        }
        let t = elapsed.as_secs_f64() / total.as_secs_f64();

        match *self {
            Motion::Line { from, to, .. } => Pose {
                position: Point::new(
                    from.position.x + (to.x - from.position.x) * t,
                    from.position.y + (to.y - from.position.y) * t,
                ),
                heading: from.heading,
            },
            Motion::Rotate { from, delta, .. } => Pose {
                position: from.position,
                heading: from.heading + delta * t,
            },
            Motion::Arc {
                from,
                center,
                radius,
                start_angle,
                sweep,
                ..
            } => arc_pose(center, radius, start_angle, from.heading, sweep * t),
        }
    }
}

fn arc_pose(center: Point, radius: f64, start_angle: f64, heading: f64, swept: f64) -> Pose {
    let (sin, cos) = (start_angle + swept).sin_cos();
    Pose {
        position: Point::new(center.x + radius * cos, center.y + radius * sin),
        heading: heading + swept,
    }
}

/// Converts a non-negative second count, saturating at [`Duration::MAX`].
fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(if secs > 0.0 {
        Duration::MAX
    } else {
        Duration::ZERO
    })
}

/// Rejects NaN and infinities.
pub(crate) fn ensure_finite(what: &'static str, value: f64) -> Result<(), ConsoleError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConsoleError::InvalidArgument { what, value })
    }
}

/// Arc radius must be finite and strictly positive.
pub(crate) fn ensure_radius(radius: f64) -> Result<(), ConsoleError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(ConsoleError::InvalidRadius { radius })
    }
}
