//! # Turtle console.
//!
//! Turtles move on a plane with animated, cancellable steps and trace pen paths. The
//! routine gets a [`TurtleRun`] and creates [`Turtle`]s from it; the presentation layer
//! reads [`TurtleSnapshot`]s through `Console<TurtleScene>`.
//!
//! Default speeds: 200 points/s for lines and arcs, 90 °/s for rotations
//! (see [`Config`](crate::Config)).

mod console;
mod geometry;
mod handle;
mod scene;

pub use geometry::{Motion, Point, Pose};
pub use handle::{Turtle, TurtleRun};
pub use scene::{PathSegment, Stroke, TurtleId, TurtleScene, TurtleSnapshot};
