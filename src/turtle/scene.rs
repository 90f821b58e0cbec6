//! # Turtle scene: per-turtle pose, pen and traced paths.
//!
//! [`TurtleScene`] is the kind state of a turtle console. Every turtle is an independent
//! state machine; the scene only shares the console's run checkpoint between them.
//!
//! ## Pen tracing
//! ```text
//! pen_down ──► new PathSegment [current position]  (style copied from the turtle)
//! tick     ──► append interpolated position         (only while the pen is down)
//! motion end ► append exact end position
//! pen_up   ──► segment is frozen
//! set_color / line_width while down ──► pen_down again (new segment, new style)
//! ```

use tokio::time::Instant;

use crate::config::Config;
use crate::core::{ConsoleKind, RunContext};
use crate::error::ConsoleError;
use crate::events::Bus;
use crate::style::Color;
use crate::turtle::geometry::{Motion, Point, Pose};
use crate::turtle::TurtleRun;

/// Identifier of a turtle within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurtleId(pub(crate) u64);

impl TurtleId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Stroke style of a path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// A traced path; append-only while the pen that created it is down.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub stroke: Stroke,
    pub fill: Option<Color>,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Pen {
    Up,
    Down { segment: usize, fill: Option<Color> },
}

/// Owner-side state of one turtle.
#[derive(Debug)]
pub(crate) struct TurtleState {
    id: TurtleId,
    pose: Pose,
    motion: Option<(Motion, Instant)>,
    pen: Pen,
    stroke: Stroke,
    segments: Vec<PathSegment>,
}

impl TurtleState {
    fn new(id: TurtleId, stroke: Stroke) -> Self {
        Self {
            id,
            pose: Pose::default(),
            motion: None,
            pen: Pen::Up,
            stroke,
            segments: Vec::new(),
        }
    }

    /// Pose at `now`, interpolated while a motion is in flight.
    pub fn pose_at(&self, now: Instant) -> Pose {
        match &self.motion {
            Some((motion, started)) => motion.pose_at(now.saturating_duration_since(*started)),
            None => self.pose,
        }
    }

    /// Starts `motion` from the current settled pose.
    pub fn begin(&mut self, motion: Motion, now: Instant) {
        self.halt(now);
        self.motion = Some((motion, now));
    }

    /// Lands the in-flight motion exactly on its end pose.
    pub fn finish_motion(&mut self) {
        if let Some((motion, _)) = self.motion.take() {
            self.pose = motion.end();
            self.trace_point(self.pose.position);
        }
    }

    /// Freezes the turtle where it is at `now`.
    pub fn halt(&mut self, now: Instant) {
        if self.motion.is_some() {
            self.pose = self.pose_at(now);
            self.motion = None;
            self.trace_point(self.pose.position);
        }
    }

    /// Per-frame update: extends the active segment while moving.
    pub fn trace(&mut self, now: Instant) {
        if self.motion.is_some() {
            let position = self.pose_at(now).position;
            self.trace_point(position);
        }
    }

    pub fn pen_down(&mut self, fill: Option<Color>) {
        self.segments.push(PathSegment {
            stroke: self.stroke,
            fill,
            points: vec![self.pose.position],
        });
        self.pen = Pen::Down {
            segment: self.segments.len() - 1,
            fill,
        };
    }

    pub fn pen_up(&mut self) {
        self.pen = Pen::Up;
    }

    pub fn set_color(&mut self, color: Color) {
        self.stroke.color = color;
        self.restart_segment();
    }

    pub fn set_width(&mut self, width: f64) {
        self.stroke.width = width;
        self.restart_segment();
    }

    pub fn snapshot(&self, now: Instant) -> TurtleSnapshot {
        TurtleSnapshot {
            id: self.id,
            pose: self.pose_at(now),
            moving: self.motion.is_some(),
            pen_down: matches!(self.pen, Pen::Down { .. }),
            stroke: self.stroke,
            segments: self.segments.clone(),
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    fn restart_segment(&mut self) {
        if let Pen::Down { fill, .. } = self.pen {
            self.pen_down(fill);
        }
    }

    fn trace_point(&mut self, position: Point) {
        let Pen::Down { segment, .. } = self.pen else {
            return;
        };
        if let Some(seg) = self.segments.get_mut(segment) {
            if seg.points.last() != Some(&position) {
                seg.points.push(position);
            }
        }
    }
}

/// Read-only view of a turtle for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TurtleSnapshot {
    pub id: TurtleId,
    pub pose: Pose,
    /// True while an animated step is in flight.
    pub moving: bool,
    pub pen_down: bool,
    pub stroke: Stroke,
    pub segments: Vec<PathSegment>,
}

/// Kind state of a turtle console.
#[derive(Debug)]
pub struct TurtleScene {
    turtles: Vec<TurtleState>,
    next_id: u64,
    default_stroke: Stroke,
}

impl TurtleScene {
    pub fn new(default_stroke: Stroke) -> Self {
        Self {
            turtles: Vec::new(),
            next_id: 0,
            default_stroke,
        }
    }

    pub fn len(&self) -> usize {
        self.turtles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turtles.is_empty()
    }

    pub(crate) fn add(&mut self) -> TurtleId {
        let id = TurtleId(self.next_id);
        self.next_id += 1;
        self.turtles.push(TurtleState::new(id, self.default_stroke));
        id
    }

    pub(crate) fn turtle_mut(&mut self, id: TurtleId) -> Result<&mut TurtleState, ConsoleError> {
        self.turtles
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ConsoleError::UnknownTurtle { id: id.0 })
    }

    pub fn snapshots(&self, now: Instant) -> Vec<TurtleSnapshot> {
        self.turtles.iter().map(|t| t.snapshot(now)).collect()
    }

    /// The single turtle, or `None` when there are zero or several.
    pub fn only_turtle(&self, now: Instant) -> Option<TurtleSnapshot> {
        match self.turtles.as_slice() {
            [only] => Some(only.snapshot(now)),
            _ => None,
        }
    }
}

impl ConsoleKind for TurtleScene {
    type Run = TurtleRun;

    const TITLE: &'static str = "Turtle";

    fn from_config(config: &Config) -> Self {
        TurtleScene::new(Stroke {
            color: config.turtle_color,
            width: config.line_width,
        })
    }

    fn bind(ctx: RunContext<Self>) -> TurtleRun {
        TurtleRun::new(ctx)
    }

    fn disable_clear(&self) -> bool {
        false
    }

    fn on_tick(&mut self, now: Instant) {
        for turtle in &mut self.turtles {
            turtle.trace(now);
        }
    }

    fn on_stop(&mut self, now: Instant, _run: Option<u64>, _bus: &Bus) {
        for turtle in &mut self.turtles {
            turtle.halt(now);
        }
    }

    fn on_clear(&mut self) {
        self.turtles.clear();
    }
}
