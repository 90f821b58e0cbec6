//! # Run-bound turtle handles.
//!
//! Every motion follows the same sequence:
//! ```text
//! validate args ─► [owner] checkpoint ─► plan Motion ─► begin ─► MotionStarted
//!               ─► pause(duration)  (cancellable)
//!               ─► [owner] checkpoint ─► land on the exact end pose
//! ```
//! Invalid arguments fail before the first checkpoint, so they never move the turtle.
//! A stop during the pause halts the turtle at its interpolated pose; the routine then
//! sees `Canceled`.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::Config;
use crate::core::{RunContext, RunScope, Session};
use crate::error::ConsoleError;
use crate::events::{Event, EventKind};
use crate::style::Color;
use crate::turtle::geometry::{Motion, Pose, ensure_finite, ensure_radius};
use crate::turtle::scene::{TurtleId, TurtleScene, TurtleState};

/// Turtle console handle given to the routine of one run.
#[derive(Clone)]
pub struct TurtleRun {
    ctx: RunContext<TurtleScene>,
}

impl TurtleRun {
    pub(crate) fn new(ctx: RunContext<TurtleScene>) -> Self {
        Self { ctx }
    }

    /// Creates a new turtle at the origin, heading along +x, pen up.
    pub async fn add_turtle(&self) -> Result<Turtle, ConsoleError> {
        let id = self.ctx.call(add_turtle).await?;
        Ok(Turtle {
            id,
            ctx: self.ctx.clone(),
        })
    }

    /// Blocking twin of [`add_turtle`](Self::add_turtle).
    pub fn blocking_add_turtle(&self) -> Result<Turtle, ConsoleError> {
        let id = self.ctx.blocking_call(add_turtle)?;
        Ok(Turtle {
            id,
            ctx: self.ctx.clone(),
        })
    }
}

fn add_turtle(session: &mut Session<TurtleScene>, scope: &RunScope) -> Result<TurtleId, ConsoleError> {
    let id = session.kind.add();
    session.publish(
        Event::new(EventKind::TurtleAdded)
            .with_run(scope.generation())
            .with_turtle(id.get()),
    );
    Ok(id)
}

/// One turtle of the current run.
#[derive(Clone)]
pub struct Turtle {
    id: TurtleId,
    ctx: RunContext<TurtleScene>,
}

impl Turtle {
    pub fn id(&self) -> TurtleId {
        self.id
    }

    /// Moves `distance` points along the heading (negative moves backward).
    pub async fn forward(&self, distance: f64) -> Result<(), ConsoleError> {
        ensure_finite("distance", distance)?;
        self.animate(move |pose, cfg| Motion::line(pose, distance, cfg.linear_speed()))
            .await
    }

    pub fn blocking_forward(&self, distance: f64) -> Result<(), ConsoleError> {
        ensure_finite("distance", distance)?;
        self.blocking_animate(move |pose, cfg| Motion::line(pose, distance, cfg.linear_speed()))
    }

    pub async fn backward(&self, distance: f64) -> Result<(), ConsoleError> {
        self.forward(-distance).await
    }

    pub fn blocking_backward(&self, distance: f64) -> Result<(), ConsoleError> {
        self.blocking_forward(-distance)
    }

    /// Turns by `degrees`; positive is to the turtle's left.
    pub async fn rotate(&self, degrees: f64) -> Result<(), ConsoleError> {
        ensure_finite("angle", degrees)?;
        self.animate(move |pose, cfg| Motion::rotate(pose, degrees, cfg.angular_speed()))
            .await
    }

    pub fn blocking_rotate(&self, degrees: f64) -> Result<(), ConsoleError> {
        ensure_finite("angle", degrees)?;
        self.blocking_animate(move |pose, cfg| Motion::rotate(pose, degrees, cfg.angular_speed()))
    }

    /// Sweeps `degrees` along a circle of `radius`, staying tangent to it.
    ///
    /// Non-negative angles curve left, negative ones right. Fails with
    /// [`ConsoleError::InvalidRadius`] for `radius <= 0`, before anything moves.
    pub async fn arc(&self, radius: f64, degrees: f64) -> Result<(), ConsoleError> {
        ensure_radius(radius)?;
        ensure_finite("angle", degrees)?;
        self.animate(move |pose, cfg| Motion::arc(pose, radius, degrees, cfg.linear_speed()))
            .await
    }

    pub fn blocking_arc(&self, radius: f64, degrees: f64) -> Result<(), ConsoleError> {
        ensure_radius(radius)?;
        ensure_finite("angle", degrees)?;
        self.blocking_animate(move |pose, cfg| Motion::arc(pose, radius, degrees, cfg.linear_speed()))
    }

    /// Starts a new path segment at the current position.
    pub async fn pen_down(&self) -> Result<(), ConsoleError> {
        self.update(|t| t.pen_down(None)).await
    }

    pub fn blocking_pen_down(&self) -> Result<(), ConsoleError> {
        self.blocking_update(|t| t.pen_down(None))
    }

    /// Starts a new path segment whose shape is filled with `fill`.
    pub async fn pen_down_filled(&self, fill: Color) -> Result<(), ConsoleError> {
        self.update(move |t| t.pen_down(Some(fill))).await
    }

    pub fn blocking_pen_down_filled(&self, fill: Color) -> Result<(), ConsoleError> {
        self.blocking_update(move |t| t.pen_down(Some(fill)))
    }

    pub async fn pen_up(&self) -> Result<(), ConsoleError> {
        self.update(TurtleState::pen_up).await
    }

    pub fn blocking_pen_up(&self) -> Result<(), ConsoleError> {
        self.blocking_update(TurtleState::pen_up)
    }

    /// Changes the stroke color; segments drawn so far keep theirs.
    pub async fn set_color(&self, color: Color) -> Result<(), ConsoleError> {
        self.update(move |t| t.set_color(color)).await
    }

    pub fn blocking_set_color(&self, color: Color) -> Result<(), ConsoleError> {
        self.blocking_update(move |t| t.set_color(color))
    }

    /// Changes the stroke width; segments drawn so far keep theirs.
    pub async fn line_width(&self, width: f64) -> Result<(), ConsoleError> {
        ensure_width(width)?;
        self.update(move |t| t.set_width(width)).await
    }

    pub fn blocking_line_width(&self, width: f64) -> Result<(), ConsoleError> {
        ensure_width(width)?;
        self.blocking_update(move |t| t.set_width(width))
    }

    /// Settled pose (the end pose of the last completed motion).
    pub async fn pose(&self) -> Result<Pose, ConsoleError> {
        let id = self.id;
        self.ctx
            .call(move |s, _| Ok(s.kind.turtle_mut(id)?.pose()))
            .await
    }

    pub fn blocking_pose(&self) -> Result<Pose, ConsoleError> {
        let id = self.id;
        self.ctx
            .blocking_call(move |s, _| Ok(s.kind.turtle_mut(id)?.pose()))
    }

    async fn animate<P>(&self, plan: P) -> Result<(), ConsoleError>
    where
        P: FnOnce(Pose, &Config) -> Motion + Send + 'static,
    {
        let id = self.id;
        let duration = self
            .ctx
            .call(move |s, scope| begin_motion(s, scope, id, plan))
            .await?;
        self.ctx.pause(duration).await?;
        self.ctx.call(move |s, _| land(s, id)).await
    }

    fn blocking_animate<P>(&self, plan: P) -> Result<(), ConsoleError>
    where
        P: FnOnce(Pose, &Config) -> Motion + Send + 'static,
    {
        let id = self.id;
        let duration = self
            .ctx
            .blocking_call(move |s, scope| begin_motion(s, scope, id, plan))?;
        self.ctx.blocking_pause(duration)?;
        self.ctx.blocking_call(move |s, _| land(s, id))
    }

    async fn update<F>(&self, op: F) -> Result<(), ConsoleError>
    where
        F: FnOnce(&mut TurtleState) + Send + 'static,
    {
        let id = self.id;
        self.ctx
            .call(move |s, _| {
                op(s.kind.turtle_mut(id)?);
                Ok(())
            })
            .await
    }

    fn blocking_update<F>(&self, op: F) -> Result<(), ConsoleError>
    where
        F: FnOnce(&mut TurtleState) + Send + 'static,
    {
        let id = self.id;
        self.ctx.blocking_call(move |s, _| {
            op(s.kind.turtle_mut(id)?);
            Ok(())
        })
    }
}

fn begin_motion<P>(
    session: &mut Session<TurtleScene>,
    scope: &RunScope,
    id: TurtleId,
    plan: P,
) -> Result<Duration, ConsoleError>
where
    P: FnOnce(Pose, &Config) -> Motion,
{
    let now = Instant::now();
    let turtle = session.kind.turtle_mut(id)?;
    let motion = plan(turtle.pose(), &session.config);
    let duration = motion.duration();
    turtle.begin(motion, now);

    session.publish(
        Event::new(EventKind::MotionStarted)
            .with_run(scope.generation())
            .with_turtle(id.get())
            .with_duration(duration),
    );
    Ok(duration)
}

fn land(session: &mut Session<TurtleScene>, id: TurtleId) -> Result<(), ConsoleError> {
    session.kind.turtle_mut(id)?.finish_motion();
    Ok(())
}

fn ensure_width(width: f64) -> Result<(), ConsoleError> {
    ensure_finite("width", width)?;
    if width < 0.0 {
        return Err(ConsoleError::InvalidArgument {
            what: "width",
            value: width,
        });
    }
    Ok(())
}
