use std::time::Duration;

use tokio::sync::oneshot;

use crate::core::{RunContext, RunScope, Session};
use crate::error::ConsoleError;
use crate::events::{Event, EventKind};
use crate::style::StyledText;
use crate::text::{LineContent, TextBuffer};

/// Text console handle given to the routine of one run.
///
/// Every operation fails with [`ConsoleError::Canceled`] once its run is no longer the
/// current running one.
#[derive(Clone)]
pub struct TextRun {
    ctx: RunContext<TextBuffer>,
}

impl TextRun {
    pub(crate) fn new(ctx: RunContext<TextBuffer>) -> Self {
        Self { ctx }
    }

    /// Generation of the run this handle belongs to.
    pub fn generation(&self) -> u64 {
        self.ctx.scope().generation()
    }

    /// Appends an output line.
    pub async fn write(&self, text: impl Into<StyledText>) -> Result<(), ConsoleError> {
        let text = text.into();
        self.ctx
            .call(move |s, _| {
                s.kind.push(LineContent::Output(text));
                Ok(())
            })
            .await
    }

    /// Blocking twin of [`write`](Self::write).
    pub fn blocking_write(&self, text: impl Into<StyledText>) -> Result<(), ConsoleError> {
        let text = text.into();
        self.ctx.blocking_call(move |s, _| {
            s.kind.push(LineContent::Output(text));
            Ok(())
        })
    }

    /// Shows `prompt`, then waits for the user's answer.
    ///
    /// Resolves to `""` when the run is stopped while waiting.
    pub async fn read(&self, prompt: impl Into<StyledText>) -> Result<String, ConsoleError> {
        let prompt = prompt.into();
        let answer = self.ctx.call(move |s, scope| begin_read(s, scope, prompt)).await?;
        Ok(answer.await.ok().flatten().unwrap_or_default())
    }

    /// Blocking twin of [`read`](Self::read).
    pub fn blocking_read(&self, prompt: impl Into<StyledText>) -> Result<String, ConsoleError> {
        let prompt = prompt.into();
        let answer = self
            .ctx
            .blocking_call(move |s, scope| begin_read(s, scope, prompt))?;
        Ok(answer.blocking_recv().ok().flatten().unwrap_or_default())
    }

    /// Sleeps for `duration`; fails with `Canceled` as soon as the run is stopped.
    pub async fn pause(&self, duration: Duration) -> Result<(), ConsoleError> {
        self.ctx.pause(duration).await
    }

    /// Blocking twin of [`pause`](Self::pause).
    pub fn blocking_pause(&self, duration: Duration) -> Result<(), ConsoleError> {
        self.ctx.blocking_pause(duration)
    }
}

fn begin_read(
    session: &mut Session<TextBuffer>,
    scope: &RunScope,
    prompt: StyledText,
) -> Result<oneshot::Receiver<Option<String>>, ConsoleError> {
    let (tx, rx) = oneshot::channel();
    let shown = prompt.plain();
    session.kind.begin_read(prompt, tx)?;
    session.publish(
        Event::new(EventKind::InputRequested)
            .with_run(scope.generation())
            .with_reason(shown),
    );
    Ok(rx)
}
