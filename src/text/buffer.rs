//! # Bounded line buffer with a single pending-read slot.
//!
//! [`TextBuffer`] is the kind state of a text console. It lives on the owner context and
//! is only touched through bridged operations.
//!
//! ## Rules
//! - at most `capacity` lines; appending at capacity evicts the oldest line (FIFO)
//! - at most one pending read; a second one is refused with `ReadPending`
//! - a committed read turns its pending line into the submitted text
//! - an abandoned read (forced stop) removes its pending line and resolves to `""`

use std::collections::VecDeque;

use tokio::sync::oneshot;

use crate::config::Config;
use crate::core::{ConsoleKind, RunContext};
use crate::error::ConsoleError;
use crate::events::{Bus, Event, EventKind};
use crate::style::StyledText;
use crate::text::TextRun;

/// Stable identifier of a line, for diffing in the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(u64);

impl LineId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineContent {
    /// Written text, or the answer of a committed read.
    Output(StyledText),
    /// Placeholder where the input field is shown while a read is pending.
    PendingInput,
}

/// One entry of the console log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub id: LineId,
    pub content: LineContent,
}

impl Line {
    /// Plain text of an output line; `None` for the pending-input placeholder.
    pub fn text(&self) -> Option<String> {
        match &self.content {
            LineContent::Output(text) => Some(text.plain()),
            LineContent::PendingInput => None,
        }
    }
}

struct PendingRead {
    line: LineId,
    reply: oneshot::Sender<Option<String>>,
}

/// Kind state of a text console.
pub struct TextBuffer {
    lines: VecDeque<Line>,
    capacity: usize,
    next_id: u64,
    input: String,
    pending: Option<PendingRead>,
}

impl TextBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 0,
            input: String::new(),
            pending: None,
        }
    }

    pub fn lines(&self) -> &VecDeque<Line> {
        &self.lines
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Scratch value of the input field.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn has_pending_read(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn set_input(&mut self, value: String) {
        self.input = value;
    }

    /// Appends a line, evicting the oldest one at capacity.
    pub(crate) fn push(&mut self, content: LineContent) -> LineId {
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        let id = LineId(self.next_id);
        self.next_id += 1;
        self.lines.push_back(Line { id, content });
        id
    }

    /// Appends the prompt and the pending-input line, and parks `reply` in the read slot.
    pub(crate) fn begin_read(
        &mut self,
        prompt: StyledText,
        reply: oneshot::Sender<Option<String>>,
    ) -> Result<LineId, ConsoleError> {
        if let Some(pending) = &self.pending {
            if !pending.reply.is_closed() {
                return Err(ConsoleError::ReadPending);
            }
            // reader went away without an answer
            let line = pending.line;
            self.remove(line);
            self.pending = None;
        }

        self.push(LineContent::Output(prompt));
        let line = self.push(LineContent::PendingInput);
        self.pending = Some(PendingRead { line, reply });
        Ok(line)
    }

    /// Resolves the pending read, if any.
    ///
    /// `commit = true` hands the input value to the reader and keeps it as line content;
    /// `commit = false` removes the pending line and resolves the reader with `""`.
    /// The input scratch value is cleared either way. Returns false when nothing was pending.
    pub(crate) fn resolve(&mut self, commit: bool, run: Option<u64>, bus: &Bus) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let value = std::mem::take(&mut self.input);

        let kind = if commit {
            if let Some(line) = self.lines.iter_mut().find(|l| l.id == pending.line) {
                line.content = LineContent::Output(StyledText::from(value.as_str()));
            }
            let _ = pending.reply.send(Some(value));
            EventKind::InputSubmitted
        } else {
            self.remove(pending.line);
            let _ = pending.reply.send(None);
            EventKind::InputAbandoned
        };

        let mut ev = Event::new(kind).with_console(Self::TITLE);
        if let Some(run) = run {
            ev = ev.with_run(run);
        }
        bus.publish(ev);
        true
    }

    fn remove(&mut self, id: LineId) {
        self.lines.retain(|l| l.id != id);
    }
}

impl ConsoleKind for TextBuffer {
    type Run = TextRun;

    const TITLE: &'static str = "Console";

    fn from_config(config: &Config) -> Self {
        TextBuffer::with_capacity(config.max_lines_clamped())
    }

    fn bind(ctx: RunContext<Self>) -> TextRun {
        TextRun::new(ctx)
    }

    fn disable_clear(&self) -> bool {
        self.lines.is_empty()
    }

    fn on_stop(&mut self, _now: tokio::time::Instant, run: Option<u64>, bus: &Bus) {
        self.resolve(false, run, bus);
    }

    fn on_clear(&mut self) {
        self.lines.clear();
        self.input.clear();
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(buf: &TextBuffer) -> Vec<Option<String>> {
        buf.lines().iter().map(Line::text).collect()
    }

    #[test]
    fn test_eviction_is_fifo() {
        let mut buf = TextBuffer::with_capacity(3);
        for i in 0..5 {
            buf.push(LineContent::Output(i.to_string().into()));
        }
        assert_eq!(
            output(&buf),
            vec![Some("2".into()), Some("3".into()), Some("4".into())]
        );
    }

    #[test]
    fn test_line_ids_stay_unique_across_eviction() {
        let mut buf = TextBuffer::with_capacity(2);
        let a = buf.push(LineContent::Output("a".into()));
        let b = buf.push(LineContent::Output("b".into()));
        let c = buf.push(LineContent::Output("c".into()));
        assert!(a < b && b < c);
        assert_eq!(buf.lines().front().map(|l| l.id), Some(b));
    }

    #[tokio::test]
    async fn test_commit_replaces_pending_line() {
        let bus = Bus::new(8);
        let mut buf = TextBuffer::with_capacity(10);
        let (tx, rx) = oneshot::channel();
        buf.begin_read("Enter a number".into(), tx).unwrap();
        assert_eq!(output(&buf), vec![Some("Enter a number".into()), None]);

        buf.set_input("5".into());
        assert!(buf.resolve(true, Some(1), &bus));

        assert_eq!(rx.await.unwrap(), Some("5".to_string()));
        assert_eq!(
            output(&buf),
            vec![Some("Enter a number".into()), Some("5".into())]
        );
        assert_eq!(buf.input(), "");
        assert!(!buf.has_pending_read());
    }

    #[tokio::test]
    async fn test_abandon_removes_pending_line() {
        let bus = Bus::new(8);
        let mut rx_bus = bus.subscribe();
        let mut buf = TextBuffer::with_capacity(10);
        let (tx, rx) = oneshot::channel();
        buf.begin_read("name?".into(), tx).unwrap();
        buf.set_input("half typed".into());

        assert!(buf.resolve(false, Some(3), &bus));
        assert_eq!(rx.await.unwrap(), None);
        assert_eq!(output(&buf), vec![Some("name?".into())]);
        assert_eq!(buf.input(), "");

        let ev = rx_bus.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::InputAbandoned);
        assert_eq!(ev.run, Some(3));
    }

    #[test]
    fn test_second_read_is_refused() {
        let mut buf = TextBuffer::with_capacity(10);
        let (tx1, _rx1) = oneshot::channel();
        let (tx2, _rx2) = oneshot::channel();
        buf.begin_read("first".into(), tx1).unwrap();
        assert_eq!(
            buf.begin_read("second".into(), tx2).unwrap_err(),
            ConsoleError::ReadPending
        );
        assert_eq!(buf.lines().len(), 2);
    }

    #[test]
    fn test_resolve_without_pending_read_is_noop() {
        let bus = Bus::new(1);
        let mut buf = TextBuffer::with_capacity(4);
        buf.set_input("typed".into());
        assert!(!buf.resolve(true, None, &bus));
        assert_eq!(buf.input(), "typed");
    }
}
