//! # Text console.
//!
//! A bounded log of output lines plus a pending-read protocol. The routine gets a
//! [`TextRun`]; the presentation layer uses the `Console<TextBuffer>` methods.
//!
//! ```text
//! routine ── read(prompt) ──► [prompt][PendingInput] ── waits ─┐
//!                                                              │
//! input widget ── set_input("5") ── submit_input(true) ────────┤──► "5"
//! stop() ──────────────────────── (abandon, line removed) ─────┘──► ""
//! ```

mod buffer;
mod console;
mod run;

pub use buffer::{Line, LineContent, LineId, TextBuffer};
pub use run::TextRun;
