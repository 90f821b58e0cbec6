//! # Colors and styled text.
//!
//! [`StyledText`] is a sequence of `(text, color)` spans. The presentation layer renders
//! the spans; everywhere else it behaves like plain text through `+`, `+=` and
//! [`StyledText::plain`].
//!
//! ## Example
//! ```
//! use consolevisor::{Color, StyledText};
//!
//! let mut line = StyledText::colored("error", Color::RED) + ": ";
//! line += StyledText::from("disk full");
//! assert_eq!(line.plain(), "error: disk full");
//! assert_eq!(line.spans().len(), 2);
//! ```

use std::fmt;
use std::ops::{Add, AddAssign};

/// Color used for text spans and turtle strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The theme's primary foreground color.
    #[default]
    Primary,
    /// Explicit RGB color.
    Rgb(u8, u8, u8),
}

impl Color {
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const RED: Color = Color::Rgb(255, 59, 48);
    pub const GREEN: Color = Color::Rgb(52, 199, 89);
    pub const BLUE: Color = Color::Rgb(0, 122, 255);
    pub const YELLOW: Color = Color::Rgb(255, 204, 0);
    pub const ORANGE: Color = Color::Rgb(255, 149, 0);
    pub const PURPLE: Color = Color::Rgb(175, 82, 222);
    pub const GRAY: Color = Color::Rgb(142, 142, 147);
}

/// One run of text in a single color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub color: Color,
}

/// Text made of colored spans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    spans: Vec<Span>,
}

impl StyledText {
    /// Creates an empty text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a text with a single colored span.
    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            spans: vec![Span {
                text: text.into(),
                color,
            }],
        }
    }

    /// Returns the spans in order.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Projects to plain text.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }

    /// Appends uncolored text to the last span (or starts a primary span).
    pub fn push_str(&mut self, text: &str) {
        match self.spans.last_mut() {
            Some(last) => last.text.push_str(text),
            None => self.spans.push(Span {
                text: text.to_string(),
                color: Color::Primary,
            }),
        }
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        StyledText::colored(text, Color::Primary)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        StyledText::colored(text, Color::Primary)
    }
}

impl Add for StyledText {
    type Output = StyledText;

    fn add(mut self, rhs: StyledText) -> StyledText {
        self.spans.extend(rhs.spans);
        self
    }
}

impl Add<&str> for StyledText {
    type Output = StyledText;

    fn add(mut self, rhs: &str) -> StyledText {
        self.push_str(rhs);
        self
    }
}

impl AddAssign for StyledText {
    fn add_assign(&mut self, rhs: StyledText) {
        self.spans.extend(rhs.spans);
    }
}

impl AddAssign<&str> for StyledText {
    fn add_assign(&mut self, rhs: &str) {
        self.push_str(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_suffix_extends_last_span() {
        let text = StyledText::colored("a", Color::BLUE) + "b";
        assert_eq!(text.spans().len(), 1);
        assert_eq!(text.spans()[0].text, "ab");
        assert_eq!(text.spans()[0].color, Color::BLUE);
    }

    #[test]
    fn test_str_on_empty_starts_primary_span() {
        let mut text = StyledText::new();
        text += "x";
        assert_eq!(text.spans()[0].color, Color::Primary);
        assert_eq!(text.to_string(), "x");
    }

    #[test]
    fn test_concatenation_keeps_colors() {
        let text = StyledText::colored("1", Color::RED) + StyledText::colored("2", Color::GREEN);
        let colors: Vec<Color> = text.spans().iter().map(|s| s.color).collect();
        assert_eq!(colors, vec![Color::RED, Color::GREEN]);
        assert_eq!(text.plain(), "12");
    }
}
