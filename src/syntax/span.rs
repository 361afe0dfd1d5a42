//! Source coordinates.
//!
//! Invariants:
//! - `line` is 1-based, `column` is 0-based.
//! - Byte offsets always land on UTF-8 char boundaries of the source.

use std::fmt;

use serde::Serialize;

/// Line/column position for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Full span of a token: byte offsets plus the coordinates of its first
/// char and the line its last char lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub last_line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, last_line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            last_line,
            column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn is_multiline(&self) -> bool {
        self.last_line > self.line
    }

    /// True when `other` begins exactly where this span ends, with no
    /// whitespace between.
    pub fn touches(&self, other: &Span) -> bool {
        self.end == other.start
    }
}
