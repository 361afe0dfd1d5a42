//! Syntax errors reported by the readers and parsers.
//!
//! There is exactly one fatal error kind. An error aborts the parse; no
//! partial document is ever returned.

use std::fmt;
use std::fmt::Write as _;

use serde::Serialize;

use crate::syntax::span::Position;

/// A fatal parse error with the source position where it was detected.
///
/// `line` is 1-based, `column` is 0-based, both counted per decoded char.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            line: position.line,
            column: position.column,
            message: message.into(),
        }
    }

    /// A required symbol was absent, e.g. `Expected ':'`.
    pub fn expected_symbol(symbol: char, position: Position) -> Self {
        Self::new(format!("Expected '{}'", symbol), position)
    }

    /// A required substring or token class was absent, e.g. `Expected string`.
    pub fn expected(what: impl fmt::Display, position: Position) -> Self {
        Self::new(format!("Expected {}", what), position)
    }

    /// Surplus or illegal content, e.g. `Unexpected ']'`.
    pub fn unexpected_symbol(symbol: char, position: Position) -> Self {
        Self::new(format!("Unexpected '{}'", symbol), position)
    }

    pub fn unexpected(what: impl fmt::Display, position: Position) -> Self {
        Self::new(format!("Unexpected {}", what), position)
    }

    /// EOF in the middle of a construct, e.g. `Unterminated string`.
    pub fn unterminated(what: &str, position: Position) -> Self {
        Self::new(format!("Unterminated {}", what), position)
    }

    pub fn invalid_escape(position: Position) -> Self {
        Self::new("Invalid escape sequence", position)
    }

    pub fn invalid_hex(position: Position) -> Self {
        Self::new("Invalid hex digit", position)
    }

    pub fn digit_expected(position: Position) -> Self {
        Self::new("Digit expected", position)
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Render the error with an arrowed location and, when the source is
    /// available, the offending line under a pipe gutter with a caret.
    ///
    /// The column is char-indexed, so the caret pad is built from the
    /// line's own chars up to the column; tabs are copied through so the
    /// caret stays aligned however wide the terminal renders them.
    pub fn render(&self, source: Option<&str>, file: Option<&str>) -> String {
        let mut out = String::new();
        let _ = write!(out, "syntax error: {}", self.message);

        match file {
            Some(file) => {
                let _ = write!(out, "\n --> {}:{}:{}", file, self.line, self.column);
            }
            None => {
                let _ = write!(out, "\n --> {}:{}", self.line, self.column);
            }
        }

        let Some(line_text) = source.and_then(|src| source_line(src, self.line)) else {
            return out;
        };

        let number = self.line.to_string();
        let gutter = " ".repeat(number.len());
        let caret_pad: String = line_text
            .chars()
            .take(self.column)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();

        let _ = write!(out, "\n{gutter} |");
        let _ = write!(out, "\n{number} | {line_text}");
        let _ = write!(out, "\n{gutter} | {caret_pad}^");
        out
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.message, self.line, self.column)
    }
}

impl std::error::Error for SyntaxError {}

/// The 1-based line of `source`, with any `\r` of a CRLF ending dropped
/// so the excerpt never carries a stray carriage return.
fn source_line(source: &str, line: usize) -> Option<&str> {
    source
        .split('\n')
        .nth(line.checked_sub(1)?)
        .map(|text| text.strip_suffix('\r').unwrap_or(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let err = SyntaxError::expected_symbol(':', Position::new(3, 7));
        assert_eq!(err.to_string(), "Expected ':' at 3:7");
    }

    #[test]
    fn render_excerpts_the_line_with_a_caret() {
        let source = "a: 1\nb c\n";
        let err = SyntaxError::expected_symbol(':', Position::new(2, 2));
        let rendered = err.render(Some(source), Some("test.xjs"));

        assert_eq!(
            rendered,
            "syntax error: Expected ':'\n\
             \x20--> test.xjs:2:2\n\
             \x20 |\n\
             2 | b c\n\
             \x20 |   ^"
        );
    }

    #[test]
    fn render_copies_tabs_into_the_caret_pad() {
        let source = "\tkey value";
        let err = SyntaxError::unexpected_symbol('v', Position::new(1, 4));
        let rendered = err.render(Some(source), None);

        assert_eq!(rendered.lines().last(), Some("  | \t   ^"));
    }

    #[test]
    fn render_strips_the_cr_of_crlf_excerpts() {
        let source = "a: 1\r\nb: ?\r\n";
        let err = SyntaxError::unexpected_symbol('?', Position::new(2, 3));
        let rendered = err.render(Some(source), None);

        assert!(rendered.contains("2 | b: ?\n"));
        assert!(!rendered.contains('\r'));
    }

    #[test]
    fn render_without_source_ends_at_the_location() {
        let err = SyntaxError::unterminated("string", Position::new(1, 0));
        let rendered = err.render(None, None);

        assert_eq!(rendered, "syntax error: Unterminated string\n --> 1:0");
    }
}
