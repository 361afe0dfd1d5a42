//! Byte-indexed source reader for the tokenizer.
//!
//! The cursor is a single byte offset that always sits on a UTF-8
//! boundary; token spans are byte ranges, so the implicit-text slicing
//! downstream can cut the source directly. The char under the cursor is
//! cached so the tokenizer's dispatch never re-decodes it.
//!
//! Invariants:
//! - At end of input `cursor == source.len()` and `current()` is `None`;
//!   advancing there changes nothing.
//! - Line/column count decoded chars: `\n` bumps `line` and resets
//!   `column` to 0; `\r` never counts as a line on its own.
//! - Capture segments are byte ranges of `source`; `end_capture` joins
//!   them with the paused gaps omitted.

use std::rc::Rc;

use crate::error::SyntaxError;
use crate::syntax::span::Position;

#[derive(Debug, Clone)]
pub(crate) struct CharReader {
    source: Rc<str>,
    cursor: usize,
    current: Option<char>,
    line: usize,
    column: usize,
    captured: Vec<(usize, usize)>,
    capture_start: Option<usize>,
}

impl CharReader {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        let source: Rc<str> = Rc::from(input.into());
        let current = source.chars().next();

        Self {
            source,
            cursor: 0,
            current,
            line: 1,
            column: 0,
            captured: Vec::new(),
            capture_start: None,
        }
    }

    pub(crate) fn source_rc(&self) -> Rc<str> {
        Rc::clone(&self.source)
    }

    pub(crate) fn current(&self) -> Option<char> {
        self.current
    }

    /// Consume the current char and step onto the next one. At end of
    /// input the cursor parks on the source length and stays there.
    pub(crate) fn advance(&mut self) -> Option<char> {
        let consumed = self.current?;

        self.cursor += consumed.len_utf8();
        if consumed == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }

        self.current = self.char_at(self.cursor);
        self.current
    }

    /// Look `n` chars past the cursor without moving it; `peek_n(0)` is
    /// the current char.
    pub(crate) fn peek_n(&self, n: usize) -> Option<char> {
        self.source[self.cursor..].chars().nth(n)
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.peek_n(1)
    }

    pub(crate) fn peek_byte(&self) -> Option<u8> {
        let next = self.cursor + self.current?.len_utf8();
        self.source.as_bytes().get(next).copied()
    }

    pub(crate) fn peek2_byte(&self) -> Option<u8> {
        let next = self.cursor + self.current?.len_utf8();
        self.source.as_bytes().get(next + 1).copied()
    }

    /// Consume the current char iff it equals `expected`.
    pub(crate) fn read_if(&mut self, expected: char) -> bool {
        if self.current == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current char or fail with `Expected '<c>'`.
    pub(crate) fn expect(&mut self, expected: char) -> Result<(), SyntaxError> {
        if self.read_if(expected) {
            Ok(())
        } else {
            Err(SyntaxError::expected_symbol(expected, self.position()))
        }
    }

    /// Skip spaces, tabs and bare `\r`; never crosses a `\n` or the `\r`
    /// of a `\r\n` pair.
    pub(crate) fn skip_line_whitespace(&mut self) {
        while matches!(self.current, Some(' ' | '\t'))
            || (self.current == Some('\r') && self.peek() != Some('\n'))
        {
            self.advance();
        }
    }

    /// Advance to the next `\n` (or EOF) without consuming it.
    pub(crate) fn skip_to_nl(&mut self) {
        while self.current.is_some() && self.current != Some('\n') {
            self.advance();
        }
    }

    pub(crate) fn start_capture(&mut self) {
        self.capture_start = Some(self.cursor);
    }

    pub(crate) fn pause_capture(&mut self) {
        if let Some(start) = self.capture_start.take() {
            if self.cursor > start {
                self.captured.push((start, self.cursor));
            }
        }
    }

    /// Close the capture and return everything captured since the last
    /// `end_capture`.
    pub(crate) fn end_capture(&mut self) -> String {
        self.pause_capture();

        let mut out = String::new();
        for (start, end) in self.captured.drain(..) {
            out.push_str(&self.source[start..end]);
        }
        out
    }

    pub(crate) fn index(&self) -> usize {
        self.cursor
    }

    pub(crate) fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn column(&self) -> usize {
        self.column
    }

    /// Slice the source by byte offsets. Offsets come from this reader's
    /// own cursor, so an out-of-bounds or mid-char range is a caller bug
    /// and panics via the standard str indexing.
    pub(crate) fn slice(&self, start: usize, end: usize) -> &str {
        &self.source[start..end]
    }

    fn char_at(&self, idx: usize) -> Option<char> {
        self.source.get(idx..)?.chars().next()
    }
}

#[cfg(test)]
mod tests {
    use super::CharReader;
    use crate::syntax::span::Position;

    #[test]
    fn positions_advance_per_decoded_char() {
        let mut reader = CharReader::new("é\nqr");

        let mut seen = Vec::new();
        while let Some(c) = reader.current() {
            seen.push((c, reader.position()));
            reader.advance();
        }

        // The two-byte é still occupies a single column.
        assert_eq!(
            seen,
            vec![
                ('é', Position::new(1, 0)),
                ('\n', Position::new(1, 1)),
                ('q', Position::new(2, 0)),
                ('r', Position::new(2, 1)),
            ]
        );
        assert_eq!(reader.index(), "é\nqr".len());
    }

    #[test]
    fn the_cursor_parks_at_end_of_input() {
        let mut reader = CharReader::new("ab");
        reader.advance();
        reader.advance();

        assert_eq!(reader.current(), None);
        assert_eq!(reader.index(), 2);
        assert_eq!(reader.position(), Position::new(1, 2));

        assert_eq!(reader.advance(), None);
        assert_eq!(reader.index(), 2);
        assert_eq!(reader.position(), Position::new(1, 2));
    }

    #[test]
    fn peeking_never_moves_the_cursor() {
        let reader = CharReader::new("abc");

        assert_eq!(reader.peek_n(0), Some('a'));
        assert_eq!(reader.peek(), Some('b'));
        assert_eq!(reader.peek_n(2), Some('c'));
        assert_eq!(reader.peek_n(3), None);
        assert_eq!(reader.index(), 0);
    }

    #[test]
    fn byte_peeks_follow_the_current_char_width() {
        let reader = CharReader::new("é''");

        assert_eq!(reader.peek_byte(), Some(b'\''));
        assert_eq!(reader.peek2_byte(), Some(b'\''));
    }

    #[test]
    fn capture_joins_paused_segments() {
        let mut reader = CharReader::new("ab--cd");
        reader.start_capture();
        reader.advance();
        reader.advance(); // cursor on first '-'
        reader.pause_capture();

        reader.advance();
        reader.advance(); // cursor on 'c'
        reader.start_capture();
        reader.advance();
        reader.advance(); // EOF
        assert_eq!(reader.end_capture(), "abcd");
    }

    #[test]
    fn expect_reports_missing_symbol() {
        let mut reader = CharReader::new("x");
        let err = reader.expect(':').unwrap_err();
        assert_eq!(err.message, "Expected ':'");
        assert_eq!((err.line, err.column), (1, 0));
    }

    #[test]
    fn skip_line_whitespace_stops_at_newline() {
        let mut reader = CharReader::new("  \t \nx");
        reader.skip_line_whitespace();
        assert_eq!(reader.current(), Some('\n'));
    }
}
