//! Comment scanning and body extraction.
//!
//! Bodies are stored without delimiters and with line endings normalized
//! to `\n`. Expanded block comments are dedented relative to the opener so
//! the writer can re-indent them at any level.

use crate::error::SyntaxError;
use crate::syntax::token::{CommentStyle, TokenKind};

use super::Tokenizer;

impl Tokenizer {
    /// Entry: current is `/` and peek is `/`.
    pub(super) fn read_line_comment(&mut self) -> Result<TokenKind, SyntaxError> {
        self.reader().advance();
        self.reader().advance();

        let style = if self.reader().read_if('/') {
            CommentStyle::LineDoc
        } else {
            CommentStyle::Line
        };

        Ok(self.read_to_line_end(style))
    }

    /// Entry: current is `#`.
    pub(super) fn read_hash_comment(&mut self) -> Result<TokenKind, SyntaxError> {
        self.reader().advance();
        Ok(self.read_to_line_end(CommentStyle::Hash))
    }

    /// One space after the delimiter is part of the delimiter by
    /// convention; further leading whitespace belongs to the body.
    fn read_to_line_end(&mut self, style: CommentStyle) -> TokenKind {
        self.reader().read_if(' ');

        self.reader().start_capture();
        self.reader().skip_to_nl();
        let text = self.reader().end_capture();

        TokenKind::Comment {
            style,
            text: text.trim_end().to_string(),
        }
    }

    /// Entry: current is `/` and peek is `*`. The closer is required.
    pub(super) fn read_block_comment(&mut self) -> Result<TokenKind, SyntaxError> {
        let opener_position = self.reader().position();
        let opener_column = self.reader().column();

        self.reader().advance(); // '/'
        self.reader().advance(); // '*'

        // A second star opens a doc comment unless it closes immediately
        // (the empty comment `/**/`).
        let style = if self.reader().current() == Some('*') && self.reader().peek() != Some('/') {
            self.reader().advance();
            CommentStyle::MultilineDoc
        } else {
            CommentStyle::Block
        };

        self.reader().start_capture();
        loop {
            match self.reader().current() {
                None => {
                    return Err(SyntaxError::unterminated("comment", opener_position));
                }
                Some('*') if self.reader().peek() == Some('/') => {
                    self.reader().pause_capture();
                    self.reader().advance();
                    self.reader().advance();
                    break;
                }
                Some(_) => {
                    self.reader().advance();
                }
            }
        }
        let raw = self.reader().end_capture();

        Ok(TokenKind::Comment {
            style,
            text: extract_block_body(&raw, opener_column),
        })
    }
}

/// Body extraction for `/* */` and `/** */`.
///
/// Collapsed form (no newline): trim both ends. Expanded form: drop
/// whitespace-only opener/closer lines, dedent each continuation line up
/// to the opener's column plus the conventional ` * ` gutter, and trim
/// trailing whitespace per line.
fn extract_block_body(raw: &str, opener_column: usize) -> String {
    if !raw.contains('\n') {
        return raw.trim().to_string();
    }

    let mut lines: Vec<&str> = raw.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());

    let last = lines.pop().unwrap_or("");
    let first = lines.remove(0);

    let first = first.trim();
    if !first.is_empty() {
        out.push(first);
    }

    for line in lines {
        out.push(dedent_block_line(line, opener_column));
    }

    let last = dedent_block_line(last, opener_column);
    if !last.is_empty() {
        out.push(last);
    }

    out.join("\n")
}

fn dedent_block_line(line: &str, opener_column: usize) -> &str {
    let line = line.strip_suffix('\r').unwrap_or(line);

    // Skip at most opener_column + 1 leading blanks; the star of a `/*`
    // gutter sits one column right of the opener's slash.
    let mut rest = line;
    let mut skipped = 0;
    while skipped <= opener_column {
        match rest.strip_prefix([' ', '\t']) {
            Some(stripped) => {
                rest = stripped;
                skipped += 1;
            }
            None => break,
        }
    }

    if let Some(stripped) = rest.strip_prefix('*') {
        rest = stripped.strip_prefix(' ').unwrap_or(stripped);
    }

    rest.trim_end()
}

#[cfg(test)]
mod tests {
    use super::extract_block_body;

    #[test]
    fn collapsed_body_is_trimmed() {
        assert_eq!(extract_block_body(" collapsed ", 0), "collapsed");
    }

    #[test]
    fn expanded_body_loses_gutter() {
        // Raw body of `/**\n * line1\n * line2\n*/`.
        assert_eq!(
            extract_block_body("\n * line1\n * line2\n", 0),
            "line1\nline2"
        );
    }

    #[test]
    fn expanded_body_keeps_interior_blank_lines() {
        assert_eq!(extract_block_body("\n * a\n *\n * b\n ", 0), "a\n\nb");
    }

    #[test]
    fn indented_opener_dedents_continuations() {
        // Raw body of an opener at column 2: `  /*\n   * a\n   */`.
        assert_eq!(extract_block_body("\n   * a\n   ", 2), "a");
    }
}
