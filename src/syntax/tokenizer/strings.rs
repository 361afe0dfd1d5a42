//! Quoted string scanning ('…', "…", '''…''') and escape handling.

use crate::error::SyntaxError;
use crate::syntax::token::{StringKind, TokenKind};

use super::Tokenizer;

impl Tokenizer {
    /// Entry: current is the opening `'` or `"`.
    /// Single-line strings cannot contain a raw newline.
    pub(super) fn read_quoted(&mut self, quote: char) -> Result<TokenKind, SyntaxError> {
        let opener_position = self.reader().position();
        self.reader().advance();

        let mut text = String::new();
        loop {
            match self.reader().current() {
                None | Some('\n') => {
                    return Err(SyntaxError::unterminated("string", opener_position));
                }
                Some(c) if c == quote => {
                    self.reader().advance();
                    break;
                }
                Some('\\') => {
                    self.read_escape(quote, &mut text)?;
                }
                Some(c) => {
                    text.push(c);
                    self.reader().advance();
                }
            }
        }

        let kind = if quote == '\'' {
            StringKind::Single
        } else {
            StringKind::Double
        };
        Ok(TokenKind::String { kind, text })
    }

    /// Entry: current and the next two chars are `'`.
    ///
    /// The body is taken raw (no escapes). A whitespace-only opener line
    /// and closer line are dropped; every other line is dedented by at
    /// most the opener's column, so indentation relative to the opener
    /// survives the round trip.
    pub(super) fn read_multi(&mut self) -> Result<TokenKind, SyntaxError> {
        let opener_position = self.reader().position();
        let opener_column = self.reader().column();

        self.reader().advance();
        self.reader().advance();
        self.reader().advance();

        let mut raw = String::new();
        loop {
            match self.reader().current() {
                None => {
                    return Err(SyntaxError::unterminated("string", opener_position));
                }
                Some('\'')
                    if self.reader().peek_byte() == Some(b'\'')
                        && self.reader().peek2_byte() == Some(b'\'') =>
                {
                    self.reader().advance();
                    self.reader().advance();
                    self.reader().advance();
                    break;
                }
                Some(c) => {
                    raw.push(c);
                    self.reader().advance();
                }
            }
        }

        Ok(TokenKind::String {
            kind: StringKind::Multi,
            text: extract_multi_body(&raw, opener_column),
        })
    }

    fn read_escape(&mut self, quote: char, out: &mut String) -> Result<(), SyntaxError> {
        let escape_position = self.reader().position();
        self.reader().advance(); // backslash

        let Some(c) = self.reader().current() else {
            return Err(SyntaxError::invalid_escape(escape_position));
        };

        let resolved = match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{0008}',
            'f' => '\u{000C}',
            '\\' => '\\',
            '/' => '/',
            '"' => '"',
            'u' => {
                self.reader().advance();
                return self.read_unicode_escape(out);
            }
            c if c == quote => c,
            _ => return Err(SyntaxError::invalid_escape(escape_position)),
        };

        out.push(resolved);
        self.reader().advance();
        Ok(())
    }

    /// Entry: the `u` of `\uXXXX` has been consumed.
    ///
    /// Surrogate pairs combine into one scalar; a lone surrogate becomes
    /// U+FFFD, matching the reference's UTF-16 transcoding.
    fn read_unicode_escape(&mut self, out: &mut String) -> Result<(), SyntaxError> {
        let high = self.read_hex4()?;

        if (0xD800..=0xDBFF).contains(&high) {
            if self.reader().current() == Some('\\') && self.reader().peek() == Some('u') {
                self.reader().advance();
                self.reader().advance();
                let low = self.read_hex4()?;
                if (0xDC00..=0xDFFF).contains(&low) {
                    let combined =
                        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    out.push(char::from_u32(combined).unwrap_or('\u{FFFD}'));
                } else {
                    out.push('\u{FFFD}');
                    out.push(char::from_u32(low).unwrap_or('\u{FFFD}'));
                }
            } else {
                out.push('\u{FFFD}');
            }
        } else if (0xDC00..=0xDFFF).contains(&high) {
            out.push('\u{FFFD}');
        } else {
            out.push(char::from_u32(high).unwrap_or('\u{FFFD}'));
        }

        Ok(())
    }

    fn read_hex4(&mut self) -> Result<u32, SyntaxError> {
        let mut value = 0u32;
        for _ in 0..4 {
            let position = self.reader().position();
            let digit = self
                .reader()
                .current()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| SyntaxError::invalid_hex(position))?;
            value = (value << 4) | digit;
            self.reader().advance();
        }
        Ok(value)
    }
}

fn extract_multi_body(raw: &str, opener_column: usize) -> String {
    if !raw.contains('\n') {
        return raw.to_string();
    }

    let mut lines: Vec<&str> = raw.split('\n').collect();

    let last = lines.pop().unwrap_or("");
    let first = lines.remove(0);

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 2);
    if !first.trim().is_empty() {
        out.push(first.strip_suffix('\r').unwrap_or(first));
    }

    for line in lines {
        out.push(dedent_multi_line(line, opener_column));
    }

    if !last.trim().is_empty() {
        out.push(dedent_multi_line(last, opener_column));
    }

    out.join("\n")
}

/// Strip at most `opener_column` leading blanks; content indented deeper
/// than the opener keeps its extra indentation.
fn dedent_multi_line(line: &str, opener_column: usize) -> &str {
    let mut rest = line.strip_suffix('\r').unwrap_or(line);
    let mut skipped = 0;
    while skipped < opener_column {
        match rest.strip_prefix([' ', '\t']) {
            Some(stripped) => {
                rest = stripped;
                skipped += 1;
            }
            None => break,
        }
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::extract_multi_body;

    #[test]
    fn relative_indentation_survives() {
        // Raw body of the block:
        //   '''
        //   0
        //    1
        //     2
        //   '''
        // with the opener at column 2.
        let raw = "\n  0\n   1\n    2\n  ";
        assert_eq!(extract_multi_body(raw, 2), "0\n 1\n  2");
    }

    #[test]
    fn single_line_body_is_taken_raw() {
        assert_eq!(extract_multi_body(" a ", 0), " a ");
    }

    #[test]
    fn content_on_opener_line_is_kept() {
        assert_eq!(extract_multi_body("a\nb\n", 0), "a\nb");
    }
}
