//! The XJS token parser.
//!
//! Drives a cursor over the containerized token stream and distributes
//! trivia to the right nodes. The `formatting` scratch accumulates line
//! counts and comments for the value currently being read; entering a
//! container saves the scratch on the stack and starts a fresh one for
//! the children.

use std::mem;

use crate::document::comment::CommentType;
use crate::document::{Array, Object, Trivia, Value};
use crate::error::SyntaxError;
use crate::parse::trivia_sink::{self, CommentSink, TriviaSink};
use crate::parse::unexpected_token;
use crate::syntax::span::{Position, Span};
use crate::syntax::stream::{TokenCursor, TokenStream};
use crate::syntax::token::{ContainerKind, TokenKind};

pub(crate) struct XjsParser {
    cursor: TokenCursor,
    stack: Vec<(TokenCursor, Trivia)>,
    formatting: Trivia,
    comments: CommentSink,
}

impl XjsParser {
    pub(crate) fn parse(input: &str) -> Result<Value, SyntaxError> {
        let stream = TokenStream::containerize(input)?;
        // A top-level standalone `:` means the document is a brace-less
        // object; anything else is a single closed value.
        let open_root = stream.root().lookup(':', true).is_some();

        let mut parser = Self {
            cursor: stream.cursor(),
            stack: Vec::new(),
            formatting: Trivia::new(),
            comments: CommentSink::new(),
        };

        if open_root {
            parser.read_open_root()
        } else {
            parser.read_closed_root()
        }
    }

    fn read_open_root(&mut self) -> Result<Value, SyntaxError> {
        let mut root = Object::new();
        let mut root_trivia = Trivia::new();

        self.read_whitespace(true)?;
        self.split_open_header(&mut root_trivia);

        loop {
            self.read_whitespace(false)?;
            if self.cursor.at_end() {
                break;
            }
            if !self.read_next_member(&mut root)? {
                self.read_whitespace(false)?;
                break;
            }
        }

        self.set_comment(CommentType::Footer);
        self.set_trailing();
        self.expect_end()?;

        let mut value = Value::from(root);
        self.take_formatting_into(&mut value);
        value.trivia_mut().apply_defaults(root_trivia);
        Ok(value)
    }

    /// Partition blank-line-separated leading comments between the root's
    /// own header and the first member's header. One newline of the
    /// separating gap is consumed as the separator itself; the rest feed
    /// the first member's `lines_above`.
    fn split_open_header(&mut self, root_trivia: &mut Trivia) {
        let Some(mut header) = self.comments.buffer.take_open_header() else {
            return;
        };
        let gap = header.take_last_lines_skipped();

        root_trivia.set_lines_above(self.comments.take_lines_skipped());
        root_trivia.set_comment(CommentType::Header, header);
        self.comments.lines_skipped = gap - 1;
    }

    fn read_closed_root(&mut self) -> Result<Value, SyntaxError> {
        self.read_whitespace(true)?;
        self.set_comment(CommentType::Header);
        self.set_above();

        let mut value = self.read_value(0)?;

        self.read_whitespace(false)?;
        let trailing = self.comments.take_lines_skipped();
        if trailing > 0 {
            self.comments.buffer.prepend_lines(trailing as u32);
        }
        self.set_comment(CommentType::Footer);
        self.expect_end()?;

        self.take_formatting_into(&mut value);
        Ok(value)
    }

    // ---- trivia accumulation ------------------------------------------

    fn read_whitespace(&mut self, reset: bool) -> Result<(), SyntaxError> {
        if reset {
            self.comments.lines_skipped = 0;
        }
        trivia_sink::read_whitespace(&mut self.cursor, &mut self.comments)
    }

    /// Consume comments only; a BREAK stays put.
    fn read_line_whitespace(&mut self) -> Result<(), SyntaxError> {
        loop {
            let comment = match self.cursor.current() {
                Some(token) => match &token.kind {
                    TokenKind::Comment { style, text } => (*style, text.clone(), token.span),
                    _ => return Ok(()),
                },
                None => return Ok(()),
            };
            self.cursor.advance();
            self.comments.on_comment(comment.0, comment.1, &comment.2)?;
        }
    }

    /// Move the comment buffer into the scratch under `comment_type`.
    ///
    /// Headers drop one trailing newline (their newline is implicit on
    /// output); EOL comments surrender their trailing newline to
    /// `lines_skipped` since they are written before it.
    fn set_comment(&mut self, comment_type: CommentType) {
        let mut data = mem::take(&mut self.comments.buffer);

        match comment_type {
            CommentType::Header => data.trim_last_newline(),
            CommentType::Eol => {
                if data.ends_with_newline() {
                    data.trim_last_newline();
                    self.comments.lines_skipped += 1;
                }
            }
            _ => {}
        }

        if !data.is_empty() {
            self.formatting.set_comment(comment_type, data);
        }
    }

    fn set_above(&mut self) {
        let lines = self.comments.take_lines_skipped();
        self.formatting.set_lines_above(lines);
    }

    fn set_between(&mut self) {
        let lines = self.comments.take_lines_skipped();
        self.formatting.set_lines_between(lines);
    }

    fn set_trailing(&mut self) {
        let lines = self.comments.take_lines_skipped();
        self.formatting.set_lines_trailing(lines);
    }

    /// Copy the scratch into `value`, overwriting only what the value
    /// left unspecified, and clear the scratch.
    fn take_formatting_into(&mut self, value: &mut Value) {
        value.trivia_mut().apply_defaults(mem::take(&mut self.formatting));
    }

    // ---- values -------------------------------------------------------

    fn read_value(&mut self, offset: usize) -> Result<Value, SyntaxError> {
        if self.cursor.at_end() || self.current_is_symbol(',') {
            // `[,,]` and trailing `key:,` hold void strings.
            return Ok(Value::implicit(""));
        }

        match self.current_container() {
            Some(ContainerKind::Braces) => self.read_object_value(),
            Some(ContainerKind::Brackets) => self.read_array_value(),
            _ => self.read_implicit(offset),
        }
    }

    fn read_object_value(&mut self) -> Result<Value, SyntaxError> {
        self.enter_container();
        let mut object = Object::new();

        self.read_whitespace(true)?;
        loop {
            self.read_whitespace(false)?;
            if self.cursor.at_end() {
                break;
            }
            if !self.read_next_member(&mut object)? {
                self.read_whitespace(false)?;
                if !self.cursor.at_end() {
                    return Err(self.unexpected_current());
                }
                break;
            }
        }

        self.finish_container(Value::from(object))
    }

    fn read_array_value(&mut self) -> Result<Value, SyntaxError> {
        self.enter_container();
        let mut array = Array::new();

        self.read_whitespace(true)?;
        loop {
            self.read_whitespace(false)?;
            if self.cursor.at_end() {
                break;
            }
            if !self.read_next_element(&mut array)? {
                self.read_whitespace(false)?;
                if !self.cursor.at_end() {
                    return Err(self.unexpected_current());
                }
                break;
            }
        }

        self.finish_container(Value::from(array))
    }

    /// Attach INTERIOR trivia, pop back to the parent cursor, step past
    /// the container token, and pick up any same-line EOL comments.
    fn finish_container(&mut self, mut value: Value) -> Result<Value, SyntaxError> {
        self.set_comment(CommentType::Interior);
        self.set_trailing();
        let interior = self.exit_container();
        value.trivia_mut().apply_defaults(interior);

        self.read_line_whitespace()?;
        self.set_comment(CommentType::Eol);
        Ok(value)
    }

    fn enter_container(&mut self) {
        let token = match self.cursor.current() {
            Some(token) => token.clone(),
            None => unreachable!("enter_container called at end of stream"),
        };
        let child = self.cursor.enter(&token);
        let parent = mem::replace(&mut self.cursor, child);
        self.stack.push((parent, mem::take(&mut self.formatting)));
    }

    fn exit_container(&mut self) -> Trivia {
        let interior = mem::take(&mut self.formatting);
        let (parent, saved) = match self.stack.pop() {
            Some(entry) => entry,
            None => unreachable!("exit_container without matching enter"),
        };
        self.cursor = parent;
        self.formatting = saved;
        self.cursor.advance();
        interior
    }

    // ---- members and elements -----------------------------------------

    fn read_next_member(&mut self, object: &mut Object) -> Result<bool, SyntaxError> {
        self.set_comment(CommentType::Header);
        self.set_above();

        let offset = self.current_column();
        let key = self.read_key()?;

        self.read_whitespace(false)?;
        self.expect_symbol(':')?;
        self.read_whitespace(false)?;

        self.set_comment(CommentType::Value);
        self.set_between();

        let mut value = self.read_value(offset)?;
        let delimited = self.read_delimiter()?;
        self.take_formatting_into(&mut value);
        object.add(key, value);
        Ok(delimited)
    }

    fn read_next_element(&mut self, array: &mut Array) -> Result<bool, SyntaxError> {
        self.set_comment(CommentType::Header);
        self.set_above();

        let offset = self.current_column();
        let mut value = self.read_value(offset)?;
        let delimited = self.read_delimiter()?;
        self.take_formatting_into(&mut value);
        array.add(value);
        Ok(delimited)
    }

    /// Optional `,`, optional BREAK, optional `,`; any of them counts.
    /// Comments on the value's line become its EOL comment.
    fn read_delimiter(&mut self) -> Result<bool, SyntaxError> {
        self.read_line_whitespace()?;
        let mut delimited = false;

        if self.current_is_symbol(',') {
            self.cursor.advance();
            delimited = true;
            self.read_line_whitespace()?;
        }

        if self.current_is_break() {
            self.cursor.advance();
            self.comments.on_break();
            self.set_comment(CommentType::Eol);
            delimited = true;

            if self.current_is_symbol(',') {
                self.cursor.advance();
            }
        }

        Ok(delimited)
    }

    // ---- keys and implicit text ---------------------------------------

    /// A quoted key is its parsed body; otherwise everything up to the
    /// first colon at this container level is sliced out of the source.
    fn read_key(&mut self) -> Result<String, SyntaxError> {
        if let Some(token) = self.cursor.current() {
            if let TokenKind::String { text, .. } = &token.kind {
                let key = text.clone();
                self.cursor.advance();
                return Ok(key);
            }
        }

        let start_index = self.cursor.index();
        let mut offset: isize = 0;
        let mut first: Option<Span> = None;
        let mut last: Option<Span> = None;

        let colon_offset = loop {
            match self.cursor.peek_n(offset) {
                None => {
                    return Err(SyntaxError::expected_symbol(
                        ':',
                        self.cursor.close_position(),
                    ));
                }
                Some(token) if token.is_symbol(':') && !self.terminator_is_escaped(offset) => {
                    break offset;
                }
                Some(token) => {
                    if !token.is_trivia() {
                        if first.is_none() {
                            first = Some(token.span);
                        }
                        last = Some(token.span);
                    }
                    offset += 1;
                }
            }
        };

        let key = match (first, last) {
            (Some(first), Some(last)) => {
                let raw = self.cursor.get_text(first.start, last.end).to_string();
                normalize_implicit(&raw, first.column)
            }
            _ => String::new(),
        };

        self.cursor.skip_to(start_index + colon_offset as usize);
        Ok(key)
    }

    /// Slice an unquoted value: everything up to a top-level `,`, an
    /// unescaped line break, or the end of the container. A lone number
    /// or `true`/`false`/`null` token promotes to its typed value.
    fn read_implicit(&mut self, offset: usize) -> Result<Value, SyntaxError> {
        if let Some(token) = self.cursor.current() {
            if let TokenKind::String { kind, text } = &token.kind {
                let value = Value::string_with(text.clone(), *kind);
                self.cursor.advance();
                return Ok(value);
            }
        }

        let start_index = self.cursor.index();
        let mut cursor_offset: isize = 0;
        let mut first: Option<Span> = None;
        let mut last: Option<(isize, Span)> = None;
        let mut content_count = 0usize;
        let mut promotion: Option<Promotion> = None;

        loop {
            let escaped_terminator = self.terminator_is_escaped(cursor_offset);
            match self.cursor.peek_n(cursor_offset) {
                None => break,
                Some(token) if token.is_symbol(',') && !escaped_terminator => break,
                Some(token) if token.is_break() && !escaped_terminator => break,
                Some(token) if token.is_comment() => {
                    cursor_offset += 1;
                }
                Some(token) => {
                    if first.is_none() {
                        first = Some(token.span);
                    }
                    last = Some((cursor_offset, token.span));
                    content_count += 1;
                    promotion = match (content_count, &token.kind) {
                        (1, TokenKind::Number(value)) => Some(Promotion::Number(*value)),
                        (1, TokenKind::Word) => Some(Promotion::Word(token.span)),
                        _ => None,
                    };
                    cursor_offset += 1;
                }
            }
        }

        let (Some(first), Some((last_offset, last_span))) = (first, last) else {
            return Ok(Value::implicit(""));
        };
        self.cursor.skip_to(start_index + last_offset as usize + 1);

        if content_count == 1 {
            match promotion {
                Some(Promotion::Number(value)) => return Ok(Value::number(value)),
                Some(Promotion::Word(span)) => {
                    match self.cursor.get_text(span.start, span.end) {
                        "true" => return Ok(Value::bool_value(true)),
                        "false" => return Ok(Value::bool_value(false)),
                        "null" => return Ok(Value::null()),
                        _ => {}
                    }
                }
                None => {}
            }
        }

        let raw = self.cursor.get_text(first.start, last_span.end).to_string();
        Ok(Value::implicit(normalize_implicit(&raw, offset)))
    }

    /// A `,` or BREAK directly preceded by a touching `\` is part of the
    /// implicit text, not a terminator.
    fn terminator_is_escaped(&self, cursor_offset: isize) -> bool {
        let Some(token) = self.cursor.peek_n(cursor_offset) else {
            return false;
        };
        let span = token.span;
        self.cursor
            .peek_n(cursor_offset - 1)
            .is_some_and(|prev| prev.is_symbol('\\') && prev.span.touches(&span))
    }

    // ---- cursor helpers -----------------------------------------------

    fn current_is_symbol(&self, symbol: char) -> bool {
        self.cursor.current().is_some_and(|t| t.is_symbol(symbol))
    }

    fn current_is_break(&self) -> bool {
        self.cursor.current().is_some_and(|t| t.is_break())
    }

    fn current_container(&self) -> Option<ContainerKind> {
        self.cursor.current().and_then(|t| t.container_kind())
    }

    fn current_column(&self) -> usize {
        self.cursor.current().map_or(0, |t| t.span.column)
    }

    fn current_position(&self) -> Position {
        self.cursor
            .current()
            .map_or_else(|| self.cursor.close_position(), |t| t.span.position())
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), SyntaxError> {
        if self.current_is_symbol(symbol) {
            self.cursor.advance();
            Ok(())
        } else {
            Err(SyntaxError::expected_symbol(symbol, self.current_position()))
        }
    }

    fn expect_end(&mut self) -> Result<(), SyntaxError> {
        if self.cursor.at_end() {
            Ok(())
        } else {
            Err(self.unexpected_current())
        }
    }

    fn unexpected_current(&self) -> SyntaxError {
        match self.cursor.current() {
            Some(token) => unexpected_token(token, self.cursor.source()),
            None => SyntaxError::unexpected("end of input", self.cursor.close_position()),
        }
    }
}

enum Promotion {
    Number(f64),
    Word(Span),
}

/// Join a multi-line implicit slice: continuation lines lose at most
/// `offset` leading blanks, and an escaping `\` before a break or
/// punctuation is dropped.
fn normalize_implicit(raw: &str, offset: usize) -> String {
    let joined = if raw.contains('\n') {
        let mut lines = raw.split('\n');
        let mut out = String::with_capacity(raw.len());
        if let Some(head) = lines.next() {
            out.push_str(head.strip_suffix('\r').unwrap_or(head));
        }
        for line in lines {
            out.push('\n');
            out.push_str(dedent_to(line.strip_suffix('\r').unwrap_or(line), offset));
        }
        out
    } else {
        raw.to_string()
    };

    drop_implicit_escapes(&joined)
}

fn dedent_to(line: &str, offset: usize) -> &str {
    let mut rest = line;
    let mut skipped = 0;
    while skipped < offset {
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

fn drop_implicit_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && matches!(chars.peek(), Some('\n' | '}' | ']' | ')' | ':' | ','))
        {
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_dedents_continuation_lines() {
        assert_eq!(normalize_implicit("(\n  1\n  2\n)", 2), "(\n1\n2\n)");
        assert_eq!(normalize_implicit("(\n    1\n)", 2), "(\n  1\n)");
    }

    #[test]
    fn normalize_drops_punctuation_escapes() {
        assert_eq!(normalize_implicit(r"a\,b", 0), "a,b");
        assert_eq!(normalize_implicit("a\\\nb", 0), "a\nb");
        assert_eq!(normalize_implicit(r"a\\b", 0), r"a\\b");
        assert_eq!(normalize_implicit(r"a\db", 0), r"a\db");
    }
}
