//! The trivia seam between the two parsers.
//!
//! Both parsers drive the same whitespace loop over BREAK and COMMENT
//! tokens; what differs is where the trivia goes. XJS buffers it for
//! attribution, strict JSON treats breaks as plain whitespace and
//! rejects comments outright.

use crate::document::comment::{Comment, CommentData};
use crate::error::SyntaxError;
use crate::syntax::span::Span;
use crate::syntax::stream::TokenCursor;
use crate::syntax::token::{CommentStyle, TokenKind};

pub(crate) trait TriviaSink {
    fn on_break(&mut self);

    fn on_comment(
        &mut self,
        style: CommentStyle,
        text: String,
        span: &Span,
    ) -> Result<(), SyntaxError>;
}

/// Peek across BREAK and COMMENT tokens, feeding them to the sink; never
/// advances past a non-trivia token.
pub(crate) fn read_whitespace(
    cursor: &mut TokenCursor,
    sink: &mut impl TriviaSink,
) -> Result<(), SyntaxError> {
    loop {
        enum Step {
            Break,
            Comment(CommentStyle, String, Span),
        }

        let step = match cursor.current() {
            Some(token) if token.is_break() => Step::Break,
            Some(token) => match &token.kind {
                TokenKind::Comment { style, text } => {
                    Step::Comment(*style, text.clone(), token.span)
                }
                _ => return Ok(()),
            },
            None => return Ok(()),
        };

        cursor.advance();
        match step {
            Step::Break => sink.on_break(),
            Step::Comment(style, text, span) => sink.on_comment(style, text, &span)?,
        }
    }
}

/// Comment-buffering sink for the XJS parser.
///
/// A break lands in `lines_skipped` until the first comment arrives;
/// afterwards breaks belong to the buffer so comment groups keep their
/// internal blank lines.
#[derive(Debug, Default)]
pub(crate) struct CommentSink {
    pub(crate) buffer: CommentData,
    pub(crate) lines_skipped: i32,
}

impl CommentSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Move `lines_skipped` out, resetting it.
    pub(crate) fn take_lines_skipped(&mut self) -> i32 {
        std::mem::replace(&mut self.lines_skipped, 0)
    }
}

impl TriviaSink for CommentSink {
    fn on_break(&mut self) {
        if self.buffer.is_empty() {
            self.lines_skipped += 1;
        } else {
            self.buffer.append_lines(1);
        }
    }

    fn on_comment(
        &mut self,
        style: CommentStyle,
        text: String,
        _span: &Span,
    ) -> Result<(), SyntaxError> {
        self.buffer.append_comment(Comment::new(style, text));
        Ok(())
    }
}

/// Strict sink for the JSON parser: breaks are whitespace, comments are
/// syntax errors.
#[derive(Debug, Default)]
pub(crate) struct StrictSink;

impl TriviaSink for StrictSink {
    fn on_break(&mut self) {}

    fn on_comment(
        &mut self,
        _style: CommentStyle,
        _text: String,
        span: &Span,
    ) -> Result<(), SyntaxError> {
        Err(SyntaxError::unexpected("comment", span.position()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::stream::TokenStream;

    #[test]
    fn comment_sink_partitions_breaks() {
        let mut sink = CommentSink::new();
        sink.on_break();
        sink.on_break();
        assert_eq!(sink.lines_skipped, 2);

        sink.on_comment(CommentStyle::Line, "c".into(), &Span::new(0, 0, 1, 1, 0))
            .unwrap();
        sink.on_break();
        assert_eq!(sink.lines_skipped, 2);
        assert!(sink.buffer.ends_with_newline());
    }

    #[test]
    fn strict_sink_rejects_comments() {
        let stream = TokenStream::containerize("\n// nope\n1").unwrap();
        let mut cursor = stream.cursor();
        let err = read_whitespace(&mut cursor, &mut StrictSink).unwrap_err();
        assert_eq!(err.message, "Unexpected comment");
    }
}
