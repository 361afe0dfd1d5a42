//! The XJS tokenizer - turns source text into structural tokens.
//!
//! Tokens are produced on demand; parse errors surface from the iterator's
//! `next`, never eagerly. Whitespace other than line breaks is skipped;
//! comments and breaks are tokens because the parser attributes them to
//! document nodes as trivia.

mod comments;
mod numbers;
mod strings;

use std::rc::Rc;

use crate::error::SyntaxError;
use crate::syntax::reader::CharReader;
use crate::syntax::span::Span;
use crate::syntax::token::{Token, TokenKind};

#[derive(Debug, Clone)]
pub struct Tokenizer {
    reader: CharReader,
    failed: bool,
}

impl Tokenizer {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            reader: CharReader::new(input),
            failed: false,
        }
    }

    pub(crate) fn source_rc(&self) -> Rc<str> {
        self.reader.source_rc()
    }

    /// Read the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        self.skip_blank();

        let start = self.reader.index();
        let line = self.reader.line();
        let column = self.reader.column();

        let Some(c) = self.reader.current() else {
            return Ok(None);
        };

        let kind = match c {
            '\n' => {
                self.reader.advance();
                // A break's last_line is the line it terminates.
                return Ok(Some(Token::new(
                    TokenKind::Break,
                    Span::new(start, self.reader.index(), line, line, column),
                )));
            }
            '\r' if self.reader.peek() == Some('\n') => {
                self.reader.advance();
                self.reader.advance();
                return Ok(Some(Token::new(
                    TokenKind::Break,
                    Span::new(start, self.reader.index(), line, line, column),
                )));
            }
            '/' if self.reader.peek() == Some('/') => self.read_line_comment()?,
            '/' if self.reader.peek() == Some('*') => self.read_block_comment()?,
            '#' => self.read_hash_comment()?,
            '\'' if self.reader.peek_byte() == Some(b'\'')
                && self.reader.peek2_byte() == Some(b'\'') =>
            {
                self.read_multi()?
            }
            '\'' | '"' => self.read_quoted(c)?,
            c if is_word_start(c) => {
                self.read_word_run();
                TokenKind::Word
            }
            c if c.is_ascii_digit() => self.read_number_kind(),
            '-' if self.reader.peek().is_some_and(|p| p.is_ascii_digit()) => {
                self.read_number_kind()
            }
            c => {
                self.reader.advance();
                TokenKind::Symbol(c)
            }
        };

        let span = Span::new(start, self.reader.index(), line, self.reader.line(), column);
        Ok(Some(Token::new(kind, span)))
    }

    /// Skip spaces, tabs and bare `\r`; breaks are tokens and stay put.
    fn skip_blank(&mut self) {
        self.reader.skip_line_whitespace();
    }

    /// Consume a maximal `[A-Za-z0-9_]*` run.
    pub(super) fn read_word_run(&mut self) {
        while self.reader.current().is_some_and(is_word_continue) {
            self.reader.advance();
        }
    }

    pub(super) fn reader(&mut self) -> &mut CharReader {
        &mut self.reader
    }
}

impl Iterator for Tokenizer {
    type Item = Result<Token, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

pub(super) fn is_word_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

pub(super) fn is_word_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
