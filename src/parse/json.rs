//! The strict JSON parser.
//!
//! Runs over the same containerized token stream as the XJS parser but
//! accepts only standard JSON: double-quoted keys and strings, mandatory
//! commas, no trailing commas, no comments, no implicit text. Breaks are
//! plain whitespace with no delimiter meaning.

use std::mem;

use crate::document::{Array, Object, Value};
use crate::error::SyntaxError;
use crate::parse::trivia_sink::{self, StrictSink};
use crate::parse::unexpected_token;
use crate::syntax::stream::{TokenCursor, TokenStream};
use crate::syntax::token::{ContainerKind, StringKind, Token, TokenKind};

pub(crate) struct JsonParser {
    cursor: TokenCursor,
}

impl JsonParser {
    pub(crate) fn parse(input: &str) -> Result<Value, SyntaxError> {
        let stream = TokenStream::containerize(input)?;
        let mut parser = Self {
            cursor: stream.cursor(),
        };

        parser.skip_whitespace()?;
        let value = parser.read_value()?;
        parser.skip_whitespace()?;
        parser.expect_end()?;
        Ok(value)
    }

    fn read_value(&mut self) -> Result<Value, SyntaxError> {
        let Some(token) = self.cursor.current().cloned() else {
            return Err(SyntaxError::expected("value", self.cursor.close_position()));
        };

        match &token.kind {
            TokenKind::Container {
                kind: ContainerKind::Braces,
                ..
            } => self.read_object(&token),
            TokenKind::Container {
                kind: ContainerKind::Brackets,
                ..
            } => self.read_array(&token),
            TokenKind::Number(value) => {
                self.cursor.advance();
                Ok(Value::number(*value))
            }
            TokenKind::String {
                kind: StringKind::Double,
                text,
            } => {
                self.cursor.advance();
                Ok(Value::string(text.as_str()))
            }
            TokenKind::String { .. } => {
                Err(SyntaxError::unexpected("string", token.span.position()))
            }
            TokenKind::Word => {
                let text = token.text(self.cursor.source()).to_string();
                match text.as_str() {
                    "true" => {
                        self.cursor.advance();
                        Ok(Value::bool_value(true))
                    }
                    "false" => {
                        self.cursor.advance();
                        Ok(Value::bool_value(false))
                    }
                    "null" => {
                        self.cursor.advance();
                        Ok(Value::null())
                    }
                    _ => Err(SyntaxError::unexpected(
                        format!("'{}'", text),
                        token.span.position(),
                    )),
                }
            }
            // A bare minus never formed a number token.
            TokenKind::Symbol('-') => Err(SyntaxError::digit_expected(token.span.position())),
            TokenKind::Symbol(c) => Err(SyntaxError::unexpected_symbol(*c, token.span.position())),
            TokenKind::Container { kind, .. } => Err(SyntaxError::unexpected_symbol(
                kind.opener().unwrap_or('('),
                token.span.position(),
            )),
            TokenKind::Break | TokenKind::Comment { .. } => {
                Err(unexpected_token(&token, self.cursor.source()))
            }
        }
    }

    fn read_object(&mut self, container: &Token) -> Result<Value, SyntaxError> {
        let parent = self.enter(container);
        let mut object = Object::new();

        self.skip_whitespace()?;
        while !self.cursor.at_end() {
            let key = self.read_key()?;
            self.skip_whitespace()?;
            self.expect_symbol(':')?;
            self.skip_whitespace()?;
            let value = self.read_value()?;
            object.add(key, value);

            if !self.read_separator('}')? {
                break;
            }
        }

        self.exit(parent);
        Ok(Value::from(object))
    }

    fn read_array(&mut self, container: &Token) -> Result<Value, SyntaxError> {
        let parent = self.enter(container);
        let mut array = Array::new();

        self.skip_whitespace()?;
        while !self.cursor.at_end() {
            let value = self.read_value()?;
            array.add(value);

            if !self.read_separator(']')? {
                break;
            }
        }

        self.exit(parent);
        Ok(Value::from(array))
    }

    /// After a member: either the container ends, or a comma introduces
    /// the next member. A comma followed by the closer is the trailing
    /// comma JSON forbids.
    fn read_separator(&mut self, closer: char) -> Result<bool, SyntaxError> {
        self.skip_whitespace()?;
        if self.cursor.at_end() {
            return Ok(false);
        }

        self.expect_symbol(',')?;
        self.skip_whitespace()?;
        if self.cursor.at_end() {
            return Err(SyntaxError::unexpected_symbol(
                closer,
                self.cursor.close_position(),
            ));
        }
        Ok(true)
    }

    fn read_key(&mut self) -> Result<String, SyntaxError> {
        let Some(token) = self.cursor.current() else {
            return Err(SyntaxError::expected("string", self.cursor.close_position()));
        };

        match &token.kind {
            TokenKind::String {
                kind: StringKind::Double,
                text,
            } => {
                let key = text.clone();
                self.cursor.advance();
                Ok(key)
            }
            _ => Err(SyntaxError::expected("string", token.span.position())),
        }
    }

    fn enter(&mut self, container: &Token) -> TokenCursor {
        let child = self.cursor.enter(container);
        mem::replace(&mut self.cursor, child)
    }

    fn exit(&mut self, parent: TokenCursor) {
        self.cursor = parent;
        self.cursor.advance();
    }

    fn skip_whitespace(&mut self) -> Result<(), SyntaxError> {
        trivia_sink::read_whitespace(&mut self.cursor, &mut StrictSink)
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), SyntaxError> {
        match self.cursor.current() {
            Some(token) if token.is_symbol(symbol) => {
                self.cursor.advance();
                Ok(())
            }
            Some(token) => Err(SyntaxError::expected_symbol(symbol, token.span.position())),
            None => Err(SyntaxError::expected_symbol(
                symbol,
                self.cursor.close_position(),
            )),
        }
    }

    fn expect_end(&mut self) -> Result<(), SyntaxError> {
        match self.cursor.current() {
            None => Ok(()),
            Some(token) => Err(unexpected_token(token, self.cursor.source())),
        }
    }
}
