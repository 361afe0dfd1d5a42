//! Parsing entry points.

pub mod implicit;
mod json;
mod trivia_sink;
mod xjs;

use crate::document::Value;
use crate::error::SyntaxError;
use crate::syntax::token::{Token, TokenKind};

/// Parse XJS text into a document value, trivia attached.
pub fn parse(input: &str) -> Result<Value, SyntaxError> {
    xjs::XjsParser::parse(input)
}

/// Parse strict JSON text. Unquoted strings, trailing commas, non-`"`
/// keys and comments are all syntax errors.
pub fn parse_json(input: &str) -> Result<Value, SyntaxError> {
    json::JsonParser::parse(input)
}

/// Describe a surplus token for an `Unexpected …` error.
pub(crate) fn unexpected_token(token: &Token, source: &str) -> SyntaxError {
    let position = token.span.position();
    match &token.kind {
        TokenKind::Symbol(c) => SyntaxError::unexpected_symbol(*c, position),
        TokenKind::Container { kind, .. } => {
            SyntaxError::unexpected_symbol(kind.opener().unwrap_or('('), position)
        }
        TokenKind::String { .. } => SyntaxError::unexpected("string", position),
        TokenKind::Number(_) => SyntaxError::unexpected("number", position),
        TokenKind::Comment { .. } => SyntaxError::unexpected("comment", position),
        TokenKind::Break => SyntaxError::unexpected("line break", position),
        TokenKind::Word => {
            SyntaxError::unexpected(format!("'{}'", token.text(source)), position)
        }
    }
}
