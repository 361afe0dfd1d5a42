//! Containerized token streams.
//!
//! A single pass with an explicit stack groups `{…}`, `[…]` and `(…)` runs
//! into container tokens; the outermost wrapper is an OPEN container
//! spanning the whole input. Cursors iterate a container's children with
//! arbitrary lookahead (and lookbehind over what was already produced);
//! skipping past the end is a no-op that marks EOF.

use std::rc::Rc;

use crate::error::SyntaxError;
use crate::syntax::span::{Position, Span};
use crate::syntax::token::{ContainerKind, Token, TokenKind};
use crate::syntax::tokenizer::Tokenizer;

#[derive(Debug, Clone)]
pub struct TokenStream {
    source: Rc<str>,
    root: Token,
}

struct Frame {
    kind: ContainerKind,
    start: usize,
    line: usize,
    column: usize,
    opener_position: Position,
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Tokenize and group the whole input.
    pub fn containerize(input: impl Into<String>) -> Result<Self, SyntaxError> {
        let mut tokenizer = Tokenizer::new(input);
        let source = tokenizer.source_rc();

        let mut stack: Vec<Frame> = vec![Frame {
            kind: ContainerKind::Open,
            start: 0,
            line: 1,
            column: 0,
            opener_position: Position::new(1, 0),
            tokens: Vec::new(),
        }];
        let mut last_line = 1;

        for token in tokenizer.by_ref() {
            let token = token?;
            last_line = token.span.last_line;

            match token.kind {
                TokenKind::Symbol(c) if ContainerKind::for_opener(c).is_some() => {
                    stack.push(Frame {
                        kind: ContainerKind::for_opener(c).unwrap_or(ContainerKind::Open),
                        start: token.span.start,
                        line: token.span.line,
                        column: token.span.column,
                        opener_position: token.span.position(),
                        tokens: Vec::new(),
                    });
                }
                TokenKind::Symbol(c) if matches!(c, '}' | ']' | ')') => {
                    let matched = stack.len() > 1
                        && stack.last().is_some_and(|f| f.kind.closer() == Some(c));
                    if !matched {
                        return Err(SyntaxError::unexpected_symbol(c, token.span.position()));
                    }

                    let frame = stack.pop().unwrap_or_else(|| unreachable!());
                    let container = Token::new(
                        TokenKind::Container {
                            kind: frame.kind,
                            children: frame.tokens.into(),
                        },
                        Span::new(
                            frame.start,
                            token.span.end,
                            frame.line,
                            token.span.last_line,
                            frame.column,
                        ),
                    );
                    if let Some(parent) = stack.last_mut() {
                        parent.tokens.push(container);
                    }
                }
                _ => {
                    if let Some(frame) = stack.last_mut() {
                        frame.tokens.push(token);
                    }
                }
            }
        }

        if stack.len() > 1 {
            // Report the innermost unmatched opener.
            let frame = stack.pop().unwrap_or_else(|| unreachable!());
            let closer = frame.kind.closer().unwrap_or(')');
            return Err(SyntaxError::expected_symbol(closer, frame.opener_position));
        }

        let frame = stack.pop().unwrap_or_else(|| unreachable!());
        let root = Token::new(
            TokenKind::Container {
                kind: ContainerKind::Open,
                children: frame.tokens.into(),
            },
            Span::new(0, source.len(), 1, last_line, 0),
        );

        Ok(Self { source, root })
    }

    pub fn source(&self) -> &Rc<str> {
        &self.source
    }

    pub fn root(&self) -> &Token {
        &self.root
    }

    pub fn cursor(&self) -> TokenCursor {
        TokenCursor::over(&self.root, Rc::clone(&self.source))
    }
}

impl Token {
    /// Find the first SYMBOL child equal to `symbol`. With `exact`, a
    /// match adjacent to another symbol is rejected, which distinguishes
    /// a standalone `:` from part of a compound like `::`.
    pub fn lookup(&self, symbol: char, exact: bool) -> Option<usize> {
        let children = self.children()?;

        for (i, token) in children.iter().enumerate() {
            if !token.is_symbol(symbol) {
                continue;
            }
            if exact {
                let before = i
                    .checked_sub(1)
                    .and_then(|j| children.get(j))
                    .is_some_and(|prev| prev.is_any_symbol() && prev.span.touches(&token.span));
                let after = children
                    .get(i + 1)
                    .is_some_and(|next| next.is_any_symbol() && token.span.touches(&next.span));
                if before || after {
                    continue;
                }
            }
            return Some(i);
        }
        None
    }
}

/// An indexed cursor over one container's children.
#[derive(Debug, Clone)]
pub struct TokenCursor {
    source: Rc<str>,
    kind: ContainerKind,
    span: Span,
    tokens: Rc<[Token]>,
    index: usize,
}

impl TokenCursor {
    /// Panics if `container` is not a container token; callers dispatch on
    /// `container_kind()` first.
    pub fn over(container: &Token, source: Rc<str>) -> Self {
        let kind = container
            .container_kind()
            .unwrap_or_else(|| panic!("cursor over non-container token {}", container));
        let children = container
            .children()
            .map(Rc::clone)
            .unwrap_or_else(|| unreachable!());

        Self {
            source,
            kind,
            span: container.span,
            tokens: children,
            index: 0,
        }
    }

    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Relative lookahead: 0 is current, 1 the next token, -1 the one
    /// before it.
    pub fn peek_n(&self, offset: isize) -> Option<&Token> {
        let idx = self.index.checked_add_signed(offset)?;
        self.tokens.get(idx)
    }

    pub fn advance(&mut self) {
        self.skip(1);
    }

    pub fn skip(&mut self, count: usize) {
        self.index = self
            .index
            .saturating_add(count)
            .min(self.tokens.len());
    }

    pub fn skip_to(&mut self, index: usize) {
        self.index = index.min(self.tokens.len());
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn container_kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn container_span(&self) -> Span {
        self.span
    }

    pub fn source(&self) -> &Rc<str> {
        &self.source
    }

    /// Slice the original source text by byte offsets.
    pub fn get_text(&self, start: usize, end: usize) -> &str {
        self.source.get(start..end).unwrap_or_else(|| {
            panic!(
                "invalid text slice {}..{} for source len {}",
                start,
                end,
                self.source.len()
            )
        })
    }

    /// Position of the container's closer (or end of input for the OPEN
    /// container). Used for errors at end-of-container.
    pub fn close_position(&self) -> Position {
        let idx = match self.kind {
            ContainerKind::Open => self.span.end,
            _ => self.span.end.saturating_sub(1),
        };
        position_at(&self.source, idx)
    }

    /// Enter a nested container at the current token.
    pub fn enter(&self, container: &Token) -> TokenCursor {
        TokenCursor::over(container, Rc::clone(&self.source))
    }
}

/// Recompute a line/column pair from a byte offset. Error paths only.
pub(crate) fn position_at(source: &str, byte_idx: usize) -> Position {
    let idx = byte_idx.min(source.len());
    let before = &source[..idx];
    let line = 1 + before.matches('\n').count();
    let column = before
        .rfind('\n')
        .map_or_else(|| before.chars().count(), |nl| before[nl + 1..].chars().count());
    Position::new(line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containerizes_nested_groups() {
        let stream = TokenStream::containerize("a: [1, {b: 2}]").unwrap();
        let root = stream.root();
        assert_eq!(root.container_kind(), Some(ContainerKind::Open));

        let children = root.children().unwrap();
        let brackets = children
            .iter()
            .find(|t| t.container_kind() == Some(ContainerKind::Brackets))
            .expect("brackets container");
        let inner = brackets.children().unwrap();
        assert!(
            inner
                .iter()
                .any(|t| t.container_kind() == Some(ContainerKind::Braces))
        );
    }

    #[test]
    fn unmatched_opener_reports_expected_closer() {
        let err = TokenStream::containerize("k:(").unwrap_err();
        assert_eq!(err.message, "Expected ')'");
    }

    #[test]
    fn unmatched_closer_reports_unexpected() {
        let err = TokenStream::containerize("a: 1]").unwrap_err();
        assert_eq!(err.message, "Unexpected ']'");
    }

    #[test]
    fn lookup_exact_skips_compound_symbols() {
        let stream = TokenStream::containerize("a::b, c: 1").unwrap();
        let root = stream.root();

        let idx = root.lookup(':', true).expect("standalone colon");
        let children = root.children().unwrap();
        // The exact match is the colon after `c`, not part of `::`.
        assert!(children[idx - 1].is_break() || !children[idx - 1].is_any_symbol());

        let first = root.lookup(':', false).expect("any colon");
        assert!(first < idx);
    }

    #[test]
    fn cursor_peeks_without_advancing() {
        let stream = TokenStream::containerize("a b c").unwrap();
        let mut cursor = stream.cursor();

        assert_eq!(cursor.index(), 0);
        assert!(cursor.peek_n(2).is_some());
        assert_eq!(cursor.index(), 0);

        cursor.skip(5);
        assert!(cursor.at_end());
        cursor.advance();
        assert!(cursor.at_end());
    }

    #[test]
    fn position_at_counts_lines_and_columns() {
        let pos = position_at("ab\ncd", 4);
        assert_eq!((pos.line, pos.column), (2, 1));
    }
}
