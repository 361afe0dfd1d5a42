//! Structural tokens produced by the tokenizer.
//!
//! String and comment tokens own their parsed bodies; every other token is
//! a pure span over the shared source text. Container tokens share their
//! children behind `Rc` so cursors over nested containers stay cheap.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::syntax::span::Span;

/// Quoting style of a string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StringKind {
    /// `'…'`
    Single,
    /// `"…"`
    Double,
    /// `'''…'''`
    Multi,
    /// Unquoted.
    Implicit,
}

/// Comment delimiter style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentStyle {
    /// `//`
    Line,
    /// `///`
    LineDoc,
    /// `#`
    Hash,
    /// `/* */`
    Block,
    /// `/** */`
    MultilineDoc,
}

impl CommentStyle {
    pub fn opener(&self) -> &'static str {
        match self {
            CommentStyle::Line => "//",
            CommentStyle::LineDoc => "///",
            CommentStyle::Hash => "#",
            CommentStyle::Block => "/*",
            CommentStyle::MultilineDoc => "/**",
        }
    }

    pub fn closer(&self) -> Option<&'static str> {
        match self {
            CommentStyle::Block | CommentStyle::MultilineDoc => Some("*/"),
            _ => None,
        }
    }

    /// Line-oriented styles terminate at the end of the line; only the
    /// block styles can render a multi-line body inline.
    pub fn is_line(&self) -> bool {
        self.closer().is_none()
    }
}

/// Grouping of a container token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContainerKind {
    /// The outermost wrapper spanning the whole input.
    Open,
    /// `{…}`
    Braces,
    /// `[…]`
    Brackets,
    /// `(…)`
    Parentheses,
}

impl ContainerKind {
    pub fn opener(&self) -> Option<char> {
        match self {
            ContainerKind::Open => None,
            ContainerKind::Braces => Some('{'),
            ContainerKind::Brackets => Some('['),
            ContainerKind::Parentheses => Some('('),
        }
    }

    pub fn closer(&self) -> Option<char> {
        match self {
            ContainerKind::Open => None,
            ContainerKind::Braces => Some('}'),
            ContainerKind::Brackets => Some(']'),
            ContainerKind::Parentheses => Some(')'),
        }
    }

    pub(crate) fn for_opener(symbol: char) -> Option<Self> {
        match symbol {
            '{' => Some(ContainerKind::Braces),
            '[' => Some(ContainerKind::Brackets),
            '(' => Some(ContainerKind::Parentheses),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `[A-Za-z_][A-Za-z0-9_]*`, or a numeric run that degraded.
    Word,
    Number(f64),
    /// One token per non-word, non-whitespace char.
    Symbol(char),
    /// Parsed body; delimiters stripped, escapes resolved.
    String { kind: StringKind, text: String },
    /// Body without delimiters, line endings normalized to `\n`.
    Comment { style: CommentStyle, text: String },
    /// `\n` or `\r\n`.
    Break,
    Container {
        kind: ContainerKind,
        children: Rc<[Token]>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The raw source text under this token's span.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source
            .get(self.span.start..self.span.end)
            .unwrap_or_else(|| {
                panic!(
                    "invalid token span {}..{} for source len {}",
                    self.span.start,
                    self.span.end,
                    source.len()
                )
            })
    }

    pub fn is_symbol(&self, symbol: char) -> bool {
        matches!(self.kind, TokenKind::Symbol(c) if c == symbol)
    }

    pub fn is_any_symbol(&self) -> bool {
        matches!(self.kind, TokenKind::Symbol(_))
    }

    pub fn is_break(&self) -> bool {
        matches!(self.kind, TokenKind::Break)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::Comment { .. })
    }

    pub fn is_trivia(&self) -> bool {
        self.is_break() || self.is_comment()
    }

    pub fn is_number(&self) -> bool {
        matches!(self.kind, TokenKind::Number(_))
    }

    pub fn container_kind(&self) -> Option<ContainerKind> {
        match &self.kind {
            TokenKind::Container { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&Rc<[Token]>> {
        match &self.kind {
            TokenKind::Container { children, .. } => Some(children),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Word => write!(f, "Word({})", self.span.position()),
            TokenKind::Number(value) => write!(f, "Number({}, {})", value, self.span.position()),
            TokenKind::Symbol(c) => write!(f, "Symbol({:?}, {})", c, self.span.position()),
            TokenKind::String { kind, text } => {
                write!(f, "String({:?}, {:?}, {})", kind, text, self.span.position())
            }
            TokenKind::Comment { style, text } => {
                write!(f, "Comment({:?}, {:?}, {})", style, text, self.span.position())
            }
            TokenKind::Break => write!(f, "Break({})", self.span.position()),
            TokenKind::Container { kind, children } => {
                write!(
                    f,
                    "{:?}[{} tokens]({})",
                    kind,
                    children.len(),
                    self.span.position()
                )
            }
        }
    }
}
