//! Attributed comment data.
//!
//! A `CommentData` is an ordered run of comments interleaved with
//! blank-line counts. The parser uses one as attribution scratch space;
//! the same structure hangs off document nodes as preserved trivia.
//!
//! Invariants:
//! - Adjacent `Lines` elements are merged.
//! - Every `Lines` count is >= 1.
//! - Comment bodies hold no delimiters and use `\n` line endings.

use serde::Serialize;

use crate::syntax::token::CommentStyle;

/// Where a comment attaches relative to its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommentType {
    /// Before a value, on its own line(s).
    Header,
    /// Between a key and its value.
    Value,
    /// After a value, on the same line.
    Eol,
    /// Inside a container, after the last child.
    Interior,
    /// At the end of the document.
    Footer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub style: CommentStyle,
    pub text: String,
}

impl Comment {
    pub fn new(style: CommentStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommentElement {
    Comment(Comment),
    /// A run of newlines; `Lines(2)` is one blank line.
    Lines(u32),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentData {
    elements: Vec<CommentElement>,
}

impl CommentData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[CommentElement] {
        &self.elements
    }

    pub fn append_comment(&mut self, comment: Comment) {
        self.elements.push(CommentElement::Comment(comment));
    }

    pub fn append_lines(&mut self, lines: u32) {
        if lines == 0 {
            return;
        }
        if let Some(CommentElement::Lines(n)) = self.elements.last_mut() {
            *n += lines;
        } else {
            self.elements.push(CommentElement::Lines(lines));
        }
    }

    pub fn prepend_lines(&mut self, lines: u32) {
        if lines == 0 {
            return;
        }
        if let Some(CommentElement::Lines(n)) = self.elements.first_mut() {
            *n += lines;
        } else {
            self.elements.insert(0, CommentElement::Lines(lines));
        }
    }

    /// True iff the data ends in a line run.
    pub fn ends_with_newline(&self) -> bool {
        matches!(self.elements.last(), Some(CommentElement::Lines(_)))
    }

    /// Drop one trailing newline, removing the run when it empties.
    pub fn trim_last_newline(&mut self) {
        if let Some(CommentElement::Lines(n)) = self.elements.last_mut() {
            if *n > 1 {
                *n -= 1;
            } else {
                self.elements.pop();
            }
        }
    }

    /// Pop the trailing line run entirely, returning its count.
    pub fn take_last_lines_skipped(&mut self) -> i32 {
        if let Some(CommentElement::Lines(n)) = self.elements.last() {
            let n = *n as i32;
            self.elements.pop();
            n
        } else {
            0
        }
    }

    /// Split off everything up to and including the last blank-line gap
    /// (a run of width >= 2). Returns `None` when no such gap exists.
    ///
    /// This is how leading comments separated by a blank line are
    /// partitioned into a document header vs. the first member's header.
    pub fn take_open_header(&mut self) -> Option<CommentData> {
        let gap = self
            .elements
            .iter()
            .rposition(|e| matches!(e, CommentElement::Lines(n) if *n >= 2))?;

        let rest = self.elements.split_off(gap + 1);
        let taken = std::mem::replace(&mut self.elements, rest);
        Some(CommentData { elements: taken })
    }

    /// Total stored line count: line runs plus newlines inside bodies.
    pub fn total_lines(&self) -> u32 {
        self.elements
            .iter()
            .map(|e| match e {
                CommentElement::Lines(n) => *n,
                CommentElement::Comment(c) => c.text.matches('\n').count() as u32,
            })
            .sum()
    }

    /// The comment text alone, with line runs flattened to newlines.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for element in &self.elements {
            match element {
                CommentElement::Comment(c) => out.push_str(&c.text),
                CommentElement::Lines(n) => {
                    for _ in 0..*n {
                        out.push('\n');
                    }
                }
            }
        }
        out
    }

    /// Render every element. Comments re-wrap in their own style (or
    /// `style_override`); each line run emits its newlines followed by
    /// the indent for the next line. With `dedent_last`, the final run
    /// indents one level shallower, for data that ends at a closer.
    pub fn write_to(
        &self,
        out: &mut String,
        style_override: Option<CommentStyle>,
        indent: &str,
        level: usize,
        eol: &str,
        dedent_last: bool,
    ) {
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                CommentElement::Comment(comment) => {
                    let style = style_override.unwrap_or(comment.style);
                    write_comment(out, style, &comment.text, indent, level, eol);
                }
                CommentElement::Lines(n) => {
                    let last = i + 1 == self.elements.len();
                    let lvl = if last && dedent_last {
                        level.saturating_sub(1)
                    } else {
                        level
                    };
                    for _ in 0..*n {
                        out.push_str(eol);
                    }
                    for _ in 0..lvl {
                        out.push_str(indent);
                    }
                }
            }
        }
    }
}

/// Re-wrap one comment body in its delimiters at the given indent.
fn write_comment(
    out: &mut String,
    style: CommentStyle,
    text: &str,
    indent: &str,
    level: usize,
    eol: &str,
) {
    if style.is_line() {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                out.push_str(eol);
                for _ in 0..level {
                    out.push_str(indent);
                }
            }
            out.push_str(style.opener());
            if !line.is_empty() {
                out.push(' ');
                out.push_str(line);
            }
        }
        return;
    }

    if !text.contains('\n') {
        out.push_str(style.opener());
        if !text.is_empty() {
            out.push(' ');
            out.push_str(text);
        }
        out.push_str(" */");
        return;
    }

    out.push_str(style.opener());
    for line in text.split('\n') {
        out.push_str(eol);
        for _ in 0..level {
            out.push_str(indent);
        }
        out.push_str(" *");
        if !line.is_empty() {
            out.push(' ');
            out.push_str(line);
        }
    }
    out.push_str(eol);
    for _ in 0..level {
        out.push_str(indent);
    }
    out.push_str(" */");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> Comment {
        Comment::new(CommentStyle::Line, text)
    }

    #[test]
    fn adjacent_line_runs_merge() {
        let mut data = CommentData::new();
        data.append_lines(1);
        data.append_lines(2);
        assert_eq!(data.elements(), &[CommentElement::Lines(3)]);

        data.prepend_lines(1);
        assert_eq!(data.elements(), &[CommentElement::Lines(4)]);
    }

    #[test]
    fn take_open_header_splits_at_last_gap() {
        let mut data = CommentData::new();
        data.append_comment(line("first"));
        data.append_lines(1);
        data.append_comment(line("second"));
        data.append_lines(2);
        data.append_comment(line("third"));
        data.append_lines(2);
        data.append_comment(line("fourth"));
        data.append_lines(1);

        let header = data.take_open_header().expect("gap exists");
        assert_eq!(header.text(), "first\nsecond\n\nthird\n\n");
        assert_eq!(data.text(), "fourth\n");
    }

    #[test]
    fn take_open_header_without_gap_is_none() {
        let mut data = CommentData::new();
        data.append_comment(line("only"));
        data.append_lines(1);
        assert!(data.take_open_header().is_none());
        assert_eq!(data.text(), "only\n");
    }

    #[test]
    fn trim_last_newline_shrinks_and_removes() {
        let mut data = CommentData::new();
        data.append_comment(line("c"));
        data.append_lines(2);

        data.trim_last_newline();
        assert!(data.ends_with_newline());
        data.trim_last_newline();
        assert!(!data.ends_with_newline());
    }

    #[test]
    fn total_lines_counts_runs_and_bodies() {
        let mut data = CommentData::new();
        data.append_comment(Comment::new(CommentStyle::Block, "a\nb"));
        data.append_lines(2);
        assert_eq!(data.total_lines(), 3);
    }

    #[test]
    fn writes_line_comment_with_indent() {
        let mut data = CommentData::new();
        data.append_comment(line("hello"));
        data.append_lines(1);

        let mut out = String::new();
        data.write_to(&mut out, None, "  ", 1, "\n", false);
        assert_eq!(out, "// hello\n  ");
    }

    #[test]
    fn style_override_rewraps_every_comment() {
        let mut data = CommentData::new();
        data.append_comment(line("hello"));

        let mut out = String::new();
        data.write_to(&mut out, Some(CommentStyle::Hash), "  ", 0, "\n", false);
        assert_eq!(out, "# hello");
    }

    #[test]
    fn writes_expanded_block_comment() {
        let mut data = CommentData::new();
        data.append_comment(Comment::new(CommentStyle::MultilineDoc, "line1\nline2"));

        let mut out = String::new();
        data.write_to(&mut out, None, "  ", 0, "\n", false);
        assert_eq!(out, "/**\n * line1\n * line2\n */");
    }
}
