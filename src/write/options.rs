//! Writer configuration.

use crate::context;

/// Formatting options for the XJS and JSON writers.
///
/// Line counts are newline counts: a spacing of 1 puts siblings on
/// consecutive lines, 2 leaves one blank line between them.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// When false, everything lands on a single line with no comments.
    pub format: bool,
    pub indent: String,
    pub eol: String,
    /// Emitted after `:` and around condensed container children.
    pub separator: String,
    /// Honor `lines_above == 0` runs as same-line siblings.
    pub allow_condense: bool,
    /// Open a container's brace on the line of its key.
    pub braces_same_line: bool,
    /// Lower clamp for newlines between siblings.
    pub min_spacing: i32,
    /// Upper clamp for newlines between siblings.
    pub max_spacing: i32,
    /// Newlines between siblings that never specified any.
    pub default_spacing: i32,
    /// Force a blank line around members with headers or container
    /// values.
    pub smart_spacing: bool,
    /// Emit a non-empty object root without outer braces.
    pub omit_root_braces: bool,
    /// Allow implicit strings to stay unquoted.
    pub omit_quotes: bool,
    pub output_comments: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            format: true,
            indent: "  ".to_string(),
            eol: context::eol(),
            separator: " ".to_string(),
            allow_condense: true,
            braces_same_line: true,
            min_spacing: 0,
            max_spacing: i32::MAX,
            default_spacing: 1,
            smart_spacing: false,
            omit_root_braces: true,
            omit_quotes: true,
            output_comments: true,
        }
    }
}

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line output: no indentation, no comments, no separators.
    pub fn unformatted() -> Self {
        Self {
            format: false,
            indent: String::new(),
            eol: String::new(),
            separator: String::new(),
            output_comments: false,
            ..Self::default()
        }
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_eol(mut self, eol: impl Into<String>) -> Self {
        self.eol = eol.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_allow_condense(mut self, allow: bool) -> Self {
        self.allow_condense = allow;
        self
    }

    pub fn with_braces_same_line(mut self, same_line: bool) -> Self {
        self.braces_same_line = same_line;
        self
    }

    pub fn with_min_spacing(mut self, lines: i32) -> Self {
        self.min_spacing = lines;
        self
    }

    pub fn with_max_spacing(mut self, lines: i32) -> Self {
        self.max_spacing = lines;
        self
    }

    pub fn with_default_spacing(mut self, lines: i32) -> Self {
        self.default_spacing = lines;
        self
    }

    pub fn with_smart_spacing(mut self, smart: bool) -> Self {
        self.smart_spacing = smart;
        self
    }

    pub fn with_omit_root_braces(mut self, omit: bool) -> Self {
        self.omit_root_braces = omit;
        self
    }

    pub fn with_omit_quotes(mut self, omit: bool) -> Self {
        self.omit_quotes = omit;
        self
    }

    pub fn with_output_comments(mut self, output: bool) -> Self {
        self.output_comments = output;
        self
    }
}
