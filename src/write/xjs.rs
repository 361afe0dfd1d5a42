//! XJS emission.
//!
//! Walks the document depth-first and reproduces trivia: blank-line
//! counts, header/value/EOL/interior/footer comments, condensed
//! containers, and the brace-less open root. String kinds are honored,
//! with automatic promotion where a kind cannot legally hold its text.

use crate::document::comment::CommentType;
use crate::document::trivia::Trivia;
use crate::document::value::{Value, ValueKind};
use crate::document::{Array, Object, Reference};
use crate::parse::implicit::{self, StringContext};
use crate::syntax::token::StringKind;
use crate::write::options::WriterOptions;
use crate::write::{push_number, push_quoted_double};

pub(crate) struct XjsWriter<'a> {
    out: String,
    options: &'a WriterOptions,
}

enum MemberStyle {
    /// Document root without braces.
    OpenRoot,
    /// Children share the container's line.
    Condensed,
    /// One child per line (at least).
    Expanded,
}

impl<'a> XjsWriter<'a> {
    pub(crate) fn write(value: &Value, options: &'a WriterOptions) -> String {
        let mut writer = Self {
            out: String::new(),
            options,
        };
        writer.write_document(value);
        writer.out
    }

    fn write_document(&mut self, value: &Value) {
        let trivia = value.trivia();

        if self.options.omit_root_braces
            && value.as_object().is_some_and(|object| !object.is_empty())
        {
            let Some(object) = value.as_object() else {
                unreachable!();
            };
            self.write_open_root(object, trivia);
            return;
        }

        if self.options.format {
            self.push_lines(trivia.lines_above().max(0));
            if self.write_comment(trivia, CommentType::Header, 0) {
                self.push_eol();
            }
        }

        self.write_value(value, 0, false);

        if self.comments_enabled() {
            if let Some(footer) = trivia.get_comment(CommentType::Footer) {
                footer.write_to(
                    &mut self.out,
                    None,
                    &self.options.indent,
                    0,
                    &self.options.eol,
                    false,
                );
            }
        }
    }

    fn write_open_root(&mut self, object: &Object, trivia: &Trivia) {
        if self.options.format {
            self.push_lines(trivia.lines_above().max(0));
            if self.write_comment(trivia, CommentType::Header, 0) {
                self.push_eol();
                // The header owns its newline; give the first member a
                // visible gap when it never specified one.
                let first_gap = object
                    .references()
                    .first()
                    .map_or(0, |r| r.visit().trivia().lines_above());
                if first_gap <= 0 {
                    self.push_eol();
                }
            }
        }

        let last = self.write_members(object, 0, MemberStyle::OpenRoot);

        if let Some(last) = last {
            self.write_eol_comment(&last.visit().trivia().clone(), 0);
        }

        if self.options.format {
            let trailing = trivia.lines_trailing().max(0);
            self.push_lines(trailing);
            if self.comments_enabled() {
                if let Some(footer) = trivia.get_comment(CommentType::Footer) {
                    footer.write_to(
                        &mut self.out,
                        None,
                        &self.options.indent,
                        0,
                        &self.options.eol,
                        false,
                    );
                }
            }
        }
    }

    // ---- values -------------------------------------------------------

    /// `level` is the value's indent level: containers open here and
    /// indent children one deeper; multi-line strings hang their body at
    /// `level + 1` unless `positioned` says the cursor already moved.
    fn write_value(&mut self, value: &Value, level: usize, positioned: bool) {
        match value.kind() {
            ValueKind::Null => self.out.push_str("null"),
            ValueKind::Bool(true) => self.out.push_str("true"),
            ValueKind::Bool(false) => self.out.push_str("false"),
            ValueKind::Number(number) => push_number(&mut self.out, *number),
            ValueKind::String { text, kind } => {
                self.write_string(text, *kind, level, positioned)
            }
            ValueKind::Object(object) => self.write_object(object, value.trivia(), level),
            ValueKind::Array(array) => self.write_array(array, value.trivia(), level),
        }
    }

    fn write_string(&mut self, text: &str, kind: StringKind, level: usize, positioned: bool) {
        if text.contains('\n') && self.options.format {
            // No single-line kind can hold a raw newline.
            self.write_multi(text, level, positioned);
            return;
        }

        match kind {
            StringKind::Implicit => {
                if text.is_empty() {
                    // A void slot writes nothing; quoting it would turn
                    // it into a real string.
                    if !self.options.omit_quotes {
                        self.out.push_str("\"\"");
                    }
                } else if self.implicit_allowed(text) {
                    self.out
                        .push_str(&implicit::escape(text, StringContext::Value));
                } else {
                    push_quoted_double(&mut self.out, text);
                }
            }
            StringKind::Single => self.write_quoted_single(text),
            // Multi without a newline (or in unformatted output)
            // collapses to a double-quoted form.
            StringKind::Double | StringKind::Multi => push_quoted_double(&mut self.out, text),
        }
    }

    fn implicit_allowed(&self, text: &str) -> bool {
        self.options.omit_quotes
            && !text.starts_with(['{', '}', '[', ']', ',', ':'])
            && implicit::is_eligible(text, StringContext::Value)
    }

    fn write_quoted_single(&mut self, text: &str) {
        self.out.push('\'');
        for c in text.chars() {
            match c {
                '\'' => self.out.push_str("\\'"),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c => self.out.push(c),
            }
        }
        self.out.push('\'');
    }

    /// Body and closer indent one deeper than the owner's line so a
    /// reparse dedents back to the same text.
    fn write_multi(&mut self, text: &str, level: usize, positioned: bool) {
        let body_level = if positioned { level } else { level + 1 };
        if !positioned {
            self.push_eol();
            self.push_indent(body_level);
        }

        self.out.push_str("'''");
        for line in text.split('\n') {
            self.push_eol();
            if !line.is_empty() {
                self.push_indent(body_level);
                self.out.push_str(line);
            }
        }
        self.push_eol();
        self.push_indent(body_level);
        self.out.push_str("'''");
    }

    // ---- containers ---------------------------------------------------

    fn write_object(&mut self, object: &Object, trivia: &Trivia, level: usize) {
        self.out.push('{');

        if object.is_empty() {
            self.write_empty_interior(trivia, level);
            self.out.push('}');
            return;
        }

        let condensed = self.open_condensed(object.references());
        let style = if condensed {
            self.push_separator();
            MemberStyle::Condensed
        } else {
            MemberStyle::Expanded
        };

        let last = self.write_members(object, level + 1, style);
        self.close_container(trivia, last.as_ref(), condensed, false, level);
        self.out.push('}');
    }

    fn write_array(&mut self, array: &Array, trivia: &Trivia, level: usize) {
        self.out.push('[');

        if array.is_empty() {
            self.write_empty_interior(trivia, level);
            self.out.push(']');
            return;
        }

        let condensed = self.open_condensed(array.references());
        let first_void = array.references()[0].visit().is_void();
        if condensed && !first_void {
            self.push_separator();
        }

        let style = if condensed {
            MemberStyle::Condensed
        } else {
            MemberStyle::Expanded
        };
        let last = self.write_elements(array, level + 1, style);

        let last_void = last.as_ref().is_some_and(|r| r.visit().is_void());
        if last_void {
            // Trailing comma keeps the final void slot readable.
            self.out.push(',');
        }
        self.close_container(trivia, last.as_ref(), condensed, last_void, level);
        self.out.push(']');
    }

    fn open_condensed(&self, references: &[Reference]) -> bool {
        if !self.options.format {
            return true;
        }
        self.options.allow_condense
            && references
                .first()
                .is_some_and(|r| r.visit().trivia().lines_above() == 0)
    }

    fn write_empty_interior(&mut self, trivia: &Trivia, level: usize) {
        if self.comments_enabled() {
            if let Some(interior) = trivia.get_comment(CommentType::Interior) {
                self.push_separator();
                interior.write_to(
                    &mut self.out,
                    None,
                    &self.options.indent,
                    level + 1,
                    &self.options.eol,
                    true,
                );
                if !interior.ends_with_newline() {
                    self.push_separator();
                }
                return;
            }
        }

        if self.options.format && trivia.lines_trailing() > 0 {
            self.push_lines(trivia.lines_trailing());
            self.push_indent(level);
        }
    }

    /// Last child's EOL comment, trailing blank lines, interior comment,
    /// and the indent for the closer (the closer char itself is the
    /// caller's).
    fn close_container(
        &mut self,
        trivia: &Trivia,
        last: Option<&Reference>,
        condensed: bool,
        suppress_separator: bool,
        level: usize,
    ) {
        if !self.options.format {
            return;
        }

        if let Some(last) = last {
            self.write_eol_comment(&last.visit().trivia().clone(), level + 1);
        }

        let trailing = trivia.lines_trailing();
        let interior = if self.comments_enabled() {
            trivia.get_comment(CommentType::Interior)
        } else {
            None
        };

        if let Some(interior) = interior {
            self.push_lines(trailing.max(1));
            self.push_indent(level + 1);
            interior.write_to(
                &mut self.out,
                None,
                &self.options.indent,
                level + 1,
                &self.options.eol,
                true,
            );
            if !interior.ends_with_newline() {
                self.push_eol();
                self.push_indent(level);
            }
            return;
        }

        let close_inline = trailing == 0 || (trailing < 0 && condensed);
        if close_inline {
            if !suppress_separator {
                self.push_separator();
            }
        } else {
            self.push_lines(trailing.max(1));
            self.push_indent(level);
        }
    }

    // ---- members and elements -----------------------------------------

    /// Write every member, returning the last reference so the caller
    /// can place its EOL comment before the closer.
    fn write_members(
        &mut self,
        object: &Object,
        level: usize,
        style: MemberStyle,
    ) -> Option<Reference> {
        let mut previous: Option<Reference> = None;

        for (index, (key, reference)) in object.iter().enumerate() {
            let value = reference.visit();
            let trivia = value.trivia().clone();

            self.delimit_child(index, &trivia, &value, previous.as_ref(), level, &style);
            self.write_header_comment(&trivia, level);
            self.write_key(key);
            self.out.push(':');
            self.write_after_colon(&value, level);

            drop(value);
            previous = Some(reference.clone());
        }

        previous
    }

    fn write_elements(
        &mut self,
        array: &Array,
        level: usize,
        style: MemberStyle,
    ) -> Option<Reference> {
        let mut previous: Option<Reference> = None;

        for (index, reference) in array.iter().enumerate() {
            let value = reference.visit();
            let trivia = value.trivia().clone();

            if value.is_void() {
                // Voids write nothing; only their commas appear.
                if index > 0 {
                    self.out.push(',');
                }
                drop(value);
                previous = Some(reference.clone());
                continue;
            }

            self.delimit_child(index, &trivia, &value, previous.as_ref(), level, &style);
            self.write_header_comment(&trivia, level);
            // The element's line is already indented, so a multi-line
            // string hangs its body at this same level.
            self.write_value(&value, level, true);

            drop(value);
            previous = Some(reference.clone());
        }

        previous
    }

    /// Everything between the previous sibling and this one: the comma
    /// or newline run, the previous sibling's EOL comment, and this
    /// line's indent.
    fn delimit_child(
        &mut self,
        index: usize,
        trivia: &Trivia,
        value: &Value,
        previous: Option<&Reference>,
        level: usize,
        style: &MemberStyle,
    ) {
        if !self.options.format {
            if index > 0 {
                self.out.push(',');
            }
            return;
        }

        let previous_trivia = previous.map(|r| r.visit().trivia().clone());
        let previous_eol = previous_trivia
            .as_ref()
            .is_some_and(|t| t.has_comment(CommentType::Eol));
        let previous_void = previous.is_some_and(|r| r.visit().is_void());

        if index == 0 {
            match style {
                MemberStyle::OpenRoot => self.push_lines(trivia.lines_above().max(0)),
                MemberStyle::Condensed => {}
                MemberStyle::Expanded => {
                    let lines = self.spacing(trivia.lines_above()).max(1);
                    self.push_lines(lines);
                    self.push_indent(level);
                }
            }
            return;
        }

        let mut lines = self.spacing(trivia.lines_above());
        if previous_eol && lines == 0 {
            // An EOL comment owns the rest of its line.
            lines = 1;
        }
        if self.options.smart_spacing && lines >= 1 {
            let spacious = trivia.has_comment(CommentType::Header)
                || value.is_container()
                || previous_trivia
                    .as_ref()
                    .is_some_and(|t| t.has_comment(CommentType::Header))
                || previous.is_some_and(|r| r.visit().is_container());
            if spacious {
                lines = lines.max(2);
            }
        }

        if lines == 0 && self.options.allow_condense {
            self.out.push(',');
            if !previous_void {
                self.push_separator();
            }
        } else {
            if let Some(previous_trivia) = &previous_trivia {
                self.write_eol_comment(previous_trivia, level);
            }
            self.push_lines(lines.max(1));
            self.push_indent(level);
        }
    }

    /// Newlines between siblings after clamping; unspecified counts use
    /// the default.
    fn spacing(&self, raw: i32) -> i32 {
        if !self.options.format {
            return 0;
        }
        let lines = if raw < 0 {
            self.options.default_spacing
        } else {
            raw
        };
        lines.clamp(self.options.min_spacing, self.options.max_spacing)
    }

    fn write_key(&mut self, key: &str) {
        if self.options.omit_quotes
            && !key.contains('\n')
            && implicit::is_eligible(key, StringContext::Key)
        {
            self.out.push_str(&implicit::escape(key, StringContext::Key));
        } else if key.is_empty() && self.options.omit_quotes {
            // An empty implicit key round-trips as a bare colon.
        } else {
            push_quoted_double(&mut self.out, key);
        }
    }

    /// The `: value` tail of a member: VALUE comment placement, the
    /// separating space or coerced newline, then the value itself.
    fn write_after_colon(&mut self, value: &Value, member_level: usize) {
        let trivia = value.trivia();
        let between = if self.options.format {
            trivia.lines_between()
        } else {
            -1
        };
        let comment = if self.comments_enabled() {
            trivia.get_comment(CommentType::Value)
        } else {
            None
        };

        let multi_bound = self.options.format
            && matches!(value.kind(), ValueKind::String { text, .. } if text.contains('\n'));

        let mut positioned = false;
        if between > 0 {
            self.push_lines(between);
            self.push_indent(member_level + 1);
            positioned = true;
        }

        if let Some(comment) = comment {
            if !positioned {
                self.push_separator();
            }
            comment.write_to(
                &mut self.out,
                None,
                &self.options.indent,
                member_level + 1,
                &self.options.eol,
                false,
            );
            if comment.ends_with_newline() {
                positioned = true;
            } else {
                self.push_separator();
                positioned = true;
            }
        }

        if !positioned {
            if value.is_container() && !self.options.braces_same_line && self.options.format {
                self.push_eol();
                self.push_indent(member_level);
                positioned = true;
            } else if multi_bound {
                // write_multi positions itself one level deeper.
            } else {
                self.push_separator();
            }
        }

        let value_level = if multi_bound && positioned {
            member_level + 1
        } else {
            member_level
        };
        self.write_value(value, value_level, positioned && multi_bound);
    }

    // ---- comments and spacing helpers ---------------------------------

    fn comments_enabled(&self) -> bool {
        self.options.format && self.options.output_comments
    }

    /// Returns true when a comment was written.
    fn write_comment(&mut self, trivia: &Trivia, comment_type: CommentType, level: usize) -> bool {
        if !self.comments_enabled() {
            return false;
        }
        let Some(data) = trivia.get_comment(comment_type) else {
            return false;
        };
        data.write_to(
            &mut self.out,
            None,
            &self.options.indent,
            level,
            &self.options.eol,
            false,
        );
        true
    }

    /// Header comments sit on their own line(s) above the node.
    fn write_header_comment(&mut self, trivia: &Trivia, level: usize) {
        if self.write_comment(trivia, CommentType::Header, level) {
            self.push_eol();
            self.push_indent(level);
        }
    }

    fn write_eol_comment(&mut self, trivia: &Trivia, level: usize) {
        if !self.comments_enabled() {
            return;
        }
        if let Some(eol) = trivia.get_comment(CommentType::Eol) {
            self.push_separator();
            eol.write_to(
                &mut self.out,
                None,
                &self.options.indent,
                level,
                &self.options.eol,
                false,
            );
        }
    }

    fn push_eol(&mut self) {
        self.out.push_str(&self.options.eol);
    }

    fn push_lines(&mut self, count: i32) {
        for _ in 0..count.max(0) {
            self.push_eol();
        }
    }

    fn push_indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str(&self.options.indent);
        }
    }

    fn push_separator(&mut self) {
        self.out.push_str(&self.options.separator);
    }
}
