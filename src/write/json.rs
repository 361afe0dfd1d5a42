//! Strict JSON emission.
//!
//! Containers always brace, keys and strings always double-quote,
//! commas always delimit, and comments never appear. Blank-line trivia
//! still shapes the layout so a document converted from XJS keeps its
//! vertical rhythm.

use crate::document::trivia::Trivia;
use crate::document::value::{Value, ValueKind};
use crate::document::{Array, Object};
use crate::write::options::WriterOptions;
use crate::write::{push_number, push_quoted_double};

pub(crate) struct JsonWriter<'a> {
    out: String,
    options: &'a WriterOptions,
}

impl<'a> JsonWriter<'a> {
    pub(crate) fn write(value: &Value, options: &'a WriterOptions) -> String {
        let mut writer = Self {
            out: String::new(),
            options,
        };
        writer.write_value(value, 0);
        writer.out
    }

    fn write_value(&mut self, value: &Value, level: usize) {
        match value.kind() {
            ValueKind::Null => self.out.push_str("null"),
            ValueKind::Bool(true) => self.out.push_str("true"),
            ValueKind::Bool(false) => self.out.push_str("false"),
            ValueKind::Number(number) => push_number(&mut self.out, *number),
            ValueKind::String { text, .. } => push_quoted_double(&mut self.out, text),
            ValueKind::Object(object) => self.write_object(object, value.trivia(), level),
            ValueKind::Array(array) => self.write_array(array, value.trivia(), level),
        }
    }

    fn write_object(&mut self, object: &Object, trivia: &Trivia, level: usize) {
        self.out.push('{');
        if object.is_empty() {
            self.out.push('}');
            return;
        }

        let condensed = self.condensed(object.references().first().map(|r| {
            r.visit().trivia().lines_above()
        }));
        if condensed {
            self.push_separator();
        }

        for (index, (key, reference)) in object.iter().enumerate() {
            let value = reference.visit();
            self.delimit(index, value.trivia().lines_above(), condensed, level + 1);
            push_quoted_double(&mut self.out, key);
            self.out.push(':');
            self.push_separator();
            self.write_value(&value, level + 1);
        }

        self.close(trivia, condensed, level);
        self.out.push('}');
    }

    fn write_array(&mut self, array: &Array, trivia: &Trivia, level: usize) {
        self.out.push('[');
        if array.is_empty() {
            self.out.push(']');
            return;
        }

        let condensed = self.condensed(array.references().first().map(|r| {
            r.visit().trivia().lines_above()
        }));
        if condensed {
            self.push_separator();
        }

        for (index, reference) in array.iter().enumerate() {
            let value = reference.visit();
            self.delimit(index, value.trivia().lines_above(), condensed, level + 1);
            self.write_value(&value, level + 1);
        }

        self.close(trivia, condensed, level);
        self.out.push(']');
    }

    fn condensed(&self, first_lines_above: Option<i32>) -> bool {
        if !self.options.format {
            return true;
        }
        self.options.allow_condense && first_lines_above == Some(0)
    }

    /// JSON always separates with a comma; the newline is extra.
    fn delimit(&mut self, index: usize, lines_above: i32, condensed: bool, level: usize) {
        if index == 0 {
            if self.options.format && !condensed {
                self.push_lines(self.spacing(lines_above).max(1));
                self.push_indent(level);
            }
            return;
        }

        self.out.push(',');
        if !self.options.format {
            return;
        }

        let lines = self.spacing(lines_above);
        if lines == 0 && self.options.allow_condense {
            self.push_separator();
        } else {
            self.push_lines(lines.max(1));
            self.push_indent(level);
        }
    }

    fn close(&mut self, trivia: &Trivia, condensed: bool, level: usize) {
        if !self.options.format {
            return;
        }

        let trailing = trivia.lines_trailing();
        if trailing == 0 || (trailing < 0 && condensed) {
            self.push_separator();
        } else {
            self.push_lines(trailing.max(1));
            self.push_indent(level);
        }
    }

    fn spacing(&self, raw: i32) -> i32 {
        let lines = if raw < 0 {
            self.options.default_spacing
        } else {
            raw
        };
        lines.clamp(self.options.min_spacing, self.options.max_spacing)
    }

    fn push_lines(&mut self, count: i32) {
        for _ in 0..count.max(0) {
            self.out.push_str(&self.options.eol);
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
