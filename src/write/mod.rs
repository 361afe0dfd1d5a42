//! Serialization of document values back to text.

mod json;
pub mod options;
mod xjs;

use std::fmt;

use crate::document::Value;

pub use options::WriterOptions;

/// Write a value as XJS, reproducing attached trivia.
pub fn write_xjs(value: &Value, options: &WriterOptions) -> String {
    xjs::XjsWriter::write(value, options)
}

/// Write a value as strict JSON: always-braced containers, `"`-quoted
/// keys and strings, comma delimiters, no comments.
pub fn write_json(value: &Value, options: &WriterOptions) -> String {
    json::JsonWriter::write(value, options)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&write_xjs(self, &WriterOptions::default()))
    }
}

/// Canonical number form shared by both writers: integral doubles print
/// as integers, other finite doubles use the shortest round-trip form
/// (Rust never uppercases the exponent), non-finite doubles have no
/// textual form and fall back to null.
pub(crate) fn push_number(out: &mut String, value: f64) {
    use std::fmt::Write;

    if !value.is_finite() {
        out.push_str("null");
        return;
    }

    // 2^53: beyond this, f64 no longer distinguishes adjacent integers.
    if value == value.trunc() && value.abs() < 9_007_199_254_740_992.0 {
        let _ = write!(out, "{}", value as i64);
    } else {
        let _ = write!(out, "{}", value);
    }
}

/// Double-quoted string with JSON escapes.
pub(crate) fn push_quoted_double(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                use std::fmt::Write;
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(value: f64) -> String {
        let mut out = String::new();
        push_number(&mut out, value);
        out
    }

    #[test]
    fn integral_doubles_print_as_integers() {
        assert_eq!(number(3.0), "3");
        assert_eq!(number(-42.0), "-42");
        assert_eq!(number(0.5), "0.5");
    }

    #[test]
    fn non_finite_numbers_have_no_textual_form() {
        assert_eq!(number(f64::NAN), "null");
        assert_eq!(number(f64::INFINITY), "null");
    }

    #[test]
    fn quoting_escapes_controls() {
        let mut out = String::new();
        push_quoted_double(&mut out, "a\"b\\c\nd\u{0001}");
        assert_eq!(out, r#""a\"b\\c\nd\u0001""#);
    }
}
