//! The document value type.
//!
//! Every value carries its own formatting trivia so a parsed document can
//! be re-emitted without losing comments or blank lines. Structural
//! comparisons go through `matches`, which ignores trivia and quoting
//! style.

use crate::context;
use crate::document::array::Array;
use crate::document::comment::{Comment, CommentData, CommentType};
use crate::document::object::Object;
use crate::document::trivia::Trivia;
use crate::syntax::token::StringKind;

#[derive(Debug, Clone)]
pub enum ValueKind {
    Null,
    Bool(bool),
    Number(f64),
    String { text: String, kind: StringKind },
    Array(Array),
    Object(Object),
}

#[derive(Debug, Clone)]
pub struct Value {
    kind: ValueKind,
    trivia: Trivia,
}

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            trivia: Trivia::new(),
        }
    }

    pub fn null() -> Self {
        Self::new(ValueKind::Null)
    }

    pub fn bool_value(value: bool) -> Self {
        Self::new(ValueKind::Bool(value))
    }

    pub fn number(value: f64) -> Self {
        Self::new(ValueKind::Number(value))
    }

    /// A double-quoted string; the safe default for programmatic values.
    pub fn string(text: impl Into<String>) -> Self {
        Self::string_with(text, StringKind::Double)
    }

    pub fn string_with(text: impl Into<String>, kind: StringKind) -> Self {
        Self::new(ValueKind::String {
            text: text.into(),
            kind,
        })
    }

    /// An unquoted string. The writer quotes it anyway when its text
    /// cannot legally stand bare.
    pub fn implicit(text: impl Into<String>) -> Self {
        Self::string_with(text, StringKind::Implicit)
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ValueKind {
        &mut self.kind
    }

    pub fn trivia(&self) -> &Trivia {
        &self.trivia
    }

    pub fn trivia_mut(&mut self) -> &mut Trivia {
        &mut self.trivia
    }

    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ValueKind::Null => "null",
            ValueKind::Bool(_) => "boolean",
            ValueKind::Number(_) => "number",
            ValueKind::String { .. } => "string",
            ValueKind::Array(_) => "array",
            ValueKind::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, ValueKind::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.kind, ValueKind::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self.kind, ValueKind::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, ValueKind::String { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ValueKind::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, ValueKind::Object(_))
    }

    pub fn is_container(&self) -> bool {
        self.is_array() || self.is_object()
    }

    /// An implicit empty string, used to encode empty array slots.
    pub fn is_void(&self) -> bool {
        matches!(
            &self.kind,
            ValueKind::String {
                text,
                kind: StringKind::Implicit
            } if text.is_empty()
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.kind {
            ValueKind::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match &self.kind {
            ValueKind::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_f64().map(|v| v as i64)
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn string_kind(&self) -> Option<StringKind> {
        match &self.kind {
            ValueKind::String { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match &self.kind {
            ValueKind::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match &mut self.kind {
            ValueKind::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match &self.kind {
            ValueKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match &mut self.kind {
            ValueKind::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Attach a one-comment run in the process-default comment style,
    /// replacing whatever the slot held.
    pub fn set_comment_text(
        &mut self,
        comment_type: CommentType,
        text: impl Into<String>,
    ) -> &mut Self {
        let mut data = CommentData::new();
        data.append_comment(Comment::new(context::default_comment_style(), text));
        self.trivia.set_comment(comment_type, data);
        self
    }

    /// The text of the comment run in `comment_type`, if any.
    pub fn comment_text(&self, comment_type: CommentType) -> Option<String> {
        self.trivia.get_comment(comment_type).map(CommentData::text)
    }

    /// Structural equality: trivia and quoting style are ignored, member
    /// order and duplicate keys are not.
    pub fn matches(&self, other: &Value) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Null, ValueKind::Null) => true,
            (ValueKind::Bool(a), ValueKind::Bool(b)) => a == b,
            (ValueKind::Number(a), ValueKind::Number(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (ValueKind::String { text: a, .. }, ValueKind::String { text: b, .. }) => a == b,
            (ValueKind::Array(a), ValueKind::Array(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| x.visit().matches(&y.visit()))
            }
            (ValueKind::Object(a), ValueKind::Object(b)) => {
                a.keys() == b.keys()
                    && a.references()
                        .iter()
                        .zip(b.references())
                        .all(|(x, y)| x.visit().matches(&y.visit()))
            }
            _ => false,
        }
    }

    /// Strip all trivia recursively, leaving pure data.
    pub fn unformatted(mut self) -> Value {
        self.strip_trivia();
        self
    }

    fn strip_trivia(&mut self) {
        self.trivia.clear();
        match &mut self.kind {
            ValueKind::Array(array) => {
                for reference in array.references() {
                    reference.visit_mut().strip_trivia();
                }
            }
            ValueKind::Object(object) => {
                for reference in object.references() {
                    reference.visit_mut().strip_trivia();
                }
            }
            _ => {}
        }
    }
}

impl From<ValueKind> for Value {
    fn from(kind: ValueKind) -> Self {
        Value::new(kind)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::bool_value(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::number(value.into())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::string(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::string(text)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::new(ValueKind::Array(array))
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::new(ValueKind::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::comment::{Comment, CommentData, CommentType};
    use crate::syntax::token::CommentStyle;

    #[test]
    fn matches_ignores_trivia_and_quote_kind() {
        let mut a = Value::string_with("x", StringKind::Single);
        a.trivia_mut().set_lines_above(3);
        let b = Value::implicit("x");

        assert!(a.matches(&b));
        assert!(!a.matches(&Value::string("y")));
    }

    #[test]
    fn matches_compares_object_structure() {
        let mut left = Object::new();
        left.add("a", Value::number(1.0));
        let mut right = Object::new();
        right.add("a", Value::number(1.0));

        assert!(Value::from(left.clone()).matches(&Value::from(right.clone())));

        right.add("b", Value::null());
        assert!(!Value::from(left).matches(&Value::from(right)));
    }

    #[test]
    fn unformatted_strips_nested_trivia() {
        let mut inner = Value::number(1.0);
        let mut comment = CommentData::new();
        comment.append_comment(Comment::new(CommentStyle::Line, "c"));
        inner.trivia_mut().set_comment(CommentType::Header, comment);

        let mut array = Array::new();
        array.add(inner);
        let value = Value::from(array).unformatted();

        let array = value.as_array().unwrap();
        assert!(array.visit(0).unwrap().trivia().is_unspecified());
    }

    #[test]
    fn void_strings_are_empty_implicit() {
        assert!(Value::implicit("").is_void());
        assert!(!Value::string("").is_void());
        assert!(!Value::implicit("x").is_void());
    }
}
