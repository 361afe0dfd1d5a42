//! Interop with the serde data model.
//!
//! Serialization flattens the document to pure data: trivia and quoting
//! styles do not survive, and duplicate keys serialize in order (standard
//! JSON consumers then apply their own last-wins rule).

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::document::value::{Value, ValueKind};

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.kind() {
            ValueKind::Null => serializer.serialize_unit(),
            ValueKind::Bool(value) => serializer.serialize_bool(*value),
            ValueKind::Number(value) => serializer.serialize_f64(*value),
            ValueKind::String { text, .. } => serializer.serialize_str(text),
            ValueKind::Array(array) => {
                let mut seq = serializer.serialize_seq(Some(array.len()))?;
                for reference in array.iter() {
                    seq.serialize_element(&*reference.visit())?;
                }
                seq.end()
            }
            ValueKind::Object(object) => {
                let mut map = serializer.serialize_map(Some(object.len()))?;
                for (key, reference) in object.iter() {
                    map.serialize_entry(key, &*reference.visit())?;
                }
                map.end()
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value.kind() {
            ValueKind::Null => serde_json::Value::Null,
            ValueKind::Bool(b) => serde_json::Value::Bool(*b),
            ValueKind::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            ValueKind::String { text, .. } => serde_json::Value::String(text.clone()),
            ValueKind::Array(array) => serde_json::Value::Array(
                array.iter().map(|r| Self::from(&*r.visit())).collect(),
            ),
            ValueKind::Object(object) => {
                let mut map = serde_json::Map::with_capacity(object.len());
                for (key, reference) in object.iter() {
                    // Last duplicate wins, as in standard JSON parsing.
                    map.insert(key.to_string(), Self::from(&*reference.visit()));
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::null(),
            serde_json::Value::Bool(b) => Value::bool_value(*b),
            serde_json::Value::Number(n) => Value::number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::string(s),
            serde_json::Value::Array(items) => {
                let mut array = crate::document::array::Array::new();
                for item in items {
                    array.add(Value::from(item));
                }
                Value::from(array)
            }
            serde_json::Value::Object(map) => {
                let mut object = crate::document::object::Object::new();
                for (key, item) in map {
                    object.add(key.as_str(), Value::from(item));
                }
                Value::from(object)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::object::Object;

    #[test]
    fn serializes_to_plain_json_data() {
        let mut object = Object::new();
        object.add("a", Value::number(1.0));
        object.add("b", Value::implicit("text"));
        let value = Value::from(object);

        let json = serde_json::to_value(&value).expect("serializable");
        assert_eq!(json, serde_json::json!({"a": 1.0, "b": "text"}));
    }

    #[test]
    fn duplicate_keys_collapse_last_wins() {
        let mut object = Object::new();
        object.add("k", Value::number(1.0));
        object.add("k", Value::number(2.0));

        let json = serde_json::Value::from(&Value::from(object));
        assert_eq!(json, serde_json::json!({"k": 2.0}));
    }

    #[test]
    fn round_trips_through_serde_json() {
        let json = serde_json::json!({"list": [1.0, null, true], "s": "x"});
        let value = Value::from(&json);
        assert_eq!(serde_json::Value::from(&value), json);
    }
}
