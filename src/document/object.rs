//! Ordered key/value maps with duplicate keys.
//!
//! Lookup is last-match: when a key occurs twice, `get` and `index_of`
//! resolve to the later occurrence. A fixed 32-slot byte table makes the
//! common case O(1) without allocating; it is an accelerator only, and
//! every lookup falls back to a linear scan whenever the slot disagrees.

use std::cell::{Ref, RefMut};
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::document::reference::Reference;
use crate::document::value::{Value, ValueKind};

const SLOT_COUNT: usize = 32;

/// Maps `hash(key) & 31` to `index + 1`; 0 means empty. Indices that do
/// not fit in a byte leave the slot empty and ride the linear fallback.
#[derive(Debug, Clone, Default)]
struct SlotTable {
    slots: [u8; SLOT_COUNT],
}

impl SlotTable {
    fn slot_of(key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) & (SLOT_COUNT - 1)
    }

    fn get(&self, key: &str) -> Option<usize> {
        match self.slots[Self::slot_of(key)] {
            0 => None,
            stored => Some(stored as usize - 1),
        }
    }

    fn set(&mut self, key: &str, index: usize) {
        self.slots[Self::slot_of(key)] = if index > 254 { 0 } else { (index + 1) as u8 };
    }

    fn remove_index(&mut self, removed: usize) {
        for slot in &mut self.slots {
            let stored = *slot;
            if stored == 0 {
                continue;
            }
            let index = stored as usize - 1;
            if index == removed {
                *slot = 0;
            } else if index > removed {
                *slot = stored - 1;
            }
        }
    }

    fn rebuild(&mut self, keys: &[String]) {
        self.slots = [0; SLOT_COUNT];
        for (index, key) in keys.iter().enumerate() {
            self.set(key, index);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Object {
    keys: Vec<String>,
    references: Vec<Reference>,
    table: SlotTable,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        debug_assert!(self.keys.len() == self.references.len());
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Reference)> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.references.iter())
    }

    pub fn has(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Index of the last occurrence of `key`.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        if let Some(index) = self.table.get(key) {
            if self.keys.get(index).is_some_and(|k| k == key) {
                return Some(index);
            }
        }
        // Stale, clipped (> 254) or colliding slot.
        self.keys.iter().rposition(|k| k == key)
    }

    /// Read `key`, marking the slot accessed.
    pub fn get(&self, key: &str) -> Option<Ref<'_, Value>> {
        self.get_reference(key).map(Reference::get)
    }

    /// Read `key` without marking it accessed.
    pub fn visit(&self, key: &str) -> Option<Ref<'_, Value>> {
        self.get_reference(key).map(Reference::visit)
    }

    pub fn get_mut(&self, key: &str) -> Option<RefMut<'_, Value>> {
        self.get_reference(key).map(Reference::get_mut)
    }

    pub fn get_reference(&self, key: &str) -> Option<&Reference> {
        self.index_of(key).map(|index| &self.references[index])
    }

    /// Append unconditionally, allowing duplicate keys.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let index = self.keys.len();
        self.table.set(&key, index);
        self.keys.push(key);
        self.references.push(Reference::new(value.into()));
        self
    }

    pub fn add_reference(&mut self, key: impl Into<String>, reference: Reference) -> &mut Self {
        let key = key.into();
        let index = self.keys.len();
        self.table.set(&key, index);
        self.keys.push(key);
        self.references.push(reference);
        self
    }

    /// Replace if present, else append. A replacement keeps the old
    /// value's formatting wherever the new value left it unspecified.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let mut value = value.into();

        match self.index_of(&key) {
            Some(index) => {
                let reference = &self.references[index];
                let inherited = reference.visit().trivia().clone();
                value.trivia_mut().apply_defaults(inherited);
                reference.set(value);
            }
            None => {
                self.add(key, value);
            }
        }
        self
    }

    /// Insert at `index`, shifting later members. The slot table no
    /// longer reflects the ordering afterwards, so it is rebuilt.
    pub fn insert(&mut self, index: usize, key: impl Into<String>, value: impl Into<Value>) {
        let index = index.min(self.keys.len());
        self.keys.insert(index, key.into());
        self.references.insert(index, Reference::new(value.into()));
        self.table.rebuild(&self.keys);
    }

    /// Remove the occurrence `index_of` reports, returning its reference.
    pub fn remove(&mut self, key: &str) -> Option<Reference> {
        let index = self.index_of(key)?;
        self.keys.remove(index);
        let reference = self.references.remove(index);
        self.table.remove_index(index);
        Some(reference)
    }

    /// `get` narrowed to a bool, `None` when absent or a different type.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_f64()
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_i64()
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key)?.as_str().map(str::to_string)
    }

    /// Recursively fill keys missing here from `defaults`. When both
    /// sides hold an object under the same key, merge instead of copying.
    pub fn set_defaults(&mut self, defaults: &Object) {
        for (key, default_reference) in defaults.iter() {
            match self.index_of(key) {
                None => {
                    self.add(key, default_reference.visit().clone());
                }
                Some(index) => {
                    let mut existing = self.references[index].visit_mut();
                    let default_value = default_reference.visit();
                    if let (ValueKind::Object(existing), ValueKind::Object(default_object)) =
                        (existing.kind_mut(), default_value.kind())
                    {
                        existing.set_defaults(default_object);
                    }
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.references.clear();
        self.table = SlotTable::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_of(pairs: &[(&str, f64)]) -> Object {
        let mut object = Object::new();
        for (key, value) in pairs {
            object.add(*key, Value::number(*value));
        }
        object
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let object = object_of(&[("b", 1.0), ("a", 2.0), ("c", 3.0)]);
        let keys: Vec<&str> = object.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn duplicate_keys_resolve_to_last() {
        let object = object_of(&[("k", 1.0), ("x", 2.0), ("k", 3.0)]);
        assert_eq!(object.index_of("k"), Some(2));
        assert_eq!(object.visit("k").unwrap().as_f64(), Some(3.0));
    }

    #[test]
    fn remove_shifts_later_indices() {
        let mut object = object_of(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        assert!(object.remove("b").is_some());

        assert_eq!(object.index_of("a"), Some(0));
        assert_eq!(object.index_of("c"), Some(1));
        assert_eq!(object.visit("c").unwrap().as_f64(), Some(3.0));
        assert!(object.remove("b").is_none());
    }

    #[test]
    fn insert_rebuilds_lookup() {
        let mut object = object_of(&[("a", 1.0), ("c", 3.0)]);
        object.insert(1, "b", Value::number(2.0));

        assert_eq!(object.keys(), &["a", "b", "c"]);
        assert_eq!(object.visit("c").unwrap().as_f64(), Some(3.0));
        assert_eq!(object.visit("b").unwrap().as_f64(), Some(2.0));
    }

    #[test]
    fn lookup_beyond_slot_capacity_falls_back_to_scan() {
        let mut object = Object::new();
        for i in 0..300 {
            object.add(format!("key{i}"), Value::number(i as f64));
        }

        // Indices past 254 cannot live in the byte table.
        assert_eq!(object.visit("key299").unwrap().as_f64(), Some(299.0));
        assert_eq!(object.index_of("key255"), Some(255));
    }

    #[test]
    fn set_replaces_and_appends() {
        let mut object = object_of(&[("a", 1.0)]);
        object.set("a", Value::number(9.0));
        object.set("b", Value::number(2.0));

        assert_eq!(object.len(), 2);
        assert_eq!(object.visit("a").unwrap().as_f64(), Some(9.0));
    }

    #[test]
    fn set_defaults_merges_nested_objects() {
        let mut nested = Object::new();
        nested.add("x", Value::number(1.0));
        let mut target = Object::new();
        target.add("inner", Value::from(nested));

        let mut default_nested = Object::new();
        default_nested.add("x", Value::number(9.0));
        default_nested.add("y", Value::number(2.0));
        let mut defaults = Object::new();
        defaults.add("inner", Value::from(default_nested));
        defaults.add("top", Value::bool_value(true));

        target.set_defaults(&defaults);

        assert_eq!(target.visit("top").unwrap().as_bool(), Some(true));
        let inner = target.visit("inner").unwrap();
        let inner = inner.as_object().unwrap();
        assert_eq!(inner.visit("x").unwrap().as_f64(), Some(1.0));
        assert_eq!(inner.visit("y").unwrap().as_f64(), Some(2.0));
    }
}
