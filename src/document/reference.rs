//! Shared value handles with access tracking.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::document::value::Value;

/// A handle to a value slot inside a container.
///
/// Cloning shares the slot. `get`/`get_mut` flag the slot as accessed,
/// which callers use to report unused members; `visit` reads without
/// flagging.
#[derive(Debug, Clone)]
pub struct Reference {
    inner: Rc<ReferenceInner>,
}

#[derive(Debug)]
struct ReferenceInner {
    value: RefCell<Value>,
    accessed: Cell<bool>,
}

impl Reference {
    pub fn new(value: Value) -> Self {
        Self {
            inner: Rc::new(ReferenceInner {
                value: RefCell::new(value),
                accessed: Cell::new(false),
            }),
        }
    }

    pub fn get(&self) -> Ref<'_, Value> {
        self.inner.accessed.set(true);
        self.inner.value.borrow()
    }

    pub fn get_mut(&self) -> RefMut<'_, Value> {
        self.inner.accessed.set(true);
        self.inner.value.borrow_mut()
    }

    /// Read without marking the slot accessed.
    pub fn visit(&self) -> Ref<'_, Value> {
        self.inner.value.borrow()
    }

    pub fn visit_mut(&self) -> RefMut<'_, Value> {
        self.inner.value.borrow_mut()
    }

    /// Replace the held value, keeping the access flag.
    pub fn set(&self, value: Value) {
        *self.inner.value.borrow_mut() = value;
    }

    pub fn accessed(&self) -> bool {
        self.inner.accessed.get()
    }

    pub fn set_accessed(&self, accessed: bool) {
        self.inner.accessed.set(accessed);
    }

    pub fn clone_value(&self) -> Value {
        self.inner.value.borrow().clone()
    }

    /// Move the value out, leaving null behind. For single-owner slots
    /// this avoids a deep clone.
    pub fn take_value(&self) -> Value {
        self.inner.value.replace(Value::null())
    }
}

impl From<Value> for Reference {
    fn from(value: Value) -> Self {
        Reference::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_marks_accessed_and_visit_does_not() {
        let reference = Reference::new(Value::number(1.0));
        assert!(!reference.accessed());

        let _ = reference.visit();
        assert!(!reference.accessed());

        let _ = reference.get();
        assert!(reference.accessed());
    }

    #[test]
    fn clones_share_the_slot() {
        let reference = Reference::new(Value::number(1.0));
        let alias = reference.clone();
        alias.set(Value::bool_value(true));

        assert_eq!(reference.visit().as_bool(), Some(true));
    }
}
