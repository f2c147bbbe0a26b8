//! Path-addressed access into the value tree.
//!
//! Resolution walks the variant tree performing a shape check at each
//! segment: a key segment requires an object, an index segment requires an
//! array with the index in bounds. Any mismatch resolves to `None` (reads)
//! or a `false` no-op (writes) — never a panic.

use crate::path::{Path, Segment};

use super::Value;

impl Value {
    /// Read the value at `path`, or `None` if the path does not resolve.
    ///
    /// The root path resolves to `self`.
    pub fn get(&self, path: &Path) -> Option<&Value> {
        let mut current = self;
        for segment in path.segments() {
            current = match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => map.get(key)?,
                (Segment::Index(index), Value::Array(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Mutable access to the value at `path`, or `None` if it does not resolve.
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Value> {
        let mut current = self;
        for segment in path.segments() {
            current = match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => map.get_mut(key)?,
                (Segment::Index(index), Value::Array(items)) => items.get_mut(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Write `value` at `path`. Returns whether the write happened.
    ///
    /// The parent of `path` must resolve to a container of the matching
    /// shape. Writing a new key into an existing object is allowed; writing
    /// past the end of an array is not. Writing at the root path replaces
    /// the whole tree.
    pub fn set(&mut self, path: &Path, value: Value) -> bool {
        let Some(last) = path.last() else {
            *self = value;
            return true;
        };
        // parent() is Some for any non-root path.
        let Some(parent_path) = path.parent() else {
            return false;
        };
        let Some(parent) = self.get_mut(&parent_path) else {
            return false;
        };
        match (last, parent) {
            (Segment::Key(key), Value::Object(map)) => {
                map.insert(key.clone(), value);
                true
            }
            (Segment::Index(index), Value::Array(items)) => {
                if let Some(slot) = items.get_mut(*index) {
                    *slot = value;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Remove the value at `path` from its parent container.
    ///
    /// Object removal is order-preserving (later keys keep their relative
    /// order). Returns the removed value, or `None` if the path did not
    /// resolve. The root path cannot be removed.
    pub fn remove(&mut self, path: &Path) -> Option<Value> {
        let last = path.last()?;
        let parent = self.get_mut(&path.parent()?)?;
        match (last, parent) {
            (Segment::Key(key), Value::Object(map)) => map.shift_remove(key),
            (Segment::Index(index), Value::Array(items)) => {
                if *index < items.len() {
                    Some(items.remove(*index))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
