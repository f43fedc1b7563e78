//! Working memory: the fact store a run reads and mutates.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Fact values keyed by fact name.
///
/// A name missing from the map is *unknown*. A name mapped to
/// [`Value::Null`] is *explicitly unknown*. Conditions treat it like an
/// absent fact; backward chaining treats it as a failed goal instead of
/// trying to derive it.
///
/// No history is kept: [`set`](Self::set) overwrites in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingMemory(BTreeMap<String, Value>);

impl WorkingMemory {
    pub fn new() -> Self {
        WorkingMemory(BTreeMap::new())
    }

    /// Bind `name` to `value`, returning the previous binding if any.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether `name` is bound, including bindings to null.
    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Facts in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for WorkingMemory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut memory = WorkingMemory::new();
        memory.extend(iter);
        memory
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for WorkingMemory {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

impl<'a> IntoIterator for &'a WorkingMemory {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
