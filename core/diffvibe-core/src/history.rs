//! Linear undo/redo history over an arbitrary value type.
//!
//! Every operation returns a new [`History`]; the receiver is never mutated.
//! `push` compares with `PartialEq` (value equality). Callers that want identity
//! semantics pass their own predicate to [`History::push_by`], e.g. `Arc::ptr_eq`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History<T> {
    pub past: Vec<T>,
    pub present: T,
    pub future: Vec<T>,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: Vec::new(),
        }
    }

    /// Records `value` as the new present and drops any redo entries.
    /// Pushing a value equal to the present returns an unchanged copy.
    pub fn push(&self, value: T) -> Self
    where
        T: PartialEq,
    {
        self.push_by(value, |a, b| a == b)
    }

    pub fn push_by(&self, value: T, same: impl Fn(&T, &T) -> bool) -> Self {
        if same(&value, &self.present) {
            return self.clone();
        }

        let mut past = self.past.clone();
        past.push(self.present.clone());
        Self {
            past,
            present: value,
            future: Vec::new(),
        }
    }

    pub fn undo(&self) -> Self {
        let mut past = self.past.clone();
        let Some(previous) = past.pop() else {
            return self.clone();
        };

        let mut future = Vec::with_capacity(self.future.len() + 1);
        future.push(self.present.clone());
        future.extend(self.future.iter().cloned());

        Self {
            past,
            present: previous,
            future,
        }
    }

    pub fn redo(&self) -> Self {
        let Some((next, rest)) = self.future.split_first() else {
            return self.clone();
        };

        let mut past = self.past.clone();
        past.push(self.present.clone());
        Self {
            past,
            present: next.clone(),
            future: rest.to_vec(),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Discards all history and starts over from `value`.
    pub fn reset(&self, value: T) -> Self {
        Self::new(value)
    }
}
