//! Loops: the one-or-more values held by a port. Index 0..N-1 are parallel
//! evaluation lanes; shorter loops broadcast by holding their last value.

use serde::{Deserialize, Serialize};

use super::Value;

/// Ordered, non-empty sequence of values on a single port.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ValueLoop(Vec<Value>);

impl ValueLoop {
    /// Build a loop, restoring the non-empty invariant if handed nothing.
    pub fn new(values: Vec<Value>) -> Self {
        if values.is_empty() {
            Self(vec![Value::default()])
        } else {
            Self(values)
        }
    }

    pub fn from_value(value: Value) -> Self {
        Self(vec![value])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn first(&self) -> &Value {
        &self.0[0]
    }

    pub fn last(&self) -> &Value {
        self.0.last().expect("loop is non-empty")
    }

    /// Lane value at `index`, holding the last element past the end.
    pub fn at(&self, index: usize) -> &Value {
        self.0.get(index).unwrap_or_else(|| self.last())
    }

    /// Replace the lane at `index` if it exists.
    pub fn set_at(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = value;
        }
    }

    /// Extend to `length` by repeating the last element ("hold last
    /// value"); a loop already at least that long is returned unchanged.
    pub fn lengthened(&self, length: usize) -> Self {
        if self.0.len() >= length {
            return self.clone();
        }
        let mut values = self.0.clone();
        let last = self.last().clone();
        values.resize(length, last);
        Self(values)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }
}

impl Default for ValueLoop {
    fn default() -> Self {
        Self(vec![Value::default()])
    }
}

impl From<Vec<Value>> for ValueLoop {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// Effective iteration count for a set of input loops: the longest length,
/// never less than 1.
pub fn longest_loop_length(loops: &[ValueLoop]) -> usize {
    loops.iter().map(ValueLoop::len).max().unwrap_or(1).max(1)
}

/// Hold-last-value broadcast of every loop to `length`.
pub fn lengthened_loops(loops: &[ValueLoop], length: usize) -> Vec<ValueLoop> {
    loops.iter().map(|l| l.lengthened(length)).collect()
}
