//! Variable frames.
//!
//! A frame maps names to slots. A name is either absent (never declared)
//! or present, holding a [`Value`] that may still be
//! [`Value::Uninitialized`].

use std::collections::BTreeMap;

use ippcode_common::Value;
use thiserror::Error;

/// Slot-level failures. The context turns these into runtime errors,
/// attaching the frame kind and instruction index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("variable '{0}' is already declared")]
    Redeclared(String),

    #[error("variable '{0}' is not declared")]
    Undeclared(String),
}

/// A named collection of variable slots.
///
/// Backed by a `BTreeMap` so that diagnostic dumps list variables in a
/// stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    slots: BTreeMap<String, Value>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an uninitialized slot for `name`.
    pub fn declare(&mut self, name: &str) -> Result<(), FrameError> {
        if self.slots.contains_key(name) {
            return Err(FrameError::Redeclared(name.to_string()));
        }
        self.slots.insert(name.to_string(), Value::Uninitialized);
        Ok(())
    }

    /// Overwrite the value of a declared slot.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), FrameError> {
        match self.slots.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(FrameError::Undeclared(name.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Result<&Value, FrameError> {
        self.slots
            .get(name)
            .ok_or_else(|| FrameError::Undeclared(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Number of declared slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Declared names with their values, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_then_read_is_uninitialized() {
        let mut frame = Frame::new();
        frame.declare("x").unwrap();
        assert!(frame.has("x"));
        assert_eq!(frame.get("x"), Ok(&Value::Uninitialized));
    }

    #[test]
    fn redeclare_fails() {
        let mut frame = Frame::new();
        frame.declare("x").unwrap();
        assert_eq!(frame.declare("x"), Err(FrameError::Redeclared("x".to_string())));
    }

    #[test]
    fn absent_names() {
        let mut frame = Frame::new();
        assert!(!frame.has("y"));
        assert_eq!(frame.get("y"), Err(FrameError::Undeclared("y".to_string())));
        assert_eq!(
            frame.set("y", Value::Int(1)),
            Err(FrameError::Undeclared("y".to_string()))
        );
    }

    #[test]
    fn set_overwrites() {
        let mut frame = Frame::new();
        frame.declare("x").unwrap();
        frame.set("x", Value::Int(1)).unwrap();
        frame.set("x", Value::Str("a".into())).unwrap();
        assert_eq!(frame.get("x"), Ok(&Value::Str("a".into())));
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn iter_is_sorted() {
        let mut frame = Frame::new();
        for name in ["b", "c", "a"] {
            frame.declare(name).unwrap();
        }
        let names: Vec<&str> = frame.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
