//! Filters applied to a child's HTTP value before it reaches the element.

use std::fmt;
use std::rc::Rc;

use crate::model::Value;

pub trait Filter: fmt::Debug {
    fn filter(&self, value: Value) -> Value;
}

/// Trims surrounding whitespace of string values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trim;

impl Filter for Trim {
    fn filter(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(s.trim().to_string()),
            other => other,
        }
    }
}

/// Drops map entries that are null, empty strings or empty maps.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyArrayValues;

impl Filter for EmptyArrayValues {
    fn filter(&self, value: Value) -> Value {
        match value {
            Value::Map(mut map) => {
                map.retain(|_, item| !item.is_empty_input());
                Value::Map(map)
            }
            other => other,
        }
    }
}

#[derive(Clone)]
pub struct FnFilter(Rc<dyn Fn(Value) -> Value>);

impl FnFilter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value) -> Value + 'static,
    {
        Self(Rc::new(f))
    }
}

impl fmt::Debug for FnFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnFilter").finish()
    }
}

impl Filter for FnFilter {
    fn filter(&self, value: Value) -> Value {
        (self.0)(value)
    }
}
