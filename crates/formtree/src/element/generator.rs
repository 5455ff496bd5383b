//! Producers of the fresh value a form hydrates its children into.

use std::fmt;
use std::rc::Rc;

use crate::model::Value;

pub trait ValueGenerator: fmt::Debug {
    fn generate(&self) -> Value;
}

/// Generates an empty map.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapGenerator;

impl ValueGenerator for MapGenerator {
    fn generate(&self) -> Value {
        Value::empty_map()
    }
}

/// Generates a copy of a prototype value, e.g. a map of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct PrototypeGenerator(pub Value);

impl ValueGenerator for PrototypeGenerator {
    fn generate(&self) -> Value {
        self.0.clone()
    }
}

#[derive(Clone)]
pub struct FnGenerator(Rc<dyn Fn() -> Value>);

impl FnGenerator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Value + 'static,
    {
        Self(Rc::new(f))
    }
}

impl fmt::Debug for FnGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnGenerator").finish()
    }
}

impl ValueGenerator for FnGenerator {
    fn generate(&self) -> Value {
        (self.0)()
    }
}
