//! Property access: reading and writing named properties of entities.
//!
//! Two accessor flavours exist and are chosen when a form is defined:
//! - the associative-map accessor, implemented here for [`Value`];
//! - structured records, where the application implements [`PropertyAccess`]
//!   for its own type.
//!
//! Children use an [`Extractor`] to read their value off an entity on import
//! and a [`Hydrator`] to write it back when a value is generated.

use std::fmt;
use std::rc::Rc;

use crate::error::AccessError;
use crate::model::{Map, Value};

/// Read and write access to properties addressed by a dot-separated path.
pub trait PropertyAccess {
    /// Reads the property at `path`.
    fn get(&self, path: &str) -> Result<Value, AccessError>;

    /// Writes the property at `path`.
    fn set(&mut self, path: &str, value: Value) -> Result<(), AccessError>;
}

impl PropertyAccess for Value {
    /// Missing entries read as [`Value::Null`]. Traversing a scalar is an error.
    fn get(&self, path: &str) -> Result<Value, AccessError> {
        if path.is_empty() {
            return Err(AccessError::EmptyPath);
        }

        let mut current = self;
        for segment in path.split('.') {
            match current {
                Value::Map(map) => match map.get(segment) {
                    Some(next) => current = next,
                    None => return Ok(Value::Null),
                },
                Value::Null => return Ok(Value::Null),
                _ => {
                    return Err(AccessError::NotAContainer {
                        path: path.to_string(),
                    });
                }
            }
        }

        Ok(current.clone())
    }

    /// Intermediate maps are created on demand; a null target becomes a map.
    fn set(&mut self, path: &str, value: Value) -> Result<(), AccessError> {
        if path.is_empty() {
            return Err(AccessError::EmptyPath);
        }

        let mut current = self;
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            if current.is_null() {
                *current = Value::Map(Map::new());
            }

            let Value::Map(map) = current else {
                return Err(AccessError::NotAContainer {
                    path: path.to_string(),
                });
            };

            if segments.peek().is_none() {
                map.insert(segment.to_string(), value);
                return Ok(());
            }

            current = map.entry(segment.to_string()).or_insert(Value::Null);
        }

        Ok(())
    }
}

/// Writes an element value into an entity.
pub trait Hydrator: fmt::Debug {
    fn hydrate(&self, target: &mut dyn PropertyAccess, value: Value) -> Result<(), AccessError>;
}

/// Reads an element value out of an entity.
pub trait Extractor: fmt::Debug {
    fn extract(&self, source: &dyn PropertyAccess) -> Result<Value, AccessError>;
}

/// Accessor bound to a single property path. Used both ways by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    path: String,
}

impl Property {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Hydrator for Property {
    fn hydrate(&self, target: &mut dyn PropertyAccess, value: Value) -> Result<(), AccessError> {
        target.set(&self.path, value)
    }
}

impl Extractor for Property {
    fn extract(&self, source: &dyn PropertyAccess) -> Result<Value, AccessError> {
        source.get(&self.path)
    }
}

type HydrateFn = dyn Fn(&mut dyn PropertyAccess, Value) -> Result<(), AccessError>;
type ExtractFn = dyn Fn(&dyn PropertyAccess) -> Result<Value, AccessError>;

/// Hydrator backed by a closure.
#[derive(Clone)]
pub struct FnHydrator(Rc<HydrateFn>);

impl FnHydrator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut dyn PropertyAccess, Value) -> Result<(), AccessError> + 'static,
    {
        Self(Rc::new(f))
    }
}

impl fmt::Debug for FnHydrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHydrator").finish_non_exhaustive()
    }
}

impl Hydrator for FnHydrator {
    fn hydrate(&self, target: &mut dyn PropertyAccess, value: Value) -> Result<(), AccessError> {
        (self.0)(target, value)
    }
}

/// Extractor backed by a closure.
#[derive(Clone)]
pub struct FnExtractor(Rc<ExtractFn>);

impl FnExtractor {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn PropertyAccess) -> Result<Value, AccessError> + 'static,
    {
        Self(Rc::new(f))
    }
}

impl fmt::Debug for FnExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnExtractor").finish_non_exhaustive()
    }
}

impl Extractor for FnExtractor {
    fn extract(&self, source: &dyn PropertyAccess) -> Result<Value, AccessError> {
        (self.0)(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_nested_path() {
        let entity = Value::map([("address", Value::map([("city", "Paris")]))]);

        assert_eq!(entity.get("address.city"), Ok(Value::from("Paris")));
        assert_eq!(entity.get("address.zip"), Ok(Value::Null));
        assert_eq!(entity.get("missing.deep"), Ok(Value::Null));
        assert_eq!(
            entity.get("address.city.name"),
            Err(AccessError::NotAContainer {
                path: "address.city.name".to_string()
            })
        );
        assert_eq!(entity.get(""), Err(AccessError::EmptyPath));
    }

    #[test]
    fn test_set_creates_intermediate_maps() {
        let mut entity = Value::Null;
        entity.set("address.city", Value::from("Lyon")).unwrap();
        entity.set("name", Value::from("Bob")).unwrap();

        assert_eq!(entity.get("address.city"), Ok(Value::from("Lyon")));
        assert_eq!(entity.get("name"), Ok(Value::from("Bob")));
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut entity = Value::map([("name", "Bob")]);
        let result = entity.set("name.first", Value::from("B"));
        assert!(matches!(result, Err(AccessError::NotAContainer { .. })));
    }

    #[test]
    fn test_closure_accessors() {
        let extractor = FnExtractor::new(|source| {
            let first = source.get("first")?;
            let last = source.get("last")?;
            Ok(Value::from(format!("{first} {last}")))
        });
        let hydrator = FnHydrator::new(|target, value| target.set("full", value));

        let mut entity = Value::map([("first", "Ada"), ("last", "Lovelace")]);
        let full = extractor.extract(&entity).unwrap();
        hydrator.hydrate(&mut entity, full).unwrap();

        assert_eq!(entity.get("full"), Ok(Value::from("Ada Lovelace")));
    }
}
