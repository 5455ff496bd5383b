//! Data model shared by every element.
//!
//! This module contains:
//! - Dynamic values (HTTP payloads, element values, plain entities)
//! - Property access (accessors, hydrators, extractors)

pub mod access;
pub mod value;

pub use access::{Extractor, FnExtractor, FnHydrator, Hydrator, Property, PropertyAccess};
pub use value::{Map, Value};
