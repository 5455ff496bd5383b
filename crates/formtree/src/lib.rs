//! formtree: declarative form trees with dependency-ordered submission.
//!
//! A form is a tree of elements. Leaves hold scalars; containers ([`Form`],
//! [`ArrayElement`]) hold named children. Submitting an HTTP shaped value
//! filters, converts and validates it all the way down, and the resulting
//! value can be hydrated into an entity.
//!
//! # Overview
//!
//! - **Dependency ordering**: a child may declare siblings it depends on; they
//!   are always submitted before it, so its constraints can read their values
//! - **Structured errors**: every element exposes a [`FormError`] tree keyed by
//!   child name
//! - **Copy-on-write sharing**: attaching a child or container that already
//!   belongs elsewhere yields an independent copy
//!
//! # Quick Start
//!
//! ```rust
//! use formtree::{Element, FormBuilder, Value};
//!
//! let mut form = FormBuilder::new()
//!     .string("name", |f| f.trim().required())
//!     .integer("age", |f| f.range(Some(0.0), None))
//!     .array("tags", |a| a.string(|s| s.length(None, Some(10))))
//!     .build();
//!
//! let valid = form.submit(Value::map([
//!     ("name", Value::from("  Ada ")),
//!     ("age", Value::from("36")),
//!     ("tags", Value::list(["math", "", "engines"])),
//! ]));
//!
//! assert!(valid);
//! assert_eq!(form.value().item("name"), Some(&Value::from("Ada")));
//! assert_eq!(
//!     form.value().item("tags"),
//!     Some(&Value::map([("0", "math"), ("2", "engines")]))
//! );
//! ```
//!
//! # Modules
//!
//! - [`model`]: dynamic values and property access
//! - [`dependency`]: level layering and the ordered children collection
//! - [`child`]: named slots, HTTP field mapping and filters
//! - [`element`]: the element trait, leaves, forms and arrays
//! - [`builder`]: fluent form definition
//! - [`validate`]: constraints
//! - [`transform`]: HTTP/element value transformers
//! - [`error`]: error types
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.

pub mod builder;
pub mod child;
pub mod dependency;
pub mod element;
pub mod error;
pub mod model;
pub mod transform;
pub mod validate;
pub mod view;

// Re-export commonly used types at crate root
pub use builder::{ArrayBuilder, ChildBuilder, ElementBuilder, FormBuilder, LeafBuilder};
pub use child::{Child, HttpFields};
pub use dependency::{DependencyTree, Levels};
pub use element::{
    ArrayElement, ArrayOptions, BooleanElement, ContainerId, Element, FloatElement, Form,
    IntegerElement, Leaf, Scope, StringElement,
};
pub use error::{AccessError, ErrorMessage, FormError, TransformError};
pub use model::{Map, PropertyAccess, Value};
pub use view::FieldView;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
