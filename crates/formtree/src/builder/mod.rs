//! Fluent definition of form trees.
//!
//! ```
//! use formtree::builder::FormBuilder;
//! use formtree::{Element, Value};
//!
//! let mut form = FormBuilder::new()
//!     .string("password", |f| f.required().length(Some(8), None))
//!     .string("confirm", |f| f.depends(["password"]).equal_to("password").detached())
//!     .build();
//!
//! assert!(form.submit(Value::map([("password", "correct horse"), ("confirm", "correct horse")])));
//! assert_eq!(form.value(), Value::map([("password", "correct horse")]));
//! ```

mod child;
mod element;
mod form;

use crate::element::{ArrayElement, Element, Form, Leaf, LeafType};

pub use child::ChildBuilder;
pub use element::{ArrayBuilder, LeafBuilder};
pub use form::FormBuilder;

/// Produces an element to put in a child.
pub trait ElementBuilder {
    fn build_element(self) -> Box<dyn Element>;
}

impl ElementBuilder for Box<dyn Element> {
    fn build_element(self) -> Box<dyn Element> {
        self
    }
}

impl ElementBuilder for Form {
    fn build_element(self) -> Box<dyn Element> {
        Box::new(self)
    }
}

impl ElementBuilder for ArrayElement {
    fn build_element(self) -> Box<dyn Element> {
        Box::new(self)
    }
}

impl<T: LeafType> ElementBuilder for Leaf<T> {
    fn build_element(self) -> Box<dyn Element> {
        Box::new(self)
    }
}
