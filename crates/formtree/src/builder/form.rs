use std::rc::Rc;

use crate::builder::{ArrayBuilder, ChildBuilder, ElementBuilder, LeafBuilder};
use crate::child::{Child, HttpFields};
use crate::element::{Element, Form, ValueGenerator};
use crate::transform::Transformer;
use crate::validate::Constraint;

/// Builds a [`Form`].
#[derive(Debug, Default)]
pub struct FormBuilder {
    form: Form,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn string<F>(self, name: &str, configure: F) -> Self
    where
        F: FnOnce(ChildBuilder<LeafBuilder<String>>) -> ChildBuilder<LeafBuilder<String>>,
    {
        self.child(name, LeafBuilder::new(), configure)
    }

    pub fn integer<F>(self, name: &str, configure: F) -> Self
    where
        F: FnOnce(ChildBuilder<LeafBuilder<i64>>) -> ChildBuilder<LeafBuilder<i64>>,
    {
        self.child(name, LeafBuilder::new(), configure)
    }

    pub fn float<F>(self, name: &str, configure: F) -> Self
    where
        F: FnOnce(ChildBuilder<LeafBuilder<f64>>) -> ChildBuilder<LeafBuilder<f64>>,
    {
        self.child(name, LeafBuilder::new(), configure)
    }

    pub fn boolean<F>(self, name: &str, configure: F) -> Self
    where
        F: FnOnce(ChildBuilder<LeafBuilder<bool>>) -> ChildBuilder<LeafBuilder<bool>>,
    {
        self.child(name, LeafBuilder::new(), configure)
    }

    /// Adds a nested form, submitted from the payload entry `name`.
    pub fn form<F>(self, name: &str, configure: F) -> Self
    where
        F: FnOnce(FormBuilder) -> FormBuilder,
    {
        self.child(name, configure(FormBuilder::new()), |child| child)
    }

    /// Adds a nested form whose fields are flattened into this form's
    /// payload as `<name>_<field>`.
    pub fn embedded<F>(self, name: &str, configure: F) -> Self
    where
        F: FnOnce(FormBuilder) -> FormBuilder,
    {
        let prefix = format!("{name}_");
        self.child(name, configure(FormBuilder::new()), |child| {
            child.http_fields(HttpFields::Prefixed(prefix))
        })
    }

    pub fn array<F>(self, name: &str, configure: F) -> Self
    where
        F: FnOnce(ArrayBuilder) -> ArrayBuilder,
    {
        self.child(name, configure(ArrayBuilder::new()), |child| child)
    }

    /// Adds a child around any element builder.
    pub fn child<B, F>(self, name: &str, element: B, configure: F) -> Self
    where
        B: ElementBuilder,
        F: FnOnce(ChildBuilder<B>) -> ChildBuilder<B>,
    {
        self.add(configure(ChildBuilder::new(name, element)).build())
    }

    pub fn add(mut self, child: Child) -> Self {
        self.form.add(child);
        self
    }

    /// Adds a constraint on the whole form value.
    pub fn satisfy(mut self, constraint: impl Constraint + 'static) -> Self {
        self.form.constraints_mut().push(constraint);
        self
    }

    pub fn transformer(mut self, transformer: impl Transformer + 'static) -> Self {
        self.form.set_transformer(Rc::new(transformer));
        self
    }

    pub fn generator(mut self, generator: impl ValueGenerator + 'static) -> Self {
        self.form.set_generator(Rc::new(generator));
        self
    }

    pub fn build(self) -> Form {
        self.form
    }
}

impl ElementBuilder for FormBuilder {
    fn build_element(self) -> Box<dyn Element> {
        Box::new(self.form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::PrototypeGenerator;
    use crate::model::Value;

    #[test]
    fn test_nested_form() {
        let mut form = FormBuilder::new()
            .string("name", |f| f.required())
            .form("address", |a| a.string("city", |f| f.required()))
            .build();

        assert!(form.submit(Value::map([
            ("name", Value::from("John")),
            ("address", Value::map([("city", "Paris")])),
        ])));
        assert_eq!(form.find("address.city").unwrap().element().value(), Value::from("Paris"));

        let address = form["address"].element().as_form().unwrap();
        assert_eq!(address.parent(), Some(form.id()));
    }

    #[test]
    fn test_embedded_form_reads_prefixed_fields() {
        let mut form = FormBuilder::new()
            .embedded("address", |a| a.string("city", |f| f).string("zip", |f| f))
            .build();

        assert!(form.submit(Value::map([("address_city", "Paris"), ("address_zip", "75001")])));
        assert_eq!(
            form.value(),
            Value::map([("address", Value::map([("city", "Paris"), ("zip", "75001")]))])
        );
        assert_eq!(
            form.http_value(),
            Value::map([("address_city", "Paris"), ("address_zip", "75001")])
        );
    }

    #[test]
    fn test_array_of_forms() {
        let mut form = FormBuilder::new()
            .array("items", |a| a.form(|f| f.integer("qty", |q| q.required())).count(Some(1), None))
            .build();

        assert!(form.submit(Value::map([(
            "items",
            Value::list([Value::map([("qty", "2")]), Value::map([("qty", "5")])]),
        )])));
        assert_eq!(form.find("items.1.qty").unwrap().element().value(), Value::Int(5));

        assert!(!form.submit(Value::map([("items", Value::Null)])));
        assert!(form.error().child("items").is_some());
    }

    #[test]
    fn test_generator() {
        let form = FormBuilder::new()
            .string("name", |f| f)
            .generator(PrototypeGenerator(Value::map([("kind", "person")])))
            .build();

        assert_eq!(form.value(), Value::map([("kind", Value::from("person")), ("name", Value::Null)]));
    }
}
