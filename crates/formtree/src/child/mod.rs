//! Named slots of a container.
//!
//! A [`Child`] binds an element to a name inside its container. It knows
//! which HTTP fields feed the element, which filters and default apply, how
//! the element value maps onto an entity property, and which siblings must be
//! submitted before it.

pub mod fields;
pub mod filter;

use std::rc::Rc;

use tracing::warn;

use crate::element::{ContainerId, Element, Scope};
use crate::error::{AccessError, FormError};
use crate::model::{Extractor, Hydrator, Map, Property, PropertyAccess, Value};
use crate::view::FieldView;

pub use fields::HttpFields;
pub use filter::{EmptyArrayValues, Filter, FnFilter, Trim};

#[derive(Debug)]
pub struct Child {
    name: String,
    element: Box<dyn Element>,
    parent: Option<ContainerId>,
    fields: HttpFields,
    filters: Vec<Rc<dyn Filter>>,
    default: Option<Value>,
    hydrator: Option<Rc<dyn Hydrator>>,
    extractor: Option<Rc<dyn Extractor>>,
    dependencies: Vec<String>,
    error: FormError,
}

impl Child {
    /// A detached child reading the HTTP field `name` and bound to the
    /// entity property `name`.
    pub fn new(name: impl Into<String>, element: Box<dyn Element>) -> Self {
        let name = name.into();
        let property = Rc::new(Property::new(name.clone()));

        Self {
            fields: HttpFields::Offset(name.clone()),
            name,
            element,
            parent: None,
            filters: Vec::new(),
            default: None,
            hydrator: Some(property.clone()),
            extractor: Some(property),
            dependencies: Vec::new(),
            error: FormError::empty(),
        }
    }

    pub fn with_dependencies<I>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.dependencies.extend(dependencies.into_iter().map(Into::into));
        self
    }

    pub fn with_fields(mut self, fields: HttpFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_filter(self, filter: impl Filter + 'static) -> Self {
        self.with_shared_filter(Rc::new(filter))
    }

    pub fn with_shared_filter(mut self, filter: Rc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// HTTP value used when the filtered input is null.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_hydrator(mut self, hydrator: Rc<dyn Hydrator>) -> Self {
        self.hydrator = Some(hydrator);
        self
    }

    pub fn with_extractor(mut self, extractor: Rc<dyn Extractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Unbinds the child from entities: it neither imports nor hydrates.
    pub fn detached(mut self) -> Self {
        self.hydrator = None;
        self.extractor = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element(&self) -> &dyn Element {
        self.element.as_ref()
    }

    pub fn element_mut(&mut self) -> &mut dyn Element {
        self.element.as_mut()
    }

    pub fn parent(&self) -> Option<ContainerId> {
        self.parent
    }

    pub fn fields(&self) -> &HttpFields {
        &self.fields
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Error of the last submit.
    pub fn error(&self) -> &FormError {
        &self.error
    }

    /// Attaches the child to `parent`.
    ///
    /// A detached child is attached in place and `None` is returned, as is
    /// the case when it already belongs to `parent`. A child owned by another
    /// container is left untouched and a copy attached to `parent` is
    /// returned instead.
    pub fn set_parent(&mut self, parent: ContainerId) -> Option<Child> {
        match self.parent {
            None => {
                self.parent = Some(parent);
                self.element.attach(parent);
                None
            }
            Some(current) if current == parent => None,
            Some(_) => Some(self.reparented(parent)),
        }
    }

    /// Copy of the child attached to `parent`, with a duplicated element.
    pub fn reparented(&self, parent: ContainerId) -> Child {
        Child {
            name: self.name.clone(),
            element: self.element.duplicate(Some(parent)),
            parent: Some(parent),
            fields: self.fields.clone(),
            filters: self.filters.clone(),
            default: self.default.clone(),
            hydrator: self.hydrator.clone(),
            extractor: self.extractor.clone(),
            dependencies: self.dependencies.clone(),
            error: self.error.clone(),
        }
    }

    /// Submits the child's slice of the parent `payload`.
    pub fn submit(&mut self, payload: &Value, scope: &Scope<'_>) -> bool {
        let value = self.fields.extract(payload);
        self.submit_value(value, scope)
    }

    /// Submits an already extracted HTTP value.
    pub fn submit_value(&mut self, value: Value, scope: &Scope<'_>) -> bool {
        let mut value = self
            .filters
            .iter()
            .fold(value, |value, filter| filter.filter(value));

        if value.is_null() {
            if let Some(default) = &self.default {
                value = default.clone();
            }
        }

        let valid = self.element.submit_scoped(value, scope);
        self.error = self.element.error().clone();
        valid
    }

    /// Imports the child's property of `entity` into the element.
    ///
    /// When the property cannot be read the element is cleared and the
    /// access failure becomes the child's error.
    pub fn import(&mut self, entity: &dyn PropertyAccess) {
        let Some(extractor) = &self.extractor else {
            return;
        };

        match extractor.extract(entity) {
            Ok(value) => {
                self.element.import(value);
                self.error = self.element.error().clone();
            }
            Err(err) => {
                warn!(field = %self.name, error = %err, "cannot extract field value");
                self.element.import(Value::Null);
                self.error = err.into();
            }
        }
    }

    /// Clears the element value and the last error.
    pub(crate) fn clear(&mut self) {
        self.element.import(Value::Null);
        self.error = FormError::empty();
    }

    /// Replaces the child's error, for failures found by its container.
    pub(crate) fn set_error(&mut self, error: FormError) {
        self.error = error;
    }

    /// Writes the element value into `target`.
    pub fn fill(&self, target: &mut dyn PropertyAccess) -> Result<(), AccessError> {
        match &self.hydrator {
            Some(hydrator) => hydrator.hydrate(target, self.element.value()),
            None => Ok(()),
        }
    }

    /// HTTP fields of the child, keyed as in the parent payload.
    pub fn http_fields(&self) -> Map {
        self.fields.format(self.element.http_value())
    }

    pub fn view(&self) -> FieldView {
        FieldView::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{IntegerElement, StringElement};
    use crate::error::CODE_ACCESS;
    use crate::model::FnExtractor;
    use crate::validate::Required;

    fn string_child(name: &str) -> Child {
        Child::new(name, Box::new(StringElement::new()))
    }

    #[test]
    fn test_submit_applies_filters_then_default() {
        let mut child = string_child("name").with_filter(Trim).with_default("anonymous");

        assert!(child.submit(&Value::map([("name", "  John ")]), &Scope::root()));
        assert_eq!(child.element().value(), Value::from("John"));

        assert!(child.submit(&Value::empty_map(), &Scope::root()));
        assert_eq!(child.element().value(), Value::from("anonymous"));
    }

    #[test]
    fn test_default_only_replaces_null() {
        let mut child = string_child("name").with_default("anonymous");
        assert!(child.submit(&Value::map([("name", "")]), &Scope::root()));
        assert_eq!(child.element().value(), Value::from(""));
    }

    #[test]
    fn test_submit_records_error() {
        let mut child = Child::new(
            "name",
            Box::new(StringElement::new().with_constraint(Required::new())),
        );

        assert!(!child.submit(&Value::Null, &Scope::root()));
        assert!(!child.error().is_empty());

        assert!(child.submit(&Value::map([("name", "x")]), &Scope::root()));
        assert!(child.error().is_empty());
    }

    #[test]
    fn test_set_parent_copy_on_write() {
        let first = ContainerId::new();
        let second = ContainerId::new();
        let mut child = string_child("name");
        child.element_mut().import(Value::from("kept"));

        assert!(child.set_parent(first).is_none());
        assert_eq!(child.parent(), Some(first));
        assert!(child.set_parent(first).is_none());

        let copy = child.set_parent(second).unwrap();
        assert_eq!(copy.parent(), Some(second));
        assert_eq!(child.parent(), Some(first));
        assert_eq!(copy.element().value(), Value::from("kept"));
    }

    #[test]
    fn test_import_and_fill() {
        let mut child = Child::new("age", Box::new(IntegerElement::new()));
        child.import(&Value::map([("age", 31)]));
        assert_eq!(child.element().value(), Value::Int(31));

        let mut target = Value::Null;
        child.fill(&mut target).unwrap();
        assert_eq!(target, Value::map([("age", 31)]));
    }

    #[test]
    fn test_extractor_failure_is_recorded() {
        let mut child = string_child("name").with_extractor(Rc::new(FnExtractor::new(|_| {
            Err(AccessError::Custom {
                path: "name".into(),
                message: "locked".into(),
            })
        })));
        child.element_mut().import(Value::from("before"));

        child.import(&Value::empty_map());
        assert_eq!(child.element().value(), Value::Null);
        assert_eq!(child.error().code(), Some(CODE_ACCESS));
        assert_eq!(child.error().global_message(), Some("cannot access \"name\": locked"));
    }

    #[test]
    fn test_successful_import_clears_error() {
        let mut child = Child::new(
            "name",
            Box::new(StringElement::new().with_constraint(Required::new())),
        );
        assert!(!child.submit(&Value::Null, &Scope::root()));
        assert!(!child.error().is_empty());

        child.import(&Value::map([("name", "Ada")]));
        assert!(child.error().is_empty());
        assert_eq!(child.element().value(), Value::from("Ada"));
    }

    #[test]
    fn test_detached_child_is_not_bound() {
        let mut child = string_child("confirm").detached();
        child.element_mut().import(Value::from("x"));

        child.import(&Value::map([("confirm", "y")]));
        assert_eq!(child.element().value(), Value::from("x"));

        let mut target = Value::empty_map();
        child.fill(&mut target).unwrap();
        assert_eq!(target, Value::empty_map());
    }

    #[test]
    fn test_http_fields() {
        let mut child = string_child("name");
        child.element_mut().import(Value::from("John"));
        assert_eq!(
            child.http_fields(),
            Map::from([("name".to_string(), Value::from("John"))])
        );
    }
}
