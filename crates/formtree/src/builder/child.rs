use std::rc::Rc;

use crate::builder::{ArrayBuilder, ElementBuilder, LeafBuilder};
use crate::child::{Child, Filter, HttpFields, Trim};
use crate::error::AccessError;
use crate::model::{
    Extractor, FnExtractor, FnHydrator, Hydrator, Property, PropertyAccess, Value,
};
use crate::element::LeafType;
use crate::transform::Transformer;
use crate::validate::Constraint;

/// Builds a [`Child`] around the element built by `B`.
///
/// Child level options are available for every element; options of the
/// element itself are reachable through [`ChildBuilder::element`], and the
/// common ones are forwarded for leaves and arrays.
#[derive(Debug)]
pub struct ChildBuilder<B: ElementBuilder> {
    name: String,
    element: B,
    fields: Option<HttpFields>,
    filters: Vec<Rc<dyn Filter>>,
    default: Option<Value>,
    hydrator: Option<Rc<dyn Hydrator>>,
    extractor: Option<Rc<dyn Extractor>>,
    dependencies: Vec<String>,
    detached: bool,
}

impl<B: ElementBuilder> ChildBuilder<B> {
    pub fn new(name: impl Into<String>, element: B) -> Self {
        Self {
            name: name.into(),
            element,
            fields: None,
            filters: Vec::new(),
            default: None,
            hydrator: None,
            extractor: None,
            dependencies: Vec::new(),
            detached: false,
        }
    }

    /// HTTP value used when nothing (or null) is submitted.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Rc::new(filter));
        self
    }

    pub fn trim(self) -> Self {
        self.filter(Trim)
    }

    /// Siblings to submit before this child.
    pub fn depends<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.dependencies.extend(names.into_iter().map(Into::into));
        self
    }

    /// Reads the value off entities with a closure.
    pub fn getter<F>(self, getter: F) -> Self
    where
        F: Fn(&dyn PropertyAccess) -> Result<Value, AccessError> + 'static,
    {
        self.extractor(FnExtractor::new(getter))
    }

    /// Writes the value into entities with a closure.
    pub fn setter<F>(self, setter: F) -> Self
    where
        F: Fn(&mut dyn PropertyAccess, Value) -> Result<(), AccessError> + 'static,
    {
        self.hydrator(FnHydrator::new(setter))
    }

    /// Binds the child to another entity property, both ways.
    pub fn property(self, path: impl Into<String>) -> Self {
        let property = Property::new(path);
        self.extractor(property.clone()).hydrator(property)
    }

    pub fn hydrator(mut self, hydrator: impl Hydrator + 'static) -> Self {
        self.hydrator = Some(Rc::new(hydrator));
        self
    }

    pub fn extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractor = Some(Rc::new(extractor));
        self
    }

    /// The child is not bound to any entity property.
    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    pub fn http_fields(mut self, fields: HttpFields) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Configures the element builder.
    pub fn element<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(B) -> B,
    {
        self.element = configure(self.element);
        self
    }

    pub fn build(self) -> Child {
        let mut child = Child::new(self.name, self.element.build_element())
            .with_dependencies(self.dependencies);

        if let Some(fields) = self.fields {
            child = child.with_fields(fields);
        }
        for filter in self.filters {
            child = child.with_shared_filter(filter);
        }
        if let Some(default) = self.default {
            child = child.with_default(default);
        }
        if self.detached {
            child = child.detached();
        }
        if let Some(hydrator) = self.hydrator {
            child = child.with_hydrator(hydrator);
        }
        if let Some(extractor) = self.extractor {
            child = child.with_extractor(extractor);
        }

        child
    }
}

impl<T: LeafType> ChildBuilder<LeafBuilder<T>> {
    pub fn required(self) -> Self {
        self.element(LeafBuilder::required)
    }

    pub fn length(self, min: Option<usize>, max: Option<usize>) -> Self {
        self.element(|leaf| leaf.length(min, max))
    }

    pub fn range(self, min: Option<f64>, max: Option<f64>) -> Self {
        self.element(|leaf| leaf.range(min, max))
    }

    pub fn equal_to(self, field: impl Into<String>) -> Self {
        self.element(|leaf| leaf.equal_to(field))
    }

    pub fn satisfy(self, constraint: impl Constraint + 'static) -> Self {
        self.element(|leaf| leaf.satisfy(constraint))
    }

    pub fn transformer(self, transformer: impl Transformer + 'static) -> Self {
        self.element(|leaf| leaf.transformer(transformer))
    }
}

impl ChildBuilder<ArrayBuilder> {
    pub fn count(self, min: Option<usize>, max: Option<usize>) -> Self {
        self.element(|array| array.count(min, max))
    }
}
