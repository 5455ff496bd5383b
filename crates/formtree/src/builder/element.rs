use std::rc::Rc;

use crate::builder::{ElementBuilder, FormBuilder};
use crate::element::{ArrayElement, ArrayOptions, Element, Leaf, LeafType, StringElement};
use crate::transform::{Delimited, Transformer};
use crate::validate::{Constraint, Constraints, Count, EqualTo, Length, Range, Required};

/// Builds a [`Leaf`].
#[derive(Debug, Default)]
pub struct LeafBuilder<T: LeafType> {
    leaf: Leaf<T>,
}

impl<T: LeafType> LeafBuilder<T> {
    pub fn new() -> Self {
        Self { leaf: Leaf::new() }
    }

    pub fn required(self) -> Self {
        self.satisfy(Required::new())
    }

    pub fn length(self, min: Option<usize>, max: Option<usize>) -> Self {
        self.satisfy(Length::new(min, max))
    }

    pub fn range(self, min: Option<f64>, max: Option<f64>) -> Self {
        self.satisfy(Range::new(min, max))
    }

    /// Requires the value to equal the sibling `field`, which should be
    /// declared as a dependency.
    pub fn equal_to(self, field: impl Into<String>) -> Self {
        self.satisfy(EqualTo::new(field))
    }

    pub fn satisfy(mut self, constraint: impl Constraint + 'static) -> Self {
        self.leaf.constraints_mut().push(constraint);
        self
    }

    pub fn transformer(mut self, transformer: impl Transformer + 'static) -> Self {
        self.leaf.set_transformer(Rc::new(transformer));
        self
    }

    pub fn build(self) -> Leaf<T> {
        self.leaf
    }
}

impl<T: LeafType> ElementBuilder for LeafBuilder<T> {
    fn build_element(self) -> Box<dyn Element> {
        Box::new(self.leaf)
    }
}

/// Builds an [`ArrayElement`]. The template defaults to a string leaf.
#[derive(Debug, Default)]
pub struct ArrayBuilder {
    template: Option<Box<dyn Element>>,
    constraints: Constraints,
    transformer: Option<Rc<dyn Transformer>>,
    options: ArrayOptions,
}

impl ArrayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the built element as the template of every slot.
    pub fn element(mut self, builder: impl ElementBuilder) -> Self {
        self.template = Some(builder.build_element());
        self
    }

    pub fn string<F>(self, configure: F) -> Self
    where
        F: FnOnce(LeafBuilder<String>) -> LeafBuilder<String>,
    {
        self.element(configure(LeafBuilder::new()))
    }

    pub fn integer<F>(self, configure: F) -> Self
    where
        F: FnOnce(LeafBuilder<i64>) -> LeafBuilder<i64>,
    {
        self.element(configure(LeafBuilder::new()))
    }

    pub fn form<F>(self, configure: F) -> Self
    where
        F: FnOnce(FormBuilder) -> FormBuilder,
    {
        self.element(configure(FormBuilder::new()))
    }

    pub fn count(self, min: Option<usize>, max: Option<usize>) -> Self {
        self.satisfy(Count::new(min, max))
    }

    pub fn satisfy(mut self, constraint: impl Constraint + 'static) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn transformer(mut self, transformer: impl Transformer + 'static) -> Self {
        self.transformer = Some(Rc::new(transformer));
        self
    }

    /// Reads the array from a single delimited string.
    pub fn delimited(self, separator: impl Into<String>) -> Self {
        self.transformer(Delimited::new(separator))
    }

    pub fn options(mut self, options: ArrayOptions) -> Self {
        self.options = options;
        self
    }

    pub fn keep_empty_values(self) -> Self {
        self.options(ArrayOptions::keep_empty())
    }

    pub fn build(self) -> ArrayElement {
        let template = self
            .template
            .unwrap_or_else(|| Box::new(StringElement::new()));

        let mut array = ArrayElement::new(template).with_options(self.options);
        *array.constraints_mut() = self.constraints;
        if let Some(transformer) = self.transformer {
            array.set_transformer(transformer);
        }
        array
    }
}

impl ElementBuilder for ArrayBuilder {
    fn build_element(self) -> Box<dyn Element> {
        Box::new(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use crate::validate::{CODE_LENGTH, CODE_REQUIRED};

    #[test]
    fn test_leaf_builder() {
        let leaf = LeafBuilder::<String>::new().required().length(None, Some(2)).build();
        assert_eq!(leaf.constraint_codes(), vec![CODE_REQUIRED, CODE_LENGTH]);
        assert!(leaf.required());
    }

    #[test]
    fn test_array_builder_defaults_to_strings() {
        let mut array = ArrayBuilder::new().count(None, Some(1)).build();
        assert!(array.submit(Value::list(["a"])));
        assert!(!array.submit(Value::list(["a", "b"])));
        assert!(array.options().filter_empty_values);
    }

    #[test]
    fn test_array_builder_keep_empty() {
        let mut array = ArrayBuilder::new().integer(|i| i).keep_empty_values().build();
        assert!(array.submit(Value::list([Value::Null, Value::from("2")])));
        assert_eq!(array.len(), 2);
    }
}
