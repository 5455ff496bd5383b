//! The form container: a fixed set of named children submitted as a whole.

use std::any::Any;
use std::ops::Index;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::builder::FormBuilder;
use crate::child::Child;
use crate::dependency::DependencyTree;
use crate::element::generator::{MapGenerator, ValueGenerator};
use crate::element::{ContainerId, Element, Scope, find_child};
use crate::error::{AccessError, FormError};
use crate::model::{Map, PropertyAccess, Value};
use crate::transform::Transformer;
use crate::validate::Constraints;
use crate::view::FieldView;

/// A container of heterogeneous children.
///
/// Children are submitted in dependency order, so that a child can read the
/// values of the siblings it depends on through its [`Scope`]. Every child is
/// submitted, even after another one failed, so that all errors are reported
/// at once.
#[derive(Debug)]
pub struct Form {
    id: ContainerId,
    parent: Option<ContainerId>,
    children: DependencyTree,
    constraints: Constraints,
    transformer: Option<Rc<dyn Transformer>>,
    generator: Rc<dyn ValueGenerator>,
    error: FormError,
    valid: bool,
}

impl Default for Form {
    fn default() -> Self {
        Self {
            id: ContainerId::new(),
            parent: None,
            children: DependencyTree::new(),
            constraints: Constraints::new(),
            transformer: None,
            generator: Rc::new(MapGenerator),
            error: FormError::empty(),
            valid: false,
        }
    }
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> FormBuilder {
        FormBuilder::new()
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn parent(&self) -> Option<ContainerId> {
        self.parent
    }

    /// Adds a child. A child already owned by another container is copied.
    pub fn add(&mut self, mut child: Child) {
        if let Some(copy) = child.set_parent(self.id) {
            child = copy;
        }
        self.children.add(child);
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.children.remove(name)
    }

    pub fn constraints_mut(&mut self) -> &mut Constraints {
        &mut self.constraints
    }

    pub fn set_transformer(&mut self, transformer: Rc<dyn Transformer>) {
        self.transformer = Some(transformer);
    }

    pub fn set_generator(&mut self, generator: Rc<dyn ValueGenerator>) {
        self.generator = generator;
    }

    pub fn get(&self, name: &str) -> Option<&Child> {
        self.children.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Child> {
        self.children.get_mut(name)
    }

    /// Looks up a nested child by a dot-separated path, walking through
    /// nested forms and array slots (`"address.city"`, `"tags.0"`).
    pub fn find(&self, path: &str) -> Option<&Child> {
        find_child(&self.children, path)
    }

    pub fn children(&self) -> &DependencyTree {
        &self.children
    }

    /// Views of every child, in display order.
    pub fn views(&self) -> Vec<FieldView> {
        self.children.forward_iter().map(Child::view).collect()
    }

    /// Imports the properties of `entity` into every child.
    ///
    /// Properties that cannot be read are reported in [`Element::error`]
    /// under the child's name.
    pub fn import_entity(&mut self, entity: &dyn PropertyAccess) {
        for child in self.children.values_mut() {
            child.import(entity);
        }

        self.error = FormError::aggregate(
            self.children
                .forward_iter()
                .map(|child| (child.name(), child.error().clone())),
        );
        self.valid &= self.error.is_empty();
    }

    /// Writes every child value into `target`.
    pub fn fill(&self, target: &mut dyn PropertyAccess) -> Result<(), AccessError> {
        for child in self.children.forward_iter() {
            child.fill(target)?;
        }
        Ok(())
    }

    /// Attaches the form to `parent`.
    ///
    /// Same contract as [`Child::set_parent`]: a form owned by another
    /// container is not modified, a copy attached to `parent` is returned.
    pub fn set_parent(&mut self, parent: ContainerId) -> Option<Form> {
        match self.parent {
            None => {
                self.parent = Some(parent);
                None
            }
            Some(current) if current == parent => None,
            Some(_) => Some(self.reparented(Some(parent))),
        }
    }

    /// Deep copy with a fresh identity, attached to `parent`.
    pub fn reparented(&self, parent: Option<ContainerId>) -> Form {
        let id = ContainerId::new();
        Form {
            id,
            parent,
            children: self.children.duplicate(id),
            constraints: self.constraints.clone(),
            transformer: self.transformer.clone(),
            generator: self.generator.clone(),
            error: self.error.clone(),
            valid: self.valid,
        }
    }

    /// Generates the value and hydrates every child into it. Children that
    /// cannot be written are left out of the value and keyed in the error.
    fn hydrate(&self) -> (Value, FormError) {
        let mut value = self.generator.generate();
        let mut error = FormError::empty();
        for child in self.children.forward_iter() {
            if let Err(err) = child.fill(&mut value) {
                error.add_child(child.name(), err.into());
            }
        }
        (value, error)
    }

    fn submit_children(&mut self, data: &Value, scope: &Scope<'_>) -> usize {
        let order: Vec<String> = self.children.reverse_names().map(str::to_string).collect();
        let mut resolved = Map::new();
        let mut failed = 0;

        for name in order {
            let Some(child) = self.children.get_mut(&name) else {
                continue;
            };

            let nested = scope.nest(&resolved);
            if !child.submit(data, &nested) {
                failed += 1;
            }

            let value = child.element().value();
            resolved.insert(name, value);
        }

        failed
    }
}

impl Element for Form {
    fn submit_scoped(&mut self, data: Value, scope: &Scope<'_>) -> bool {
        self.valid = false;
        self.error = FormError::empty();

        let data = match &self.transformer {
            Some(transformer) => match transformer.from_http(data) {
                Ok(data) => data,
                Err(err) => {
                    for child in self.children.values_mut() {
                        child.clear();
                    }
                    self.error = err.into();
                    debug!(form = %self.id, "form transformer rejected the submitted value");
                    return false;
                }
            },
            None => data,
        };
        let data = match data {
            Value::Map(_) => data,
            _ => Value::empty_map(),
        };

        let failed = self.submit_children(&data, scope);

        self.error = if failed > 0 {
            FormError::aggregate(
                self.children
                    .forward_iter()
                    .map(|child| (child.name(), child.error().clone())),
            )
        } else {
            let (value, error) = self.hydrate();
            if error.is_empty() {
                self.constraints.validate(&value, scope)
            } else {
                for (name, child_error) in error.children() {
                    if let Some(child) = self.children.get_mut(name) {
                        child.set_error(child_error.clone());
                    }
                }
                error
            }
        };
        self.valid = self.error.is_empty();

        debug!(form = %self.id, valid = self.valid, failed, "form submitted");
        self.valid
    }

    fn import(&mut self, value: Value) {
        self.import_entity(&value);
    }

    /// Children that cannot be hydrated are left out. A submit reports them.
    fn value(&self) -> Value {
        let (value, error) = self.hydrate();
        if !error.is_empty() {
            debug!(form = %self.id, failed = error.children().len(), "form value is incomplete");
        }
        value
    }

    fn http_value(&self) -> Value {
        let mut fields = Map::new();
        for child in self.children.forward_iter() {
            fields.extend(child.http_fields());
        }

        let value = Value::Map(fields);
        match &self.transformer {
            Some(transformer) => transformer.to_http(value.clone()).unwrap_or_else(|err| {
                warn!(form = %self.id, error = %err, "cannot transform form value to http");
                value
            }),
            None => value,
        }
    }

    fn valid(&self) -> bool {
        self.valid
    }

    fn error(&self) -> &FormError {
        &self.error
    }

    fn constraint_codes(&self) -> Vec<&'static str> {
        self.constraints.codes()
    }

    fn duplicate(&self, parent: Option<ContainerId>) -> Box<dyn Element> {
        Box::new(self.reparented(parent))
    }

    fn attach(&mut self, parent: ContainerId) {
        self.parent = Some(parent);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Index<&str> for Form {
    type Output = Child;

    /// # Panics
    ///
    /// Panics if there is no child with this name.
    fn index(&self, name: &str) -> &Child {
        &self.children[name]
    }
}
