//! The array container: a variable number of slots sharing one template.

use std::any::Any;
use std::ops::Index;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::child::{Child, EmptyArrayValues, Filter};
use crate::dependency::DependencyTree;
use crate::element::{ContainerId, Element, Scope, find_child};
use crate::error::FormError;
use crate::model::{Map, Value};
use crate::transform::Transformer;
use crate::validate::Constraints;

/// Options for [`ArrayElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayOptions {
    /// Drops empty entries before submission, and successfully submitted
    /// slots whose value is null afterwards.
    pub filter_empty_values: bool,
}

impl Default for ArrayOptions {
    fn default() -> Self {
        Self {
            filter_empty_values: true,
        }
    }
}

impl ArrayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every submitted entry gets a slot.
    pub fn keep_empty() -> Self {
        Self {
            filter_empty_values: false,
        }
    }
}

/// A container with one slot per entry of the submitted value.
///
/// Slots are duplicates of the template element keyed like the payload
/// (`"0"`, `"1"`, ... for a list). Offsets are kept: filtering out entry `1`
/// of a list leaves slots `"0"` and `"2"`.
///
/// Slots do not see each other: every slot is submitted in an empty sibling
/// frame, and the array's own siblings are reachable through
/// [`Scope::parent`].
#[derive(Debug)]
pub struct ArrayElement {
    id: ContainerId,
    parent: Option<ContainerId>,
    template: Box<dyn Element>,
    children: DependencyTree,
    constraints: Constraints,
    transformer: Option<Rc<dyn Transformer>>,
    options: ArrayOptions,
    error: FormError,
    valid: bool,
}

impl ArrayElement {
    pub fn new(template: Box<dyn Element>) -> Self {
        Self {
            id: ContainerId::new(),
            parent: None,
            template,
            children: DependencyTree::new(),
            constraints: Constraints::new(),
            transformer: None,
            options: ArrayOptions::default(),
            error: FormError::empty(),
            valid: false,
        }
    }

    pub fn with_options(mut self, options: ArrayOptions) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn parent(&self) -> Option<ContainerId> {
        self.parent
    }

    pub fn options(&self) -> ArrayOptions {
        self.options
    }

    pub fn template(&self) -> &dyn Element {
        self.template.as_ref()
    }

    pub fn constraints_mut(&mut self) -> &mut Constraints {
        &mut self.constraints
    }

    pub fn set_transformer(&mut self, transformer: Rc<dyn Transformer>) {
        self.transformer = Some(transformer);
    }

    pub fn get(&self, key: &str) -> Option<&Child> {
        self.children.get(key)
    }

    pub fn find(&self, path: &str) -> Option<&Child> {
        find_child(&self.children, path)
    }

    /// The slots, in payload order.
    pub fn children(&self) -> &DependencyTree {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Attaches the array to `parent`, with the same contract as
    /// [`Child::set_parent`].
    pub fn set_parent(&mut self, parent: ContainerId) -> Option<ArrayElement> {
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
    pub fn reparented(&self, parent: Option<ContainerId>) -> ArrayElement {
        let id = ContainerId::new();
        ArrayElement {
            id,
            parent,
            template: self.template.duplicate(Some(id)),
            children: self.children.duplicate(id),
            constraints: self.constraints.clone(),
            transformer: self.transformer.clone(),
            options: self.options,
            error: self.error.clone(),
            valid: self.valid,
        }
    }

    fn slot(&self, key: String) -> Child {
        let mut child = Child::new(key, self.template.duplicate(Some(self.id)));
        child.set_parent(self.id);
        child
    }
}

impl Element for ArrayElement {
    fn submit_scoped(&mut self, data: Value, scope: &Scope<'_>) -> bool {
        self.valid = false;
        self.error = FormError::empty();
        self.children = DependencyTree::new();

        let data = match &self.transformer {
            Some(transformer) => match transformer.from_http(data) {
                Ok(data) => data,
                Err(err) => {
                    self.error = err.into();
                    debug!(array = %self.id, "array transformer rejected the submitted value");
                    return false;
                }
            },
            None => data,
        };

        let mut data = Value::Map(data.into_entries());
        if self.options.filter_empty_values {
            data = EmptyArrayValues.filter(data);
        }

        let no_siblings = Map::new();
        let slot_scope = scope.nest(&no_siblings);

        let mut failed = 0;
        let mut pruned = 0;
        for (key, value) in data.into_entries() {
            let mut child = self.slot(key);
            let valid = child.submit_value(value, &slot_scope);

            if !valid {
                failed += 1;
            } else if self.options.filter_empty_values && child.element().value().is_null() {
                pruned += 1;
                continue;
            }

            self.children.add(child);
        }

        self.error = if failed > 0 {
            FormError::aggregate(
                self.children
                    .forward_iter()
                    .map(|child| (child.name(), child.error().clone())),
            )
        } else {
            self.constraints.validate(&self.value(), scope)
        };
        self.valid = self.error.is_empty();

        debug!(
            array = %self.id,
            valid = self.valid,
            slots = self.children.len(),
            failed,
            pruned,
            "array submitted"
        );
        self.valid
    }

    /// Replaces the slots with one per entry of `value`. Nothing is filtered.
    fn import(&mut self, value: Value) {
        self.children = DependencyTree::new();
        for (key, item) in value.into_entries() {
            let mut child = self.slot(key);
            child.element_mut().import(item);
            let error = child.element().error().clone();
            child.set_error(error);
            self.children.add(child);
        }

        self.error = FormError::aggregate(
            self.children
                .forward_iter()
                .map(|child| (child.name(), child.error().clone())),
        );
        self.valid &= self.error.is_empty();
    }

    fn value(&self) -> Value {
        Value::Map(
            self.children
                .forward_iter()
                .map(|child| (child.name().to_string(), child.element().value()))
                .collect(),
        )
    }

    fn http_value(&self) -> Value {
        let value = Value::Map(
            self.children
                .forward_iter()
                .map(|child| (child.name().to_string(), child.element().http_value()))
                .collect::<Map>(),
        );

        match &self.transformer {
            Some(transformer) => transformer.to_http(value.clone()).unwrap_or_else(|err| {
                warn!(array = %self.id, error = %err, "cannot transform array value to http");
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

impl Index<&str> for ArrayElement {
    type Output = Child;

    /// # Panics
    ///
    /// Panics if there is no slot with this key.
    fn index(&self, key: &str) -> &Child {
        &self.children[key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{IntegerElement, StringElement};
    use crate::error::TransformError;
    use crate::transform::{Delimited, FnTransformer};
    use crate::validate::{CODE_COUNT, CODE_NOT_EQUAL, Count, EqualTo, Required};

    fn strings() -> ArrayElement {
        ArrayElement::new(Box::new(StringElement::new()))
    }

    fn keys(array: &ArrayElement) -> Vec<&str> {
        array.children().forward_names().collect()
    }

    #[test]
    fn test_submit_list() {
        let mut array = strings();
        assert!(array.submit(Value::list(["a", "b"])));
        assert_eq!(array.value(), Value::list(["a", "b"]));
        assert_eq!(keys(&array), vec!["0", "1"]);
        assert_eq!(array["1"].parent(), Some(array.id()));
    }

    #[test]
    fn test_filter_keeps_offsets() {
        let mut array = strings();
        assert!(array.submit(Value::list(["a", "", "c"])));
        assert_eq!(keys(&array), vec!["0", "2"]);
        assert_eq!(array.value(), Value::map([("0", "a"), ("2", "c")]));
    }

    #[test]
    fn test_keep_empty_values() {
        let mut array = strings().with_options(ArrayOptions::keep_empty());
        assert!(array.submit(Value::list([Value::from("a"), Value::Null, Value::from("")])));
        assert_eq!(keys(&array), vec!["0", "1", "2"]);
        assert_eq!(array["1"].element().value(), Value::Null);
    }

    #[test]
    fn test_scalar_payload_is_wrapped() {
        let mut array = strings();
        assert!(array.submit(Value::from("alone")));
        assert_eq!(array.value(), Value::list(["alone"]));

        assert!(array.submit(Value::Null));
        assert!(array.is_empty());
    }

    #[test]
    fn test_submit_discards_previous_slots() {
        let mut array = strings();
        assert!(array.submit(Value::list(["a", "b", "c"])));
        assert!(array.submit(Value::list(["z"])));
        assert_eq!(array.len(), 1);
    }

    #[test]
    fn test_null_valued_slots_are_pruned() {
        let mut array = ArrayElement::new(Box::new(IntegerElement::new()));
        assert!(array.submit(Value::list([Value::from("1"), Value::from("  "), Value::from("3")])));
        assert_eq!(keys(&array), vec!["0", "2"]);
    }

    #[test]
    fn test_failing_slots_are_kept() {
        let mut array = ArrayElement::new(Box::new(
            IntegerElement::new().with_constraint(Required::new()),
        ));

        assert!(!array.submit(Value::list(["1", "x"])));
        assert_eq!(keys(&array), vec!["0", "1"]);
        assert!(array.error().child("1").is_some());
        assert!(array.error().child("0").is_none());
        assert_eq!(array.http_value(), Value::map([("0", Value::Int(1)), ("1", Value::from("x"))]));
    }

    #[test]
    fn test_count_runs_when_slots_pass() {
        let mut array = strings();
        array.constraints_mut().push(Count::new(Some(1), Some(2)));

        assert!(!array.submit(Value::list(["a", "b", "c"])));
        assert_eq!(array.error().code(), Some(CODE_COUNT));
        assert!(!array.submit(Value::Null));
        assert!(array.submit(Value::list(["a"])));
        assert_eq!(array.constraint_codes(), vec![CODE_COUNT]);
    }

    #[test]
    fn test_delimited_transformer() {
        let mut array = strings();
        array.set_transformer(Rc::new(Delimited::new(",")));

        assert!(array.submit(Value::from("a, b")));
        assert_eq!(array.value(), Value::list(["a", "b"]));
        assert_eq!(array.http_value(), Value::from("a,b"));
    }

    #[test]
    fn test_transformer_failure_aborts() {
        let mut array = strings();
        array.set_transformer(Rc::new(FnTransformer::inbound(|_| {
            Err(TransformError::invalid("broken"))
        })));

        assert!(!array.submit(Value::list(["a"])));
        assert!(array.is_empty());
        assert_eq!(array.error().global_message(), Some("broken"));
    }

    #[test]
    fn test_import_keeps_every_slot() {
        let mut array = strings();
        array.import(Value::list([Value::from("a"), Value::Null]));
        assert_eq!(array.len(), 2);
        assert!(!array.valid());
    }

    #[test]
    fn test_slots_do_not_see_array_siblings() {
        let mut array = ArrayElement::new(Box::new(
            StringElement::new().with_constraint(EqualTo::new("password")),
        ));
        let siblings = Map::from([("password".to_string(), Value::from("s3cret"))]);
        let root = Scope::root();
        let scope = root.nest(&siblings);

        assert!(!array.submit_scoped(Value::list(["s3cret"]), &scope));
        assert_eq!(array.error().child("0").and_then(FormError::code), Some(CODE_NOT_EQUAL));
    }

    #[test]
    fn test_moved_array_follows_its_new_owner() {
        let mut array = strings();
        assert!(array.set_parent(ContainerId::new()).is_none());

        let owner = ContainerId::new();
        let mut child = Child::new("tags", Box::new(array));
        assert!(child.set_parent(owner).is_none());
        assert_eq!(child.element().as_array().map(ArrayElement::parent), Some(Some(owner)));
    }

    #[test]
    fn test_reparented_copy_is_independent() {
        let mut array = strings();
        array.import(Value::list(["a"]));
        let owner = ContainerId::new();
        assert!(array.set_parent(owner).is_none());

        let mut copy = array.set_parent(ContainerId::new()).unwrap();
        assert_ne!(copy.id(), array.id());
        assert_eq!(copy["0"].parent(), Some(copy.id()));

        copy.import(Value::list(["x", "y"]));
        assert_eq!(array.value(), Value::list(["a"]));
        assert_eq!(array.parent(), Some(owner));
    }
}
