//! Elements: the value-holding units of a form tree.
//!
//! An [`Element`] is either a leaf ([`Leaf`]) or a container ([`Form`],
//! [`ArrayElement`]) owning children which in turn own elements. Ownership
//! only flows downwards; upward links are [`ContainerId`] handles.

pub mod array;
pub mod form;
pub mod generator;
pub mod leaf;
mod scope;

use std::any::Any;
use std::fmt;

use uuid::Uuid;

use crate::child::Child;
use crate::dependency::DependencyTree;
use crate::error::FormError;
use crate::model::Value;

pub use array::{ArrayElement, ArrayOptions};
pub use form::Form;
pub use generator::{FnGenerator, MapGenerator, PrototypeGenerator, ValueGenerator};
pub use leaf::{BooleanElement, FloatElement, IntegerElement, Leaf, LeafType, StringElement};
pub use scope::Scope;

/// Identity of a container instance.
///
/// Children and nested containers refer to their parent through this handle.
/// It never keeps the parent alive. Every container instance, including each
/// duplicate, gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(Uuid);

impl ContainerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// A node of the form tree holding a value.
///
/// `submit` takes the HTTP shaped value, validates it and reports success;
/// the structured error is read back through [`Element::error`]. `import`
/// loads an internal value without filtering or validation.
pub trait Element: fmt::Debug + Any {
    /// Submits an HTTP value, with `scope` exposing already submitted siblings.
    fn submit_scoped(&mut self, data: Value, scope: &Scope<'_>) -> bool;

    /// Submits an HTTP value at the root of a tree.
    fn submit(&mut self, data: Value) -> bool {
        self.submit_scoped(data, &Scope::root())
    }

    /// Loads an internal value.
    ///
    /// The error is replaced by the properties that could not be read, so it
    /// is empty for scalars. A valid element stays valid only when the import
    /// succeeded.
    fn import(&mut self, value: Value);

    /// The internal value.
    fn value(&self) -> Value;

    /// The value projected back to its HTTP shape.
    ///
    /// When the element's transformer cannot project the value, the failure
    /// is logged and the untransformed value is returned instead. A leaf whose
    /// last submit could not be coerced returns the raw submitted value.
    fn http_value(&self) -> Value;

    /// Result of the last submit. False before the first one.
    fn valid(&self) -> bool;

    /// Error of the last submit.
    fn error(&self) -> &FormError;

    fn required(&self) -> bool {
        false
    }

    /// Codes of the constraints attached to this element.
    fn constraint_codes(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Deep copy of the element, attached to `parent`.
    ///
    /// Containers get a fresh [`ContainerId`] and re-parent their children.
    fn duplicate(&self, parent: Option<ContainerId>) -> Box<dyn Element>;

    /// Records `parent` as the owner of this element, replacing any previous
    /// one. Called when the child owning the element is attached, so the
    /// element has already been moved out of its previous container. Leaves
    /// keep no parent and ignore the call.
    fn attach(&mut self, _parent: ContainerId) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Element {
    /// Downcasts to a concrete element type.
    pub fn downcast_ref<T: Element>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: Element>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Shortcut for a nested [`Form`].
    pub fn as_form(&self) -> Option<&Form> {
        self.downcast_ref()
    }

    /// Shortcut for a nested [`ArrayElement`].
    pub fn as_array(&self) -> Option<&ArrayElement> {
        self.downcast_ref()
    }
}

/// Resolves a dot-separated path against `children`, descending into nested
/// forms and arrays.
pub(crate) fn find_child<'a>(children: &'a DependencyTree, path: &str) -> Option<&'a Child> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };

    let child = children.get(head)?;
    let Some(rest) = rest else {
        return Some(child);
    };

    let element = child.element();
    if let Some(form) = element.as_form() {
        form.find(rest)
    } else if let Some(array) = element.as_array() {
        array.find(rest)
    } else {
        None
    }
}
