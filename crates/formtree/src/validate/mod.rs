//! Constraint validation for element values.
//!
//! A [`Constraint`] inspects a value, optionally reading sibling values that
//! were submitted before it through the [`Scope`], and returns a
//! [`FormError`] which is empty when the value passes.
//!
//! Only a small catalogue ships with the crate; applications plug in their own
//! rules by implementing [`Constraint`] or wrapping a closure in [`Callback`].

mod constraints;

use std::rc::Rc;

use crate::element::Scope;
use crate::error::FormError;
use crate::model::Value;

pub use constraints::{Callback, Count, EqualTo, Length, Range, Required};

/// Error code of [`Required`].
pub const CODE_REQUIRED: &str = "required";
/// Code identifying a [`Length`] constraint.
pub const CODE_LENGTH: &str = "length";
/// Error code of [`Length`] when the value is too short.
pub const CODE_TOO_SHORT: &str = "too_short";
/// Error code of [`Length`] when the value is too long.
pub const CODE_TOO_LONG: &str = "too_long";
/// Error code of [`Range`].
pub const CODE_RANGE: &str = "range";
/// Error code of [`Count`].
pub const CODE_COUNT: &str = "count";
/// Error code of [`EqualTo`].
pub const CODE_NOT_EQUAL: &str = "not_equal";
/// Default error code of [`Callback`].
pub const CODE_CALLBACK: &str = "callback";

/// A validation rule applied to an element value.
pub trait Constraint: std::fmt::Debug {
    /// Stable identifier of the rule, exposed to renderers.
    fn code(&self) -> &'static str;

    /// Validates `value`. Must not depend on anything but its inputs.
    fn validate(&self, value: &Value, scope: &Scope<'_>) -> FormError;
}

/// Ordered list of constraints. Validation stops at the first failure.
#[derive(Debug, Clone, Default)]
pub struct Constraints(Vec<Rc<dyn Constraint>>);

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, constraint: impl Constraint + 'static) {
        self.0.push(Rc::new(constraint));
    }

    pub fn push_shared(&mut self, constraint: Rc<dyn Constraint>) {
        self.0.push(constraint);
    }

    /// Runs every constraint in order and returns the first error.
    pub fn validate(&self, value: &Value, scope: &Scope<'_>) -> FormError {
        self.0
            .iter()
            .map(|constraint| constraint.validate(value, scope))
            .find(|error| !error.is_empty())
            .unwrap_or_default()
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.0.iter().map(|c| c.code()).collect()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|c| c.code() == code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraints_stop_at_first_error() {
        let mut constraints = Constraints::new();
        constraints.push(Required::new());
        constraints.push(Length::new(Some(3), None));

        let scope = Scope::root();
        let error = constraints.validate(&Value::Null, &scope);
        assert_eq!(error.code(), Some(CODE_REQUIRED));

        let error = constraints.validate(&Value::from("ab"), &scope);
        assert_eq!(error.code(), Some(CODE_TOO_SHORT));

        assert!(constraints.validate(&Value::from("abc"), &scope).is_empty());
        assert_eq!(constraints.codes(), vec![CODE_REQUIRED, CODE_LENGTH]);
        assert!(constraints.contains(CODE_REQUIRED));
    }

    #[test]
    fn test_empty_constraints_accept_anything() {
        let constraints = Constraints::new();
        assert!(constraints.is_empty());
        assert!(constraints.validate(&Value::Null, &Scope::root()).is_empty());
    }
}
