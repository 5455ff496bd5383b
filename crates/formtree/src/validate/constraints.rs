//! Built-in constraints.

use std::fmt;
use std::rc::Rc;

use crate::element::Scope;
use crate::error::FormError;
use crate::model::Value;
use crate::validate::{
    CODE_CALLBACK, CODE_COUNT, CODE_LENGTH, CODE_NOT_EQUAL, CODE_RANGE, CODE_REQUIRED, CODE_TOO_LONG,
    CODE_TOO_SHORT, Constraint,
};

/// Rejects null, the empty string and the empty map.
#[derive(Debug, Clone)]
pub struct Required {
    message: String,
}

impl Required {
    pub fn new() -> Self {
        Self::with_message("This value should not be blank.")
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for Required {
    fn default() -> Self {
        Self::new()
    }
}

impl Constraint for Required {
    fn code(&self) -> &'static str {
        CODE_REQUIRED
    }

    fn validate(&self, value: &Value, _scope: &Scope<'_>) -> FormError {
        if value.is_empty_input() {
            FormError::with_code(self.message.clone(), CODE_REQUIRED)
        } else {
            FormError::empty()
        }
    }
}

/// Bounds the number of characters of a string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Length {
    min: Option<usize>,
    max: Option<usize>,
}

impl Length {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }
}

impl Constraint for Length {
    fn code(&self) -> &'static str {
        CODE_LENGTH
    }

    fn validate(&self, value: &Value, _scope: &Scope<'_>) -> FormError {
        let Some(s) = value.as_str() else {
            return FormError::empty();
        };

        let len = s.chars().count();
        if let Some(min) = self.min.filter(|min| len < *min) {
            return FormError::with_code(
                format!("This value is too short. It should have {min} characters or more."),
                CODE_TOO_SHORT,
            );
        }
        if let Some(max) = self.max.filter(|max| len > *max) {
            return FormError::with_code(
                format!("This value is too long. It should have {max} characters or less."),
                CODE_TOO_LONG,
            );
        }

        FormError::empty()
    }
}

/// Bounds a numeric value (inclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: Option<f64>,
    max: Option<f64>,
}

impl Range {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }
}

impl Constraint for Range {
    fn code(&self) -> &'static str {
        CODE_RANGE
    }

    fn validate(&self, value: &Value, _scope: &Scope<'_>) -> FormError {
        let Some(n) = value.as_f64() else {
            return FormError::empty();
        };

        let below = self.min.is_some_and(|min| n < min);
        let above = self.max.is_some_and(|max| n > max);
        if !below && !above {
            return FormError::empty();
        }

        let message = match (self.min, self.max) {
            (Some(min), Some(max)) => format!("This value should be between {min} and {max}."),
            (Some(min), None) => format!("This value should be {min} or more."),
            (None, Some(max)) => format!("This value should be {max} or less."),
            (None, None) => return FormError::empty(),
        };
        FormError::with_code(message, CODE_RANGE)
    }
}

/// Bounds the number of entries of a map value, typically an array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Count {
    min: Option<usize>,
    max: Option<usize>,
}

impl Count {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }
}

impl Constraint for Count {
    fn code(&self) -> &'static str {
        CODE_COUNT
    }

    fn validate(&self, value: &Value, _scope: &Scope<'_>) -> FormError {
        let len = match value {
            Value::Null => 0,
            Value::Map(m) => m.len(),
            _ => return FormError::empty(),
        };

        if let Some(min) = self.min.filter(|min| len < *min) {
            return FormError::with_code(
                format!("This collection should contain {min} elements or more."),
                CODE_COUNT,
            );
        }
        if let Some(max) = self.max.filter(|max| len > *max) {
            return FormError::with_code(
                format!("This collection should contain {max} elements or less."),
                CODE_COUNT,
            );
        }

        FormError::empty()
    }
}

/// Requires the value to equal a sibling's value.
///
/// The sibling must be declared as a dependency of the field carrying this
/// constraint, otherwise it may not have been submitted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualTo {
    field: String,
    message: String,
}

impl EqualTo {
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("This value should be equal to {field}.");
        Self { field, message }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl Constraint for EqualTo {
    fn code(&self) -> &'static str {
        CODE_NOT_EQUAL
    }

    fn validate(&self, value: &Value, scope: &Scope<'_>) -> FormError {
        if value.is_null() {
            return FormError::empty();
        }

        match scope.lookup(&self.field) {
            Some(other) if other == value => FormError::empty(),
            _ => FormError::with_code(self.message.clone(), CODE_NOT_EQUAL),
        }
    }
}

type CheckFn = dyn Fn(&Value, &Scope<'_>) -> Option<String>;

/// Constraint backed by a closure returning an error message on failure.
#[derive(Clone)]
pub struct Callback {
    code: &'static str,
    check: Rc<CheckFn>,
}

impl Callback {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value, &Scope<'_>) -> Option<String> + 'static,
    {
        Self {
            code: CODE_CALLBACK,
            check: Rc::new(check),
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = code;
        self
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}

impl Constraint for Callback {
    fn code(&self) -> &'static str {
        self.code
    }

    fn validate(&self, value: &Value, scope: &Scope<'_>) -> FormError {
        match (self.check)(value, scope) {
            Some(message) => FormError::with_code(message, self.code),
            None => FormError::empty(),
        }
    }
}
