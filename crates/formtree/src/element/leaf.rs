//! Scalar elements.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use tracing::warn;

use crate::element::{ContainerId, Element, Scope};
use crate::error::{FormError, TransformError};
use crate::model::Value;
use crate::transform::Transformer;
use crate::validate::{CODE_REQUIRED, Constraint, Constraints};

/// A scalar type a [`Leaf`] can hold.
pub trait LeafType: Clone + fmt::Debug + 'static {
    /// Coerces a submitted value. `Ok(None)` means "no value".
    fn from_http(value: Value) -> Result<Option<Self>, TransformError>;

    fn to_value(&self) -> Value;

    /// Coercion used on import: values that do not convert become `None`.
    fn lenient(value: Value) -> Option<Self> {
        Self::from_http(value).ok().flatten()
    }
}

impl LeafType for String {
    fn from_http(value: Value) -> Result<Option<Self>, TransformError> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Map(_) => Err(TransformError::UnexpectedType {
                expected: "string",
                found: "map",
            }),
            scalar => Ok(Some(scalar.to_string())),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl LeafType for i64 {
    fn from_http(value: Value) -> Result<Option<Self>, TransformError> {
        match value {
            Value::Null => Ok(None),
            Value::Int(v) => Ok(Some(v)),
            // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
            Value::Float(v)
                if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 =>
            {
                Ok(Some(v as i64))
            }
            Value::Float(v) => Err(TransformError::InvalidNumber {
                value: v.to_string(),
            }),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse()
                    .map(Some)
                    .map_err(|_| TransformError::InvalidNumber { value: s })
            }
            other => Err(TransformError::UnexpectedType {
                expected: "integer",
                found: other.type_name(),
            }),
        }
    }

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl LeafType for f64 {
    fn from_http(value: Value) -> Result<Option<Self>, TransformError> {
        match value {
            Value::Null => Ok(None),
            Value::Int(v) => Ok(Some(v as f64)),
            Value::Float(v) => Ok(Some(v)),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse()
                    .map(Some)
                    .map_err(|_| TransformError::InvalidNumber { value: s })
            }
            other => Err(TransformError::UnexpectedType {
                expected: "float",
                found: other.type_name(),
            }),
        }
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

/// Checkbox semantics: an absent value is `false`.
impl LeafType for bool {
    fn from_http(value: Value) -> Result<Option<Self>, TransformError> {
        match value {
            Value::Null => Ok(Some(false)),
            Value::Bool(v) => Ok(Some(v)),
            Value::Int(v) => Ok(Some(v != 0)),
            Value::Float(v) => Ok(Some(v != 0.0)),
            Value::String(s) => Ok(Some(!matches!(s.as_str(), "" | "0" | "false"))),
            Value::Map(_) => Err(TransformError::UnexpectedType {
                expected: "bool",
                found: "map",
            }),
        }
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

/// Element holding a single scalar.
#[derive(Debug, Clone)]
pub struct Leaf<T: LeafType> {
    value: Option<T>,
    /// Submitted value kept when it could not be converted.
    raw: Option<Value>,
    constraints: Constraints,
    transformer: Option<Rc<dyn Transformer>>,
    error: FormError,
    valid: bool,
}

pub type StringElement = Leaf<String>;
pub type IntegerElement = Leaf<i64>;
pub type FloatElement = Leaf<f64>;
pub type BooleanElement = Leaf<bool>;

impl<T: LeafType> Default for Leaf<T> {
    fn default() -> Self {
        Self {
            value: None,
            raw: None,
            constraints: Constraints::new(),
            transformer: None,
            error: FormError::empty(),
            valid: false,
        }
    }
}

impl<T: LeafType> Leaf<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constraint(mut self, constraint: impl Constraint + 'static) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn constraints_mut(&mut self) -> &mut Constraints {
        &mut self.constraints
    }

    pub fn set_transformer(&mut self, transformer: Rc<dyn Transformer>) {
        self.transformer = Some(transformer);
    }

    /// The typed value.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn set(&mut self, value: Option<T>) {
        self.value = value;
        self.raw = None;
    }

    fn coerce(&self, data: Value) -> Result<Option<T>, TransformError> {
        let data = match &self.transformer {
            Some(transformer) => transformer.from_http(data)?,
            None => data,
        };
        T::from_http(data)
    }
}

impl<T: LeafType> Element for Leaf<T> {
    fn submit_scoped(&mut self, data: Value, scope: &Scope<'_>) -> bool {
        self.raw = None;

        match self.coerce(data.clone()) {
            Ok(value) => {
                self.value = value;
                self.error = self.constraints.validate(&self.value(), scope);
            }
            Err(err) => {
                self.value = None;
                self.raw = Some(data);
                self.error = err.into();
            }
        }

        self.valid = self.error.is_empty();
        self.valid
    }

    fn import(&mut self, value: Value) {
        self.value = T::lenient(value);
        self.raw = None;
        self.error = FormError::empty();
    }

    fn value(&self) -> Value {
        self.value.as_ref().map_or(Value::Null, T::to_value)
    }

    fn http_value(&self) -> Value {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }

        let value = self.value();
        match &self.transformer {
            Some(transformer) => transformer.to_http(value.clone()).unwrap_or_else(|err| {
                warn!(error = %err, "cannot transform leaf value to http");
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

    fn required(&self) -> bool {
        self.constraints.contains(CODE_REQUIRED)
    }

    fn constraint_codes(&self) -> Vec<&'static str> {
        self.constraints.codes()
    }

    fn duplicate(&self, _parent: Option<ContainerId>) -> Box<dyn Element> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CODE_INVALID_NUMBER, CODE_UNEXPECTED_TYPE};
    use crate::transform::FnTransformer;
    use crate::validate::{CODE_LENGTH, Length, Range, Required};

    #[test]
    fn test_string_coercion() {
        let mut leaf = StringElement::new();
        assert!(leaf.submit(Value::Int(12)));
        assert_eq!(leaf.value(), Value::from("12"));

        assert!(leaf.submit(Value::Null));
        assert_eq!(leaf.value(), Value::Null);

        assert!(leaf.submit(Value::from("")));
        assert_eq!(leaf.value(), Value::from(""));

        assert!(!leaf.submit(Value::list(["a"])));
        assert_eq!(leaf.error().code(), Some(CODE_UNEXPECTED_TYPE));
        assert_eq!(leaf.value(), Value::Null);
    }

    #[test]
    fn test_integer_keeps_raw_value_on_failure() {
        let mut leaf = IntegerElement::new();
        assert!(leaf.submit(Value::from(" 42 ")));
        assert_eq!(leaf.get(), Some(&42));
        assert_eq!(leaf.http_value(), Value::Int(42));

        assert!(!leaf.submit(Value::from("forty")));
        assert_eq!(leaf.error().code(), Some(CODE_INVALID_NUMBER));
        assert_eq!(leaf.value(), Value::Null);
        assert_eq!(leaf.http_value(), Value::from("forty"));

        assert!(leaf.submit(Value::from("")));
        assert_eq!(leaf.value(), Value::Null);
    }

    #[test]
    fn test_integer_rejects_floats_out_of_range() {
        let mut leaf = IntegerElement::new();
        assert!(leaf.submit(Value::Float(-3.0)));
        assert_eq!(leaf.value(), Value::Int(-3));

        for input in [1e30, -1e30, 9_223_372_036_854_775_808.0, f64::INFINITY, f64::NAN] {
            assert!(!leaf.submit(Value::Float(input)), "{input} accepted");
            assert_eq!(leaf.error().code(), Some(CODE_INVALID_NUMBER));
            assert_eq!(leaf.value(), Value::Null);
        }
    }

    #[test]
    fn test_float_and_bool() {
        let mut float = FloatElement::new();
        assert!(float.submit(Value::from("1.5")));
        assert_eq!(float.value(), Value::Float(1.5));

        let mut flag = BooleanElement::new();
        for (input, expected) in [
            (Value::Null, false),
            (Value::from(""), false),
            (Value::from("0"), false),
            (Value::from("false"), false),
            (Value::from("on"), true),
            (Value::Int(1), true),
        ] {
            assert!(flag.submit(input));
            assert_eq!(flag.value(), Value::Bool(expected));
        }
    }

    #[test]
    fn test_constraints_run_after_coercion() {
        let mut leaf = StringElement::new()
            .with_constraint(Required::new())
            .with_constraint(Length::new(None, Some(3)));

        assert!(!leaf.submit(Value::Null));
        assert_eq!(leaf.error().code(), Some(CODE_REQUIRED));
        assert!(leaf.required());
        assert_eq!(leaf.constraint_codes(), vec![CODE_REQUIRED, CODE_LENGTH]);

        assert!(!leaf.submit(Value::from("abcd")));
        assert!(leaf.submit(Value::from("abc")));
        assert!(leaf.error().is_empty());

        let mut age = IntegerElement::new().with_constraint(Range::new(Some(18.0), None));
        assert!(!age.submit(Value::from("12")));
        assert!(age.submit(Value::from("18")));
    }

    #[test]
    fn test_transformer() {
        let mut leaf = StringElement::new();
        leaf.set_transformer(Rc::new(FnTransformer::new(
            |value| Ok(value.as_str().map(|s| s.to_lowercase()).into()),
            |value| Ok(value.as_str().map(|s| s.to_uppercase()).into()),
        )));

        assert!(leaf.submit(Value::from("ABC")));
        assert_eq!(leaf.value(), Value::from("abc"));
        assert_eq!(leaf.http_value(), Value::from("ABC"));
    }

    #[test]
    fn test_import_is_lenient_and_keeps_validity() {
        let mut leaf = IntegerElement::new();
        assert!(!leaf.valid());

        leaf.import(Value::from("nope"));
        assert_eq!(leaf.value(), Value::Null);
        leaf.import(Value::Int(7));
        assert_eq!(leaf.value(), Value::Int(7));
        assert!(!leaf.valid());
    }

    #[test]
    fn test_import_drops_stale_error() {
        let mut leaf = IntegerElement::new();
        assert!(!leaf.submit(Value::from("forty")));
        assert!(!leaf.error().is_empty());

        leaf.import(Value::Int(40));
        assert!(leaf.error().is_empty());
        assert!(!leaf.valid());
        assert_eq!(leaf.http_value(), Value::Int(40));
    }
}
