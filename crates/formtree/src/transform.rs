//! Value transformers: bidirectional conversion between the HTTP shape of a
//! value and the shape the element works with.

use std::fmt;
use std::rc::Rc;

use crate::error::TransformError;
use crate::model::{Map, Value};

/// Converts values between their HTTP and element shapes.
pub trait Transformer: fmt::Debug {
    /// HTTP value to element value. Runs before validation on submit.
    fn from_http(&self, value: Value) -> Result<Value, TransformError>;

    /// Element value to HTTP value.
    fn to_http(&self, value: Value) -> Result<Value, TransformError>;
}

type TransformFn = dyn Fn(Value) -> Result<Value, TransformError>;

/// Transformer backed by a pair of closures.
#[derive(Clone)]
pub struct FnTransformer {
    from_http: Rc<TransformFn>,
    to_http: Rc<TransformFn>,
}

impl FnTransformer {
    pub fn new<F, T>(from_http: F, to_http: T) -> Self
    where
        F: Fn(Value) -> Result<Value, TransformError> + 'static,
        T: Fn(Value) -> Result<Value, TransformError> + 'static,
    {
        Self {
            from_http: Rc::new(from_http),
            to_http: Rc::new(to_http),
        }
    }

    /// A transformer that only rewrites submitted values.
    pub fn inbound<F>(from_http: F) -> Self
    where
        F: Fn(Value) -> Result<Value, TransformError> + 'static,
    {
        Self::new(from_http, Ok)
    }
}

impl fmt::Debug for FnTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransformer").finish_non_exhaustive()
    }
}

impl Transformer for FnTransformer {
    fn from_http(&self, value: Value) -> Result<Value, TransformError> {
        (self.from_http)(value)
    }

    fn to_http(&self, value: Value) -> Result<Value, TransformError> {
        (self.to_http)(value)
    }
}

/// Reads a list from a single delimited string, e.g. `"a, b, c"`.
///
/// Pieces are trimmed and empty pieces dropped. Maps pass through unchanged
/// so the field also accepts a regular array payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimited {
    separator: String,
}

impl Delimited {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl Default for Delimited {
    fn default() -> Self {
        Self::new(",")
    }
}

impl Transformer for Delimited {
    fn from_http(&self, value: Value) -> Result<Value, TransformError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Map(map) => Ok(Value::Map(map)),
            Value::String(s) => Ok(Value::list(
                s.split(self.separator.as_str())
                    .map(str::trim)
                    .filter(|piece| !piece.is_empty()),
            )),
            other => Err(TransformError::UnexpectedType {
                expected: "string",
                found: other.type_name(),
            }),
        }
    }

    fn to_http(&self, value: Value) -> Result<Value, TransformError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Map(map) => Ok(Value::String(join(&map, &self.separator))),
            other => Err(TransformError::UnexpectedType {
                expected: "map",
                found: other.type_name(),
            }),
        }
    }
}

fn join(map: &Map, separator: &str) -> String {
    map.values()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CODE_UNEXPECTED_TYPE;

    #[test]
    fn test_delimited_splits_and_trims() {
        let delimited = Delimited::new(",");
        let value = delimited.from_http(Value::from(" a, b,,c ")).unwrap();
        assert_eq!(value, Value::list(["a", "b", "c"]));
        assert_eq!(delimited.from_http(Value::from("")).unwrap(), Value::empty_map());
        assert_eq!(delimited.from_http(Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_delimited_to_http() {
        let delimited = Delimited::new(", ");
        let http = delimited.to_http(Value::list(["a", "b"])).unwrap();
        assert_eq!(http, Value::from("a, b"));
    }

    #[test]
    fn test_delimited_rejects_scalars() {
        let err = Delimited::default().from_http(Value::Int(3)).unwrap_err();
        assert_eq!(err.code(), CODE_UNEXPECTED_TYPE);
    }

    #[test]
    fn test_fn_transformer() {
        let upper = FnTransformer::inbound(|value| match value {
            Value::String(s) => Ok(Value::String(s.to_uppercase())),
            Value::Null => Ok(Value::Null),
            _ => Err(TransformError::invalid("not a string")),
        });

        assert_eq!(upper.from_http(Value::from("ab")).unwrap(), Value::from("AB"));
        assert_eq!(upper.to_http(Value::from("ab")).unwrap(), Value::from("ab"));
        assert!(upper.from_http(Value::Int(1)).is_err());
    }
}
