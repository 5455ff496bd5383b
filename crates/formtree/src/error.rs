//! Error types for submission, transformation and property access.
//!
//! Two families live here:
//! - [`FormError`]: the structured, recursive error value every element
//!   exposes after a submit. It is data, not a failure of the call.
//! - [`TransformError`] and [`AccessError`]: ordinary `Result` errors raised by
//!   transformers, leaf coercion and property accessors. Containers catch them
//!   at their boundary and fold them into a [`FormError`].

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

/// Error code attached to transformer failures that carry no code of their own.
pub const CODE_TRANSFORMATION: &str = "transformation_failed";
/// Error code for a value of the wrong shape (a map where a scalar was expected...).
pub const CODE_UNEXPECTED_TYPE: &str = "unexpected_type";
/// Error code for a string that does not parse as a number.
pub const CODE_INVALID_NUMBER: &str = "invalid_number";
/// Error code for a property that could not be read from or written to an entity.
pub const CODE_ACCESS: &str = "access_failed";

/// Error raised while converting a value between its HTTP and internal shapes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("{message}")]
    Invalid {
        message: String,
        code: Option<&'static str>,
    },

    #[error("expected {expected}, found {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{value:?} is not a valid number")]
    InvalidNumber { value: String },
}

impl TransformError {
    /// Creates a transformation error with a free-form message.
    pub fn invalid(message: impl Into<String>) -> Self {
        TransformError::Invalid {
            message: message.into(),
            code: None,
        }
    }

    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            TransformError::Invalid { code, .. } => code.unwrap_or(CODE_TRANSFORMATION),
            TransformError::UnexpectedType { .. } => CODE_UNEXPECTED_TYPE,
            TransformError::InvalidNumber { .. } => CODE_INVALID_NUMBER,
        }
    }
}

/// Error raised by a property accessor, hydrator or extractor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("property path is empty")]
    EmptyPath,

    #[error("cannot access {path:?}: parent value is not a map")]
    NotAContainer { path: String },

    #[error("cannot access {path:?}: {message}")]
    Custom { path: String, message: String },
}

impl AccessError {
    pub fn code(&self) -> &'static str {
        CODE_ACCESS
    }
}

/// A single error message with an optional stable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    message: String,
    code: Option<String>,
}

impl ErrorMessage {
    /// Creates a message without a code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Creates a message with a code.
    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Structured, recursive error of an element.
///
/// A `FormError` is one of:
/// - empty (the element is valid),
/// - a global message (leaf failure, transformer failure, whole-value constraint),
/// - a map of child name to child error (aggregate),
/// - both at once (mixed).
///
/// Empty child entries are never stored, so [`FormError::is_empty`] holds
/// recursively by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormError {
    global: Option<ErrorMessage>,
    children: IndexMap<String, FormError>,
}

impl FormError {
    /// The empty error.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An error carrying only a global message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            global: Some(ErrorMessage::new(message)),
            children: IndexMap::new(),
        }
    }

    /// An error carrying only a global message with a code.
    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            global: Some(ErrorMessage::with_code(message, code)),
            children: IndexMap::new(),
        }
    }

    /// An aggregate error built from child errors. Empty child errors are dropped.
    pub fn aggregate<I, K>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, FormError)>,
        K: Into<String>,
    {
        let children = children
            .into_iter()
            .filter(|(_, error)| !error.is_empty())
            .map(|(name, error)| (name.into(), error))
            .collect();

        Self {
            global: None,
            children,
        }
    }

    /// Attaches (or replaces) the global message, keeping child entries.
    pub fn with_global(mut self, message: ErrorMessage) -> Self {
        self.global = Some(message);
        self
    }

    /// Adds a child entry. Empty errors are ignored.
    pub fn add_child(&mut self, name: impl Into<String>, error: FormError) {
        if !error.is_empty() {
            self.children.insert(name.into(), error);
        }
    }

    /// Returns true if neither this error nor any child error carries a message.
    pub fn is_empty(&self) -> bool {
        self.global.is_none() && self.children.values().all(FormError::is_empty)
    }

    pub fn global(&self) -> Option<&ErrorMessage> {
        self.global.as_ref()
    }

    /// Shortcut for the global message text.
    pub fn global_message(&self) -> Option<&str> {
        self.global.as_ref().map(ErrorMessage::message)
    }

    /// Shortcut for the global error code.
    pub fn code(&self) -> Option<&str> {
        self.global.as_ref().and_then(ErrorMessage::code)
    }

    pub fn children(&self) -> &IndexMap<String, FormError> {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&FormError> {
        self.children.get(name)
    }

    /// Flattens the error tree into `(path, message)` pairs, depth first.
    ///
    /// A global message on the root has an empty path; nested entries are
    /// joined with `.`.
    pub fn flatten(&self) -> Vec<(String, &ErrorMessage)> {
        let mut out = Vec::new();
        self.flatten_into(String::new(), &mut out);
        out
    }

    fn flatten_into<'a>(&'a self, prefix: String, out: &mut Vec<(String, &'a ErrorMessage)>) {
        if let Some(global) = &self.global {
            out.push((prefix.clone(), global));
        }

        for (name, child) in &self.children {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            child.flatten_into(path, out);
        }
    }
}

impl From<TransformError> for FormError {
    fn from(error: TransformError) -> Self {
        FormError::with_code(error.to_string(), error.code())
    }
}

impl From<AccessError> for FormError {
    fn from(error: AccessError) -> Self {
        FormError::with_code(error.to_string(), error.code())
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (path, message) in self.flatten() {
            if !first {
                writeln!(f)?;
            }
            first = false;

            if path.is_empty() {
                write!(f, "{message}")?;
            } else {
                write!(f, "{path}: {message}")?;
            }
        }
        Ok(())
    }
}
