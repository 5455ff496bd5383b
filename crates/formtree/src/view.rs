use crate::child::Child;
use crate::error::FormError;
use crate::model::Value;

/// Snapshot of a child for renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: String,
    /// HTTP value, as it would be sent back to the client.
    pub value: Value,
    pub error: FormError,
    pub required: bool,
    /// Codes of the element's constraints.
    pub constraints: Vec<&'static str>,
}

impl FieldView {
    pub fn new(child: &Child) -> Self {
        let element = child.element();
        Self {
            name: child.name().to_string(),
            value: element.http_value(),
            error: child.error().clone(),
            required: element.required(),
            constraints: element.constraint_codes(),
        }
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}
