use crate::model::{Map, Value};

/// Values already resolved around the element being submitted.
///
/// Each container submitting its children pushes a frame holding the values
/// of the children submitted so far. Because children are submitted in
/// dependency order, a constraint can read any sibling it declared as a
/// dependency.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'a> {
    values: Option<&'a Map>,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    /// The scope of a root element: no siblings.
    pub fn root() -> Self {
        Self::default()
    }

    /// A new frame below this one.
    pub fn nest(&'a self, values: &'a Map) -> Scope<'a> {
        Scope {
            values: Some(values),
            parent: Some(self),
        }
    }

    /// The enclosing frame.
    pub fn parent(&self) -> Option<&'a Scope<'a>> {
        self.parent
    }

    /// Value of a sibling submitted before the current element.
    pub fn sibling(&self, name: &str) -> Option<&'a Value> {
        self.values.and_then(|values| values.get(name))
    }

    /// Resolves a dot-separated path: the first segment names a sibling, the
    /// remaining ones walk into its value.
    pub fn lookup(&self, path: &str) -> Option<&'a Value> {
        let mut segments = path.split('.');
        let mut current = self.sibling(segments.next()?)?;
        for segment in segments {
            current = current.item(segment)?;
        }
        Some(current)
    }
}
