use crate::model::{Map, Value};

/// Maps a child to the HTTP fields it reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpFields {
    /// A single payload entry with this name.
    Offset(String),
    /// Every payload entry starting with this prefix, prefix stripped.
    /// Used to flatten an embedded form into its parent's fields.
    Prefixed(String),
}

impl HttpFields {
    /// Extracts the slice of `payload` this child reads.
    pub fn extract(&self, payload: &Value) -> Value {
        match self {
            HttpFields::Offset(name) => payload.item(name).cloned().unwrap_or_default(),
            HttpFields::Prefixed(prefix) => {
                let Some(map) = payload.as_map() else {
                    return Value::Null;
                };
                Value::Map(
                    map.iter()
                        .filter_map(|(key, value)| {
                            key.strip_prefix(prefix.as_str())
                                .map(|rest| (rest.to_string(), value.clone()))
                        })
                        .collect(),
                )
            }
        }
    }

    /// Formats an HTTP value into the fields of the parent payload.
    pub fn format(&self, value: Value) -> Map {
        match self {
            HttpFields::Offset(name) => Map::from([(name.clone(), value)]),
            HttpFields::Prefixed(prefix) => value
                .into_entries()
                .into_iter()
                .map(|(key, value)| (format!("{prefix}{key}"), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        let fields = HttpFields::Offset("name".into());
        let payload = Value::map([("name", "John"), ("age", "12")]);

        assert_eq!(fields.extract(&payload), Value::from("John"));
        assert_eq!(fields.extract(&Value::Null), Value::Null);
        assert_eq!(
            fields.format(Value::from("Jane")),
            Map::from([("name".to_string(), Value::from("Jane"))])
        );
    }

    #[test]
    fn test_prefixed() {
        let fields = HttpFields::Prefixed("address_".into());
        let payload = Value::map([("address_city", "Paris"), ("address_zip", "75001"), ("name", "John")]);

        assert_eq!(
            fields.extract(&payload),
            Value::map([("city", "Paris"), ("zip", "75001")])
        );

        let formatted = fields.format(Value::map([("city", "Lyon")]));
        assert_eq!(formatted.get("address_city"), Some(&Value::from("Lyon")));
        assert_eq!(formatted.len(), 1);
    }
}
