use serde_json::{Map, Value};

use crate::error::RecordError;

/// One decoded dictionary record.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryRecord {
    pub version_id: String,
    pub payload: Map<String, Value>,
}

impl DictionaryRecord {
    /// Decode the JSON text of a record.
    pub fn parse(version_id: impl Into<String>, json: &str) -> Result<Self, RecordError> {
        let version_id = version_id.into();
        let value: Value = serde_json::from_str(json).map_err(|source| RecordError::Json {
            record_id: version_id.clone(),
            source,
        })?;
        match value {
            Value::Object(payload) => Ok(Self {
                version_id,
                payload,
            }),
            _ => Err(RecordError::NotAnObject {
                record_id: version_id,
            }),
        }
    }

    /// String value of a payload field; `None` when absent or not a string.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.payload.get(name).and_then(Value::as_str)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.payload.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object() {
        let record =
            DictionaryRecord::parse("v1", r#"{"name": "Debt", "order": 3}"#).unwrap();
        assert_eq!(record.field("name"), Some("Debt"));
        assert_eq!(record.field("order"), None);
        assert!(record.has_field("order"));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = DictionaryRecord::parse("v1", "{name: Debt}").unwrap_err();
        assert!(matches!(err, RecordError::Json { ref record_id, .. } if record_id == "v1"));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = DictionaryRecord::parse("v2", r#"["Debt"]"#).unwrap_err();
        assert!(matches!(err, RecordError::NotAnObject { .. }));
    }
}
