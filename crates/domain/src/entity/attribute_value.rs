//! Typed attribute values attached to entities.

use serde::{Deserialize, Serialize};

/// A single typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Json(serde_json::Value),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_string_variant_as_plain_string() {
        let json = serde_json::to_string(&AttributeValue::from("thumbturn")).unwrap();
        assert_eq!(json, "\"thumbturn\"");
    }

    #[test]
    fn should_serialize_int_variant_as_number() {
        let json = serde_json::to_string(&AttributeValue::from(87_i64)).unwrap();
        assert_eq!(json, "87");
    }

    #[test]
    fn should_deserialize_plain_string_as_string_variant() {
        let val: AttributeValue = serde_json::from_str("\"keypad\"").unwrap();
        assert_eq!(val, AttributeValue::String("keypad".into()));
    }

    #[test]
    fn should_deserialize_json_object_as_json_variant() {
        let val: AttributeValue = serde_json::from_str(r#"{"nested": "value"}"#).unwrap();
        assert!(matches!(val, AttributeValue::Json(_)));
    }
}
