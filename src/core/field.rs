//! Field values used in store filters

use crate::core::identifier::PostId;
use serde_json::Value;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Id(PostId),
    Null,
}

impl FieldValue {
    /// The JSON form a document field holds when it equals this value
    ///
    /// Identifiers are carried as their hex string in JSON documents.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Id(id) => Value::String(id.to_hex()),
            FieldValue::Null => Value::Null,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<PostId> for FieldValue {
    fn from(value: PostId) -> Self {
        FieldValue::Id(value)
    }
}
