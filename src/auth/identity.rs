//! Identity payloads returned by the auth authority
//!
//! The authority answers a session check with a JSON object whose attribute
//! set depends on the deployment and calling service. [`Identity`] keeps the
//! whole object and offers typed accessors, so a missing attribute fails
//! only the caller that needs it instead of the whole decode.

use crate::core::{PostedError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded result of a successful session check
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Map<String, Value>);

/// Fixed-shape identity returned by account-oriented deployments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub uid: String,
    pub email: String,
    pub role: String,
    pub created: String,
}

/// Lenient boolean parsing for string-encoded flags
///
/// Unrecognized input is `false`.
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim(), "1" | "t" | "T" | "true" | "TRUE" | "True")
}

impl Identity {
    /// Decode the authority's transport string
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| PostedError::decode("identity", e))?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(PostedError::decode(
                "identity",
                format!("expected a JSON object, got {}", json_type(&other)),
            )),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A string attribute that must be present
    pub fn require_str(&self, key: &str) -> Result<&str> {
        match self.0.get(key) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(PostedError::validation(
                key,
                format!("expected a string, got {}", json_type(other)),
            )),
            None => Err(PostedError::validation(key, "missing from identity")),
        }
    }

    /// A string attribute that may be absent
    pub fn optional_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// A boolean attribute, parsed leniently
    ///
    /// Accepts JSON booleans, string-encoded booleans and 0/1. Anything
    /// missing or unparseable is `false`.
    pub fn flag(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => parse_flag(s),
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            _ => false,
        }
    }

    /// Decode the whole payload into a fixed shape such as [`UserRecord`]
    pub fn decode_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| PostedError::decode(std::any::type_name::<T>(), e))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
