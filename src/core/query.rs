//! Store query primitives: filters, find options and limit parsing

use crate::core::field::FieldValue;
use serde_json::Value;

/// Document field holding the identifier
pub const ID_FIELD: &str = "_id";

/// Fetch limit used when a range hint is missing or malformed
pub const DEFAULT_LIMIT: u64 = 8;

/// Equality filter over one document field
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Match every document
    All,
    /// Match documents whose `field` equals `value`
    Eq { field: String, value: FieldValue },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Evaluate the filter against a JSON document
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => {
                document.get(field.as_str()).unwrap_or(&Value::Null) == &value.to_json()
            }
        }
    }
}

/// Options for multi-document fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FindOptions {
    /// Maximum number of documents, `None` for no limit
    pub limit: Option<u64>,
    /// Order newest identifier first
    pub newest_first: bool,
}

impl FindOptions {
    pub fn limited(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            newest_first: true,
        }
    }

    pub fn unlimited() -> Self {
        Self {
            limit: None,
            newest_first: true,
        }
    }
}

/// Parse a string range hint into a fetch limit
///
/// Missing, non-numeric, zero or negative hints fall back to `default`.
pub fn parse_limit(hint: Option<&str>, default: u64) -> u64 {
    hint.map(str::trim)
        .and_then(|h| h.parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| n as u64)
        .unwrap_or(default)
}
