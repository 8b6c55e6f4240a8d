//! Entity trait tying a record type to its collection

use crate::core::identifier::PostId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Base trait for all stored entities.
///
/// An entity lives in exactly one collection, is addressed by a [`PostId`]
/// assigned once at creation, and carries a server-side creation timestamp.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection name (e.g., "posts")
    fn collection_name() -> &'static str;

    /// The singular name used in log lines and error messages (e.g., "post")
    fn entity_name() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> PostId;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;
}
