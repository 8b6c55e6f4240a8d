//! Backend trait for raw document storage

use crate::core::error::Result;
use crate::core::query::{Filter, FindOptions};
use async_trait::async_trait;
use serde_json::Value;

/// Raw document storage backend
///
/// Implementations store JSON object documents per collection, keyed by the
/// hex identifier held in their `_id` field. The backend is agnostic to
/// entity types; typed decoding happens in
/// [`StoreAdapter`](crate::storage::StoreAdapter).
///
/// Implementations must be safe for concurrent use by many requests and must
/// report connectivity problems as [`ErrorKind::Transient`](crate::core::ErrorKind),
/// never as a missing document.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Short name for log lines (e.g., "in-memory", "mongodb")
    fn backend_name(&self) -> &'static str;

    /// Fetch the first document matching `filter`
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>>;

    /// Fetch documents matching `filter`, honoring limit and ordering
    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<Value>>;

    /// Append one document
    ///
    /// Only identifier uniqueness is enforced.
    async fn insert_one(&self, collection: &str, document: Value) -> Result<()>;

    /// Remove at most one document matching `filter`, returning the count removed
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64>;
}
