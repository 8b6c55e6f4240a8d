//! Typed store adapter over a raw document backend
//!
//! [`StoreAdapter`] is the generic persistence surface. It accepts result
//! shapes as type parameters, so a caller names the shape once and receives
//! freshly decoded, independently owned values:
//!
//! ```rust,ignore
//! let post: Post = store.fetch_one("posts", "_id", "5f1b2c3d4e5f6a7b8c9d0e1f").await?;
//! let recent: Vec<Post> = store.fetch_many("posts", &Filter::All, FindOptions::limited(8)).await?;
//! ```
//!
//! Every backend call runs under the configured timeout; an elapsed
//! deadline surfaces as a transient error.

use crate::core::query::ID_FIELD;
use crate::core::{DocumentBackend, Filter, FindOptions, PostId, PostedError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Default deadline for a single store round trip
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(30);

/// Generic document-store client
#[derive(Clone)]
pub struct StoreAdapter {
    backend: Arc<dyn DocumentBackend>,
    timeout: Duration,
}

impl StoreAdapter {
    /// Create an adapter over `backend` with the default timeout
    pub fn new(backend: impl DocumentBackend + 'static) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    /// Create an adapter over a shared backend
    pub fn from_arc(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    async fn guarded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    backend = self.backend_name(),
                    operation,
                    timeout_secs = self.timeout.as_secs(),
                    "store call timed out"
                );
                Err(PostedError::timeout(operation, self.timeout))
            }
        }
    }

    fn decode<T: DeserializeOwned>(collection: &str, document: Value) -> Result<T> {
        serde_json::from_value(document).map_err(|e| PostedError::decode(collection, e))
    }

    /// Fetch exactly one document where `key_field` equals the identifier `key_value`
    ///
    /// `key_value` must be valid identifier hex; malformed input is a
    /// validation error and never reaches the backend.
    pub async fn fetch_one<T: DeserializeOwned>(
        &self,
        collection: &str,
        key_field: &str,
        key_value: &str,
    ) -> Result<T> {
        let id = PostId::parse_hex(key_value)?;
        let filter = Filter::eq(key_field, id);

        tracing::debug!(collection, key_field, id = %id, "fetch_one");

        let document = self
            .guarded("find_one", self.backend.find_one(collection, &filter))
            .await?
            .ok_or_else(|| PostedError::not_found(collection, key_field, id.to_hex()))?;

        Self::decode(collection, document)
    }

    /// Fetch up to `options.limit` documents matching `filter`
    ///
    /// Each stored document is decoded into a fresh `T`; no two returned
    /// values share state.
    pub async fn fetch_many<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<T>> {
        tracing::debug!(collection, ?filter, limit = ?options.limit, "fetch_many");

        let documents = self
            .guarded(
                "find_many",
                self.backend.find_many(collection, filter, options),
            )
            .await?;

        documents
            .into_iter()
            .map(|doc| Self::decode(collection, doc))
            .collect()
    }

    /// Fetch documents shaped like `_sample`
    ///
    /// Equivalent to [`fetch_many`](Self::fetch_many) with `T` inferred from
    /// an example value instead of a turbofish.
    pub async fn fetch_many_like<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
        _sample: &T,
    ) -> Result<Vec<T>> {
        self.fetch_many(collection, filter, options).await
    }

    /// Serialize and append one document
    pub async fn insert<T: Serialize>(&self, collection: &str, document: &T) -> Result<()> {
        let value =
            serde_json::to_value(document).map_err(|e| PostedError::decode(collection, e))?;

        tracing::debug!(collection, id = ?value.get(ID_FIELD), "insert");

        self.guarded("insert_one", self.backend.insert_one(collection, value))
            .await
    }

    /// Remove at most one document by identifier hex
    ///
    /// Returns the number of documents removed (0 or 1). Removing an
    /// identifier that does not exist is not an error.
    pub async fn delete(&self, collection: &str, identifier_hex: &str) -> Result<u64> {
        let id = PostId::parse_hex(identifier_hex)?;

        tracing::debug!(collection, id = %id, "delete");

        self.guarded(
            "delete_one",
            self.backend
                .delete_one(collection, &Filter::eq(ID_FIELD, id)),
        )
        .await
    }
}
