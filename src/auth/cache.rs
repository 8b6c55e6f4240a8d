//! Identity payload caching in front of the auth authority
//!
//! A cache is optional. When present, [`CachedAuthority`] answers repeat
//! session checks for the same service/token pair from the cache. Entries
//! have no expiry; they are removed only by an explicit
//! [`CachedAuthority::invalidate`]. Cache failures never fail a request:
//! they are logged and the authority is asked directly. Every cache call
//! runs under a deadline, and an elapsed deadline counts as a failure.

use super::client::AuthAuthority;
use crate::core::{PostedError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Default deadline for a single cache round trip
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_secs(30);

/// Key-value store for identity payloads
#[async_trait]
pub trait IdentityCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;
}

/// In-memory identity cache
#[derive(Clone, Default)]
pub struct InMemoryIdentityCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryIdentityCache {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl ToString) -> PostedError {
    PostedError::transient("identity cache lock", e)
}

#[async_trait]
impl IdentityCache for InMemoryIdentityCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(feature = "redis_cache")]
pub use redis_cache::RedisIdentityCache;

#[cfg(feature = "redis_cache")]
mod redis_cache {
    use super::IdentityCache;
    use crate::core::{PostedError, Result};
    use async_trait::async_trait;
    use redis::AsyncCommands;
    use redis::aio::ConnectionManager;

    /// Redis-backed identity cache
    ///
    /// Holds a `ConnectionManager`, which reconnects on its own and is cheap
    /// to clone per call.
    #[derive(Clone)]
    pub struct RedisIdentityCache {
        manager: ConnectionManager,
    }

    impl RedisIdentityCache {
        /// Connect to the Redis server at `redis_url`
        pub async fn connect(redis_url: &str) -> Result<Self> {
            let client = redis::Client::open(redis_url)
                .map_err(|e| PostedError::validation("redis_url", e.to_string()))?;
            let manager = ConnectionManager::new(client)
                .await
                .map_err(|e| PostedError::transient("redis connect", e))?;

            tracing::info!("identity cache connected to Redis");
            Ok(Self { manager })
        }
    }

    #[async_trait]
    impl IdentityCache for RedisIdentityCache {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            let mut conn = self.manager.clone();
            conn.get::<_, Option<String>>(key)
                .await
                .map_err(|e| PostedError::transient("redis get", e))
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            let mut conn = self.manager.clone();
            conn.set::<_, _, ()>(key, value)
                .await
                .map_err(|e| PostedError::transient("redis set", e))
        }

        async fn delete(&self, key: &str) -> Result<()> {
            let mut conn = self.manager.clone();
            conn.del::<_, ()>(key)
                .await
                .map_err(|e| PostedError::transient("redis del", e))
        }
    }
}

/// Auth authority decorated with an identity cache
pub struct CachedAuthority<A> {
    inner: A,
    cache: Arc<dyn IdentityCache>,
    timeout: Duration,
}

impl<A: AuthAuthority> CachedAuthority<A> {
    pub fn new(inner: A, cache: Arc<dyn IdentityCache>) -> Self {
        Self {
            inner,
            cache,
            timeout: DEFAULT_CACHE_TIMEOUT,
        }
    }

    /// Override the per-call cache deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
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
                    operation,
                    timeout_secs = self.timeout.as_secs(),
                    "identity cache call timed out"
                );
                Err(PostedError::timeout(operation, self.timeout))
            }
        }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    fn cache_key(service: &str, token: &str) -> String {
        format!("auth:{}:{}", service, token)
    }

    /// Drop the cached payload for a service/token pair
    pub async fn invalidate(&self, service: &str, token: &str) -> Result<()> {
        let key = Self::cache_key(service, token);
        self.guarded("identity cache delete", self.cache.delete(&key))
            .await
    }
}

#[async_trait]
impl<A: AuthAuthority> AuthAuthority for CachedAuthority<A> {
    async fn check(&self, service: &str, token: &str) -> Result<String> {
        let key = Self::cache_key(service, token);

        match self.guarded("identity cache get", self.cache.get(&key)).await {
            Ok(Some(payload)) => {
                tracing::debug!(service, "identity served from cache");
                return Ok(payload);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "identity cache read failed"),
        }

        let payload = self.inner.check(service, token).await?;

        if let Err(e) = self
            .guarded("identity cache set", self.cache.set(&key, &payload))
            .await
        {
            tracing::warn!(error = %e, "identity cache write failed");
        }

        Ok(payload)
    }

    async fn login(&self, service: &str, email: &str, password: &str) -> Result<String> {
        self.inner.login(service, email, password).await
    }

    async fn create(&self, service: &str, email: &str, password: &str) -> Result<bool> {
        self.inner.create(service, email, password).await
    }

    async fn delete(&self, uid: &str) -> Result<bool> {
        self.inner.delete(uid).await
    }
}
