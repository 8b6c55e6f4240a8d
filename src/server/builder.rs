//! ServerBuilder for fluent API to build the HTTP server

use super::handlers::AppState;
use super::router::build_post_routes;
use crate::auth::{AuthAuthority, CachedAuthority, HttpAuthClient, IdentityCache};
use crate::config::ServiceConfig;
use crate::core::DocumentBackend;
use crate::posts::PostRepository;
use crate::storage::{InMemoryBackend, StoreAdapter};
use anyhow::{Context, Result, anyhow};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the post service
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new(config)
///     .with_backend(InMemoryBackend::new())
///     .with_authority(HttpAuthClient::new("http://auth:8080", timeout)?)
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: ServiceConfig,
    store: Option<StoreAdapter>,
    authority: Option<Arc<dyn AuthAuthority>>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            store: None,
            authority: None,
        }
    }

    /// Wire every dependency named by `config`
    ///
    /// - MongoDB when `mongo_url` is set (requires `mongodb_backend`),
    ///   otherwise the in-memory backend
    /// - the HTTP authority at `auth_service_url` (required)
    /// - a Redis identity cache when `redis_url` is set (requires `redis_cache`)
    pub async fn from_config(config: ServiceConfig) -> Result<Self> {
        let timeout = config.request_timeout();

        let auth_url = config
            .auth_service_url
            .clone()
            .ok_or_else(|| anyhow!("AUTH_SERVICE_URL must be set"))?;
        let client = HttpAuthClient::new(&auth_url, timeout)?;

        let backend = Self::connect_backend(&config).await?;
        let cache = Self::connect_cache(&config).await?;

        let builder = Self::new(config).with_shared_backend(backend);
        Ok(match cache {
            Some(cache) => {
                builder.with_authority(CachedAuthority::new(client, cache).with_timeout(timeout))
            }
            None => builder.with_authority(client),
        })
    }

    #[cfg(feature = "mongodb_backend")]
    async fn connect_backend(config: &ServiceConfig) -> Result<Arc<dyn DocumentBackend>> {
        if let Some(url) = &config.mongo_url {
            let backend = crate::storage::MongoBackend::connect(
                url,
                &config.mongo_database,
                config.request_timeout(),
            )
            .await
            .context("failed to connect to MongoDB")?;
            return Ok(Arc::new(backend));
        }

        tracing::warn!("MONGO_URL not set, posts are kept in memory");
        Ok(Arc::new(InMemoryBackend::new()))
    }

    #[cfg(not(feature = "mongodb_backend"))]
    async fn connect_backend(config: &ServiceConfig) -> Result<Arc<dyn DocumentBackend>> {
        if config.mongo_url.is_some() {
            tracing::warn!("built without mongodb_backend, ignoring MONGO_URL");
        }
        tracing::warn!("posts are kept in memory");
        Ok(Arc::new(InMemoryBackend::new()))
    }

    #[cfg(feature = "redis_cache")]
    async fn connect_cache(config: &ServiceConfig) -> Result<Option<Arc<dyn IdentityCache>>> {
        match &config.redis_url {
            Some(url) => {
                let cache = crate::auth::RedisIdentityCache::connect(url)
                    .await
                    .context("failed to connect to Redis")?;
                Ok(Some(Arc::new(cache)))
            }
            None => Ok(None),
        }
    }

    #[cfg(not(feature = "redis_cache"))]
    async fn connect_cache(config: &ServiceConfig) -> Result<Option<Arc<dyn IdentityCache>>> {
        if config.redis_url.is_some() {
            tracing::warn!("built without redis_cache, identity caching disabled");
        }
        Ok(None)
    }

    /// Use `backend` for document storage, bounded by the configured timeout
    pub fn with_backend(self, backend: impl DocumentBackend + 'static) -> Self {
        self.with_shared_backend(Arc::new(backend))
    }

    pub fn with_shared_backend(mut self, backend: Arc<dyn DocumentBackend>) -> Self {
        let store = StoreAdapter::from_arc(backend).with_timeout(self.config.request_timeout());
        self.store = Some(store);
        self
    }

    /// Set the auth authority (required)
    pub fn with_authority(self, authority: impl AuthAuthority + 'static) -> Self {
        self.with_shared_authority(Arc::new(authority))
    }

    pub fn with_shared_authority(mut self, authority: Arc<dyn AuthAuthority>) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn into_router(self) -> Result<(Router, ServiceConfig)> {
        let store = self
            .store
            .ok_or_else(|| anyhow!("a document backend is required"))?;
        let authority = self
            .authority
            .ok_or_else(|| anyhow!("an auth authority is required"))?;

        let posts = PostRepository::new(store).with_default_range(self.config.default_range);
        let state = AppState::new(posts, authority, self.config.service_name.as_str());
        let router = build_post_routes(state, &self.config.route_prefix());

        Ok((router, self.config))
    }

    /// Build the router
    pub fn build(self) -> Result<Router> {
        self.into_router().map(|(router, _)| router)
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the configured address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let (app, config) = self.into_router()?;
        let listener = TcpListener::bind(&config.bind_addr)
            .await
            .with_context(|| format!("failed to bind {}", config.bind_addr))?;

        tracing::info!(
            service = %config.service_name,
            "Server listening on {}",
            config.bind_addr
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
