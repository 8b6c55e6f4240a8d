//! Configuration loading and management
//!
//! [`ServiceConfig`] is resolved once at startup, from the environment or a
//! YAML document, and handed by value to the components that need it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Name the service presents to the auth authority and uses as route prefix
pub const DEFAULT_SERVICE_NAME: &str = "post-service";

/// Complete configuration for the post service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Calling-service name for session checks (e.g., "post-service")
    pub service_name: String,

    /// Base URL of the auth authority
    pub auth_service_url: Option<String>,

    /// Document store connection string; the in-memory store is used when absent
    pub mongo_url: Option<String>,

    /// Document store database name
    pub mongo_database: String,

    /// Identity cache address; caching is disabled when absent
    pub redis_url: Option<String>,

    /// Listen address for the HTTP server
    pub bind_addr: String,

    /// Per-call deadline for store and authority round trips, in seconds
    pub request_timeout_secs: u64,

    /// Fetch limit for recent-post listings without a usable range
    pub default_range: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            auth_service_url: None,
            mongo_url: None,
            mongo_database: "posted".to_string(),
            redis_url: None,
            bind_addr: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            default_range: crate::core::DEFAULT_LIMIT,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("invalid YAML configuration")?;
        Ok(config)
    }

    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// Recognized keys: `SERVICE_NAME`, `AUTH_SERVICE_URL`, `MONGO_URL`,
    /// `MONGO_DATABASE`, `REDIS_URL`, `BIND_ADDR`, `REQUEST_TIMEOUT_SECS`,
    /// `DEFAULT_RANGE`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(name) = get("SERVICE_NAME") {
            config.service_name = name;
        }
        config.auth_service_url = get("AUTH_SERVICE_URL");
        config.mongo_url = get("MONGO_URL");
        if let Some(db) = get("MONGO_DATABASE") {
            config.mongo_database = db;
        }
        config.redis_url = get("REDIS_URL");
        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(secs) = get("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("REQUEST_TIMEOUT_SECS is not a number: {}", secs))?;
        }
        if let Some(range) = get("DEFAULT_RANGE") {
            config.default_range = range
                .trim()
                .parse()
                .with_context(|| format!("DEFAULT_RANGE is not a number: {}", range))?;
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Route prefix derived from the service name
    pub fn route_prefix(&self) -> String {
        format!("/{}", self.service_name.trim_matches('/'))
    }
}
