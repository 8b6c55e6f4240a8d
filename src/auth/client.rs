//! Client for the external auth authority
//!
//! The authority owns sessions and accounts. This service only asks it
//! whether a bearer token is valid for a named calling service and reads
//! back the identity attributes it returns.

use super::identity::Identity;
use crate::core::{PostedError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Trait for auth authorities
///
/// Implementations are stateless request/response clients and must be safe
/// for concurrent use.
#[async_trait]
pub trait AuthAuthority: Send + Sync {
    /// Validate `token` for `service`, returning the raw identity payload
    ///
    /// Any rejection is [`ErrorKind::Unauthorized`](crate::core::ErrorKind);
    /// connectivity problems are transient.
    async fn check(&self, service: &str, token: &str) -> Result<String>;

    /// Exchange credentials for a session token payload
    async fn login(&self, service: &str, email: &str, password: &str) -> Result<String>;

    /// Register an account with the authority
    async fn create(&self, service: &str, email: &str, password: &str) -> Result<bool>;

    /// Remove an account from the authority
    async fn delete(&self, uid: &str) -> Result<bool>;

    /// Validate `token` and decode the identity payload
    async fn check_identity(&self, service: &str, token: &str) -> Result<Identity> {
        let raw = self.check(service, token).await?;
        Identity::from_json(&raw)
    }
}

/// HTTP client for the auth authority
///
/// - `GET  {base}/user?service=..&token=..` checks a session
/// - `POST {base}/login` (form: service, email, password) logs in
/// - `POST {base}/user` (form: service, email, password) creates an account
///
/// Only `200 OK` counts as success.
#[derive(Clone, Debug)]
pub struct HttpAuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthClient {
    /// Create a client for the authority at `base_url`
    ///
    /// `timeout` bounds every round trip.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PostedError::validation("auth_service_url", e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn request_error(operation: &str, err: reqwest::Error) -> PostedError {
    if err.is_decode() {
        PostedError::decode(operation, err)
    } else {
        PostedError::transient(operation, err)
    }
}

async fn body_text(operation: &str, response: reqwest::Response) -> Result<String> {
    response
        .text()
        .await
        .map_err(|e| request_error(operation, e))
}

#[async_trait]
impl AuthAuthority for HttpAuthClient {
    async fn check(&self, service: &str, token: &str) -> Result<String> {
        let response = self
            .client
            .get(self.url("/user"))
            .query(&[("service", service), ("token", token)])
            .send()
            .await
            .map_err(|e| request_error("auth check", e))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(service, %status, "auth authority rejected session");
            return Err(PostedError::unauthorized(format!(
                "auth authority returned {}",
                status
            )));
        }

        body_text("auth check", response).await
    }

    async fn login(&self, service: &str, email: &str, password: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url("/login"))
            .form(&[("service", service), ("email", email), ("password", password)])
            .send()
            .await
            .map_err(|e| request_error("auth login", e))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(service, %status, "auth authority rejected login");
            return Err(PostedError::unauthorized(format!(
                "login rejected with {}",
                status
            )));
        }

        body_text("auth login", response).await
    }

    async fn create(&self, service: &str, email: &str, password: &str) -> Result<bool> {
        let response = self
            .client
            .post(self.url("/user"))
            .form(&[("service", service), ("email", email), ("password", password)])
            .send()
            .await
            .map_err(|e| request_error("auth create", e))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(service, %status, "auth authority refused account creation");
            return Ok(false);
        }

        Ok(true)
    }

    async fn delete(&self, _uid: &str) -> Result<bool> {
        Err(PostedError::not_implemented("auth account delete"))
    }
}
