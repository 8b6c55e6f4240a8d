//! # Posted
//!
//! A single-resource post service: authenticated HTTP requests are checked
//! against an external session authority and then served from a document
//! store.
//!
//! ## Layers
//!
//! - **Store adapter** ([`storage::StoreAdapter`]): generic fetch-one,
//!   fetch-many, insert and delete over any [`core::DocumentBackend`],
//!   decoding into caller-chosen types under a per-call timeout
//! - **Post repository** ([`posts::PostRepository`]): typed façade fixed
//!   to the `posts` collection, exchanging identifiers as 24-character hex
//! - **Auth delegate** ([`auth::AuthAuthority`]): client for the session
//!   authority, returning an extensible [`auth::Identity`]
//! - **Server** ([`server::ServerBuilder`]): the request pipeline that
//!   forces every post operation through a session check
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use posted::prelude::*;
//!
//! let config = ServiceConfig::from_env()?;
//! ServerBuilder::from_config(config).await?.serve().await?;
//! ```
//!
//! ## Errors
//!
//! Every fallible call returns [`core::PostedError`]; branch on
//! [`core::PostedError::kind`] to tell validation, not-found, unauthorized,
//! transient, decode and not-implemented failures apart.

pub mod auth;
pub mod config;
pub mod core;
pub mod posts;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        DocumentBackend, Entity, ErrorKind, FieldValue, Filter, FindOptions, PostId, PostedError,
    };

    // === Posts ===
    pub use crate::posts::{Post, PostForm, PostRepository};

    // === Auth ===
    pub use crate::auth::{
        AuthAuthority, CachedAuthority, HttpAuthClient, Identity, IdentityCache,
        InMemoryIdentityCache, UserRecord,
    };

    // === Storage ===
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoBackend;
    pub use crate::storage::{InMemoryBackend, StoreAdapter};

    // === Config ===
    pub use crate::config::ServiceConfig;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder, build_post_routes};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
}
