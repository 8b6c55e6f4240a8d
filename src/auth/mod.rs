//! Delegated authentication
//!
//! - [`AuthAuthority`]: client contract for the external session authority
//! - [`HttpAuthClient`]: the HTTP implementation
//! - [`Identity`]: decoded, extensible identity payload
//! - [`CachedAuthority`]: optional identity caching in front of an authority

pub mod cache;
pub mod client;
pub mod identity;

#[cfg(feature = "redis_cache")]
pub use cache::RedisIdentityCache;
pub use cache::{CachedAuthority, DEFAULT_CACHE_TIMEOUT, IdentityCache, InMemoryIdentityCache};
pub use client::{AuthAuthority, HttpAuthClient};
pub use identity::{Identity, UserRecord, parse_flag};
