//! Storage implementations for different backends

pub mod adapter;
pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;

pub use adapter::{DEFAULT_STORE_TIMEOUT, StoreAdapter};
pub use in_memory::InMemoryBackend;
#[cfg(feature = "mongodb_backend")]
pub use mongodb::MongoBackend;
