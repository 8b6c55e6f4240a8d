//! Core module containing fundamental traits and types for the service

pub mod entity;
pub mod error;
pub mod field;
pub mod identifier;
pub mod query;
pub mod service;

pub use entity::Entity;
pub use error::{ErrorKind, PostedError, Result};
pub use field::FieldValue;
pub use identifier::PostId;
pub use query::{DEFAULT_LIMIT, Filter, FindOptions, ID_FIELD, parse_limit};
pub use service::DocumentBackend;
