//! Typed error handling for the post service
//!
//! Every store, repository and authority operation returns a [`PostedError`].
//! Callers branch on [`PostedError::kind`] rather than on message text:
//!
//! - [`ErrorKind::Validation`]: malformed identifier hex, malformed input
//! - [`ErrorKind::NotFound`]: no matching document
//! - [`ErrorKind::Unauthorized`]: the auth authority rejected the token/service pair
//! - [`ErrorKind::Transient`]: connectivity or timeout talking to the store or authority
//! - [`ErrorKind::Decode`]: a stored document or transport payload has the wrong shape
//! - [`ErrorKind::NotImplemented`]: operations present in the contract but not built
//!
//! This module carries no knowledge of transport status codes; the HTTP
//! mapping lives in [`crate::server::response`].
//!
//! # Example
//!
//! ```rust,ignore
//! match repository.find_by_id(&postid).await {
//!     Ok(post) => println!("Found: {:?}", post),
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("no post {}", postid),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T, E = PostedError> = std::result::Result<T, E>;

/// Coarse error class, stable across message changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Transient,
    Decode,
    NotImplemented,
}

impl ErrorKind {
    /// Machine-readable code for the class
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Transient => "TRANSIENT_ERROR",
            ErrorKind::Decode => "DECODE_ERROR",
            ErrorKind::NotImplemented => "NOT_IMPLEMENTED",
        }
    }
}

/// The main error type for the post service
#[derive(Debug, Error)]
pub enum PostedError {
    /// Input failed validation (bad identifier hex, missing attribute, ...)
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// No document matched the lookup
    #[error("{collection} document with {key} '{value}' not found")]
    NotFound {
        collection: String,
        key: String,
        value: String,
    },

    /// The auth authority rejected the request
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Connectivity or timeout failure against a remote dependency
    #[error("{operation} failed transiently: {message}")]
    Transient { operation: String, message: String },

    /// A payload could not be mapped onto the expected shape
    #[error("Failed to decode {target}: {message}")]
    Decode { target: String, message: String },

    /// Operation is part of the contract but not supported
    #[error("{operation} is not implemented")]
    NotImplemented { operation: String },
}

impl PostedError {
    /// Get the error class
    pub fn kind(&self) -> ErrorKind {
        match self {
            PostedError::Validation { .. } => ErrorKind::Validation,
            PostedError::NotFound { .. } => ErrorKind::NotFound,
            PostedError::Unauthorized { .. } => ErrorKind::Unauthorized,
            PostedError::Transient { .. } => ErrorKind::Transient,
            PostedError::Decode { .. } => ErrorKind::Decode,
            PostedError::NotImplemented { .. } => ErrorKind::NotImplemented,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        self.kind().code()
    }

    /// Whether retrying the same call might succeed
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PostedError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(
        collection: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        PostedError::NotFound {
            collection: collection.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        PostedError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn transient(operation: impl Into<String>, message: impl ToString) -> Self {
        PostedError::Transient {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    pub fn decode(target: impl Into<String>, message: impl ToString) -> Self {
        PostedError::Decode {
            target: target.into(),
            message: message.to_string(),
        }
    }

    pub fn not_implemented(operation: impl Into<String>) -> Self {
        PostedError::NotImplemented {
            operation: operation.into(),
        }
    }

    /// A call that exceeded its deadline
    pub fn timeout(operation: impl Into<String>, after: Duration) -> Self {
        PostedError::Transient {
            operation: operation.into(),
            message: format!("timed out after {}s", after.as_secs()),
        }
    }
}
