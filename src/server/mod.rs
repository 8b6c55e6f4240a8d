//! HTTP composition root: routes, handlers and server assembly

pub mod builder;
pub mod handlers;
pub mod response;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::{AppState, IdList, TOKEN_COOKIE};
pub use response::{ErrorResponse, status_for};
pub use router::build_post_routes;
