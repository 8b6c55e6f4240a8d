//! Router for the post routes

use super::handlers::{
    AppState, create_post, delete_post, get_post, list_by_owner, list_recent, ping,
};
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

/// Build the post routes under `prefix`
///
/// - GET /{prefix}/ping - Liveness
/// - GET /{prefix}/post?postid= - Fetch one post
/// - POST /{prefix}/post - Create a post from form fields
/// - DELETE /{prefix}/post?postid= - Delete a post
/// - GET /{prefix}/allpost?range= - Identifiers of recent posts
/// - GET /{prefix}/userpost?uid= - Identifiers of one user's posts
pub fn build_post_routes(state: AppState, prefix: &str) -> Router {
    let routes = Router::new()
        .route("/ping", get(ping))
        .route("/post", get(get_post).post(create_post).delete(delete_post))
        .route("/allpost", get(list_recent))
        .route("/userpost", get(list_by_owner))
        .with_state(state);

    let prefix = prefix.trim_end_matches('/');
    let app = if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(prefix, routes)
    };

    app.layer(TraceLayer::new_for_http())
}
