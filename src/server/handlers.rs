//! HTTP handlers for the post routes
//!
//! Every handler except [`ping`] runs the session check before touching the
//! repository.

use crate::auth::{AuthAuthority, Identity};
use crate::core::{PostedError, Result};
use crate::posts::{Post, PostForm, PostRepository};
use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query, State};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cookie carrying the bearer session token
pub const TOKEN_COOKIE: &str = "token";

/// Shared state for the post routes
#[derive(Clone)]
pub struct AppState {
    pub posts: PostRepository,
    pub authority: Arc<dyn AuthAuthority>,
    pub service_name: Arc<str>,
}

impl AppState {
    pub fn new(
        posts: PostRepository,
        authority: Arc<dyn AuthAuthority>,
        service_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            posts,
            authority,
            service_name: service_name.into(),
        }
    }

    /// Validate the session cookie and decode the caller's identity
    async fn authenticate(&self, jar: &CookieJar) -> Result<Identity> {
        let token = jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PostedError::unauthorized("missing session token"))?;

        self.authority
            .check_identity(&self.service_name, &token)
            .await
    }
}

#[derive(Debug, Deserialize)]
pub struct PostIdQuery {
    pub postid: Option<String>,
}

impl PostIdQuery {
    fn required(&self) -> Result<&str> {
        self.postid
            .as_deref()
            .ok_or_else(|| PostedError::validation("postid", "query parameter is required"))
    }
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub range: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub uid: Option<String>,
}

/// Listing response: identifier hex strings only
#[derive(Debug, Serialize, Deserialize)]
pub struct IdList {
    pub results: Vec<String>,
}

pub async fn ping() -> &'static str {
    "OK"
}

pub async fn get_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<PostIdQuery>,
) -> Result<Json<Post>> {
    state.authenticate(&jar).await?;
    let post = state.posts.find_by_id(query.required()?).await?;
    Ok(Json(post))
}

/// The session check runs before the body is looked at, so an anonymous
/// request is `Unauthorized` whatever it carries.
pub async fn create_post(
    State(state): State<AppState>,
    jar: CookieJar,
    form: std::result::Result<Form<PostForm>, FormRejection>,
) -> Result<&'static str> {
    let identity = state.authenticate(&jar).await?;
    let Form(form) = form.map_err(|e| PostedError::validation("form", e.body_text()))?;
    let post = Post::compose(&identity, &form, Utc::now())?;
    state.posts.create(&post).await?;
    Ok("ok")
}

pub async fn delete_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<PostIdQuery>,
) -> Result<&'static str> {
    state.authenticate(&jar).await?;
    state.posts.delete(query.required()?).await?;
    Ok("deleted")
}

pub async fn list_recent(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<RangeQuery>,
) -> Result<Json<IdList>> {
    state.authenticate(&jar).await?;
    let results = state
        .posts
        .find_recent(query.range.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(IdList { results }))
}

pub async fn list_by_owner(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<IdList>> {
    state.authenticate(&jar).await?;
    let uid = query
        .uid
        .ok_or_else(|| PostedError::validation("uid", "query parameter is required"))?;
    let results = state.posts.find_many_by_field("uid", uid).await?;
    Ok(Json(IdList { results }))
}
