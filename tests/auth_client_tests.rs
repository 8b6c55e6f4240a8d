//! Integration tests for `HttpAuthClient` against a local fake authority
//!
//! Each test binds an axum router on an ephemeral port and points the
//! client at it.

use axum::extract::{Form, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use posted::auth::{AuthAuthority, HttpAuthClient};
use posted::core::ErrorKind;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpListener;

const PROFILE: &str = r#"{"uid":"u-1","username":"alice","screenname":"Alice","avatarurl":"http://img.local/a.png","verified":"true"}"#;

#[derive(Debug, Deserialize)]
struct Credentials {
    service: String,
    email: String,
    password: String,
}

/// Authority that accepts token `good` for service `posts` and answers
/// `bad-*` tokens with the status named after the dash.
async fn check(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
    let service = params.get("service").map(String::as_str);
    let token = params.get("token").map(String::as_str).unwrap_or_default();

    match (service, token) {
        (Some("posts"), "good") => (StatusCode::OK, PROFILE.to_string()),
        // Spaces and ampersands must survive query encoding
        (Some("my service"), "a&b=c") => (StatusCode::OK, r#"{"uid":"encoded"}"#.to_string()),
        (_, "bad-403") => (StatusCode::FORBIDDEN, String::new()),
        (_, "bad-500") => (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
        _ => (StatusCode::UNAUTHORIZED, String::new()),
    }
}

async fn login(Form(creds): Form<Credentials>) -> (StatusCode, String) {
    if creds.service == "posts" && creds.email == "a@b.c" && creds.password == "secret" {
        (StatusCode::OK, "session-token".to_string())
    } else {
        (StatusCode::UNAUTHORIZED, String::new())
    }
}

async fn create_user(Form(creds): Form<Credentials>) -> StatusCode {
    if creds.email.contains('@') && !creds.password.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::CONFLICT
    }
}

async fn spawn_authority() -> HttpAuthClient {
    let app = Router::new()
        .route("/user", get(check).post(create_user))
        .route("/login", post(login));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    HttpAuthClient::new(&format!("http://{}/", addr), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_check_returns_payload() {
    let client = spawn_authority().await;
    let body = client.check("posts", "good").await.unwrap();
    assert_eq!(body, PROFILE);
}

#[tokio::test]
async fn test_check_identity_decodes_payload() {
    let client = spawn_authority().await;
    let identity = client.check_identity("posts", "good").await.unwrap();
    assert_eq!(identity.require_str("uid").unwrap(), "u-1");
    assert_eq!(identity.optional_str("screenname"), Some("Alice"));
    assert!(identity.flag("verified"));
}

#[tokio::test]
async fn test_rejections_are_unauthorized() {
    let client = spawn_authority().await;
    for token in ["expired", "bad-403", "bad-500"] {
        let err = client.check("posts", token).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized, "token {:?}", token);
        assert!(!err.is_transient());
    }
}

#[tokio::test]
async fn test_wrong_service_is_unauthorized() {
    let client = spawn_authority().await;
    let err = client.check("other", "good").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_query_parameters_are_encoded() {
    let client = spawn_authority().await;
    let body = client.check("my service", "a&b=c").await.unwrap();
    assert_eq!(body, r#"{"uid":"encoded"}"#);
}

#[tokio::test]
async fn test_unreachable_authority_is_transient() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpAuthClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let err = client.check("posts", "good").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transient);
}

#[tokio::test]
async fn test_login() {
    let client = spawn_authority().await;
    let token = client.login("posts", "a@b.c", "secret").await.unwrap();
    assert_eq!(token, "session-token");

    let err = client.login("posts", "a@b.c", "wrong").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_create_account() {
    let client = spawn_authority().await;
    assert!(client.create("posts", "new@b.c", "pw").await.unwrap());
    assert!(!client.create("posts", "not-an-email", "pw").await.unwrap());
}

#[tokio::test]
async fn test_delete_account_not_implemented() {
    let client = spawn_authority().await;
    let err = client.delete("u-1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotImplemented);
}
