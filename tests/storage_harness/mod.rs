//! Shared test harness for storage backend testing
//!
//! Provides helpers for composing posts and identities, plus the
//! `post_repository_tests!` macro that validates a `PostRepository` over any
//! backend.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod post_repository_tests;

use chrono::{DateTime, Duration, Utc};
use posted::auth::Identity;
use posted::posts::{Post, PostForm};

/// Identity payload shaped like the profile variant of the authority
pub fn identity(uid: &str) -> Identity {
    Identity::from_json(&format!(
        r#"{{"uid":"{uid}","username":"user-{uid}","screenname":"User {uid}","avatarurl":"http://img.local/{uid}.png","verified":"true"}}"#
    ))
    .unwrap()
}

/// Compose a post for `uid` created at `at`
pub fn post_at(uid: &str, tags: Option<&str>, at: DateTime<Utc>) -> Post {
    let form = PostForm {
        img_url: format!("http://img.local/{}/photo.png", uid),
        post_caption: format!("caption by {}", uid),
        tags: tags.map(str::to_string),
    };
    Post::compose(&identity(uid), &form, at).unwrap()
}

/// Compose a post for `uid` created now
pub fn post(uid: &str) -> Post {
    post_at(uid, None, Utc::now())
}

/// Compose `count` posts one second apart, oldest first
pub fn timeline(uid: &str, count: usize) -> Vec<Post> {
    let start = Utc::now() - Duration::seconds(count as i64 + 1);
    (0..count)
        .map(|i| post_at(uid, None, start + Duration::seconds(i as i64)))
        .collect()
}
