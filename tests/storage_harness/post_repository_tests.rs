//! Macro-generated test suite for `PostRepository` contract validation.
//!
//! The `post_repository_tests!` macro generates a test module that validates
//! a `PostRepository` over any `DocumentBackend`.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//!
//! post_repository_tests!(PostRepository::new(StoreAdapter::new(InMemoryBackend::new())));
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_find_by_id`: every field survives the round trip
//! - `test_find_missing_is_not_found`: unknown identifier is NotFound
//! - `test_invalid_hex_is_validation`: find/delete reject malformed ids
//! - `test_delete_existing`: delete then find is NotFound
//! - `test_delete_nonexistent_succeeds`: deleting an unknown id reports success
//! - `test_update_not_implemented`
//!
//! ## Listing
//! - `test_find_recent_default_range`: "", "notanumber" and "8" agree
//! - `test_find_recent_limit_newest_first`
//! - `test_find_recent_empty`
//! - `test_find_many_by_field`
//!
//! ## Tags
//! - `test_tags_preserve_order`
//! - `test_no_tags_stores_placeholder`
//!
//! ## Concurrency
//! - `test_concurrent_creates`: parallel creates from spawned tasks

/// Generate a full `PostRepository` conformance test suite.
///
/// `$factory` must evaluate to a fresh, empty `PostRepository`. It is
/// re-evaluated for each test to ensure isolation.
#[macro_export]
macro_rules! post_repository_tests {
    ($factory:expr) => {
        mod post_repository_contract_tests {
            use super::*;
            use posted::core::{ErrorKind, PostId};

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_find_by_id() {
                let repo = $factory;
                let post = post_at("u1", Some("sunset,beach"), chrono::Utc::now());

                assert!(repo.create(&post).await.unwrap());

                let found = repo.find_by_id(&post.id.to_hex()).await.unwrap();
                assert_eq!(found, post);
                assert_eq!(found.like_count, 0);
                assert_eq!(found.comment_count, 0);
                assert_eq!(found.view_count, 0);
                assert!(!found.private);
                assert!(found.verified);
            }

            #[tokio::test]
            async fn test_find_missing_is_not_found() {
                let repo = $factory;
                repo.create(&post("u1")).await.unwrap();

                let err = repo
                    .find_by_id(&PostId::new().to_hex())
                    .await
                    .unwrap_err();
                assert_eq!(err.kind(), ErrorKind::NotFound);
            }

            #[tokio::test]
            async fn test_invalid_hex_is_validation() {
                let repo = $factory;
                for bad in ["", "1", "not-a-valid-identifier!!", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
                    let err = repo.find_by_id(bad).await.unwrap_err();
                    assert_eq!(err.kind(), ErrorKind::Validation, "find {:?}", bad);

                    let err = repo.delete(bad).await.unwrap_err();
                    assert_eq!(err.kind(), ErrorKind::Validation, "delete {:?}", bad);
                }
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let repo = $factory;
                let post = post("u1");
                repo.create(&post).await.unwrap();

                assert!(repo.delete(&post.id.to_hex()).await.unwrap());

                let err = repo.find_by_id(&post.id.to_hex()).await.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::NotFound);
            }

            #[tokio::test]
            async fn test_delete_nonexistent_succeeds() {
                let repo = $factory;
                assert!(repo.delete(&PostId::new().to_hex()).await.unwrap());
            }

            #[tokio::test]
            async fn test_update_not_implemented() {
                let repo = $factory;
                let err = repo.update().await.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::NotImplemented);
            }

            // ==================================================================
            // Listing
            // ==================================================================

            #[tokio::test]
            async fn test_find_recent_default_range() {
                let repo = $factory;
                for post in timeline("u1", 10) {
                    repo.create(&post).await.unwrap();
                }

                let explicit = repo.find_recent("8").await.unwrap();
                assert_eq!(explicit.len(), 8);
                assert_eq!(repo.find_recent("").await.unwrap(), explicit);
                assert_eq!(repo.find_recent("notanumber").await.unwrap(), explicit);
            }

            #[tokio::test]
            async fn test_find_recent_limit_newest_first() {
                let repo = $factory;
                let posts = timeline("u1", 5);
                for post in &posts {
                    repo.create(post).await.unwrap();
                }

                let ids = repo.find_recent("3").await.unwrap();
                let expected: Vec<String> =
                    posts.iter().rev().take(3).map(|p| p.id.to_hex()).collect();
                assert_eq!(ids, expected);

                let all = repo.find_recent("50").await.unwrap();
                assert_eq!(all.len(), 5);
            }

            #[tokio::test]
            async fn test_find_recent_empty() {
                let repo = $factory;
                assert!(repo.find_recent("").await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_find_many_by_field() {
                let repo = $factory;
                let mine = timeline("alice", 3);
                for post in &mine {
                    repo.create(post).await.unwrap();
                }
                repo.create(&post("bob")).await.unwrap();

                let ids = repo.find_many_by_field("uid", "alice").await.unwrap();
                let expected: Vec<String> = mine.iter().rev().map(|p| p.id.to_hex()).collect();
                assert_eq!(ids, expected);

                let none = repo.find_many_by_field("uid", "carol").await.unwrap();
                assert!(none.is_empty());
            }

            // ==================================================================
            // Tags
            // ==================================================================

            #[tokio::test]
            async fn test_tags_preserve_order() {
                let repo = $factory;
                let post = post_at("u1", Some("a,b"), chrono::Utc::now());
                repo.create(&post).await.unwrap();

                let found = repo.find_by_id(&post.id.to_hex()).await.unwrap();
                assert_eq!(found.tags, vec!["a".to_string(), "b".to_string()]);
            }

            #[tokio::test]
            async fn test_no_tags_stores_placeholder() {
                let repo = $factory;
                let post = post("u1");
                repo.create(&post).await.unwrap();

                let found = repo.find_by_id(&post.id.to_hex()).await.unwrap();
                assert_eq!(found.tags, vec![String::new()]);
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_creates() {
                let repo = $factory;
                let r1 = repo.clone();
                let r2 = repo.clone();

                let p1 = post("concurrent-a");
                let p2 = post("concurrent-b");
                let (id1, id2) = (p1.id.to_hex(), p2.id.to_hex());

                let h1 = tokio::spawn(async move { r1.create(&p1).await });
                let h2 = tokio::spawn(async move { r2.create(&p2).await });

                assert!(h1.await.unwrap().unwrap());
                assert!(h2.await.unwrap().unwrap());

                assert_eq!(repo.find_by_id(&id1).await.unwrap().uid, "concurrent-a");
                assert_eq!(repo.find_by_id(&id2).await.unwrap().uid, "concurrent-b");
            }
        }
    };
}
