//! Post repository over the generic store adapter

use super::model::Post;
use crate::core::query::ID_FIELD;
use crate::core::{
    DEFAULT_LIMIT, Entity, FieldValue, Filter, FindOptions, PostedError, Result, parse_limit,
};
use crate::storage::StoreAdapter;

/// Typed façade over [`StoreAdapter`] fixed to the `posts` collection
///
/// Listing operations return identifier hex strings only; callers fetch
/// full records with [`find_by_id`](Self::find_by_id).
#[derive(Clone)]
pub struct PostRepository {
    store: StoreAdapter,
    default_range: u64,
}

impl PostRepository {
    pub fn new(store: StoreAdapter) -> Self {
        Self {
            store,
            default_range: DEFAULT_LIMIT,
        }
    }

    /// Override the fallback limit used by [`find_recent`](Self::find_recent)
    pub fn with_default_range(mut self, default_range: u64) -> Self {
        self.default_range = default_range.max(1);
        self
    }

    pub fn store(&self) -> &StoreAdapter {
        &self.store
    }

    fn collection() -> &'static str {
        Post::collection_name()
    }

    fn to_hex_ids(posts: Vec<Post>) -> Vec<String> {
        posts.into_iter().map(|p| p.id.to_hex()).collect()
    }

    /// Fetch one post by identifier hex
    pub async fn find_by_id(&self, identifier_hex: &str) -> Result<Post> {
        self.store
            .fetch_one(Self::collection(), ID_FIELD, identifier_hex)
            .await
    }

    /// Identifiers of every post whose `field` equals `value`, newest first
    pub async fn find_many_by_field(
        &self,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Vec<String>> {
        let posts: Vec<Post> = self
            .store
            .fetch_many(
                Self::collection(),
                &Filter::eq(field, value),
                FindOptions::unlimited(),
            )
            .await?;

        Ok(Self::to_hex_ids(posts))
    }

    /// Identifiers of the most recent posts
    ///
    /// `range` is a string size hint; empty or non-numeric hints use the
    /// default range.
    pub async fn find_recent(&self, range: &str) -> Result<Vec<String>> {
        let limit = parse_limit(Some(range), self.default_range);
        let posts: Vec<Post> = self
            .store
            .fetch_many(Self::collection(), &Filter::All, FindOptions::limited(limit))
            .await?;

        Ok(Self::to_hex_ids(posts))
    }

    /// Persist a fully formed post
    ///
    /// The identifier and creation time must already be set (see
    /// [`Post::compose`]). Not idempotent: retrying a failed create with a
    /// newly composed post can store a duplicate.
    pub async fn create(&self, post: &Post) -> Result<bool> {
        self.store.insert(Self::collection(), post).await?;
        tracing::info!(
            entity = Post::entity_name(),
            id = %post.id(),
            uid = %post.uid,
            created = %post.created_at(),
            "created"
        );
        Ok(true)
    }

    /// Delete a post by identifier hex
    ///
    /// Succeeds whether or not a post with that identifier existed.
    pub async fn delete(&self, identifier_hex: &str) -> Result<bool> {
        let removed = self.store.delete(Self::collection(), identifier_hex).await?;
        tracing::info!(
            entity = Post::entity_name(),
            id = identifier_hex,
            removed,
            "deleted"
        );
        Ok(true)
    }

    /// Posts are immutable once created
    pub async fn update(&self) -> Result<bool> {
        Err(PostedError::not_implemented(format!(
            "{} update",
            Post::entity_name()
        )))
    }
}
