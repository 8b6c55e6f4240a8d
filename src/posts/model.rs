//! Post entity and write form

use crate::auth::Identity;
use crate::core::{Entity, PostId, Result};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Tag list stored when a post is created without tags
///
/// Posts have always been written with a single empty tag in that case and
/// readers may rely on the list being non-empty.
pub fn empty_tag_placeholder() -> Vec<String> {
    vec![String::new()]
}

/// A published post
///
/// The owning-user fields are a snapshot of the author's identity at
/// creation time; later profile changes do not touch existing posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub uid: String,
    pub username: String,
    #[serde(rename = "screenname")]
    pub screen_name: String,
    #[serde(rename = "avatarurl")]
    pub avatar_url: String,
    pub verified: bool,
    #[serde(rename = "imageurl")]
    pub image_url: String,
    pub caption: String,
    #[serde(rename = "likecount")]
    pub like_count: i64,
    pub private: bool,
    #[serde(rename = "commentcount")]
    pub comment_count: i64,
    #[serde(rename = "viewcount")]
    pub view_count: i64,
    pub created: DateTime<Utc>,
    #[serde(rename = "tag", default = "empty_tag_placeholder")]
    pub tags: Vec<String>,
}

/// Form fields accepted when creating a post
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PostForm {
    #[serde(default)]
    pub img_url: String,
    #[serde(default)]
    pub post_caption: String,
    /// Comma-separated tag list
    #[serde(default)]
    pub tags: Option<String>,
}

impl PostForm {
    /// Split the comma-separated tag field, dropping blank entries
    ///
    /// Yields the placeholder list when nothing usable was supplied.
    pub fn tag_list(&self) -> Vec<String> {
        let tags: Vec<String> = self
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        if tags.is_empty() {
            empty_tag_placeholder()
        } else {
            tags
        }
    }
}

impl Post {
    /// Build a new post authored by `identity`
    ///
    /// Assigns a fresh identifier stamped with `now`, sets the creation
    /// time server-side (at millisecond precision, the resolution of stored
    /// dates) and zeroes every counter. Only `uid` is required of
    /// the identity; display attributes default to empty strings and
    /// `verified` is parsed leniently.
    pub fn compose(identity: &Identity, form: &PostForm, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            id: PostId::from_timestamp(now),
            uid: identity.require_str("uid")?.to_string(),
            username: identity.optional_str("username").unwrap_or_default().to_string(),
            screen_name: identity
                .optional_str("screenname")
                .unwrap_or_default()
                .to_string(),
            avatar_url: identity
                .optional_str("avatarurl")
                .unwrap_or_default()
                .to_string(),
            verified: identity.flag("verified"),
            image_url: form.img_url.clone(),
            caption: form.post_caption.clone(),
            like_count: 0,
            private: false,
            comment_count: 0,
            view_count: 0,
            created: now.trunc_subsecs(3),
            tags: form.tag_list(),
        })
    }
}

impl Entity for Post {
    fn collection_name() -> &'static str {
        "posts"
    }

    fn entity_name() -> &'static str {
        "post"
    }

    fn id(&self) -> PostId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created
    }
}
