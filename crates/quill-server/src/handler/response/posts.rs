//! Post response types.

use jiff::Timestamp;
use quill_store::model;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a blog post.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier of the post.
    pub id: i64,
    /// Title of the post.
    pub subject: String,
    /// Body of the post.
    pub detail: String,
    /// Like counter, may be negative.
    pub like: i64,
    /// Account that wrote the post.
    pub user_id: Uuid,
    /// Display name of the author, when joined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,

    /// Timestamp when the post was created.
    pub created_at: Timestamp,
    /// Timestamp when the post was last updated.
    pub updated_at: Timestamp,
}

impl Post {
    pub fn from_model(post: model::Post) -> Self {
        Self {
            id: post.id,
            subject: post.subject,
            detail: post.detail,
            like: post.like,
            user_id: post.user_id,
            author_name: None,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }

    pub fn from_joined(joined: model::PostWithAuthor) -> Self {
        Self {
            author_name: Some(joined.author_name),
            ..Self::from_model(joined.post)
        }
    }
}
