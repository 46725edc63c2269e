//! Blog post model.

use jiff::Timestamp;
use uuid::Uuid;

/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Auto-incremented identifier, starting at 1.
    pub id: i64,
    /// Post title.
    pub subject: String,
    /// Post body.
    pub detail: String,
    /// Like counter. Not clamped; unlikes may drive it below zero.
    pub like: i64,
    /// Author account.
    pub user_id: Uuid,
    /// Timestamp when the post was created.
    pub created_at: Timestamp,
    /// Timestamp of the last edit or like change.
    pub updated_at: Timestamp,
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub subject: String,
    pub detail: String,
    pub user_id: Uuid,
}

/// Partial update of a post. `None` fields are left untouched.
#[derive(Debug, Default, Clone)]
pub struct UpdatePost {
    pub subject: Option<String>,
    pub detail: Option<String>,
}

impl UpdatePost {
    /// Returns `true` if no field would change.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.detail.is_none()
    }
}

/// A post joined with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author_name: String,
}
