//! Post request types.

use quill_store::model;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request payload for creating a post.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    /// Title of the post.
    #[validate(length(min = 1, max = 200))]
    pub subject: String,

    /// Body of the post.
    #[validate(length(min = 1))]
    pub detail: String,
}

impl CreatePost {
    pub fn into_model(self, user_id: Uuid) -> model::NewPost {
        model::NewPost {
            subject: self.subject,
            detail: self.detail,
            user_id,
        }
    }
}

/// Request payload for editing a post. Omitted fields stay unchanged.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePost {
    /// New title of the post.
    #[validate(length(min = 1, max = 200))]
    pub subject: Option<String>,

    /// New body of the post.
    #[validate(length(min = 1))]
    pub detail: Option<String>,
}

impl UpdatePost {
    pub fn into_model(self) -> model::UpdatePost {
        model::UpdatePost {
            subject: self.subject,
            detail: self.detail,
        }
    }
}
