//! Path parameter types for HTTP handlers.

use serde::{Deserialize, Serialize};

/// Path parameters for single-post operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPathParams {
    /// Unique identifier of the post.
    pub id: i64,
}
