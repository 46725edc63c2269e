//! Request types for HTTP handlers.

mod authentications;
mod paths;
mod posts;

pub use authentications::{Login, Register};
pub use paths::PostPathParams;
pub use posts::{CreatePost, UpdatePost};
