//! Record types stored by the repositories.

mod account;
mod post;

pub use account::{Account, NewAccount};
pub use post::{NewPost, Post, PostWithAuthor, UpdatePost};
