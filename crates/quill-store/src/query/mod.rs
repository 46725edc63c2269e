//! Repository traits and their [`MemoryStore`] implementations.
//!
//! [`MemoryStore`]: crate::MemoryStore

mod account;
mod post;

pub use account::AccountRepository;
pub use post::PostRepository;
