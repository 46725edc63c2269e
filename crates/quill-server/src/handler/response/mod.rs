//! Response types for HTTP handlers.

mod authentications;
mod error_response;
mod posts;

pub use authentications::{Account, Session};
pub use error_response::ErrorResponse;
pub use posts::Post;
