//! Password hashing and session key management.

mod password_hasher;
mod session_keys;

pub use password_hasher::PasswordHasher;
pub use session_keys::SessionKeys;
