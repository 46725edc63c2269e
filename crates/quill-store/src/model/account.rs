//! Account model.
//!
//! ## Models
//!
//! - [`Account`] - A registered user
//! - [`NewAccount`] - Data structure for creating new user accounts

use jiff::Timestamp;
use uuid::Uuid;

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Login email, stored lowercased.
    pub email_address: String,
    /// Human-readable name shown next to posts.
    pub display_name: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
}

/// Data for creating a new account.
#[derive(Debug, Default, Clone)]
pub struct NewAccount {
    /// Login email. Normalized to lowercase on insert.
    pub email_address: String,
    /// Human-readable name shown next to posts.
    pub display_name: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}
