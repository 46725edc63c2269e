//! Authentication response types.

use jiff::Timestamp;
use quill_store::model;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::SessionClaims;

/// Represents a registered account.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier of the account.
    pub id: Uuid,
    /// Email address associated with the account.
    pub email: String,
    /// Display name of the account holder.
    pub name: String,
}

impl Account {
    pub fn from_model(account: model::Account) -> Self {
        Self {
            id: account.id,
            email: account.email_address,
            name: account.display_name,
        }
    }
}

/// Claims of the current session.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Identifier of the signed-in account.
    pub id: String,
    /// Email address of the signed-in account.
    pub email: String,
    /// Display name of the signed-in account.
    pub name: String,
    /// When the current session token was issued.
    pub issued_at: Timestamp,
    /// When the current session token expires.
    pub expires_at: Timestamp,
}

impl Session {
    pub fn from_claims(claims: SessionClaims) -> Self {
        Self {
            id: claims.user.id,
            email: claims.user.email,
            name: claims.user.name,
            issued_at: claims.issued_at,
            expires_at: claims.expires_at,
        }
    }
}
