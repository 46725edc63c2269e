//! Account repository for managing user accounts.

use std::future::Future;

use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{Account, NewAccount};
use crate::{MemoryStore, StoreError, StoreResult, TRACING_TARGET_QUERY};

/// Repository for account operations.
pub trait AccountRepository {
    /// Creates a new account.
    ///
    /// The email is normalized to lowercase. Fails with
    /// [`StoreError::Conflict`] if the email is already registered.
    fn create_account(
        &self,
        new_account: NewAccount,
    ) -> impl Future<Output = StoreResult<Account>> + Send;

    /// Finds an account by email address. Comparison is case-insensitive.
    fn find_account_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = StoreResult<Option<Account>>> + Send;

    /// Checks if an email address is already registered.
    fn email_exists(&self, email: &str) -> impl Future<Output = StoreResult<bool>> + Send;
}

impl AccountRepository for MemoryStore {
    async fn create_account(&self, new_account: NewAccount) -> StoreResult<Account> {
        let email_address = new_account.email_address.to_lowercase();
        let mut tables = self.write().await;

        if tables.account_emails.contains_key(&email_address) {
            tracing::debug!(
                target: TRACING_TARGET_QUERY,
                email = %email_address,
                "account email already registered"
            );
            return Err(StoreError::Conflict("email address already registered".into()));
        }

        let account = Account {
            id: Uuid::new_v4(),
            email_address,
            display_name: new_account.display_name,
            password_hash: new_account.password_hash,
            created_at: Timestamp::now(),
        };

        tables
            .account_emails
            .insert(account.email_address.clone(), account.id);
        tables.accounts.insert(account.id, account.clone());

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            account_id = %account.id,
            "account created"
        );

        Ok(account)
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let email = email.to_lowercase();
        let tables = self.read().await;
        let account = tables
            .account_emails
            .get(&email)
            .and_then(|id| tables.accounts.get(id))
            .cloned();
        Ok(account)
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let email = email.to_lowercase();
        let tables = self.read().await;
        Ok(tables.account_emails.contains_key(&email))
    }
}
