//! In-memory store client.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::TRACING_TARGET_CLIENT;
use crate::model::{Account, Post};

/// Process-local store holding every table behind one read-write lock.
///
/// Cloning is cheap and yields a handle to the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

/// Table contents. Only repository implementations touch these directly.
#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) accounts: HashMap<Uuid, Account>,
    /// Lowercased email to account id.
    pub(crate) account_emails: HashMap<String, Uuid>,
    /// Ordered by id so listings come back in insertion order.
    pub(crate) posts: BTreeMap<i64, Post>,
    pub(crate) last_post_id: i64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        tracing::debug!(target: TRACING_TARGET_CLIENT, "in-memory store created");
        Self::default()
    }

    #[inline]
    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().await
    }

    #[inline]
    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().await
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}
