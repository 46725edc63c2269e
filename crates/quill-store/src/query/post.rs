//! Post repository for blog posts and their like counters.

use std::future::Future;

use jiff::Timestamp;

use crate::model::{NewPost, Post, PostWithAuthor, UpdatePost};
use crate::{MemoryStore, StoreError, StoreResult, TRACING_TARGET_QUERY};

/// Repository for post operations.
pub trait PostRepository {
    /// Creates a new post with a zero like counter.
    ///
    /// Fails with [`StoreError::Conflict`] if the author does not exist.
    fn create_post(&self, new_post: NewPost) -> impl Future<Output = StoreResult<Post>> + Send;

    /// Finds a post by id, joined with its author's name.
    fn find_post_by_id(
        &self,
        post_id: i64,
    ) -> impl Future<Output = StoreResult<Option<PostWithAuthor>>> + Send;

    /// Lists all posts ordered by id, joined with their authors' names.
    fn list_posts(&self) -> impl Future<Output = StoreResult<Vec<PostWithAuthor>>> + Send;

    /// Applies a partial update to a post.
    fn update_post(
        &self,
        post_id: i64,
        updates: UpdatePost,
    ) -> impl Future<Output = StoreResult<Post>> + Send;

    /// Permanently removes a post.
    fn delete_post(&self, post_id: i64) -> impl Future<Output = StoreResult<()>> + Send;

    /// Adds one to the like counter.
    fn increment_like(&self, post_id: i64) -> impl Future<Output = StoreResult<Post>> + Send;

    /// Subtracts one from the like counter.
    fn decrement_like(&self, post_id: i64) -> impl Future<Output = StoreResult<Post>> + Send;
}

impl MemoryStore {
    async fn adjust_like(&self, post_id: i64, delta: i64) -> StoreResult<Post> {
        let mut tables = self.write().await;
        let post = tables
            .posts
            .get_mut(&post_id)
            .ok_or(StoreError::not_found("post"))?;

        post.like = post.like.saturating_add(delta);
        post.updated_at = Timestamp::now();

        tracing::trace!(
            target: TRACING_TARGET_QUERY,
            post_id,
            like = post.like,
            "like counter adjusted"
        );

        Ok(post.clone())
    }
}

impl PostRepository for MemoryStore {
    async fn create_post(&self, new_post: NewPost) -> StoreResult<Post> {
        let mut tables = self.write().await;

        if !tables.accounts.contains_key(&new_post.user_id) {
            return Err(StoreError::Conflict("post author does not exist".into()));
        }

        let post_id = tables
            .last_post_id
            .checked_add(1)
            .ok_or(StoreError::Unexpected("post id space exhausted".into()))?;
        tables.last_post_id = post_id;

        let now = Timestamp::now();
        let post = Post {
            id: post_id,
            subject: new_post.subject,
            detail: new_post.detail,
            like: 0,
            user_id: new_post.user_id,
            created_at: now,
            updated_at: now,
        };

        tables.posts.insert(post.id, post.clone());

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            post_id = post.id,
            user_id = %post.user_id,
            "post created"
        );

        Ok(post)
    }

    async fn find_post_by_id(&self, post_id: i64) -> StoreResult<Option<PostWithAuthor>> {
        let tables = self.read().await;
        let Some(post) = tables.posts.get(&post_id) else {
            return Ok(None);
        };

        let author_name = tables
            .accounts
            .get(&post.user_id)
            .map(|account| account.display_name.clone())
            .unwrap_or_default();

        Ok(Some(PostWithAuthor {
            post: post.clone(),
            author_name,
        }))
    }

    async fn list_posts(&self) -> StoreResult<Vec<PostWithAuthor>> {
        let tables = self.read().await;
        let posts = tables
            .posts
            .values()
            .map(|post| PostWithAuthor {
                post: post.clone(),
                author_name: tables
                    .accounts
                    .get(&post.user_id)
                    .map(|account| account.display_name.clone())
                    .unwrap_or_default(),
            })
            .collect();

        Ok(posts)
    }

    async fn update_post(&self, post_id: i64, updates: UpdatePost) -> StoreResult<Post> {
        let mut tables = self.write().await;
        let post = tables
            .posts
            .get_mut(&post_id)
            .ok_or(StoreError::not_found("post"))?;

        if let Some(subject) = updates.subject {
            post.subject = subject;
        }
        if let Some(detail) = updates.detail {
            post.detail = detail;
        }
        post.updated_at = Timestamp::now();

        tracing::debug!(target: TRACING_TARGET_QUERY, post_id, "post updated");
        Ok(post.clone())
    }

    async fn delete_post(&self, post_id: i64) -> StoreResult<()> {
        let mut tables = self.write().await;
        tables
            .posts
            .remove(&post_id)
            .ok_or(StoreError::not_found("post"))?;

        tracing::debug!(target: TRACING_TARGET_QUERY, post_id, "post deleted");
        Ok(())
    }

    async fn increment_like(&self, post_id: i64) -> StoreResult<Post> {
        self.adjust_like(post_id, 1).await
    }

    async fn decrement_like(&self, post_id: i64) -> StoreResult<Post> {
        self.adjust_like(post_id, -1).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Account, NewAccount};
    use crate::query::AccountRepository;

    async fn author(store: &MemoryStore) -> Account {
        store
            .create_account(NewAccount {
                email_address: "author@example.com".to_owned(),
                display_name: "Author".to_owned(),
                password_hash: "$argon2id$stub".to_owned(),
            })
            .await
            .unwrap()
    }

    fn new_post(account: &Account, subject: &str) -> NewPost {
        NewPost {
            subject: subject.to_owned(),
            detail: "body".to_owned(),
            user_id: account.id,
        }
    }

    #[tokio::test]
    async fn ids_increment_and_listing_is_ordered() {
        let store = MemoryStore::new();
        let account = author(&store).await;

        let first = store.create_post(new_post(&account, "first")).await.unwrap();
        let second = store.create_post(new_post(&account, "second")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        let posts = store.list_posts().await.unwrap();
        let subjects: Vec<_> = posts.iter().map(|p| p.post.subject.as_str()).collect();
        assert_eq!(subjects, ["first", "second"]);
        assert!(posts.iter().all(|p| p.author_name == "Author"));
    }

    #[tokio::test]
    async fn reject_unknown_author() {
        let store = MemoryStore::new();
        let result = store
            .create_post(NewPost {
                subject: "orphan".to_owned(),
                detail: "body".to_owned(),
                user_id: uuid::Uuid::new_v4(),
            })
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn exhausted_post_ids_fail() {
        let store = MemoryStore::new();
        let account = author(&store).await;
        store.write().await.last_post_id = i64::MAX;

        let result = store.create_post(new_post(&account, "overflow")).await;
        assert!(matches!(result, Err(StoreError::Unexpected(_))));
        assert!(store.list_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let store = MemoryStore::new();
        let account = author(&store).await;
        let post = store.create_post(new_post(&account, "draft")).await.unwrap();

        let updated = store
            .update_post(post.id, UpdatePost {
                subject: Some("final".to_owned()),
                detail: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.subject, "final");
        assert_eq!(updated.detail, "body");
    }

    #[tokio::test]
    async fn like_counter_round_trip() {
        let store = MemoryStore::new();
        let account = author(&store).await;
        let post = store.create_post(new_post(&account, "liked")).await.unwrap();

        assert_eq!(store.increment_like(post.id).await.unwrap().like, 1);
        assert_eq!(store.increment_like(post.id).await.unwrap().like, 2);
        assert_eq!(store.decrement_like(post.id).await.unwrap().like, 1);
        assert_eq!(store.decrement_like(post.id).await.unwrap().like, 0);
        assert_eq!(store.decrement_like(post.id).await.unwrap().like, -1);
    }

    #[tokio::test]
    async fn missing_post_operations_fail() {
        let store = MemoryStore::new();
        assert!(store.find_post_by_id(42).await.unwrap().is_none());
        assert!(store.delete_post(42).await.unwrap_err().is_not_found());
        assert!(store.increment_like(42).await.unwrap_err().is_not_found());
        assert!(
            store
                .update_post(42, UpdatePost::default())
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn deleted_post_disappears() {
        let store = MemoryStore::new();
        let account = author(&store).await;
        let post = store.create_post(new_post(&account, "gone")).await.unwrap();

        store.delete_post(post.id).await.unwrap();
        assert!(store.find_post_by_id(post.id).await.unwrap().is_none());
        assert!(store.list_posts().await.unwrap().is_empty());
    }
}
