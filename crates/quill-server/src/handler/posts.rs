//! Post handlers.
//!
//! Reading and liking posts is public. Writing requires a session; any
//! signed-in account may edit or delete any post.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use quill_store::MemoryStore;
use quill_store::query::PostRepository;
use uuid::Uuid;

use crate::extract::{AuthSession, Json, Path, ValidateJson};
use crate::handler::request::{CreatePost, PostPathParams, UpdatePost};
use crate::handler::response::Post;
use crate::handler::{ErrorKind, Result};
use crate::service::{ServiceState, SessionClaims};
use crate::utility::tracing_targets::TRACING_TARGET_POSTS as TRACING_TARGET;

fn session_account_id(claims: &SessionClaims) -> Result<Uuid> {
    Uuid::parse_str(&claims.user.id).map_err(|_| {
        tracing::warn!(
            target: TRACING_TARGET,
            "session identity is not an account id"
        );
        ErrorKind::Unauthorized.with_resource("session")
    })
}

/// Lists all posts with their authors, ordered by id.
#[tracing::instrument(skip_all)]
async fn list_posts(State(store): State<MemoryStore>) -> Result<Json<Vec<Post>>> {
    let posts = store.list_posts().await?;
    tracing::debug!(target: TRACING_TARGET, count = posts.len(), "posts listed");
    Ok(Json(posts.into_iter().map(Post::from_joined).collect()))
}

/// Returns a single post.
#[tracing::instrument(skip_all, fields(post_id = path_params.id))]
async fn read_post(
    State(store): State<MemoryStore>,
    Path(path_params): Path<PostPathParams>,
) -> Result<Json<Post>> {
    let Some(post) = store.find_post_by_id(path_params.id).await? else {
        return Err(ErrorKind::NotFound.with_resource("post"));
    };

    Ok(Json(Post::from_joined(post)))
}

/// Adds one like.
#[tracing::instrument(skip_all, fields(post_id = path_params.id))]
async fn like_post(
    State(store): State<MemoryStore>,
    Path(path_params): Path<PostPathParams>,
) -> Result<Json<Post>> {
    let post = store.increment_like(path_params.id).await?;
    tracing::debug!(target: TRACING_TARGET, post_id = post.id, like = post.like, "post liked");
    Ok(Json(Post::from_model(post)))
}

/// Removes one like. The counter may go below zero.
#[tracing::instrument(skip_all, fields(post_id = path_params.id))]
async fn unlike_post(
    State(store): State<MemoryStore>,
    Path(path_params): Path<PostPathParams>,
) -> Result<Json<Post>> {
    let post = store.decrement_like(path_params.id).await?;
    tracing::debug!(target: TRACING_TARGET, post_id = post.id, like = post.like, "post unliked");
    Ok(Json(Post::from_model(post)))
}

/// Creates a post authored by the signed-in account.
#[tracing::instrument(skip_all)]
async fn create_post(
    State(store): State<MemoryStore>,
    AuthSession(claims): AuthSession,
    ValidateJson(request): ValidateJson<CreatePost>,
) -> Result<(StatusCode, Json<Post>)> {
    let author_id = session_account_id(&claims)?;
    let post = store.create_post(request.into_model(author_id)).await?;

    tracing::info!(
        target: TRACING_TARGET,
        post_id = post.id,
        author_id = %author_id,
        "post created"
    );

    let mut response = Post::from_model(post);
    response.author_name = Some(claims.user.name);
    Ok((StatusCode::CREATED, Json(response)))
}

/// Edits the subject and/or detail of a post.
#[tracing::instrument(skip_all, fields(post_id = path_params.id))]
async fn update_post(
    State(store): State<MemoryStore>,
    AuthSession(claims): AuthSession,
    Path(path_params): Path<PostPathParams>,
    ValidateJson(request): ValidateJson<UpdatePost>,
) -> Result<Json<Post>> {
    let updates = request.into_model();
    if updates.is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("Nothing to update")
            .with_resource("post"));
    }

    let post = store.update_post(path_params.id, updates).await?;

    tracing::info!(
        target: TRACING_TARGET,
        post_id = post.id,
        editor_id = %claims.user.id,
        "post updated"
    );

    Ok(Json(Post::from_model(post)))
}

/// Permanently deletes a post.
#[tracing::instrument(skip_all, fields(post_id = path_params.id))]
async fn delete_post(
    State(store): State<MemoryStore>,
    AuthSession(claims): AuthSession,
    Path(path_params): Path<PostPathParams>,
) -> Result<StatusCode> {
    store.delete_post(path_params.id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        post_id = path_params.id,
        editor_id = %claims.user.id,
        "post deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Returns a [`Router`] with the routes that need a session.
pub fn private_routes() -> Router<ServiceState> {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/{id}", axum::routing::patch(update_post).delete(delete_post))
}

/// Returns a [`Router`] with the public routes.
pub fn public_routes() -> Router<ServiceState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/{id}", get(read_post))
        .route("/posts/{id}/like", post(like_post))
        .route("/posts/{id}/unlike", post(unlike_post))
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use jiff::Timestamp;
    use serde_json::json;

    use super::*;
    use crate::handler::test::{create_test_server, create_test_server_with_clock, sign_in};
    use crate::service::ManualClock;

    async fn create(server: &TestServer, cookie: Cookie<'static>, subject: &str) -> Post {
        let response = server
            .post("/posts")
            .add_cookie(cookie)
            .json(&json!({ "subject": subject, "detail": "Notes on the engine" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    #[tokio::test]
    async fn create_without_session_is_unauthorized() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/posts")
            .json(&json!({ "subject": "Hello", "detail": "World" }))
            .await;
        response.assert_status_unauthorized();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "missing_auth_token");
        Ok(())
    }

    #[tokio::test]
    async fn create_with_session_refreshes_cookie() -> anyhow::Result<()> {
        let clock = ManualClock::new(Timestamp::now());
        let server = create_test_server_with_clock(clock.clone())?;
        let cookie = sign_in(&server, "author@example.com").await?;

        clock.advance(Duration::from_secs(60));
        let response = server
            .post("/posts")
            .add_cookie(cookie.clone())
            .json(&json!({ "subject": "Hello", "detail": "World" }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let refreshed = response
            .maybe_cookie("session")
            .ok_or_else(|| anyhow::anyhow!("expected a refreshed session cookie"))?;
        assert_ne!(refreshed.value(), cookie.value());
        assert_eq!(refreshed.http_only(), Some(true));

        let post: Post = response.json();
        assert_eq!(post.id, 1);
        assert_eq!(post.like, 0);
        assert_eq!(post.author_name.as_deref(), Some("Ada Lovelace"));
        Ok(())
    }

    #[tokio::test]
    async fn tampered_cookie_is_cleared() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let cookie = sign_in(&server, "tamper@example.com").await?;

        let mut value = cookie.value().to_owned();
        let last = if value.ends_with('A') { 'B' } else { 'A' };
        value.pop();
        value.push(last);

        let response = server
            .post("/posts")
            .add_cookie(Cookie::new("session", value))
            .json(&json!({ "subject": "Hello", "detail": "World" }))
            .await;
        response.assert_status_unauthorized();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "unauthorized");

        let removal = response
            .maybe_cookie("session")
            .ok_or_else(|| anyhow::anyhow!("expected a removal cookie"))?;
        assert_eq!(removal.value(), "");
        Ok(())
    }

    #[tokio::test]
    async fn expired_cookie_is_rejected() -> anyhow::Result<()> {
        let clock = ManualClock::new(Timestamp::now());
        let server = create_test_server_with_clock(clock.clone())?;
        let cookie = sign_in(&server, "late@example.com").await?;

        clock.advance(Duration::from_secs(300 + 5));
        let response = server
            .post("/posts")
            .add_cookie(cookie)
            .json(&json!({ "subject": "Hello", "detail": "World" }))
            .await;
        response.assert_status_unauthorized();
        assert!(response.maybe_cookie("session").is_some());
        Ok(())
    }

    #[tokio::test]
    async fn list_and_read_posts() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let cookie = sign_in(&server, "reader@example.com").await?;
        let first = create(&server, cookie.clone(), "First").await;
        let second = create(&server, cookie, "Second").await;
        assert_eq!((first.id, second.id), (1, 2));

        let response = server.get("/posts").await;
        response.assert_status_ok();
        let posts: Vec<Post> = response.json();
        let subjects: Vec<_> = posts.iter().map(|p| p.subject.as_str()).collect();
        assert_eq!(subjects, ["First", "Second"]);
        assert!(posts.iter().all(|p| p.author_name.as_deref() == Some("Ada Lovelace")));

        let response = server.get("/posts/2").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Post>().subject, "Second");

        server.get("/posts/99").await.assert_status_not_found();
        server.get("/posts/abc").await.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn like_then_unlike_restores_counter() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let cookie = sign_in(&server, "fan@example.com").await?;
        let post = create(&server, cookie, "Likeable").await;

        let liked: Post = server.post(&format!("/posts/{}/like", post.id)).await.json();
        assert_eq!(liked.like, post.like + 1);

        let unliked: Post = server.post(&format!("/posts/{}/unlike", post.id)).await.json();
        assert_eq!(unliked.like, post.like);

        let below_zero: Post = server.post(&format!("/posts/{}/unlike", post.id)).await.json();
        assert_eq!(below_zero.like, -1);

        server.post("/posts/99/like").await.assert_status_not_found();
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_post() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let cookie = sign_in(&server, "editor@example.com").await?;
        let post = create(&server, cookie.clone(), "Draft").await;
        let path = format!("/posts/{}", post.id);

        let response = server
            .patch(&path)
            .add_cookie(cookie.clone())
            .json(&json!({ "subject": "Final" }))
            .await;
        response.assert_status_ok();
        let updated: Post = response.json();
        assert_eq!(updated.subject, "Final");
        assert_eq!(updated.detail, "Notes on the engine");

        server
            .patch(&path)
            .add_cookie(cookie.clone())
            .json(&json!({}))
            .await
            .assert_status_bad_request();

        server
            .delete(&path)
            .add_cookie(cookie.clone())
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server.get(&path).await.assert_status_not_found();
        server
            .delete(&path)
            .add_cookie(cookie)
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[tokio::test]
    async fn delete_without_session_is_unauthorized() -> anyhow::Result<()> {
        let server = create_test_server()?;
        server.delete("/posts/1").await.assert_status_unauthorized();
        Ok(())
    }
}
