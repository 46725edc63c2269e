//! Authentication handlers for registration, login, logout and session
//! inspection.
//!
//! Sessions live in an `HttpOnly` cookie; handlers never return the signed
//! token in a response body.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum_extra::extract::CookieJar;
use quill_store::MemoryStore;
use quill_store::model::NewAccount;
use quill_store::query::AccountRepository;

use crate::extract::{CurrentSession, Json, ValidateJson};
use crate::handler::request::{Login, Register};
use crate::handler::response::{Account, Session};
use crate::handler::{ErrorKind, Result};
use crate::service::{
    Acknowledgement, PasswordHasher, ServiceState, SessionManager, SessionUser,
};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION as TRACING_TARGET;

/// Creates a new account.
#[tracing::instrument(skip_all)]
async fn register(
    State(store): State<MemoryStore>,
    State(password_hasher): State<PasswordHasher>,
    ValidateJson(request): ValidateJson<Register>,
) -> Result<(StatusCode, Json<Account>)> {
    tracing::trace!(target: TRACING_TARGET, "registration attempt");

    if store.email_exists(&request.email).await? {
        tracing::debug!(target: TRACING_TARGET, "email address already registered");
        return Err(ErrorKind::Conflict
            .with_message("Email address is already registered")
            .with_resource("account"));
    }

    let password_hash = password_hasher.hash_password(&request.password)?;
    let account = store
        .create_account(NewAccount {
            email_address: request.email,
            display_name: request.name,
            password_hash,
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        "account registered"
    );

    Ok((StatusCode::CREATED, Json(Account::from_model(account))))
}

/// Verifies credentials and starts a session.
#[tracing::instrument(skip_all)]
async fn login(
    State(store): State<MemoryStore>,
    State(password_hasher): State<PasswordHasher>,
    State(session_manager): State<SessionManager>,
    mut jar: CookieJar,
    ValidateJson(request): ValidateJson<Login>,
) -> Result<(CookieJar, Json<Acknowledgement>)> {
    tracing::trace!(target: TRACING_TARGET, "login attempt");

    let Some(account) = store.find_account_by_email(&request.email).await? else {
        // Keeps response timing independent of whether the email exists.
        password_hasher.verify_dummy_password(&request.password);
        tracing::warn!(
            target: TRACING_TARGET,
            account_exists = false,
            "login failed"
        );
        return Err(ErrorKind::Unauthorized
            .with_message("Invalid email or password")
            .with_resource("account"));
    };

    if let Err(err) = password_hasher.verify_password(&request.password, &account.password_hash) {
        tracing::warn!(
            target: TRACING_TARGET,
            account_id = %account.id,
            account_exists = true,
            "login failed"
        );
        return Err(err);
    }

    let user = SessionUser::new(
        account.id.to_string(),
        account.email_address,
        account.display_name,
    );
    let acknowledgement = session_manager.login(&mut jar, &user, request.remember)?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        remember = request.remember,
        "login successful"
    );

    Ok((jar, Json(acknowledgement)))
}

/// Ends the current session. Succeeds without a session too.
#[tracing::instrument(skip_all)]
async fn logout(
    State(session_manager): State<SessionManager>,
    mut jar: CookieJar,
) -> (CookieJar, Json<Acknowledgement>) {
    let acknowledgement = session_manager.logout(&mut jar);
    (jar, Json(acknowledgement))
}

/// Returns the claims of the current session, or `null`.
async fn session(CurrentSession(claims): CurrentSession) -> Json<Option<Session>> {
    Json(claims.map(Session::from_claims))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session))
}

#[cfg(test)]
mod test {
    use axum_extra::extract::cookie::Cookie;
    use serde_json::json;

    use std::time::Duration;

    use jiff::Timestamp;

    use super::*;
    use crate::handler::test::{create_test_server, create_test_server_with_clock, sign_in};
    use crate::service::ManualClock;

    #[tokio::test]
    async fn register_success() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/auth/register")
            .json(&json!({
                "email": "Ada@Example.com",
                "name": "Ada Lovelace",
                "password": "analytical-engine",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Account = response.json();
        assert_eq!(body.email, "ada@example.com");
        assert_eq!(body.name, "Ada Lovelace");
        Ok(())
    }

    #[tokio::test]
    async fn register_invalid_payload() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/auth/register")
            .json(&json!({
                "email": "not-an-email",
                "name": "",
                "password": "short",
            }))
            .await;
        response.assert_status_bad_request();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "bad_request");
        Ok(())
    }

    #[tokio::test]
    async fn register_duplicate_email() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let request = json!({
            "email": "dup@example.com",
            "name": "First",
            "password": "analytical-engine",
        });

        server
            .post("/auth/register")
            .json(&request)
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.post("/auth/register").json(&request).await;
        response.assert_status_conflict();
        Ok(())
    }

    #[tokio::test]
    async fn login_sets_http_only_cookie() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let cookie = sign_in(&server, "login@example.com").await?;

        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.expires().is_some());
        assert!(!cookie.value().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn login_response_hides_token() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let cookie = sign_in(&server, "hidden@example.com").await?;

        let response = server
            .post("/auth/login")
            .json(&json!({
                "email": "hidden@example.com",
                "password": "analytical-engine",
                "remember": true,
            }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Login Successful" }));
        assert!(!response.text().contains(cookie.value()));
        Ok(())
    }

    #[tokio::test]
    async fn login_wrong_password() -> anyhow::Result<()> {
        let server = create_test_server()?;
        sign_in(&server, "wrong@example.com").await?;

        let response = server
            .post("/auth/login")
            .json(&json!({
                "email": "wrong@example.com",
                "password": "not-the-password",
            }))
            .await;
        response.assert_status_unauthorized();
        assert!(response.maybe_cookie("session").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn login_unknown_email() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/auth/login")
            .json(&json!({
                "email": "nobody@example.com",
                "password": "analytical-engine",
            }))
            .await;
        response.assert_status_unauthorized();
        Ok(())
    }

    #[tokio::test]
    async fn session_echoes_claims() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let cookie = sign_in(&server, "echo@example.com").await?;

        let response = server.get("/auth/session").add_cookie(cookie).await;
        response.assert_status_ok();

        let body: Option<Session> = response.json();
        let session = body.ok_or_else(|| anyhow::anyhow!("expected a session"))?;
        assert_eq!(session.email, "echo@example.com");
        assert_eq!(session.name, "Ada Lovelace");
        assert_eq!(session.expires_at.as_second() - session.issued_at.as_second(), 300);
        Ok(())
    }

    #[tokio::test]
    async fn session_without_cookie_is_null() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/auth/session").await;
        response.assert_status_ok();
        response.assert_json(&serde_json::Value::Null);

        let response = server
            .get("/auth/session")
            .add_cookie(Cookie::new("session", "garbage"))
            .await;
        response.assert_status_ok();
        response.assert_json(&serde_json::Value::Null);
        Ok(())
    }

    #[tokio::test]
    async fn session_lapses_after_expiry() -> anyhow::Result<()> {
        let clock = ManualClock::new(Timestamp::now());
        let server = create_test_server_with_clock(clock.clone())?;
        let cookie = sign_in(&server, "lapse@example.com").await?;

        clock.advance(Duration::from_secs(300 + 5));
        let response = server.get("/auth/session").add_cookie(cookie).await;
        response.assert_status_ok();
        response.assert_json(&serde_json::Value::Null);
        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_cookie() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let cookie = sign_in(&server, "bye@example.com").await?;

        let response = server.post("/auth/logout").add_cookie(cookie).await;
        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Logout Successful" }));

        let removal = response
            .maybe_cookie("session")
            .ok_or_else(|| anyhow::anyhow!("expected a removal cookie"))?;
        assert_eq!(removal.value(), "");

        // Without a session the removal cookie is still emitted.
        let response = server.post("/auth/logout").await;
        response.assert_status_ok();
        assert!(response.maybe_cookie("session").is_some());
        Ok(())
    }
}
