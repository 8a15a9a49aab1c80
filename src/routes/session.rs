// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in session routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, Access, Session, SESSION_COOKIE, SESSION_TTL_SECS};
use crate::models::User;
use crate::services::IdTokenError;
use crate::time_utils::now_rfc3339;
use crate::AppState;

/// Routes open to everyone.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/session", post(create_session).delete(end_session))
}

/// Routes that need a resolved session (layer applied in routes/mod.rs).
pub fn signed_in_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me))
}

#[derive(Deserialize)]
pub struct SessionRequest {
    /// Firebase ID token from the browser sign-in flow
    token: String,
}

/// Current user and their access level.
#[derive(Serialize)]
pub struct MeResponse {
    pub user: User,
    pub access: Access,
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .secure(secure)
        .build()
}

/// Exchange a verified ID token for a session cookie.
async fn create_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<SessionRequest>,
) -> Result<(CookieJar, Json<MeResponse>)> {
    let sign_in = state
        .id_token_verifier
        .verify(&request.token)
        .await
        .map_err(|e| match e {
            IdTokenError::Rejected(reason) => {
                tracing::warn!(reason = %reason, "Rejected sign-in token");
                AppError::InvalidToken
            }
            IdTokenError::Transient(reason) => {
                AppError::Internal(anyhow::anyhow!("ID token keys unavailable: {reason}"))
            }
        })?;

    let is_admin = state.config.is_admin_email(&sign_in.email);
    let existing = state.db.get_user(&sign_in.subject).await?;
    let first_login = existing.is_none();
    let user = User::sign_in(existing, sign_in, is_admin, &now_rfc3339());
    state.db.upsert_user(&user).await?;

    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;
    let session = Session::from_user(&user, is_admin);

    tracing::info!(
        user_id = %user.id,
        is_admin,
        has_access = session.has_access,
        first_login,
        "User signed in"
    );

    let jar = jar.add(session_cookie(token, state.config.secure_cookies()));
    Ok((
        jar,
        Json(MeResponse {
            user,
            access: session.access(),
        }),
    ))
}

/// Clear the session cookie.
async fn end_session(jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        StatusCode::NO_CONTENT,
    )
}

/// Get current user profile. Unapproved users get `pending_approval`.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<MeResponse>> {
    let user = state
        .db
        .get_user(&session.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", session.user_id)))?;

    Ok(Json(MeResponse {
        user,
        access: session.access(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string(), true);
        let rendered = cookie.to_string();
        assert!(rendered.starts_with("auth-token=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=604800"));
        assert!(rendered.contains("Secure"));

        assert!(!session_cookie("abc".to_string(), false)
            .to_string()
            .contains("Secure"));
    }
}
