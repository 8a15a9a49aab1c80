// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session JWT handling and per-request session resolution.

use crate::error::AppError;
use crate::models::User;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "auth-token";
/// Session lifetime (7 days).
pub const SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Whether a signed-in user may see partner data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Approved,
    PendingApproval,
}

/// Signed-in principal for the current request.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
    pub has_access: bool,
}

impl Session {
    pub fn from_user(user: &User, is_admin: bool) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            is_admin,
            has_access: user.has_access || is_admin,
        }
    }

    pub fn access(&self) -> Access {
        if self.has_access {
            Access::Approved
        } else {
            Access::PendingApproval
        }
    }
}

/// Marker left in request extensions when a presented token was rejected.
#[derive(Debug, Clone, Copy)]
pub struct RejectedToken;

/// Pull the session token from the cookie, falling back to a Bearer header.
pub fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Validate a session JWT and return its subject.
pub fn decode_session(token: &str, signing_key: &[u8]) -> Result<String, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|_| AppError::InvalidToken)?;
    if token_data.claims.sub.is_empty() {
        return Err(AppError::InvalidToken);
    }
    Ok(token_data.claims.sub)
}

/// Middleware that resolves the session once and stores it in request
/// extensions. Requests without a usable token continue anonymously.
pub async fn resolve_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = session_token(&jar, request.headers()) {
        match decode_session(&token, &state.config.jwt_signing_key) {
            Ok(user_id) => match state.db.get_user(&user_id).await? {
                Some(user) => {
                    let is_admin = state.config.is_admin_email(&user.email);
                    request
                        .extensions_mut()
                        .insert(Session::from_user(&user, is_admin));
                }
                None => {
                    tracing::debug!(user_id = %user_id, "Session names unknown user");
                    request.extensions_mut().insert(RejectedToken);
                }
            },
            Err(_) => {
                request.extensions_mut().insert(RejectedToken);
            }
        }
    }

    Ok(next.run(request).await)
}

fn signed_in(request: &Request) -> Result<&Session, AppError> {
    if let Some(session) = request.extensions().get::<Session>() {
        return Ok(session);
    }
    if request.extensions().get::<RejectedToken>().is_some() {
        return Err(AppError::InvalidToken);
    }
    Err(AppError::Unauthorized)
}

/// Route layer: any signed-in user.
pub async fn require_session(request: Request, next: Next) -> Result<Response, AppError> {
    signed_in(&request)?;
    Ok(next.run(request).await)
}

/// Route layer: signed-in users the administrator has approved.
pub async fn require_access(request: Request, next: Next) -> Result<Response, AppError> {
    if !signed_in(&request)?.has_access {
        return Err(AppError::PendingApproval);
    }
    Ok(next.run(request).await)
}

/// Route layer: the administrator only.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let session = signed_in(&request)?;
    if !session.is_admin {
        tracing::warn!(user_id = %session.user_id, path = %request.uri().path(), "Non-admin denied");
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}

/// Create a JWT for a user session.
pub fn create_jwt(user_id: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now as usize,
        exp: (now + SESSION_TTL_SECS) as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
