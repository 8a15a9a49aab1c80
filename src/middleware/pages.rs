// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Redirect anonymous visitors away from protected pages.

use crate::middleware::auth::{decode_session, session_token};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Page prefixes that require a session.
pub const PROTECTED_PREFIXES: [&str; 2] = ["/admin", "/partners"];

/// Whether `path` is a protected prefix or lies beneath one.
pub fn is_protected_page(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Login URL that returns the visitor to `path_and_query` afterwards.
pub fn login_redirect(path_and_query: &str) -> String {
    format!("/login?from={}", urlencoding::encode(path_and_query))
}

/// Middleware: 303 to the login page for protected pages without a valid
/// session token.
pub async fn guard_pages(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    if !is_protected_page(request.uri().path()) {
        return next.run(request).await;
    }

    let authenticated = session_token(&jar, request.headers())
        .is_some_and(|token| decode_session(&token, &state.config.jwt_signing_key).is_ok());
    if authenticated {
        return next.run(request).await;
    }

    let original = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| request.uri().path());
    let location = login_redirect(original);
    tracing::debug!(path = %request.uri().path(), location = %location, "Redirecting to login");

    (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_prefixes() {
        assert!(is_protected_page("/admin"));
        assert!(is_protected_page("/admin/"));
        assert!(is_protected_page("/admin/bikes"));
        assert!(is_protected_page("/partners/list"));
        assert!(!is_protected_page("/administrator"));
        assert!(!is_protected_page("/api/admin/bikes"));
        assert!(!is_protected_page("/"));
    }

    #[test]
    fn test_login_redirect_encodes_path_and_query() {
        assert_eq!(login_redirect("/admin"), "/login?from=%2Fadmin");
        assert_eq!(
            login_redirect("/admin/bikes?page=2"),
            "/login?from=%2Fadmin%2Fbikes%3Fpage%3D2"
        );
    }
}
