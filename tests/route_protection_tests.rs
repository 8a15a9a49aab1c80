// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route protection tests.
//!
//! Pages under /admin and /partners redirect anonymous visitors to the
//! login page; the matching APIs answer with JSON errors instead.

use axum::http::{header, StatusCode};
use tower::ServiceExt;

mod common;
use common::{body_json, get_request};

#[tokio::test]
async fn test_admin_page_redirects_to_login() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(get_request("/admin/bikes?page=2", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login?from=%2Fadmin%2Fbikes%3Fpage%3D2"
    );
}

#[tokio::test]
async fn test_partner_page_redirects_with_invalid_token() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(get_request("/partners", Some("auth-token=not-a-jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login?from=%2Fpartners"
    );
}

#[tokio::test]
async fn test_page_guard_lets_valid_session_through() {
    let (app, state) = common::create_test_app();
    let cookie = common::admin_cookie(&state).await;

    let response = app
        .oneshot(get_request("/admin", Some(&cookie)))
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_similar_prefix_is_not_guarded() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(get_request("/administrator", None))
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_admin_api_without_session() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(get_request("/api/admin/bikes", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::LOCATION).is_none());
}

#[tokio::test]
async fn test_admin_api_forbids_other_users() {
    let (app, state) = common::create_test_app();
    common::seed_user(&state, "uid-partner", "partner@example.com", true).await;
    let cookie = common::session_cookie(&state, "uid-partner");

    let response = app
        .oneshot(get_request("/api/admin/users", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "forbidden");
}

#[tokio::test]
async fn test_partner_api_requires_approval() {
    let (app, state) = common::create_test_app();
    common::seed_user(&state, "uid-pending", "pending@example.com", false).await;
    let cookie = common::session_cookie(&state, "uid-pending");

    let response = app
        .clone()
        .oneshot(get_request("/api/partners/bikes", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "pending_approval");

    common::seed_user(&state, "uid-pending", "pending@example.com", true).await;
    let response = app
        .oneshot(get_request("/api/partners/bikes", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_security_headers_on_api_responses() {
    let (app, _) = common::create_test_app();

    let response = app.oneshot(get_request("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("X-Frame-Options").unwrap(), "DENY");
}
