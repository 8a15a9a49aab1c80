// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use bike_inventory::config::Config;
use bike_inventory::db::FirestoreDb;
use bike_inventory::middleware::auth::{create_jwt, SESSION_COOKIE};
use bike_inventory::models::User;
use bike_inventory::routes::create_router;
use bike_inventory::services::IdTokenVerifier;
use bike_inventory::AppState;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Key ID and secret the test verifier accepts for sign-in tokens.
pub const ID_TOKEN_KID: &str = "test-kid";
pub const ID_TOKEN_SECRET: &[u8] = b"id-token-secret-for-tests";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Build shared state around `db` with a static-key sign-in verifier.
pub fn test_state(config: Config, db: FirestoreDb) -> Arc<AppState> {
    let id_token_verifier = IdTokenVerifier::new_with_static_key(
        &config,
        ID_TOKEN_KID,
        Algorithm::HS256,
        DecodingKey::from_secret(ID_TOKEN_SECRET),
    )
    .expect("static verifier");

    Arc::new(AppState {
        config,
        db,
        id_token_verifier,
    })
}

/// Create a test app backed by the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = test_state(Config::default(), FirestoreDb::new_in_memory());
    (create_router(state.clone()), state)
}

/// Create a test app whose store fails every call.
#[allow(dead_code)]
pub fn create_offline_app() -> (axum::Router, Arc<AppState>) {
    let state = test_state(Config::default(), FirestoreDb::new_mock());
    (create_router(state.clone()), state)
}

/// Store a user directly, bypassing sign-in.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, id: &str, email: &str, has_access: bool) -> User {
    let user = User {
        id: id.to_string(),
        display_name: id.to_string(),
        email: email.to_string(),
        photo_url: None,
        has_access,
        is_admin: state.config.is_admin_email(email),
        created_at: "2026-01-01T00:00:00Z".to_string(),
        last_login_at: "2026-01-01T00:00:00Z".to_string(),
    };
    state.db.upsert_user(&user).await.expect("seed user");
    user
}

/// Seed the administrator and return a `Cookie` header value for them.
#[allow(dead_code)]
pub async fn admin_cookie(state: &AppState) -> String {
    let admin_email = state.config.admin_email.clone();
    seed_user(state, "admin-uid", &admin_email, true).await;
    session_cookie(state, "admin-uid")
}

/// `Cookie` header value carrying a session for `user_id`.
#[allow(dead_code)]
pub fn session_cookie(state: &AppState, user_id: &str) -> String {
    let token = create_jwt(user_id, &state.config.jwt_signing_key).unwrap();
    format!("{SESSION_COOKIE}={token}")
}

#[derive(Serialize)]
struct IdTokenClaims<'a> {
    iss: String,
    aud: &'a str,
    sub: &'a str,
    iat: u64,
    exp: u64,
    email: &'a str,
    email_verified: bool,
    name: &'a str,
}

/// Sign an ID token the way Firebase would for `project`.
#[allow(dead_code)]
pub fn id_token(project: &str, sub: &str, email: &str, email_verified: bool) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let claims = IdTokenClaims {
        iss: format!("https://securetoken.google.com/{project}"),
        aud: project,
        sub,
        iat: now,
        exp: now + 3600,
        email,
        email_verified,
        name: "Test Rider",
    };
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(ID_TOKEN_KID.to_string());
    encode(&header, &claims, &EncodingKey::from_secret(ID_TOKEN_SECRET)).unwrap()
}

/// JSON request with an optional session cookie.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Body-less request with an optional session cookie.
#[allow(dead_code)]
pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
