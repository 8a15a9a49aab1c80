// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User administration routes (admin guard applied in routes/mod.rs).

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::Session;
use crate::models::User;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{id}/access", put(set_access))
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.db.list_users().await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    has_access: bool,
}

async fn set_access(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(request): Json<AccessRequest>,
) -> Result<Json<User>> {
    let mut user = state
        .db
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    if !request.has_access && state.config.is_admin_email(&user.email) {
        return Err(AppError::BadRequest(
            "administrator access cannot be revoked".to_string(),
        ));
    }

    user.has_access = request.has_access;
    state.db.upsert_user(&user).await?;

    tracing::info!(
        user_id = %user.id,
        has_access = user.has_access,
        changed_by = %session.user_id,
        "User access updated"
    );
    Ok(Json(user))
}
