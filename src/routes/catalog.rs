// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public catalog and partner routes.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::promoted::PROMOTED_SLOTS;
use crate::models::{Bike, PublicBike};
use crate::services::catalog::{filter_bikes, group_families, resolve_promoted, sort_bikes};
use crate::services::{CatalogFilter, ModelFamily};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bikes", get(list_bikes))
        .route("/api/bikes/families", get(list_families))
        .route("/api/bikes/{id}", get(get_bike))
        .route("/api/promoted", get(get_promoted))
}

/// Partner routes (approved users; layer applied in routes/mod.rs).
pub fn partner_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/partners/bikes", get(list_partner_bikes))
}

async fn sorted_bikes(state: &AppState) -> Result<Vec<Bike>> {
    let mut bikes = state.db.list_bikes().await?;
    sort_bikes(&mut bikes);
    Ok(bikes)
}

async fn list_bikes(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CatalogFilter>,
) -> Result<Json<Vec<PublicBike>>> {
    let bikes = sorted_bikes(&state).await?;
    let base_path = &state.config.base_path;

    Ok(Json(
        filter_bikes(&bikes, &filter)
            .into_iter()
            .map(|b| PublicBike::from_bike(b, base_path))
            .collect(),
    ))
}

async fn list_families(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ModelFamily>>> {
    let bikes = sorted_bikes(&state).await?;
    Ok(Json(group_families(&bikes)))
}

async fn get_bike(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PublicBike>> {
    let bike = state
        .db
        .get_bike(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("bike {id}")))?;
    Ok(Json(PublicBike::from_bike(&bike, &state.config.base_path)))
}

#[derive(Serialize)]
pub struct PromotedResponse {
    pub slots: [Option<PublicBike>; PROMOTED_SLOTS],
}

async fn get_promoted(State(state): State<Arc<AppState>>) -> Result<Json<PromotedResponse>> {
    let promoted = state.db.get_promoted().await?;
    let bikes = state.db.list_bikes().await?;
    let base_path = &state.config.base_path;

    let slots = resolve_promoted(&promoted, &bikes)
        .map(|slot| slot.map(|bike| PublicBike::from_bike(bike, base_path)));
    Ok(Json(PromotedResponse { slots }))
}

/// Full records, reseller price included.
async fn list_partner_bikes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Bike>>> {
    Ok(Json(sorted_bikes(&state).await?))
}
