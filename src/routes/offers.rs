// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Customer offer routes (admin guard applied in routes/mod.rs).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::Session;
use crate::models::{Offer, OfferInput, OfferStatus};
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/offers", get(list_offers).post(create_offer))
        .route("/api/admin/offers/{id}/status", put(set_status))
}

async fn list_offers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Offer>>> {
    Ok(Json(state.db.list_offers().await?))
}

async fn create_offer(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(input): Json<OfferInput>,
) -> Result<(StatusCode, Json<Offer>)> {
    input.validate()?;

    for bike_id in &input.bike_ids {
        if state.db.get_bike(bike_id).await?.is_none() {
            return Err(AppError::BadRequest(format!("unknown bike: {bike_id}")));
        }
    }

    let offer = Offer::new(
        uuid::Uuid::new_v4().to_string(),
        input,
        &session.user_id,
        &now_rfc3339(),
    );
    state.db.upsert_offer(&offer).await?;

    tracing::info!(offer_id = %offer.id, bikes = offer.bike_ids.len(), "Offer created");
    Ok((StatusCode::CREATED, Json(offer)))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    status: OfferStatus,
}

async fn set_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<Offer>> {
    let mut offer = state
        .db
        .get_offer(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("offer {id}")))?;

    offer.status = request.status;
    state.db.upsert_offer(&offer).await?;

    tracing::info!(offer_id = %offer.id, status = ?offer.status, "Offer status updated");
    Ok(Json(offer))
}
