// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Administrator routes: bike CRUD, grid edits, CSV import, Excel export
//! and promoted bikes. The admin guard is applied in routes/mod.rs.

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::import::{import_csv, ImportOptions, ImportSummary};
use crate::models::field::diff_fields;
use crate::models::promoted::PROMOTED_SLOTS;
use crate::models::{Bike, BikeField, BikeInput, FieldValue, PromotedBikes};
use crate::services::catalog::sort_bikes;
use crate::services::export::{self, XLSX_CONTENT_TYPE};
use crate::time_utils::{current_year, now_rfc3339};
use crate::AppState;

/// CSV uploads may be well beyond axum's 2 MB default.
const IMPORT_BODY_LIMIT: usize = 16 * 1024 * 1024;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/bikes", get(list_bikes).post(create_bike))
        .route(
            "/api/admin/bikes/{id}",
            put(replace_bike).patch(patch_bike).delete(delete_bike),
        )
        .route(
            "/api/admin/import",
            post(import_bikes).layer(DefaultBodyLimit::max(IMPORT_BODY_LIMIT)),
        )
        .route("/api/admin/export", post(export_bikes))
        .route("/api/admin/promoted", get(get_promoted).put(set_promoted))
}

// ─── Bikes ───────────────────────────────────────────────────

async fn list_bikes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Bike>>> {
    let mut bikes = state.db.list_bikes().await?;
    sort_bikes(&mut bikes);
    Ok(Json(bikes))
}

async fn create_bike(
    State(state): State<Arc<AppState>>,
    Json(input): Json<BikeInput>,
) -> Result<(StatusCode, Json<Bike>)> {
    input.validate()?;

    let bike = Bike::from_input(
        String::new(),
        input,
        &state.config.brand,
        current_year(),
        &now_rfc3339(),
    );
    let bike = state.db.create_bike(bike).await?;

    tracing::info!(bike_id = %bike.id, model_number = %bike.model_number, "Bike created");
    Ok((StatusCode::CREATED, Json(bike)))
}

/// Full replacement; `version` enables the optimistic check.
#[derive(Deserialize)]
pub struct ReplaceBikeRequest {
    #[serde(flatten)]
    bike: BikeInput,
    #[serde(default)]
    version: Option<u64>,
}

async fn replace_bike(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<ReplaceBikeRequest>,
) -> Result<Json<Bike>> {
    request.bike.validate()?;

    let mut bike = state
        .db
        .get_bike(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("bike {id}")))?;
    bike.replace_with(request.bike, current_year(), &now_rfc3339());

    let bike = state.db.replace_bike(bike, request.version).await?;
    tracing::info!(bike_id = %bike.id, version = bike.version, "Bike replaced");
    Ok(Json(bike))
}

/// Grid edit: changed cells only.
#[derive(Deserialize)]
pub struct PatchBikeRequest {
    fields: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    version: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchBikeResponse {
    pub updated: bool,
    pub changed_fields: Vec<BikeField>,
    pub bike: Bike,
}

fn parse_edits(
    fields: &serde_json::Map<String, serde_json::Value>,
) -> Result<Vec<(BikeField, FieldValue)>> {
    fields
        .iter()
        .map(|(name, value)| {
            let field = BikeField::from_name(name)
                .ok_or_else(|| AppError::BadRequest(format!("unknown field: {name}")))?;
            if !field.is_editable() {
                return Err(AppError::BadRequest(format!("field is not editable: {name}")));
            }
            Ok((field, FieldValue::from_json(field, value)?))
        })
        .collect()
}

async fn patch_bike(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<PatchBikeRequest>,
) -> Result<Json<PatchBikeResponse>> {
    let edits = parse_edits(&request.fields)?;

    let mut bike = state
        .db
        .get_bike(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("bike {id}")))?;

    let patch = diff_fields(&bike, edits);
    if patch.is_empty() {
        tracing::debug!(bike_id = %id, "Grid edit matches stored values, skipping write");
        return Ok(Json(PatchBikeResponse {
            updated: false,
            changed_fields: Vec::new(),
            bike,
        }));
    }

    bike.apply_patch(&patch, &now_rfc3339())?;
    if bike.model_name.trim().is_empty() {
        return Err(AppError::BadRequest("model name must not be blank".to_string()));
    }

    let bike = state.db.replace_bike(bike, request.version).await?;
    let changed_fields = patch.fields();
    tracing::info!(
        bike_id = %bike.id,
        version = bike.version,
        changed = changed_fields.len(),
        "Bike fields updated"
    );

    Ok(Json(PatchBikeResponse {
        updated: true,
        changed_fields,
        bike,
    }))
}

async fn delete_bike(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.db.delete_bike(&id).await?;
    tracing::info!(bike_id = %id, "Bike deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Import / Export ─────────────────────────────────────────

/// Raw CSV text in the request body.
async fn import_bikes(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<ImportSummary>> {
    let options = ImportOptions {
        brand: state.config.brand.clone(),
        current_year: current_year(),
        now: now_rfc3339(),
    };

    let summary = import_csv(&state.db, &body, &options, |progress| {
        tracing::debug!(
            done = progress.done,
            total = progress.total,
            fraction = progress.fraction,
            "Import progress"
        );
    })
    .await?;

    Ok(Json(summary))
}

#[derive(Deserialize)]
pub struct ExportRequest {
    columns: Vec<String>,
}

async fn export_bikes(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse> {
    let columns = export::parse_columns(&request.columns)?;

    let mut bikes = state.db.list_bikes().await?;
    sort_bikes(&mut bikes);

    let workbook = export::build_workbook(&bikes, &columns)?;
    tracing::info!(rows = bikes.len(), columns = columns.len(), "Exported bikes");

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"bikes.xlsx\"",
            ),
        ],
        workbook,
    ))
}

// ─── Promoted ────────────────────────────────────────────────

async fn get_promoted(State(state): State<Arc<AppState>>) -> Result<Json<PromotedBikes>> {
    Ok(Json(state.db.get_promoted().await?))
}

#[derive(Deserialize)]
pub struct PromotedRequest {
    slots: [Option<String>; PROMOTED_SLOTS],
}

async fn set_promoted(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PromotedRequest>,
) -> Result<Json<PromotedBikes>> {
    let promoted = PromotedBikes::normalized(request.slots);
    state.db.set_promoted(&promoted).await?;
    tracing::info!(slots = ?promoted.slots, "Promoted bikes saved");
    Ok(Json(promoted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_edits_rejects_unknown_and_locked_fields() {
        assert!(matches!(
            parse_edits(&fields(json!({"wheels": 2}))),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_edits(&fields(json!({"isEbike": true}))),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_edits_types_values() {
        let edits = parse_edits(&fields(json!({"price": "1.299,90", "color": " red "}))).unwrap();
        assert!(edits.contains(&(BikeField::Price, FieldValue::Number(1299.9))));
        assert!(edits.contains(&(BikeField::Color, FieldValue::Text("red".to_string()))));
    }
}
