use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use karat_shared::{Category, Design, MetalType, PurityGrade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListPuritiesQuery {
    pub metal_type_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub purity_id: Uuid,
    pub rate_per_gram: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRateRequest {
    pub rate_per_gram: Decimal,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/reference/metal-types", get(list_metal_types))
        .route("/v1/reference/purities", get(list_purities))
        .route("/v1/reference/designs", get(list_designs))
        .route("/v1/reference/categories", get(list_categories))
        .route("/v1/rates/{purity_id}", get(get_rate).put(update_rate))
}

async fn list_metal_types(State(state): State<AppState>) -> Result<Json<Vec<MetalType>>, AppError> {
    Ok(Json(state.reference.metal_types().await?))
}

/// GET /v1/reference/purities?metal_type_id=
async fn list_purities(
    State(state): State<AppState>,
    Query(query): Query<ListPuritiesQuery>,
) -> Result<Json<Vec<PurityGrade>>, AppError> {
    Ok(Json(state.reference.purities(query.metal_type_id).await?))
}

async fn list_designs(State(state): State<AppState>) -> Result<Json<Vec<Design>>, AppError> {
    Ok(Json(state.reference.designs().await?))
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.reference.categories().await?))
}

/// GET /v1/rates/{purity_id}
async fn get_rate(
    State(state): State<AppState>,
    Path(purity_id): Path<Uuid>,
) -> Result<Json<RateResponse>, AppError> {
    let rate_per_gram = state
        .reference
        .rate_for_purity(purity_id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Purity not found: {}", purity_id)))?;

    Ok(Json(RateResponse {
        purity_id,
        rate_per_gram,
    }))
}

/// PUT /v1/rates/{purity_id}
async fn update_rate(
    State(state): State<AppState>,
    Path(purity_id): Path<Uuid>,
    Json(req): Json<UpdateRateRequest>,
) -> Result<Json<PurityGrade>, AppError> {
    let purity = state
        .reference
        .update_rate(purity_id, req.rate_per_gram)
        .await?;
    Ok(Json(purity))
}
