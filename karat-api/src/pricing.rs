use axum::{extract::State, routing::{get, post}, Json, Router};
use karat_catalog::{DerivedField, ProductPricingDerived, ProductPricingInputs};
use karat_core::tax::{TaxSlab, TaxSlabInfo};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecomputeRequest {
    #[serde(default)]
    pub inputs: ProductPricingInputs,
    /// Derived values currently shown in the form, read leniently since the
    /// form may hold blanks. Absent on first load.
    #[serde(default)]
    pub previous: Option<ProductPricingDerived>,
}

#[derive(Debug, Serialize)]
pub struct RecomputeResponse {
    pub derived: ProductPricingDerived,
    /// Fields the form should write back; empty once the form has settled.
    pub changed: Vec<DerivedField>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/pricing/derive", post(derive))
        .route("/v1/pricing/recompute", post(recompute))
        .route("/v1/tax-slabs", get(tax_slabs))
}

/// POST /v1/pricing/derive
async fn derive(
    State(state): State<AppState>,
    Json(inputs): Json<ProductPricingInputs>,
) -> Json<ProductPricingDerived> {
    Json(state.engine.derive(&inputs))
}

/// POST /v1/pricing/recompute
async fn recompute(
    State(state): State<AppState>,
    Json(req): Json<RecomputeRequest>,
) -> Json<RecomputeResponse> {
    let derived = state.engine.derive(&req.inputs);
    let changed = match &req.previous {
        Some(previous) => derived.changed_fields(previous),
        None => DerivedField::ALL.to_vec(),
    };

    Json(RecomputeResponse { derived, changed })
}

/// GET /v1/tax-slabs
async fn tax_slabs() -> Json<Vec<TaxSlabInfo>> {
    Json(TaxSlab::all().into_iter().map(TaxSlab::info).collect())
}
