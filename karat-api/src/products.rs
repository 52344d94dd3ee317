use axum::{extract::State, routing::post, Json, Router};
use karat_catalog::{
    qr_payload, JewelleryProduct, PricingForm, ProductPricingInputs, ProductSubmission,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Product form contents as posted by the console.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct PreviewProductRequest {
    pub id: Option<Uuid>,
    pub product_code: String,
    pub name: String,
    pub barcode: Option<String>,
    pub category_id: Option<Uuid>,
    pub metal_type_id: Option<Uuid>,
    pub purity_id: Option<Uuid>,
    pub design_id: Option<Uuid>,
    pub huid: Option<String>,
    pub image_files: Vec<String>,
    pub tax_code: Option<String>,
    pub pricing: ProductPricingInputs,
}

#[derive(Debug, Serialize)]
pub struct PreviewProductResponse {
    pub submission: ProductSubmission,
    pub qr_payload: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/products/preview", post(preview_product))
}

/// POST /v1/products/preview
///
/// Fills the metal rate from the selected purity, derives pricing, validates
/// the form, allocates a barcode when it has none and returns the payload the
/// backend's product endpoint expects.
async fn preview_product(
    State(state): State<AppState>,
    Json(req): Json<PreviewProductRequest>,
) -> Result<Json<PreviewProductResponse>, AppError> {
    let mut product = JewelleryProduct::new(req.product_code, req.name);
    if let Some(id) = req.id {
        product.id = id;
    }
    product.barcode = req.barcode.filter(|b| !b.trim().is_empty());
    product.category_id = req.category_id;
    product.metal_type_id = req.metal_type_id;
    product.purity_id = req.purity_id;
    product.design_id = req.design_id;
    product.huid = req.huid;
    product.image_files = req.image_files;
    product.tax_code = req.tax_code;
    product.pricing = req.pricing;

    let mut form = PricingForm::hydrate(state.engine.clone(), &product);

    if let Some(purity_id) = product.purity_id {
        let rate = state
            .reference
            .rate_for_purity(purity_id)
            .await?
            .ok_or_else(|| AppError::NotFoundError(format!("Purity not found: {}", purity_id)))?;
        form.set_rate(rate);
    }

    product.pricing = form.inputs().clone();
    let derived = form.derived().clone();

    // Barcodes are sequential; only a valid form may take one.
    product.validate(&derived)?;
    if product.barcode.is_none() {
        product.barcode = Some(state.barcodes.allocate().await?);
    }

    let submission = ProductSubmission::build(&product, &derived)?;
    let qr_payload = qr_payload(&product, &derived)?;

    tracing::info!(
        product_code = %product.product_code,
        total_price = %derived.total_price,
        "product preview built"
    );

    Ok(Json(PreviewProductResponse {
        submission,
        qr_payload,
    }))
}
