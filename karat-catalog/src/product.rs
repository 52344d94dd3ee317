use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::{ProductPricingDerived, ProductPricingInputs};
use karat_shared::Weight;

/// Product record as owned and stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JewelleryProduct {
    pub id: Uuid,
    pub product_code: String,
    pub name: String,
    pub barcode: Option<String>,
    pub category_id: Option<Uuid>,
    pub metal_type_id: Option<Uuid>,
    pub purity_id: Option<Uuid>,
    pub design_id: Option<Uuid>,
    /// Hallmark unique identification number
    pub huid: Option<String>,
    /// Filenames handed back by the image upload endpoint
    #[serde(default)]
    pub image_files: Vec<String>,
    /// Tax slab code or label chosen in the form
    pub tax_code: Option<String>,
    #[serde(default)]
    pub pricing: ProductPricingInputs,
    /// As last submitted. Never trusted on load.
    #[serde(default)]
    pub derived: Option<ProductPricingDerived>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl JewelleryProduct {
    pub fn new(product_code: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_code,
            name,
            barcode: None,
            category_id: None,
            metal_type_id: None,
            purity_id: None,
            design_id: None,
            huid: None,
            image_files: Vec::new(),
            tax_code: None,
            pricing: ProductPricingInputs::default(),
            derived: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Checks the record and its derived pricing are fit to submit.
    pub fn validate(&self, derived: &ProductPricingDerived) -> Result<(), ProductError> {
        if self.product_code.trim().is_empty() {
            return Err(ProductError::MissingField("product_code"));
        }
        if self.name.trim().is_empty() {
            return Err(ProductError::MissingField("name"));
        }
        if derived.net_weight.is_none() {
            return Err(ProductError::InconsistentWeights {
                gross: self.pricing.gross_weight,
                stone: self.pricing.stone_weight,
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Stone weight {stone} exceeds gross weight {gross}")]
    InconsistentWeights { gross: Weight, stone: Weight },
}

/// Body of the backend's product create/update call: record metadata with
/// the pricing inputs and derived fields flattened alongside.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSubmission {
    pub id: Uuid,
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
    pub is_active: bool,
    #[serde(flatten)]
    pub pricing: ProductPricingInputs,
    #[serde(flatten)]
    pub derived: ProductPricingDerived,
}

impl ProductSubmission {
    pub fn build(
        product: &JewelleryProduct,
        derived: &ProductPricingDerived,
    ) -> Result<Self, ProductError> {
        product.validate(derived)?;

        Ok(Self {
            id: product.id,
            product_code: product.product_code.clone(),
            name: product.name.clone(),
            barcode: product.barcode.clone(),
            category_id: product.category_id,
            metal_type_id: product.metal_type_id,
            purity_id: product.purity_id,
            design_id: product.design_id,
            huid: product.huid.clone(),
            image_files: product.image_files.clone(),
            tax_code: product.tax_code.clone(),
            is_active: product.is_active,
            pricing: product.pricing.clone(),
            derived: derived.clone(),
        })
    }
}

/// Compact JSON encoded into the QR code on the product tag.
pub fn qr_payload(
    product: &JewelleryProduct,
    derived: &ProductPricingDerived,
) -> Result<String, ProductError> {
    let barcode = product
        .barcode
        .as_deref()
        .ok_or(ProductError::MissingField("barcode"))?;

    Ok(serde_json::json!({
        "barcode": barcode,
        "product_code": product.product_code,
        "purity_id": product.purity_id,
        "net_weight": derived.net_weight,
        "total_price": derived.total_price,
    })
    .to_string())
}
