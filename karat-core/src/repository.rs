use async_trait::async_trait;
use karat_shared::{Category, Design, MetalType, PurityGrade};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::CoreResult;

/// Master data the product form draws its option lists and metal rates from.
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    async fn metal_types(&self) -> CoreResult<Vec<MetalType>>;

    /// Purity grades, optionally narrowed to one metal type.
    async fn purities(&self, metal_type_id: Option<Uuid>) -> CoreResult<Vec<PurityGrade>>;

    async fn designs(&self) -> CoreResult<Vec<Design>>;

    async fn categories(&self) -> CoreResult<Vec<Category>>;

    /// Current rate per gram for a purity, `None` when the purity is unknown.
    async fn rate_for_purity(&self, purity_id: Uuid) -> CoreResult<Option<Decimal>>;

    /// Replace the rate per gram of a purity and return the updated grade.
    async fn update_rate(&self, purity_id: Uuid, rate: Decimal) -> CoreResult<PurityGrade>;
}
