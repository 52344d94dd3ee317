use async_trait::async_trait;
use karat_core::{CoreError, CoreResult, ReferenceRepository};
use karat_shared::{Category, Design, MetalType, PurityGrade};
use rust_decimal::Decimal;
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::app_config::ReferenceSeed;
use crate::StoreError;

/// Reference data held in memory. Only purity rates change after startup.
pub struct InMemoryReferenceRepository {
    metal_types: Vec<MetalType>,
    purities: RwLock<Vec<PurityGrade>>,
    designs: Vec<Design>,
    categories: Vec<Category>,
}

impl InMemoryReferenceRepository {
    pub fn from_seed(seed: ReferenceSeed) -> Result<Self, StoreError> {
        let metal_ids: HashSet<Uuid> = seed.metal_types.iter().map(|m| m.id).collect();

        for purity in &seed.purities {
            if !metal_ids.contains(&purity.metal_type_id) {
                return Err(StoreError::InvalidSeed(format!(
                    "purity {} references unknown metal type {}",
                    purity.name, purity.metal_type_id
                )));
            }
            if purity.rate_per_gram < Decimal::ZERO {
                return Err(StoreError::InvalidSeed(format!(
                    "purity {} has a negative rate",
                    purity.name
                )));
            }
        }

        tracing::info!(
            metal_types = seed.metal_types.len(),
            purities = seed.purities.len(),
            designs = seed.designs.len(),
            categories = seed.categories.len(),
            "reference data loaded"
        );

        Ok(Self {
            metal_types: seed.metal_types,
            purities: RwLock::new(seed.purities),
            designs: seed.designs,
            categories: seed.categories,
        })
    }
}

#[async_trait]
impl ReferenceRepository for InMemoryReferenceRepository {
    async fn metal_types(&self) -> CoreResult<Vec<MetalType>> {
        Ok(self.metal_types.clone())
    }

    async fn purities(&self, metal_type_id: Option<Uuid>) -> CoreResult<Vec<PurityGrade>> {
        let purities = self.purities.read().await;
        Ok(purities
            .iter()
            .filter(|p| metal_type_id.map_or(true, |id| p.metal_type_id == id))
            .cloned()
            .collect())
    }

    async fn designs(&self) -> CoreResult<Vec<Design>> {
        Ok(self.designs.clone())
    }

    async fn categories(&self) -> CoreResult<Vec<Category>> {
        Ok(self.categories.clone())
    }

    async fn rate_for_purity(&self, purity_id: Uuid) -> CoreResult<Option<Decimal>> {
        let purities = self.purities.read().await;
        let rate = purities
            .iter()
            .find(|p| p.id == purity_id)
            .map(|p| p.rate_per_gram);
        tracing::debug!(%purity_id, ?rate, "rate lookup");
        Ok(rate)
    }

    async fn update_rate(&self, purity_id: Uuid, rate: Decimal) -> CoreResult<PurityGrade> {
        if rate < Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "rate must not be negative: {}",
                rate
            )));
        }

        let mut purities = self.purities.write().await;
        let purity = purities
            .iter_mut()
            .find(|p| p.id == purity_id)
            .ok_or_else(|| CoreError::NotFound(format!("purity {}", purity_id)))?;

        tracing::info!(%purity_id, old = %purity.rate_per_gram, new = %rate, "purity rate updated");
        purity.rate_per_gram = rate;
        Ok(purity.clone())
    }
}
