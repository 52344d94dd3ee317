use std::sync::Arc;

use karat_catalog::{BarcodeAllocator, PricingEngine, SequentialBarcodeAllocator};
use karat_core::ReferenceRepository;
use karat_store::{Config, InMemoryReferenceRepository, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub engine: PricingEngine,
    pub reference: Arc<dyn ReferenceRepository>,
    pub barcodes: Arc<dyn BarcodeAllocator>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let reference = InMemoryReferenceRepository::from_seed(config.reference.clone())?;

        Ok(Self {
            engine: PricingEngine::new(config.pricing.clone()),
            reference: Arc::new(reference),
            barcodes: Arc::new(SequentialBarcodeAllocator::new(
                config.barcode.prefix.clone(),
                config.barcode.start,
            )),
        })
    }
}
