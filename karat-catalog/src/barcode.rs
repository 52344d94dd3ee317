use async_trait::async_trait;
use karat_core::{CoreError, CoreResult};
use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out barcodes for new product tags.
#[async_trait]
pub trait BarcodeAllocator: Send + Sync {
    async fn allocate(&self) -> CoreResult<String>;
}

/// Process-local allocator producing `{prefix}{n:08}` from a counter.
pub struct SequentialBarcodeAllocator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialBarcodeAllocator {
    pub fn new(prefix: impl Into<String>, start: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(start),
        }
    }
}

#[async_trait]
impl BarcodeAllocator for SequentialBarcodeAllocator {
    async fn allocate(&self) -> CoreResult<String> {
        let n = self
            .next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .map_err(|_| CoreError::InternalError("barcode sequence exhausted".to_string()))?;

        let barcode = format!("{}{:08}", self.prefix, n);
        tracing::debug!(%barcode, "barcode allocated");
        Ok(barcode)
    }
}
