pub mod numeric;
pub mod repository;
pub mod tax;

pub use numeric::{parse_decimal_lenient, parse_quantity_lenient};
pub use repository::ReferenceRepository;
pub use tax::{resolve_tax_percent, tax_percent_from_label, TaxSlab};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
