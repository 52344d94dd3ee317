pub mod barcode;
pub mod form;
pub mod pricing;
pub mod product;

pub use barcode::{BarcodeAllocator, SequentialBarcodeAllocator};
pub use form::{DerivedField, InputField, PricingForm};
pub use pricing::{
    MakingChargeBasis, PricingConfig, PricingEngine, PricingMode, ProductPricingDerived,
    ProductPricingInputs, WastageBasis,
};
pub use product::{qr_payload, JewelleryProduct, ProductError, ProductSubmission};
