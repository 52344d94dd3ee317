pub mod decimal;
pub mod models;

pub use decimal::{Money, Percent, RoundingMode, Weight};
pub use models::reference::{Category, Design, MetalType, PurityGrade};
