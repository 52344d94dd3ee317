use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A metal the shop trades in (gold, silver, platinum).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetalType {
    pub id: Uuid,
    pub name: String,
}

/// A purity grade of a metal, e.g. 22K gold, carrying the current rate per gram.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurityGrade {
    pub id: Uuid,
    pub metal_type_id: Uuid,
    pub name: String,
    pub rate_per_gram: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Design {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}
