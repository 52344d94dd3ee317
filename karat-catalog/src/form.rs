//! Form-state container for the product pricing fields.
//!
//! Holds the raw inputs and the last written derived values. Every input
//! change re-runs the full derivation and reports only the derived fields
//! whose rounded value actually moved, so a caller that writes those fields
//! back into an observed form never loops.

use karat_core::{parse_decimal_lenient, parse_quantity_lenient, resolve_tax_percent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{
    MakingChargeBasis, PricingEngine, PricingMode, ProductPricingDerived, ProductPricingInputs,
    WastageBasis,
};
use crate::product::JewelleryProduct;

/// Free-text numeric inputs of the pricing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    GrossWeight,
    StoneWeight,
    StonePrice,
    WastagePercent,
    MakingChargeRate,
    Rate,
    PieceCost,
    Quantity,
    HallmarkCharge,
    TaxPercent,
    DiscountPercent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedField {
    NetWeight,
    WastageWeight,
    TotalWeightAfterWastage,
    RateAmount,
    MakingCharges,
    DiscountAmount,
    Subtotal,
    TaxAmount,
    TotalPrice,
}

impl DerivedField {
    /// Every derived field, in pipeline order.
    pub const ALL: [DerivedField; 9] = [
        DerivedField::NetWeight,
        DerivedField::WastageWeight,
        DerivedField::TotalWeightAfterWastage,
        DerivedField::RateAmount,
        DerivedField::MakingCharges,
        DerivedField::DiscountAmount,
        DerivedField::Subtotal,
        DerivedField::TaxAmount,
        DerivedField::TotalPrice,
    ];
}

impl ProductPricingDerived {
    /// Fields of `self` that differ from `previous`, in pipeline order.
    pub fn changed_fields(&self, previous: &ProductPricingDerived) -> Vec<DerivedField> {
        let pairs = [
            (DerivedField::WastageWeight, self.wastage_weight, previous.wastage_weight),
            (
                DerivedField::TotalWeightAfterWastage,
                self.total_weight_after_wastage,
                previous.total_weight_after_wastage,
            ),
            (DerivedField::RateAmount, self.rate_amount, previous.rate_amount),
            (DerivedField::MakingCharges, self.making_charges, previous.making_charges),
            (DerivedField::DiscountAmount, self.discount_amount, previous.discount_amount),
            (DerivedField::Subtotal, self.subtotal, previous.subtotal),
            (DerivedField::TaxAmount, self.tax_amount, previous.tax_amount),
            (DerivedField::TotalPrice, self.total_price, previous.total_price),
        ];

        let mut changed = Vec::new();
        if self.net_weight != previous.net_weight {
            changed.push(DerivedField::NetWeight);
        }
        changed.extend(
            pairs
                .into_iter()
                .filter(|(_, next, prev)| next != prev)
                .map(|(field, _, _)| field),
        );
        changed
    }
}

#[derive(Debug, Clone)]
pub struct PricingForm {
    engine: PricingEngine,
    inputs: ProductPricingInputs,
    derived: ProductPricingDerived,
}

impl PricingForm {
    /// Blank form for a new product.
    pub fn new(engine: PricingEngine) -> Self {
        Self::with_inputs(engine, ProductPricingInputs::default())
    }

    /// Edit mode. Inputs come from the record; derived values stored on the
    /// record are ignored and computed fresh.
    pub fn hydrate(engine: PricingEngine, product: &JewelleryProduct) -> Self {
        let mut inputs = product.pricing.clone();
        if let Some(code) = &product.tax_code {
            inputs.tax_percent = resolve_tax_percent(code);
        }
        Self::with_inputs(engine, inputs)
    }

    fn with_inputs(engine: PricingEngine, inputs: ProductPricingInputs) -> Self {
        let derived = engine.derive(&inputs);
        Self {
            engine,
            inputs,
            derived,
        }
    }

    pub fn inputs(&self) -> &ProductPricingInputs {
        &self.inputs
    }

    pub fn derived(&self) -> &ProductPricingDerived {
        &self.derived
    }

    /// Apply raw text typed into a numeric field.
    pub fn set(&mut self, field: InputField, raw: &str) -> Vec<DerivedField> {
        let decimal = || parse_decimal_lenient(raw);
        match field {
            InputField::GrossWeight => self.write(decimal(), |i| &mut i.gross_weight),
            InputField::StoneWeight => self.write(decimal(), |i| &mut i.stone_weight),
            InputField::StonePrice => self.write(decimal(), |i| &mut i.stone_price),
            InputField::WastagePercent => self.write(decimal(), |i| &mut i.wastage_percent),
            InputField::MakingChargeRate => self.write(decimal(), |i| &mut i.making_charge_rate),
            InputField::Rate => self.write(decimal(), |i| &mut i.rate),
            InputField::PieceCost => self.write(decimal(), |i| &mut i.piece_cost),
            InputField::Quantity => self.write(parse_quantity_lenient(raw), |i| &mut i.quantity),
            InputField::HallmarkCharge => self.write(decimal(), |i| &mut i.hallmark_charge),
            InputField::TaxPercent => self.write(decimal(), |i| &mut i.tax_percent),
            InputField::DiscountPercent => self.write(decimal(), |i| &mut i.discount_percent),
        }
    }

    /// Rate per gram resolved from the selected purity.
    pub fn set_rate(&mut self, rate: Decimal) -> Vec<DerivedField> {
        self.write(rate, |inputs| &mut inputs.rate)
    }

    /// Tax selection, either a slab code or a label such as `"18% GST"`.
    pub fn select_tax(&mut self, selection: &str) -> Vec<DerivedField> {
        self.write(resolve_tax_percent(selection), |inputs| &mut inputs.tax_percent)
    }

    pub fn set_pricing_mode(&mut self, mode: PricingMode) -> Vec<DerivedField> {
        self.write(mode, |inputs| &mut inputs.pricing_mode)
    }

    pub fn set_wastage_basis(&mut self, basis: WastageBasis) -> Vec<DerivedField> {
        self.write(basis, |inputs| &mut inputs.wastage_basis)
    }

    pub fn set_making_charge_basis(&mut self, basis: MakingChargeBasis) -> Vec<DerivedField> {
        self.write(basis, |inputs| &mut inputs.making_charge_basis)
    }

    /// Re-run the derivation and keep the result if any field moved.
    pub fn recompute(&mut self) -> Vec<DerivedField> {
        let next = self.engine.derive(&self.inputs);
        let changed = next.changed_fields(&self.derived);
        if !changed.is_empty() {
            tracing::debug!(?changed, "derived pricing fields updated");
            self.derived = next;
        }
        changed
    }

    fn write<T, F>(&mut self, value: T, slot: F) -> Vec<DerivedField>
    where
        T: PartialEq,
        F: FnOnce(&mut ProductPricingInputs) -> &mut T,
    {
        let target = slot(&mut self.inputs);
        if *target == value {
            return Vec::new();
        }
        *target = value;
        self.recompute()
    }
}
