use karat_core::numeric::lenient;
use karat_shared::decimal::percent_of;
use karat_shared::{Money, Percent, RoundingMode, Weight};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// How the metal value of a piece is priced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingMode {
    /// Metal rate per gram times the weight after wastage.
    #[default]
    ByWeight,
    /// Flat cost per piece times quantity.
    ByFixed,
}

/// Which weight the wastage percentage is applied to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WastageBasis {
    #[default]
    GrossWeight,
    WeightBeforeWastage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MakingChargeBasis {
    #[default]
    PerGram,
    /// Flat fee for the piece, not scaled by quantity.
    PerPiece,
    PercentOfRateAmount,
}

/// Lowercase alphanumerics only, so `"Gross Weight"`, `"GROSS_WEIGHT"` and
/// `"grossWeight"` compare equal.
fn normalize(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown selection: {0}")]
pub struct UnknownSelection(String);

impl FromStr for PricingMode {
    type Err = UnknownSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "byweight" | "weight" => Ok(PricingMode::ByWeight),
            "byfixed" | "fixed" => Ok(PricingMode::ByFixed),
            _ => Err(UnknownSelection(s.to_string())),
        }
    }
}

impl FromStr for WastageBasis {
    type Err = UnknownSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "grossweight" | "gross" => Ok(WastageBasis::GrossWeight),
            "weightbeforewastage" | "netweight" | "net" => Ok(WastageBasis::WeightBeforeWastage),
            _ => Err(UnknownSelection(s.to_string())),
        }
    }
}

impl FromStr for MakingChargeBasis {
    type Err = UnknownSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "pergram" | "gram" => Ok(MakingChargeBasis::PerGram),
            "perpiece" | "piece" => Ok(MakingChargeBasis::PerPiece),
            "percentofrateamount" | "ofrateamount" | "percentage" | "percent" => {
                Ok(MakingChargeBasis::PercentOfRateAmount)
            }
            _ => Err(UnknownSelection(s.to_string())),
        }
    }
}

/// Read a selection by any of its accepted labels. Missing or unknown
/// selections fall back to the default option.
fn selection<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| match s.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(selection = %s, "unknown selection, using default");
                None
            }
        })
        .unwrap_or_default())
}

/// User-editable pricing fields of the product form.
///
/// Every numeric field deserializes leniently: numbers, numeric strings,
/// blanks and `null` are all accepted, and anything unusable is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPricingInputs {
    #[serde(deserialize_with = "lenient::decimal")]
    pub gross_weight: Weight,
    #[serde(deserialize_with = "lenient::decimal")]
    pub stone_weight: Weight,
    #[serde(deserialize_with = "lenient::decimal")]
    pub stone_price: Money,
    #[serde(deserialize_with = "selection")]
    pub pricing_mode: PricingMode,
    #[serde(deserialize_with = "selection")]
    pub wastage_basis: WastageBasis,
    #[serde(deserialize_with = "lenient::decimal")]
    pub wastage_percent: Percent,
    #[serde(deserialize_with = "selection")]
    pub making_charge_basis: MakingChargeBasis,
    #[serde(deserialize_with = "lenient::decimal")]
    pub making_charge_rate: Decimal,
    /// Metal rate per gram, looked up by purity.
    #[serde(deserialize_with = "lenient::decimal")]
    pub rate: Money,
    #[serde(deserialize_with = "lenient::decimal")]
    pub piece_cost: Money,
    /// Piece count. Zero is accepted, since a blank field reads as zero; a
    /// zero quantity prices a fixed-cost piece at nothing.
    #[serde(deserialize_with = "lenient::quantity")]
    pub quantity: u32,
    #[serde(deserialize_with = "lenient::decimal")]
    pub hallmark_charge: Money,
    #[serde(deserialize_with = "lenient::decimal")]
    pub tax_percent: Percent,
    #[serde(deserialize_with = "lenient::decimal")]
    pub discount_percent: Percent,
}

/// Fields computed from [`ProductPricingInputs`]. Never edited directly.
///
/// Deserializes as leniently as the inputs, since values echoed back from a
/// form may have been blanked: a blank `net_weight` reads as unset and any
/// other blank field as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPricingDerived {
    /// `None` when stone weight exceeds gross weight.
    #[serde(deserialize_with = "lenient::optional_decimal")]
    pub net_weight: Option<Weight>,
    #[serde(deserialize_with = "lenient::decimal")]
    pub wastage_weight: Weight,
    #[serde(deserialize_with = "lenient::decimal")]
    pub total_weight_after_wastage: Weight,
    #[serde(deserialize_with = "lenient::decimal")]
    pub rate_amount: Money,
    #[serde(deserialize_with = "lenient::decimal")]
    pub making_charges: Money,
    #[serde(deserialize_with = "lenient::decimal")]
    pub discount_amount: Money,
    #[serde(deserialize_with = "lenient::decimal")]
    pub subtotal: Money,
    #[serde(deserialize_with = "lenient::decimal")]
    pub tax_amount: Money,
    #[serde(deserialize_with = "lenient::decimal")]
    pub total_price: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PricingConfig {
    /// Decimal places for weights (grams)
    pub weight_scale: u32,

    /// Decimal places for money
    pub money_scale: u32,

    pub rounding: RoundingMode,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            weight_scale: 3,
            money_scale: 2,
            rounding: RoundingMode::HalfUp,
        }
    }
}

/// Derives every weight and money field of a product from its inputs.
///
/// A derivation is a pure function of the input snapshot. It is re-run in
/// full on every change and always yields a complete result. Any stage whose
/// value does not fit in a [`Decimal`] saturates at [`Decimal::MAX`].
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn derive(&self, inputs: &ProductPricingInputs) -> ProductPricingDerived {
        let net_weight = self.net_weight(inputs);
        let net = net_weight.unwrap_or(Decimal::ZERO);

        let (wastage_weight, total_weight_after_wastage) = self.wastage(inputs, net);
        let rate_amount = self.rate_amount(inputs, total_weight_after_wastage);
        let making_charges = self.making_charges(inputs, total_weight_after_wastage, rate_amount);
        let discount_amount = self.money(percent_of(making_charges, inputs.discount_percent));

        let subtotal = self.money(
            rate_amount
                .saturating_add(inputs.stone_price)
                .saturating_add(making_charges)
                .saturating_add(inputs.hallmark_charge)
                .saturating_sub(discount_amount),
        );
        let tax_amount = self.money(percent_of(subtotal, inputs.tax_percent));
        let total_price = self.money(subtotal.saturating_add(tax_amount));

        let derived = ProductPricingDerived {
            net_weight,
            wastage_weight,
            total_weight_after_wastage,
            rate_amount,
            making_charges,
            discount_amount,
            subtotal,
            tax_amount,
            total_price,
        };
        tracing::trace!(?derived, "pricing derived");
        derived
    }

    /// Negative net weight means the gross/stone pair is inconsistent; it is
    /// left unset rather than shown as zero.
    fn net_weight(&self, inputs: &ProductPricingInputs) -> Option<Weight> {
        let net = inputs.gross_weight.saturating_sub(inputs.stone_weight);
        if net < Decimal::ZERO {
            None
        } else {
            Some(self.weight(net))
        }
    }

    fn wastage(&self, inputs: &ProductPricingInputs, net: Weight) -> (Weight, Weight) {
        let base = match inputs.wastage_basis {
            WastageBasis::GrossWeight => inputs.gross_weight,
            WastageBasis::WeightBeforeWastage => net,
        };
        let wastage = self.weight(percent_of(base, inputs.wastage_percent));
        (wastage, self.weight(net.saturating_add(wastage)))
    }

    fn rate_amount(&self, inputs: &ProductPricingInputs, total_weight: Weight) -> Money {
        let amount = match inputs.pricing_mode {
            PricingMode::ByWeight => inputs.rate.saturating_mul(total_weight),
            PricingMode::ByFixed => inputs.piece_cost.saturating_mul(Decimal::from(inputs.quantity)),
        };
        self.money(amount)
    }

    fn making_charges(
        &self,
        inputs: &ProductPricingInputs,
        total_weight: Weight,
        rate_amount: Money,
    ) -> Money {
        let charges = match inputs.making_charge_basis {
            MakingChargeBasis::PerGram => inputs.making_charge_rate.saturating_mul(total_weight),
            MakingChargeBasis::PercentOfRateAmount => {
                percent_of(rate_amount, inputs.making_charge_rate)
            }
            MakingChargeBasis::PerPiece => inputs.making_charge_rate,
        };
        self.money(charges)
    }

    fn weight(&self, value: Decimal) -> Weight {
        self.config.rounding.round(value, self.config.weight_scale)
    }

    fn money(&self, value: Decimal) -> Money {
        self.config.rounding.round(value, self.config.money_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn engine() -> PricingEngine {
        PricingEngine::new(PricingConfig::default())
    }

    fn scenario() -> ProductPricingInputs {
        ProductPricingInputs {
            gross_weight: dec!(10),
            stone_weight: dec!(0),
            stone_price: dec!(0),
            pricing_mode: PricingMode::ByWeight,
            wastage_basis: WastageBasis::GrossWeight,
            wastage_percent: dec!(10),
            making_charge_basis: MakingChargeBasis::PercentOfRateAmount,
            making_charge_rate: dec!(10),
            rate: dec!(5000),
            hallmark_charge: dec!(60),
            tax_percent: dec!(3),
            discount_percent: dec!(0),
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let derived = engine().derive(&scenario());

        assert_eq!(derived.net_weight, Some(dec!(10.000)));
        assert_eq!(derived.wastage_weight, dec!(1.000));
        assert_eq!(derived.total_weight_after_wastage, dec!(11.000));
        assert_eq!(derived.rate_amount, dec!(55000.00));
        assert_eq!(derived.making_charges, dec!(5500.00));
        assert_eq!(derived.discount_amount, dec!(0.00));
        assert_eq!(derived.subtotal, dec!(60560.00));
        assert_eq!(derived.tax_amount, dec!(1816.80));
        assert_eq!(derived.total_price, dec!(62376.80));

        assert_eq!(derived.tax_amount.to_string(), "1816.80");
        assert_eq!(derived.total_weight_after_wastage.to_string(), "11.000");
    }

    #[test]
    fn test_net_weight_rounds_to_three_places() {
        let inputs = ProductPricingInputs {
            gross_weight: dec!(12.34567),
            stone_weight: dec!(2.1),
            ..Default::default()
        };
        assert_eq!(engine().derive(&inputs).net_weight, Some(dec!(10.246)));
    }

    #[test]
    fn test_net_weight_of_equal_weights_is_zero_not_unset() {
        let inputs = ProductPricingInputs {
            gross_weight: dec!(4.5),
            stone_weight: dec!(4.5),
            ..Default::default()
        };
        assert_eq!(engine().derive(&inputs).net_weight, Some(dec!(0.000)));
    }

    #[test]
    fn test_negative_net_weight_is_unset() {
        let inputs = ProductPricingInputs {
            gross_weight: dec!(2),
            stone_weight: dec!(3.5),
            wastage_basis: WastageBasis::WeightBeforeWastage,
            wastage_percent: dec!(10),
            rate: dec!(5000),
            ..Default::default()
        };
        let derived = engine().derive(&inputs);

        assert_eq!(derived.net_weight, None);
        // Downstream stages see a zero net weight.
        assert_eq!(derived.wastage_weight, Decimal::ZERO);
        assert_eq!(derived.total_weight_after_wastage, Decimal::ZERO);
        assert_eq!(derived.rate_amount, Decimal::ZERO);
    }

    #[test]
    fn test_wastage_on_gross_weight() {
        let inputs = ProductPricingInputs {
            gross_weight: dec!(10.000),
            wastage_basis: WastageBasis::GrossWeight,
            wastage_percent: dec!(10),
            ..Default::default()
        };
        let derived = engine().derive(&inputs);
        assert_eq!(derived.wastage_weight, dec!(1.000));
        assert_eq!(derived.total_weight_after_wastage, dec!(11.000));
    }

    #[test]
    fn test_wastage_on_weight_before_wastage() {
        let inputs = ProductPricingInputs {
            gross_weight: dec!(12),
            stone_weight: dec!(2),
            wastage_basis: WastageBasis::WeightBeforeWastage,
            wastage_percent: dec!(8),
            ..Default::default()
        };
        let derived = engine().derive(&inputs);
        assert_eq!(derived.wastage_weight, dec!(0.800));
        assert_eq!(derived.total_weight_after_wastage, dec!(10.800));

        let gross_based = ProductPricingInputs {
            wastage_basis: WastageBasis::GrossWeight,
            ..inputs
        };
        let derived = engine().derive(&gross_based);
        assert_eq!(derived.wastage_weight, dec!(0.960));
        assert_eq!(derived.total_weight_after_wastage, dec!(10.960));
    }

    #[test]
    fn test_zero_wastage_keeps_net() {
        let inputs = ProductPricingInputs {
            gross_weight: dec!(7.25),
            stone_weight: dec!(0.25),
            ..Default::default()
        };
        let derived = engine().derive(&inputs);
        assert_eq!(derived.wastage_weight, Decimal::ZERO);
        assert_eq!(derived.total_weight_after_wastage, dec!(7.000));
    }

    #[test]
    fn test_rate_amount_by_weight() {
        let derived = engine().derive(&scenario());
        assert_eq!(derived.rate_amount, dec!(55000.00));
    }

    #[test]
    fn test_rate_amount_by_fixed_ignores_weight() {
        let inputs = ProductPricingInputs {
            pricing_mode: PricingMode::ByFixed,
            piece_cost: dec!(1000),
            quantity: 3,
            ..scenario()
        };
        let derived = engine().derive(&inputs);
        assert_eq!(derived.rate_amount, dec!(3000.00));

        let heavier = ProductPricingInputs {
            gross_weight: dec!(250),
            ..inputs
        };
        assert_eq!(engine().derive(&heavier).rate_amount, dec!(3000.00));
    }

    #[test]
    fn test_making_charges_per_gram() {
        let inputs = ProductPricingInputs {
            making_charge_basis: MakingChargeBasis::PerGram,
            making_charge_rate: dec!(350),
            ..scenario()
        };
        assert_eq!(engine().derive(&inputs).making_charges, dec!(3850.00));
    }

    #[test]
    fn test_making_charges_percent_of_rate_amount() {
        assert_eq!(engine().derive(&scenario()).making_charges, dec!(5500.00));
    }

    #[test]
    fn test_making_charges_per_piece_is_flat() {
        let inputs = ProductPricingInputs {
            pricing_mode: PricingMode::ByFixed,
            piece_cost: dec!(1000),
            quantity: 3,
            making_charge_basis: MakingChargeBasis::PerPiece,
            making_charge_rate: dec!(750),
            ..scenario()
        };
        assert_eq!(engine().derive(&inputs).making_charges, dec!(750.00));
    }

    #[test]
    fn test_discount_on_making_charges() {
        let inputs = ProductPricingInputs {
            discount_percent: dec!(10),
            ..scenario()
        };
        let derived = engine().derive(&inputs);
        assert_eq!(derived.discount_amount, dec!(550.00));
        assert_eq!(derived.subtotal, dec!(60010.00));
        assert_eq!(derived.tax_amount, dec!(1800.30));
        assert_eq!(derived.total_price, dec!(61810.30));
    }

    #[test]
    fn test_stone_price_enters_subtotal() {
        let inputs = ProductPricingInputs {
            stone_weight: dec!(0.5),
            stone_price: dec!(2500),
            wastage_percent: dec!(0),
            making_charge_rate: dec!(0),
            hallmark_charge: dec!(0),
            tax_percent: dec!(0),
            ..scenario()
        };
        let derived = engine().derive(&inputs);
        assert_eq!(derived.rate_amount, dec!(47500.00));
        assert_eq!(derived.subtotal, dec!(50000.00));
        assert_eq!(derived.total_price, dec!(50000.00));
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let engine = engine();
        let inputs = scenario();
        assert_eq!(engine.derive(&inputs), engine.derive(&inputs));
    }

    #[test]
    fn test_blank_inputs_produce_zeroes() {
        let derived = engine().derive(&ProductPricingInputs::default());

        assert_eq!(derived.net_weight, Some(Decimal::ZERO));
        assert_eq!(derived.wastage_weight, Decimal::ZERO);
        assert_eq!(derived.total_weight_after_wastage, Decimal::ZERO);
        assert_eq!(derived.rate_amount, Decimal::ZERO);
        assert_eq!(derived.making_charges, Decimal::ZERO);
        assert_eq!(derived.discount_amount, Decimal::ZERO);
        assert_eq!(derived.subtotal, Decimal::ZERO);
        assert_eq!(derived.tax_amount, Decimal::ZERO);
        assert_eq!(derived.total_price, Decimal::ZERO);
    }

    #[test]
    fn test_oversized_rate_saturates() {
        let inputs = ProductPricingInputs {
            gross_weight: dec!(10),
            rate: karat_core::parse_decimal_lenient("79228162514264337593543950335"),
            tax_percent: dec!(3),
            ..Default::default()
        };
        let derived = engine().derive(&inputs);

        assert_eq!(derived.net_weight, Some(dec!(10.000)));
        assert_eq!(derived.rate_amount, Decimal::MAX);
        assert_eq!(derived.subtotal, Decimal::MAX);
        assert_eq!(derived.tax_amount, Decimal::MAX);
        assert_eq!(derived.total_price, Decimal::MAX);
    }

    #[test]
    fn test_oversized_fixed_and_making_inputs_saturate() {
        let inputs = ProductPricingInputs {
            gross_weight: dec!(5),
            pricing_mode: PricingMode::ByFixed,
            piece_cost: Decimal::MAX,
            quantity: 7,
            making_charge_basis: MakingChargeBasis::PerGram,
            making_charge_rate: Decimal::MAX,
            wastage_percent: Decimal::MAX,
            hallmark_charge: Decimal::MAX,
            ..Default::default()
        };
        let derived = engine().derive(&inputs);

        assert_eq!(derived.wastage_weight, Decimal::MAX);
        assert_eq!(derived.rate_amount, Decimal::MAX);
        assert_eq!(derived.making_charges, Decimal::MAX);
        assert_eq!(derived.total_price, Decimal::MAX);
    }

    #[test]
    fn test_bankers_rounding_config() {
        let engine = PricingEngine::new(PricingConfig {
            rounding: RoundingMode::Bankers,
            ..Default::default()
        });
        let inputs = ProductPricingInputs {
            making_charge_basis: MakingChargeBasis::PerPiece,
            making_charge_rate: dec!(0.125),
            ..Default::default()
        };
        assert_eq!(engine.derive(&inputs).making_charges, dec!(0.12));
        assert_eq!(self::engine().derive(&inputs).making_charges, dec!(0.13));
    }

    #[test]
    fn test_inputs_deserialize_from_form_payload() {
        let inputs: ProductPricingInputs = serde_json::from_value(serde_json::json!({
            "gross_weight": "10",
            "stone_weight": "",
            "pricing_mode": "Weight",
            "wastage_basis": "Gross Weight",
            "wastage_percent": 10,
            "making_charge_basis": "PERCENT_OF_RATE_AMOUNT",
            "making_charge_rate": "10",
            "rate": 5000,
            "quantity": null,
            "hallmark_charge": "60",
            "tax_percent": "3",
            "discount_percent": "abc"
        }))
        .unwrap();

        assert_eq!(inputs, scenario());
    }

    #[test]
    fn test_unknown_selection_falls_back_to_default() {
        let inputs: ProductPricingInputs = serde_json::from_value(serde_json::json!({
            "pricing_mode": "by barter",
            "making_charge_basis": "Per Piece"
        }))
        .unwrap();

        assert_eq!(inputs.pricing_mode, PricingMode::ByWeight);
        assert_eq!(inputs.making_charge_basis, MakingChargeBasis::PerPiece);
    }

    #[test]
    fn test_derived_reads_blanked_form_values() {
        let derived: ProductPricingDerived = serde_json::from_value(serde_json::json!({
            "net_weight": "",
            "wastage_weight": "1.000",
            "rate_amount": "",
            "total_price": 62376.8
        }))
        .unwrap();

        assert_eq!(derived.net_weight, None);
        assert_eq!(derived.wastage_weight, dec!(1.000));
        assert_eq!(derived.rate_amount, Decimal::ZERO);
        assert_eq!(derived.subtotal, Decimal::ZERO);
        assert_eq!(derived.total_price, dec!(62376.8));
    }
}
