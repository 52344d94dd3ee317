//! Non-failing numeric parsing for free-text form fields.
//!
//! Every pricing input is a non-negative number typed into a text box. Blank,
//! malformed and negative text all read as zero so that a derivation always
//! has a full set of inputs to work with.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a decimal, coercing blank, malformed or negative text to zero.
///
/// Thousands separators (`1,250.50`) are accepted.
pub fn parse_decimal_lenient(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    let cleaned: String = trimmed.chars().filter(|c| *c != ',' && *c != '_').collect();
    let parsed = Decimal::from_str(&cleaned).or_else(|_| Decimal::from_scientific(&cleaned));

    match parsed {
        Ok(value) if value.is_zero() => Decimal::ZERO,
        Ok(value) if value.is_sign_negative() => {
            tracing::warn!(raw, "negative numeric input coerced to zero");
            Decimal::ZERO
        }
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(raw, "unparsable numeric input coerced to zero");
            Decimal::ZERO
        }
    }
}

/// Parse a piece count. Fractions are truncated; anything unusable is zero.
pub fn parse_quantity_lenient(raw: &str) -> u32 {
    parse_decimal_lenient(raw).trunc().to_u32().unwrap_or(0)
}

/// Serde adapters that apply the lenient policy to JSON payloads.
///
/// Numbers, numeric strings, empty strings and `null` are all accepted; any
/// other JSON value reads as zero.
pub mod lenient {
    use super::{parse_decimal_lenient, parse_quantity_lenient};
    use rust_decimal::Decimal;
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNumber {
        Number(serde_json::Number),
        Text(String),
        Other(IgnoredAny),
    }

    impl RawNumber {
        fn into_text(self) -> String {
            match self {
                RawNumber::Number(n) => n.to_string(),
                RawNumber::Text(s) => s,
                RawNumber::Other(_) => String::new(),
            }
        }
    }

    pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawNumber>::deserialize(deserializer)?;
        Ok(raw
            .map(|r| parse_decimal_lenient(&r.into_text()))
            .unwrap_or(Decimal::ZERO))
    }

    /// Like [`decimal`], except null or blank values read as `None`.
    pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawNumber>::deserialize(deserializer)?;
        Ok(raw.map(RawNumber::into_text).and_then(|text| {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(parse_decimal_lenient(text))
            }
        }))
    }

    pub fn quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawNumber>::deserialize(deserializer)?;
        Ok(raw
            .map(|r| parse_quantity_lenient(&r.into_text()))
            .unwrap_or(0))
    }
}
