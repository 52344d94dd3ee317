//! GST slabs offered in the product form.
//!
//! The console used to carry tax choices as display strings ("18% GST") and
//! recover the rate by stripping the text. Slabs are keyed by a stable code
//! here; the label is display only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxSlab {
    #[serde(rename = "GST0")]
    Exempt,
    #[serde(rename = "GST3")]
    Gst3,
    #[serde(rename = "GST5")]
    Gst5,
    #[serde(rename = "GST12")]
    Gst12,
    #[serde(rename = "GST18")]
    Gst18,
    #[serde(rename = "GST28")]
    Gst28,
}

/// Flattened view of a slab for option lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxSlabInfo {
    pub code: String,
    pub label: String,
    pub percent: Decimal,
}

impl TaxSlab {
    pub fn all() -> [TaxSlab; 6] {
        [
            TaxSlab::Exempt,
            TaxSlab::Gst3,
            TaxSlab::Gst5,
            TaxSlab::Gst12,
            TaxSlab::Gst18,
            TaxSlab::Gst28,
        ]
    }

    pub fn code(self) -> &'static str {
        match self {
            TaxSlab::Exempt => "GST0",
            TaxSlab::Gst3 => "GST3",
            TaxSlab::Gst5 => "GST5",
            TaxSlab::Gst12 => "GST12",
            TaxSlab::Gst18 => "GST18",
            TaxSlab::Gst28 => "GST28",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaxSlab::Exempt => "0% GST",
            TaxSlab::Gst3 => "3% GST",
            TaxSlab::Gst5 => "5% GST",
            TaxSlab::Gst12 => "12% GST",
            TaxSlab::Gst18 => "18% GST",
            TaxSlab::Gst28 => "28% GST",
        }
    }

    pub fn percent(self) -> Decimal {
        let pct: u32 = match self {
            TaxSlab::Exempt => 0,
            TaxSlab::Gst3 => 3,
            TaxSlab::Gst5 => 5,
            TaxSlab::Gst12 => 12,
            TaxSlab::Gst18 => 18,
            TaxSlab::Gst28 => 28,
        };
        Decimal::from(pct)
    }

    pub fn from_code(code: &str) -> Option<TaxSlab> {
        let code = code.trim();
        Self::all()
            .into_iter()
            .find(|slab| slab.code().eq_ignore_ascii_case(code))
    }

    pub fn info(self) -> TaxSlabInfo {
        TaxSlabInfo {
            code: self.code().to_string(),
            label: self.label().to_string(),
            percent: self.percent(),
        }
    }
}

/// Leading numeric portion of a tax label: `"18% GST"` is 18.
///
/// Labels without a leading number are zero.
pub fn tax_percent_from_label(label: &str) -> Decimal {
    let trimmed = label.trim_start();
    let mut end = 0;
    let mut seen_dot = false;

    for (idx, ch) in trimmed.char_indices() {
        if ch.is_ascii_digit() {
            end = idx + 1;
        } else if ch == '.' && !seen_dot {
            seen_dot = true;
        } else {
            break;
        }
    }

    Decimal::from_str(&trimmed[..end]).unwrap_or(Decimal::ZERO)
}

/// Tax percent for a form selection, which is either a slab code or a
/// free-text label.
pub fn resolve_tax_percent(selection: &str) -> Decimal {
    match TaxSlab::from_code(selection) {
        Some(slab) => slab.percent(),
        None => tax_percent_from_label(selection),
    }
}
