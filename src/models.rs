//! Wire and domain types for the receipt pipeline.
//!
//! These structs mirror the JSON contract spoken by the OCR splitter and the
//! LLM normalizer (camelCase field names on the wire). `RawItem` is ephemeral
//! and never persisted; `NormalizedItem` flows through consolidation and into
//! the pantry merge.

use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Measurement unit attached to an item. Doubles as a typed database column
/// on pantry rows.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Discrete count (the default when the normalizer omits a unit)
    #[default]
    #[sea_orm(string_value = "count")]
    Count,
    /// Grams
    #[sea_orm(string_value = "g")]
    G,
    /// Milliliters
    #[sea_orm(string_value = "ml")]
    Ml,
    /// Kilograms
    #[sea_orm(string_value = "kg")]
    Kg,
    /// Liters
    #[sea_orm(string_value = "l")]
    L,
    /// Pounds
    #[sea_orm(string_value = "lb")]
    Lb,
    /// Ounces
    #[sea_orm(string_value = "oz")]
    Oz,
}

impl Unit {
    /// Wire-format name of the unit, as it appears in keys and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::G => "g",
            Self::Ml => "ml",
            Self::Kg => "kg",
            Self::L => "l",
            Self::Lb => "lb",
            Self::Oz => "oz",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw line item as produced by OCR splitting, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    /// The raw OCR text for this line
    pub name_raw: String,
    /// Quantity, defaulting to one when the line gives no count
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    /// Price per unit, if the line carried one
    #[serde(default)]
    pub unit_price: Option<f64>,
    /// Total for the line, if the line carried one
    #[serde(default)]
    pub line_total: Option<f64>,
    /// OCR confidence, if the engine reported one
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// One structured item as produced by the LLM normalizer.
///
/// A single receipt scan may contain duplicates (the same logical item split
/// across multiple OCR lines); [`crate::core::consolidate`] merges those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedItem {
    /// Normalized item name
    pub name_norm: String,
    /// Grocery category (e.g. "Produce", "Dairy")
    pub category: String,
    /// Quantity in `unit`; unknown quantities are inferred as one count
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    /// Measurement unit, defaulting to `count`
    #[serde(default)]
    pub unit: Unit,
    /// Price per unit if visible on the receipt
    #[serde(default)]
    pub unit_price: Option<f64>,
    /// Line total if visible on the receipt
    #[serde(default)]
    pub line_total: Option<f64>,
    /// Normalizer confidence in [0, 1]
    #[serde(default)]
    pub confidence: f64,
}

impl NormalizedItem {
    /// Validates the item shape beyond what deserialization enforces.
    ///
    /// The normalizer is untrusted input: names must be non-blank, the
    /// quantity finite and positive, prices finite and non-negative, and the
    /// confidence within `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.name_norm.trim().is_empty() {
            return Err(Error::Validation {
                message: "item name must not be blank".to_string(),
            });
        }

        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(Error::InvalidQuantity {
                quantity: self.quantity,
            });
        }

        for (field, value) in [("unitPrice", self.unit_price), ("lineTotal", self.line_total)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::Validation {
                        message: format!("{field} must be a non-negative number, got {v}"),
                    });
                }
            }
        }

        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(Error::Validation {
                message: format!("confidence must be within [0, 1], got {}", self.confidence),
            });
        }

        Ok(())
    }
}

/// One observed price for a pantry item, appended on each receipt merge that
/// carried a unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observed price per unit
    pub price: f64,
    /// When the price was observed
    pub date: DateTime<Utc>,
}

fn default_quantity() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn valid_item() -> NormalizedItem {
        NormalizedItem {
            name_norm: "pasta".to_string(),
            category: "Pantry".to_string(),
            quantity: 2.0,
            unit: Unit::Count,
            unit_price: Some(1.29),
            line_total: Some(2.58),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let item: NormalizedItem =
            serde_json::from_str(r#"{"nameNorm":"egg","category":"Dairy"}"#).unwrap();
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.unit, Unit::Count);
        assert_eq!(item.unit_price, None);
        assert_eq!(item.line_total, None);
        assert_eq!(item.confidence, 0.0);
    }

    #[test]
    fn test_unit_wire_names() {
        assert_eq!(serde_json::to_string(&Unit::Count).unwrap(), r#""count""#);
        assert_eq!(serde_json::to_string(&Unit::Kg).unwrap(), r#""kg""#);
        let unit: Unit = serde_json::from_str(r#""lb""#).unwrap();
        assert_eq!(unit, Unit::Lb);
    }

    #[test]
    fn test_validate_accepts_valid_item() {
        assert!(valid_item().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut item = valid_item();
        item.name_norm = "   ".to_string();
        assert!(matches!(
            item.validate().unwrap_err(),
            Error::Validation { message: _ }
        ));
    }

    #[test]
    fn test_validate_rejects_bad_quantity() {
        for quantity in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut item = valid_item();
            item.quantity = quantity;
            assert!(matches!(
                item.validate().unwrap_err(),
                Error::InvalidQuantity { quantity: _ }
            ));
        }
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut item = valid_item();
        item.unit_price = Some(-0.5);
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_confidence() {
        let mut item = valid_item();
        item.confidence = 1.5;
        assert!(item.validate().is_err());
    }
}
