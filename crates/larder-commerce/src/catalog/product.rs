//! Product and selling-mode types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::ProductId;
use crate::money::Money;

/// Display unit used for weight products whose catalog unit has no abbreviation.
pub const DEFAULT_WEIGHT_ABBREV: &str = "gr";

/// Unit names and abbreviations that denote discrete items.
const UNIT_WORDS: [&str; 3] = ["unidad", "unidades", "u"];

/// How a product is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellingMode {
    /// Discrete items priced per unit.
    UnitBased,
    /// Continuous quantity (weight/volume) priced per hundred units.
    WeightBased,
}

impl SellingMode {
    /// Classify a catalog unit of measure.
    ///
    /// Unit-based when the normalized name or abbreviation is one of
    /// `unidad`, `unidades`, `u`, or the name contains `unidad`.
    /// Everything else, including a missing unit, is weight-based.
    pub fn classify(unit_name: Option<&str>, unit_abbrev: Option<&str>) -> Self {
        let name = unit_name.map(normalize).unwrap_or_default();
        let abbrev = unit_abbrev.map(normalize).unwrap_or_default();

        let is_unit = UNIT_WORDS.contains(&name.as_str())
            || UNIT_WORDS.contains(&abbrev.as_str())
            || name.contains("unidad");

        if is_unit {
            SellingMode::UnitBased
        } else {
            SellingMode::WeightBased
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SellingMode::UnitBased => "unit_based",
            SellingMode::WeightBased => "weight_based",
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Mode-specific packaging data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "selling_mode", rename_all = "snake_case")]
pub enum Packaging {
    /// Priced package holds `units_per_package` discrete items.
    #[serde(rename = "unit_based")]
    Units { units_per_package: Option<u32> },
    /// Priced package corresponds to `reference_quantity` of `unit_abbrev`.
    #[serde(rename = "weight_based")]
    Weight {
        reference_quantity: Option<Decimal>,
        unit_abbrev: String,
    },
}

/// A product as seen by the pricing engine and the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable catalog identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Brand, when the catalog has one.
    pub brand: Option<String>,
    /// Cost price of one priced package.
    pub cost_price: Option<Money>,
    /// Additive margin on cost (0.30 = 30%).
    pub margin_rate: Option<Decimal>,
    /// Mode-specific packaging.
    #[serde(flatten)]
    pub packaging: Packaging,
}

impl Product {
    /// Create a unit-based product.
    pub fn unit_based(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        cost_price: Money,
        margin_rate: Decimal,
        units_per_package: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: None,
            cost_price: Some(cost_price),
            margin_rate: Some(margin_rate),
            packaging: Packaging::Units {
                units_per_package: Some(units_per_package),
            },
        }
    }

    /// Create a weight-based product.
    pub fn weight_based(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        cost_price: Money,
        margin_rate: Decimal,
        reference_quantity: u32,
        unit_abbrev: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: None,
            cost_price: Some(cost_price),
            margin_rate: Some(margin_rate),
            packaging: Packaging::Weight {
                reference_quantity: Some(Decimal::from(reference_quantity)),
                unit_abbrev: unit_abbrev.into(),
            },
        }
    }

    /// Set the brand.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// The selling mode resolved at ingestion.
    pub fn selling_mode(&self) -> SellingMode {
        match self.packaging {
            Packaging::Units { .. } => SellingMode::UnitBased,
            Packaging::Weight { .. } => SellingMode::WeightBased,
        }
    }

    /// Display unit for weight products.
    pub fn unit_abbrev(&self) -> Option<&str> {
        match &self.packaging {
            Packaging::Units { .. } => None,
            Packaging::Weight { unit_abbrev, .. } => Some(unit_abbrev),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_classify_unit_words() {
        assert_eq!(
            SellingMode::classify(Some("Unidad"), None),
            SellingMode::UnitBased
        );
        assert_eq!(
            SellingMode::classify(Some(" UNIDADES "), Some("uds")),
            SellingMode::UnitBased
        );
        assert_eq!(SellingMode::classify(None, Some("u")), SellingMode::UnitBased);
        assert_eq!(
            SellingMode::classify(Some("media unidad"), None),
            SellingMode::UnitBased
        );
    }

    #[test]
    fn test_classify_weight_units() {
        assert_eq!(
            SellingMode::classify(Some("gramos"), Some("gr")),
            SellingMode::WeightBased
        );
        assert_eq!(
            SellingMode::classify(Some("mililitros"), Some("ml")),
            SellingMode::WeightBased
        );
        assert_eq!(SellingMode::classify(None, None), SellingMode::WeightBased);
    }

    #[test]
    fn test_abbrev_containing_unidad_is_not_enough() {
        // Only the name is checked for containment.
        assert_eq!(
            SellingMode::classify(Some("kilo"), Some("xunidadx")),
            SellingMode::WeightBased
        );
    }

    #[test]
    fn test_product_mode_follows_packaging() {
        let nuts = Product::weight_based(
            "nuts",
            "Almonds",
            Money::from_major(200, Currency::ARS),
            Decimal::new(50, 2),
            500,
            "gr",
        );
        assert_eq!(nuts.selling_mode(), SellingMode::WeightBased);
        assert_eq!(nuts.unit_abbrev(), Some("gr"));

        let eggs = Product::unit_based(
            "eggs",
            "Eggs",
            Money::from_major(100, Currency::ARS),
            Decimal::new(20, 2),
            4,
        );
        assert_eq!(eggs.selling_mode(), SellingMode::UnitBased);
        assert_eq!(eggs.unit_abbrev(), None);
    }
}
