//! Cart line types.

use serde::{Deserialize, Serialize};

use crate::cart::{UnitCount, WeightAmount};
use crate::catalog::SellingMode;
use crate::error::CommerceError;
use crate::ids::{LineId, ProductId};
use crate::money::Money;

/// Mode-specific quantity of a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "selling_mode")]
pub enum LineQuantity {
    /// Discrete items; the unit price is per item.
    #[serde(rename = "unit_based")]
    Units { quantity: UnitCount },
    /// Weight or volume; the unit price is per hundred.
    #[serde(rename = "weight_based")]
    Weight {
        quantity: WeightAmount,
        unit_abbrev: String,
        /// Amount requested by the most recent add, before clamping.
        /// A re-add without quantity repeats it.
        #[serde(default)]
        last_added: Option<u32>,
    },
}

/// One row in the cart, unique per product and selling mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "line_id")]
    pub id: LineId,
    pub product_id: ProductId,
    /// Product name, denormalized for display.
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    /// Price captured when the line was created. Never refreshed.
    pub unit_price: Money,
    #[serde(flatten)]
    pub quantity: LineQuantity,
}

impl CartLine {
    /// Create a unit-based line.
    pub fn units(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        quantity: UnitCount,
    ) -> Self {
        Self {
            id: LineId::generate(),
            product_id,
            name: name.into(),
            brand: None,
            unit_price,
            quantity: LineQuantity::Units { quantity },
        }
    }

    /// Create a weight-based line priced per hundred `unit_abbrev`.
    pub fn weight(
        product_id: ProductId,
        name: impl Into<String>,
        price_per_hundred: Money,
        quantity: WeightAmount,
        unit_abbrev: impl Into<String>,
    ) -> Self {
        Self {
            id: LineId::generate(),
            product_id,
            name: name.into(),
            brand: None,
            unit_price: price_per_hundred,
            quantity: LineQuantity::Weight {
                quantity,
                unit_abbrev: unit_abbrev.into(),
                last_added: Some(quantity.get()),
            },
        }
    }

    pub fn selling_mode(&self) -> SellingMode {
        match self.quantity {
            LineQuantity::Units { .. } => SellingMode::UnitBased,
            LineQuantity::Weight { .. } => SellingMode::WeightBased,
        }
    }

    /// Unit count or weight amount.
    pub fn quantity_value(&self) -> u32 {
        match &self.quantity {
            LineQuantity::Units { quantity } => quantity.get(),
            LineQuantity::Weight { quantity, .. } => quantity.get(),
        }
    }

    pub fn unit_abbrev(&self) -> Option<&str> {
        match &self.quantity {
            LineQuantity::Units { .. } => None,
            LineQuantity::Weight { unit_abbrev, .. } => Some(unit_abbrev),
        }
    }

    /// Line total from the snapshot price.
    ///
    /// Unit lines multiply by the count; weight lines scale by
    /// `quantity / 100`, rounded once to the minor unit.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        let total = match &self.quantity {
            LineQuantity::Units { quantity } => {
                self.unit_price.try_multiply(i64::from(quantity.get()))
            }
            LineQuantity::Weight { quantity, .. } => {
                self.unit_price.try_scale(i64::from(quantity.get()), 100)
            }
        };
        total.ok_or(CommerceError::Overflow)
    }

    /// Name with the quantity suffix for weight lines, e.g. `Almendras (250gr)`.
    pub fn display_name(&self) -> String {
        match &self.quantity {
            LineQuantity::Units { .. } => self.name.clone(),
            LineQuantity::Weight {
                quantity,
                unit_abbrev,
                ..
            } => format!("{} ({}{})", self.name, quantity.get(), unit_abbrev),
        }
    }

    /// Whether this line holds `product_id` sold as `mode`.
    pub fn matches(&self, product_id: &ProductId, mode: SellingMode) -> bool {
        &self.product_id == product_id && self.selling_mode() == mode
    }
}
