//! Order payload types.

use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::catalog::SellingMode;
use crate::checkout::Fulfilment;
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId, UserId};
use crate::money::{Currency, Money};

/// What the unit price of an order line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    PerUnit,
    PerHundred,
}

impl PriceBasis {
    pub fn for_mode(mode: SellingMode) -> Self {
        match mode {
            SellingMode::UnitBased => PriceBasis::PerUnit,
            SellingMode::WeightBased => PriceBasis::PerHundred,
        }
    }
}

/// One resolved line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    /// Name with quantity suffix for weight lines.
    pub display_name: String,
    pub selling_mode: SellingMode,
    /// Unit count or weight amount.
    pub quantity: u32,
    /// Set for weight lines.
    pub unit_abbrev: Option<String>,
    pub price_basis: PriceBasis,
    pub unit_price: Money,
    pub line_total: Money,
}

impl OrderLine {
    /// Resolve a cart line.
    pub fn from_cart_line(line: &CartLine) -> Result<Self, CommerceError> {
        let mode = line.selling_mode();
        Ok(Self {
            product_id: line.product_id.clone(),
            display_name: line.display_name(),
            selling_mode: mode,
            quantity: line.quantity_value(),
            unit_abbrev: line.unit_abbrev().map(str::to_string),
            price_basis: PriceBasis::for_mode(mode),
            unit_price: line.unit_price,
            line_total: line.line_total()?,
        })
    }
}

/// Everything the external order API needs to place an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub id: OrderId,
    /// Authenticated customer, if any.
    pub user_id: Option<UserId>,
    pub currency: Currency,
    pub lines: Vec<OrderLine>,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Flat fee, charged for delivery only.
    pub shipping_fee: Money,
    pub grand_total: Money,
    pub fulfilment: Fulfilment,
    /// Badge count of the cart at assembly.
    pub item_count: u64,
    /// Unix timestamp of assembly.
    pub created_at: i64,
}

/// Acknowledgement from the order API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    /// Reference issued by the receiving side.
    pub reference: String,
}

/// The external order API.
pub trait OrderGateway {
    /// Submit an order. An error leaves the cart untouched.
    fn submit(&self, order: &OrderPayload) -> Result<OrderReceipt, CommerceError>;
}
