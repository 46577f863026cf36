//! The cart of one owner.

use serde::{Deserialize, Serialize};

use crate::cart::{
    parse_quantity, CartLine, LineQuantity, UnitCount, WeightAmount, DEFAULT_WEIGHT,
    MAX_WEIGHT_PER_LINE, MIN_UNITS, MIN_WEIGHT,
};
use crate::catalog::{Packaging, Product, SellingMode};
use crate::error::CommerceError;
use crate::ids::{LineId, ProductId};
use crate::money::{Currency, Money};
use crate::pricing::PricingEngine;

/// Absorb an operation on a line that is not in the cart.
fn unknown_line(line_id: &LineId, action: &'static str) -> bool {
    let err = CommerceError::UnknownLine(line_id.clone());
    tracing::debug!(%err, action, "ignored");
    false
}

/// Requested weight kept for the next re-add, capped at the line maximum.
fn remembered_amount(amount: i64) -> u32 {
    u32::try_from(amount.clamp(0, i64::from(MAX_WEIGHT_PER_LINE))).unwrap_or(MAX_WEIGHT_PER_LINE)
}

/// Ordered cart lines, at most one per product and selling mode.
///
/// Quantity and lookup problems are absorbed here: bad quantities are
/// clamped and unknown line ids are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartStore {
    currency: Currency,
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            lines: Vec::new(),
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Add `product`, or grow its existing line.
    ///
    /// `requested` defaults to 1 for unit products. For weight products it
    /// defaults to 100 on a new line, and to the amount added last time on
    /// an existing one. Non-positive requests count as absent.
    pub fn add_to_cart(
        &mut self,
        engine: &PricingEngine,
        product: &Product,
        requested: Option<i64>,
    ) -> Result<LineId, CommerceError> {
        let requested = requested.filter(|&q| {
            let valid = q > 0;
            if !valid {
                tracing::debug!(product = %product.id, quantity = q, "ignoring non-positive add quantity");
            }
            valid
        });
        let mode = product.selling_mode();

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.matches(&product.id, mode))
        {
            match &mut line.quantity {
                LineQuantity::Units { quantity } => {
                    let amount = requested.unwrap_or(1);
                    *quantity = UnitCount::commit(i64::from(quantity.get()).saturating_add(amount));
                }
                LineQuantity::Weight {
                    quantity,
                    last_added,
                    ..
                } => {
                    let amount = requested
                        .unwrap_or_else(|| i64::from(last_added.unwrap_or(DEFAULT_WEIGHT)));
                    *quantity = WeightAmount::commit(i64::from(quantity.get()).saturating_add(amount));
                    *last_added = Some(remembered_amount(amount));
                }
            }
            tracing::debug!(line = %line.id, product = %product.id, quantity = line.quantity_value(), "line grown");
            return Ok(line.id.clone());
        }

        let price = engine.derive_prices(product).sellable_price();
        if price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: price.currency.code().to_string(),
            });
        }

        let mut line = match &product.packaging {
            Packaging::Units { .. } => CartLine::units(
                product.id.clone(),
                product.name.clone(),
                price,
                UnitCount::commit(requested.unwrap_or(1)),
            ),
            Packaging::Weight { unit_abbrev, .. } => CartLine::weight(
                product.id.clone(),
                product.name.clone(),
                price,
                WeightAmount::commit(requested.unwrap_or(i64::from(DEFAULT_WEIGHT))),
                unit_abbrev.clone(),
            ),
        };
        line.brand = product.brand.clone();
        if let (LineQuantity::Weight { last_added, .. }, Some(amount)) = (&mut line.quantity, requested) {
            *last_added = Some(remembered_amount(amount));
        }

        let id = line.id.clone();
        tracing::debug!(line = %id, product = %product.id, quantity = line.quantity_value(), "line added");
        self.lines.push(line);
        Ok(id)
    }

    /// Set a line's quantity, clamped for its mode.
    ///
    /// A unit line set to zero or less is removed. Returns false when the
    /// line does not exist.
    pub fn update_quantity(&mut self, line_id: &LineId, quantity: i64) -> bool {
        let Some(index) = self.lines.iter().position(|l| &l.id == line_id) else {
            return unknown_line(line_id, "update");
        };
        if quantity <= 0 && self.lines[index].selling_mode() == SellingMode::UnitBased {
            return self.remove_line(line_id);
        }

        let line = &mut self.lines[index];
        match &mut line.quantity {
            LineQuantity::Units { quantity: current } => *current = UnitCount::commit(quantity),
            LineQuantity::Weight {
                quantity: current, ..
            } => *current = WeightAmount::commit(quantity),
        }
        tracing::debug!(line = %line_id, quantity = line.quantity_value(), "line quantity set");
        true
    }

    /// Set a line's quantity from typed text.
    ///
    /// Text that does not parse sets the minimum for the line's mode.
    pub fn set_quantity_text(&mut self, line_id: &LineId, text: &str) -> bool {
        let Some(mode) = self.line(line_id).map(CartLine::selling_mode) else {
            return unknown_line(line_id, "update");
        };
        let quantity = parse_quantity(text).unwrap_or_else(|err| {
            tracing::debug!(line = %line_id, %err, "clamping invalid quantity");
            match mode {
                SellingMode::UnitBased => i64::from(MIN_UNITS),
                SellingMode::WeightBased => i64::from(MIN_WEIGHT),
            }
        });
        self.update_quantity(line_id, quantity)
    }

    /// Step a line up by 1 unit or 5 weight units.
    pub fn increment(&mut self, line_id: &LineId) -> bool {
        self.step(line_id, true)
    }

    /// Step a line down, never below its minimum.
    pub fn decrement(&mut self, line_id: &LineId) -> bool {
        self.step(line_id, false)
    }

    fn step(&mut self, line_id: &LineId, up: bool) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| &l.id == line_id) else {
            return unknown_line(line_id, "step");
        };
        match &mut line.quantity {
            LineQuantity::Units { quantity } => {
                *quantity = if up { quantity.step_up() } else { quantity.step_down() };
            }
            LineQuantity::Weight { quantity, .. } => {
                *quantity = if up { quantity.step_up() } else { quantity.step_down() };
            }
        }
        true
    }

    /// Remove a line. Returns false if it was not there.
    pub fn remove_line(&mut self, line_id: &LineId) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| &l.id != line_id);
        if self.lines.len() == len_before {
            return unknown_line(line_id, "remove");
        }
        tracing::debug!(line = %line_id, "line removed");
        true
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals at snapshot prices.
    pub fn total(&self) -> Result<Money, CommerceError> {
        let totals = self
            .lines
            .iter()
            .map(CartLine::line_total)
            .collect::<Result<Vec<_>, _>>()?;
        Money::try_sum(totals.iter(), self.currency).ok_or(CommerceError::Overflow)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Badge count: unit counts plus one per weight line.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|l| match &l.quantity {
                LineQuantity::Units { quantity } => u64::from(quantity.get()),
                LineQuantity::Weight { .. } => 1,
            })
            .sum()
    }

    pub fn unique_line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, line_id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == line_id)
    }

    pub fn line_for(&self, product_id: &ProductId, mode: SellingMode) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.matches(product_id, mode))
    }

    /// Fold `pending` into this cart.
    ///
    /// Colliding lines sum their quantities and keep this cart's snapshot
    /// price. Other pending lines are appended unchanged, except for a
    /// fresh id when theirs is already taken.
    pub fn merge_from(&mut self, pending: CartStore) -> Result<(), CommerceError> {
        if pending.currency != self.currency && !pending.is_empty() {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: pending.currency.code().to_string(),
            });
        }

        for mut incoming in pending.lines {
            let mode = incoming.selling_mode();
            if let Some(existing) = self
                .lines
                .iter_mut()
                .find(|l| l.matches(&incoming.product_id, mode))
            {
                match (&mut existing.quantity, &incoming.quantity) {
                    (LineQuantity::Units { quantity }, LineQuantity::Units { quantity: extra }) => {
                        *quantity = quantity.plus(extra.get());
                    }
                    (
                        LineQuantity::Weight { quantity, .. },
                        LineQuantity::Weight { quantity: extra, .. },
                    ) => {
                        *quantity = quantity.plus(extra.get());
                    }
                    // Same selling mode on both sides by construction.
                    _ => {}
                }
                tracing::debug!(line = %existing.id, quantity = existing.quantity_value(), "merged colliding line");
                continue;
            }

            if self.lines.iter().any(|l| l.id == incoming.id) {
                incoming.id = LineId::generate();
            }
            self.lines.push(incoming);
        }
        Ok(())
    }
}
