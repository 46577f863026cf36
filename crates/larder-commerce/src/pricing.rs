//! Price derivation from cost, margin and packaging.
//!
//! The sale price is additive margin on cost: `cost + cost * margin_rate`.
//! It is then spread over the package: per unit for unit-based products,
//! per hundred (grams, millilitres, ...) for weight-based products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Packaging, Product};
use crate::money::{Currency, Money};

/// A pricing input that was absent or zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingInput {
    CostPrice,
    MarginRate,
    UnitsPerPackage,
    ReferenceQuantity,
}

/// Prices derived for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedPrices {
    /// Package price: cost plus margin.
    pub price_with_margin: Money,
    /// Set for unit-based products.
    pub price_per_unit: Option<Money>,
    /// Set for weight-based products.
    pub price_per_hundred: Option<Money>,
    /// Inputs that were missing and priced as zero.
    pub missing: Vec<PricingInput>,
}

impl DerivedPrices {
    /// The price a cart line snapshots: per unit or per hundred.
    pub fn sellable_price(&self) -> Money {
        self.price_per_unit
            .or(self.price_per_hundred)
            .unwrap_or(self.price_with_margin)
    }

    /// True when the sellable price is zero because inputs were missing.
    ///
    /// Callers show "price unavailable" in that case.
    pub fn is_unavailable(&self) -> bool {
        self.sellable_price().is_zero() && !self.missing.is_empty()
    }
}

/// Derives sellable prices. Stateless apart from the currency used for
/// products that carry no cost at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine {
    currency: Currency,
}

impl PricingEngine {
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Derive the prices for `product`. Never fails: missing inputs count as
    /// zero and are reported in [`DerivedPrices::missing`].
    pub fn derive_prices(&self, product: &Product) -> DerivedPrices {
        let currency = product
            .cost_price
            .map(|c| c.currency)
            .unwrap_or(self.currency);
        let mut missing = Vec::new();

        let cost = match product.cost_price {
            Some(cost) if !cost.is_zero() => cost.to_decimal(),
            _ => {
                missing.push(PricingInput::CostPrice);
                Decimal::ZERO
            }
        };
        let margin = product.margin_rate.unwrap_or_else(|| {
            missing.push(PricingInput::MarginRate);
            Decimal::ZERO
        });
        let with_margin = cost
            .checked_mul(margin)
            .and_then(|markup| cost.checked_add(markup))
            .unwrap_or_else(|| {
                tracing::warn!(product = %product.id, %cost, %margin, "margin overflows; pricing at zero");
                missing.push(PricingInput::MarginRate);
                Decimal::ZERO
            });

        let (per_unit, per_hundred) = match &product.packaging {
            Packaging::Units { units_per_package } => {
                let price = units_per_package
                    .filter(|&u| u > 0)
                    .and_then(|u| with_margin.checked_div(Decimal::from(u)))
                    .unwrap_or_else(|| {
                        missing.push(PricingInput::UnitsPerPackage);
                        Decimal::ZERO
                    });
                (Some(price), None)
            }
            Packaging::Weight {
                reference_quantity, ..
            } => {
                // A tiny reference quantity can round to zero hundreds.
                let hundreds = reference_quantity
                    .filter(|q| q.is_sign_positive() && !q.is_zero())
                    .and_then(|q| q.checked_div(Decimal::ONE_HUNDRED))
                    .filter(|h| !h.is_zero());
                let price = match hundreds.and_then(|h| with_margin.checked_div(h)) {
                    Some(price) => price,
                    None => {
                        if hundreds.is_some() {
                            tracing::warn!(product = %product.id, reference = ?reference_quantity, "price per hundred overflows; pricing at zero");
                        }
                        missing.push(PricingInput::ReferenceQuantity);
                        Decimal::ZERO
                    }
                };
                (None, Some(price))
            }
        };

        let to_money = |amount: Decimal| {
            Money::from_decimal(amount, currency).unwrap_or_else(|| {
                tracing::warn!(product = %product.id, %amount, "derived price out of range");
                Money::zero(currency)
            })
        };

        let prices = DerivedPrices {
            price_with_margin: to_money(with_margin),
            price_per_unit: per_unit.map(to_money),
            price_per_hundred: per_hundred.map(to_money),
            missing,
        };
        if prices.is_unavailable() {
            tracing::debug!(product = %product.id, missing = ?prices.missing, "price unavailable");
        }
        prices
    }
}

/// Format a margin rate as an Argentine-style percentage (`0.155` → `15,50%`).
pub fn format_margin(rate: Decimal) -> String {
    match rate.checked_mul(Decimal::ONE_HUNDRED) {
        Some(percent) => format!("{:.2}%", percent.round_dp(2)).replace('.', ","),
        None => format!("{}x", rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;

    fn ars(major: i64) -> Money {
        Money::from_major(major, Currency::ARS)
    }

    #[test]
    fn test_unit_based_price_per_unit() {
        let product = Product::unit_based("eggs", "Eggs", ars(100), Decimal::new(20, 2), 4);
        let prices = PricingEngine::default().derive_prices(&product);

        assert_eq!(prices.price_with_margin, ars(120));
        assert_eq!(prices.price_per_unit, Some(ars(30)));
        assert_eq!(prices.price_per_hundred, None);
        assert!(prices.missing.is_empty());
        assert!(!prices.is_unavailable());
    }

    #[test]
    fn test_weight_based_price_per_hundred() {
        let product =
            Product::weight_based("nuts", "Almonds", ars(200), Decimal::new(50, 2), 500, "gr");
        let prices = PricingEngine::default().derive_prices(&product);

        assert_eq!(prices.price_with_margin, ars(300));
        assert_eq!(prices.price_per_hundred, Some(ars(60)));
        assert_eq!(prices.price_per_unit, None);
        assert_eq!(prices.sellable_price(), ars(60));
    }

    #[test]
    fn test_margin_is_additive_not_divisive() {
        // cost / (1 - 0.5) would be 200; additive is 150.
        let product = Product::unit_based("x", "X", ars(100), Decimal::new(5, 1), 1);
        let prices = PricingEngine::default().derive_prices(&product);
        assert_eq!(prices.price_per_unit, Some(ars(150)));
    }

    #[test]
    fn test_missing_cost_prices_zero_and_flags_unavailable() {
        let mut product = Product::unit_based("x", "X", ars(0), Decimal::new(3, 1), 6);
        product.cost_price = None;

        let prices = PricingEngine::new(Currency::ARS).derive_prices(&product);
        assert_eq!(prices.price_per_unit, Some(Money::zero(Currency::ARS)));
        assert_eq!(prices.missing, vec![PricingInput::CostPrice]);
        assert!(prices.is_unavailable());
    }

    #[test]
    fn test_zero_divisor_prices_zero() {
        let mut product = Product::unit_based("x", "X", ars(100), Decimal::ZERO, 0);
        let prices = PricingEngine::default().derive_prices(&product);
        assert_eq!(prices.price_per_unit, Some(Money::zero(Currency::ARS)));
        assert_eq!(prices.missing, vec![PricingInput::UnitsPerPackage]);

        product.packaging = Packaging::Weight {
            reference_quantity: None,
            unit_abbrev: "ml".into(),
        };
        let prices = PricingEngine::default().derive_prices(&product);
        assert_eq!(prices.price_per_hundred, Some(Money::zero(Currency::ARS)));
        assert_eq!(prices.missing, vec![PricingInput::ReferenceQuantity]);
        assert!(prices.is_unavailable());
    }

    #[test]
    fn test_vanishing_reference_quantity_prices_zero() {
        let mut product =
            Product::weight_based("saffron", "Azafran", ars(500), Decimal::new(10, 2), 100, "gr");
        product.packaging = Packaging::Weight {
            reference_quantity: Some(Decimal::new(1, 28)),
            unit_abbrev: "gr".into(),
        };

        let prices = PricingEngine::default().derive_prices(&product);
        assert_eq!(prices.price_per_hundred, Some(Money::zero(Currency::ARS)));
        assert_eq!(prices.missing, vec![PricingInput::ReferenceQuantity]);
        assert!(prices.is_unavailable());
    }

    #[test]
    fn test_overflowing_margin_prices_zero() {
        let margin = Decimal::from(10_000_000_000_000_000_000u64) * Decimal::TEN;
        let product = Product::unit_based("x", "X", ars(1_000_000_000), margin, 1);

        let prices = PricingEngine::default().derive_prices(&product);
        assert_eq!(prices.price_with_margin, Money::zero(Currency::ARS));
        assert_eq!(prices.price_per_unit, Some(Money::zero(Currency::ARS)));
        assert_eq!(prices.missing, vec![PricingInput::MarginRate]);
        assert!(prices.is_unavailable());
    }

    #[test]
    fn test_missing_margin_prices_at_cost() {
        let mut product = Product::unit_based("x", "X", ars(90), Decimal::ZERO, 3);
        product.margin_rate = None;

        let prices = PricingEngine::default().derive_prices(&product);
        assert_eq!(prices.price_per_unit, Some(ars(30)));
        assert_eq!(prices.missing, vec![PricingInput::MarginRate]);
        assert!(!prices.is_unavailable());
    }

    #[test]
    fn test_rounds_once_to_cents() {
        // 10 * 1.10 / 3 = 3.666.. -> 3.67
        let product = Product::unit_based("x", "X", ars(10), Decimal::new(10, 2), 3);
        let prices = PricingEngine::default().derive_prices(&product);
        assert_eq!(prices.price_per_unit, Some(Money::new(367, Currency::ARS)));
    }

    #[test]
    fn test_format_margin() {
        assert_eq!(format_margin(Decimal::new(155, 3)), "15,50%");
        assert_eq!(format_margin(Decimal::new(3, 1)), "30,00%");
        assert_eq!(format_margin(Decimal::ZERO), "0,00%");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Price law: per unit == (cost + cost * margin) / units.
            #[test]
            fn price_per_unit_law(
                cost_cents in 0i64..100_000_000,
                margin_bp in 0i64..50_000,
                units in 1u32..1_000,
            ) {
                let cost = Money::new(cost_cents, Currency::ARS);
                let margin = Decimal::new(margin_bp, 4);
                let product = Product::unit_based(ProductId::new("p"), "P", cost, margin, units);

                let prices = PricingEngine::default().derive_prices(&product);
                let c = cost.to_decimal();
                let expected = Money::from_decimal((c + c * margin) / Decimal::from(units), Currency::ARS);
                prop_assert_eq!(prices.price_per_unit, expected);
            }

            /// Price law: per hundred == (cost + cost * margin) / (reference / 100).
            #[test]
            fn price_per_hundred_law(
                cost_cents in 0i64..100_000_000,
                margin_bp in 0i64..50_000,
                reference in 100u32..10_000,
            ) {
                let cost = Money::new(cost_cents, Currency::ARS);
                let margin = Decimal::new(margin_bp, 4);
                let product = Product::weight_based("p", "P", cost, margin, reference, "gr");

                let prices = PricingEngine::default().derive_prices(&product);
                let c = cost.to_decimal();
                let hundreds = Decimal::from(reference) / Decimal::ONE_HUNDRED;
                let expected = Money::from_decimal((c + c * margin) / hundreds, Currency::ARS);
                prop_assert_eq!(prices.price_per_hundred, expected);
            }
        }
    }
}
