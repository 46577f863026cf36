//! Builds order payloads from a cart.

use crate::cart::CartStore;
use crate::checkout::{Fulfilment, OrderLine, OrderPayload};
use crate::error::CommerceError;
use crate::ids::{OrderId, UserId};
use crate::money::Money;

/// Turns a cart into an [`OrderPayload`]. Never mutates the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutAssembler {
    shipping_fee: Money,
}

impl CheckoutAssembler {
    /// Create an assembler charging `shipping_fee` on delivery orders.
    pub fn new(shipping_fee: Money) -> Self {
        Self { shipping_fee }
    }

    pub fn shipping_fee(&self) -> Money {
        self.shipping_fee
    }

    /// Assemble the payload for `cart`.
    ///
    /// Returns an error if:
    /// - The cart has no lines
    /// - A delivery is missing a field
    /// - The shipping fee is in another currency than the cart
    /// - Arithmetic overflow would occur
    pub fn assemble(
        &self,
        cart: &CartStore,
        fulfilment: &Fulfilment,
        user_id: Option<&UserId>,
    ) -> Result<OrderPayload, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        fulfilment.validate()?;

        let currency = cart.currency();
        let lines = cart
            .lines()
            .iter()
            .map(OrderLine::from_cart_line)
            .collect::<Result<Vec<_>, _>>()?;
        let subtotal = Money::try_sum(lines.iter().map(|l| &l.line_total), currency)
            .ok_or(CommerceError::Overflow)?;

        let shipping_fee = if fulfilment.is_delivery() {
            self.shipping_fee
        } else {
            Money::zero(currency)
        };
        if shipping_fee.currency != currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: shipping_fee.currency.code().to_string(),
            });
        }
        let grand_total = subtotal
            .try_add(&shipping_fee)
            .ok_or(CommerceError::Overflow)?;

        let payload = OrderPayload {
            id: OrderId::generate(),
            user_id: user_id.cloned(),
            currency,
            lines,
            subtotal,
            shipping_fee,
            grand_total,
            fulfilment: fulfilment.clone(),
            item_count: cart.item_count(),
            created_at: current_timestamp(),
        };
        tracing::info!(
            order = %payload.id,
            lines = payload.lines.len(),
            total = %payload.grand_total,
            "order assembled"
        );
        Ok(payload)
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::checkout::{PaymentMethod, PriceBasis};
    use crate::money::Currency;
    use crate::pricing::PricingEngine;
    use rust_decimal::Decimal;

    fn cart() -> CartStore {
        let engine = PricingEngine::new(Currency::ARS);
        let mut cart = CartStore::new(Currency::ARS);
        let eggs = Product::unit_based(
            "eggs",
            "Huevos",
            Money::from_major(100, Currency::ARS),
            Decimal::new(20, 2),
            4,
        );
        let almonds = Product::weight_based(
            "almonds",
            "Almendras",
            Money::from_major(200, Currency::ARS),
            Decimal::new(50, 2),
            500,
            "gr",
        );
        cart.add_to_cart(&engine, &eggs, Some(6)).unwrap();
        cart.add_to_cart(&engine, &almonds, Some(250)).unwrap();
        cart
    }

    fn delivery() -> Fulfilment {
        Fulfilment::Delivery {
            phone: "1155550000".into(),
            street: "Av. Corrientes".into(),
            street_number: "1234".into(),
            between_streets: "Uruguay y Talcahuano".into(),
            payment: PaymentMethod::Cash,
        }
    }

    #[test]
    fn test_empty_cart_fails() {
        let assembler = CheckoutAssembler::new(Money::zero(Currency::ARS));
        let result = assembler.assemble(&CartStore::new(Currency::ARS), &Fulfilment::Pickup, None);
        assert!(matches!(result, Err(CommerceError::EmptyCart)));
    }

    #[test]
    fn test_pickup_payload() {
        let cart = cart();
        let assembler = CheckoutAssembler::new(Money::from_major(500, Currency::ARS));
        let user = UserId::new("7");
        let order = assembler.assemble(&cart, &Fulfilment::Pickup, Some(&user)).unwrap();

        assert_eq!(order.user_id, Some(user));
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.subtotal, Money::from_major(330, Currency::ARS));
        assert_eq!(order.shipping_fee, Money::zero(Currency::ARS));
        assert_eq!(order.grand_total, order.subtotal);
        assert_eq!(order.item_count, 7);

        let nuts = &order.lines[1];
        assert_eq!(nuts.display_name, "Almendras (250gr)");
        assert_eq!(nuts.price_basis, PriceBasis::PerHundred);
        assert_eq!(nuts.unit_abbrev.as_deref(), Some("gr"));
        assert_eq!(nuts.line_total, Money::from_major(150, Currency::ARS));

        // Cart untouched.
        assert_eq!(cart.unique_line_count(), 2);
    }

    #[test]
    fn test_delivery_adds_shipping_fee() {
        let assembler = CheckoutAssembler::new(Money::from_major(500, Currency::ARS));
        let order = assembler.assemble(&cart(), &delivery(), None).unwrap();

        assert_eq!(order.shipping_fee, Money::from_major(500, Currency::ARS));
        assert_eq!(order.grand_total, Money::from_major(830, Currency::ARS));
        assert_eq!(order.fulfilment.payment(), PaymentMethod::Cash);
    }

    #[test]
    fn test_incomplete_delivery_propagates() {
        let mut fulfilment = delivery();
        if let Fulfilment::Delivery { phone, .. } = &mut fulfilment {
            phone.clear();
        }
        let assembler = CheckoutAssembler::new(Money::zero(Currency::ARS));
        let result = assembler.assemble(&cart(), &fulfilment, None);
        assert!(matches!(result, Err(CommerceError::CheckoutIncomplete("phone"))));
    }

    #[test]
    fn test_shipping_fee_currency_must_match() {
        let assembler = CheckoutAssembler::new(Money::from_major(5, Currency::USD));
        let result = assembler.assemble(&cart(), &delivery(), None);
        assert!(matches!(result, Err(CommerceError::CurrencyMismatch { .. })));
    }
}
