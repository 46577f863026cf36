//! How an order reaches the customer and how it is paid.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;

/// Payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid at the counter on pickup.
    InStore,
    /// Cash on delivery.
    Cash,
    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::InStore => "in_store",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::InStore => "Pago en local",
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::Transfer => "Transferencia",
        }
    }
}

/// Pickup at the store, or delivery to an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Fulfilment {
    Pickup,
    Delivery {
        phone: String,
        street: String,
        street_number: String,
        between_streets: String,
        payment: PaymentMethod,
    },
}

impl Fulfilment {
    /// Payment method; pickup is always paid in store.
    pub fn payment(&self) -> PaymentMethod {
        match self {
            Fulfilment::Pickup => PaymentMethod::InStore,
            Fulfilment::Delivery { payment, .. } => *payment,
        }
    }

    pub fn is_delivery(&self) -> bool {
        matches!(self, Fulfilment::Delivery { .. })
    }

    /// Check that a delivery has every field it needs.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let Fulfilment::Delivery {
            phone,
            street,
            street_number,
            between_streets,
            payment,
        } = self
        else {
            return Ok(());
        };

        for (field, value) in [
            ("phone", phone),
            ("street", street),
            ("street_number", street_number),
            ("between_streets", between_streets),
        ] {
            if value.trim().is_empty() {
                return Err(CommerceError::CheckoutIncomplete(field));
            }
        }
        if *payment == PaymentMethod::InStore {
            return Err(CommerceError::CheckoutIncomplete("payment"));
        }
        Ok(())
    }
}
