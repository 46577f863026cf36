//! Cart, pricing and checkout core for Larder.
//!
//! This crate holds the commerce rules of a bulk-goods shop that sells some
//! products by the unit and others by weight:
//!
//! - **Catalog**: product records and the selling mode each one resolves to
//! - **Pricing**: additive margin on cost, per unit or per hundred grams
//! - **Cart**: quantity rules, snapshot-priced lines, the per-owner cart store
//! - **Identity**: guest and user carts, merged once on login
//! - **Checkout**: order payload assembly and submission
//!
//! # Example
//!
//! ```rust
//! use larder_commerce::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let engine = PricingEngine::new(Currency::ARS);
//! let almonds = Product::weight_based(
//!     "almonds",
//!     "Almendras",
//!     Money::from_major(200, Currency::ARS),
//!     Decimal::new(50, 2),
//!     500,
//!     "gr",
//! );
//!
//! let mut cart = CartStore::new(Currency::ARS);
//! cart.add_to_cart(&engine, &almonds, Some(247)).unwrap();
//!
//! assert_eq!(cart.lines()[0].display_name(), "Almendras (245gr)");
//! assert_eq!(cart.total().unwrap().display(), "$147,00");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod identity;
pub mod pricing;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, CatalogRecord, Packaging, Product, SellingMode};

    // Pricing
    pub use crate::pricing::{format_margin, DerivedPrices, PricingEngine, PricingInput};

    // Cart
    pub use crate::cart::{
        CartLine, CartStore, LineQuantity, UnitCount, WeightAmount, WeightDraft,
    };

    // Identity
    #[cfg(feature = "storage")]
    pub use crate::identity::CacheRepository;
    pub use crate::identity::{CartRepository, IdentityLedger, MemoryRepository, OwnerKey};

    // Checkout
    pub use crate::checkout::{
        CheckoutAssembler, Fulfilment, OrderGateway, OrderLine, OrderPayload, OrderReceipt,
        PaymentMethod, PriceBasis,
    };
}
