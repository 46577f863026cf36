//! Catalog module.
//!
//! Ingests product records from the external catalog API and resolves each
//! product's selling mode once, at ingestion time.

mod product;
mod record;

pub use product::{Packaging, Product, SellingMode, DEFAULT_WEIGHT_ABBREV};
pub use record::{Catalog, CatalogRecord};
