//! Raw catalog records and the in-memory catalog.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Packaging, Product, SellingMode, DEFAULT_WEIGHT_ABBREV};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// A product record as returned by the external catalog API.
///
/// Every pricing input is optional; absent inputs price at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    /// Cost in major currency units.
    #[serde(default)]
    pub cost_price: Option<Decimal>,
    #[serde(default)]
    pub margin_rate: Option<Decimal>,
    #[serde(default)]
    pub unit_name: Option<String>,
    #[serde(default)]
    pub unit_abbrev: Option<String>,
    #[serde(default)]
    pub units_per_package: Option<u32>,
    #[serde(default)]
    pub reference_quantity: Option<Decimal>,
}

impl Product {
    /// Ingest a catalog record, resolving its selling mode.
    pub fn from_record(record: CatalogRecord, currency: Currency) -> Result<Self, CommerceError> {
        if record.id.as_str().trim().is_empty() {
            return Err(CommerceError::InvalidCatalog(format!(
                "product {:?} has an empty id",
                record.name
            )));
        }
        if record.cost_price.is_some_and(|c| c.is_sign_negative() && !c.is_zero()) {
            return Err(CommerceError::InvalidCatalog(format!(
                "product {} has a negative cost price",
                record.id
            )));
        }
        if record.margin_rate.is_some_and(|m| m.is_sign_negative() && !m.is_zero()) {
            return Err(CommerceError::InvalidCatalog(format!(
                "product {} has a negative margin rate",
                record.id
            )));
        }

        let cost_price = match record.cost_price {
            Some(cost) => Some(Money::from_decimal(cost, currency).ok_or(CommerceError::Overflow)?),
            None => None,
        };

        let mode = SellingMode::classify(record.unit_name.as_deref(), record.unit_abbrev.as_deref());
        let packaging = match mode {
            SellingMode::UnitBased => Packaging::Units {
                units_per_package: record.units_per_package,
            },
            SellingMode::WeightBased => Packaging::Weight {
                reference_quantity: record.reference_quantity,
                unit_abbrev: record
                    .unit_abbrev
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| DEFAULT_WEIGHT_ABBREV.to_string()),
            },
        };

        Ok(Self {
            id: record.id,
            name: record.name,
            brand: record.brand,
            cost_price,
            margin_rate: record.margin_rate,
            packaging,
        })
    }
}

/// Products keyed by id, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    currency: Currency,
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from external records.
    pub fn from_records(
        records: impl IntoIterator<Item = CatalogRecord>,
        currency: Currency,
    ) -> Result<Self, CommerceError> {
        let mut catalog = Self {
            currency,
            ..Self::default()
        };
        for record in records {
            let product = Product::from_record(record, currency)?;
            if catalog.index.contains_key(&product.id) {
                return Err(CommerceError::InvalidCatalog(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
            catalog.index.insert(product.id.clone(), catalog.products.len());
            catalog.products.push(product);
        }
        tracing::debug!(products = catalog.products.len(), "catalog ingested");
        Ok(catalog)
    }

    /// Parse a JSON array of records.
    pub fn from_json(json: &str, currency: Currency) -> Result<Self, CommerceError> {
        let records: Vec<CatalogRecord> = serde_json::from_str(json)
            .map_err(|e| CommerceError::InvalidCatalog(e.to_string()))?;
        Self::from_records(records, currency)
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|&i| self.products.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {
            "id": "eggs",
            "name": "Huevos",
            "brand": "Granja Sur",
            "cost_price": 100,
            "margin_rate": "0.20",
            "unit_name": "Unidades",
            "unit_abbrev": "u",
            "units_per_package": 4
        },
        {
            "id": "almonds",
            "name": "Almendras",
            "cost_price": 200.0,
            "margin_rate": 0.5,
            "unit_name": "Gramos",
            "unit_abbrev": "gr",
            "reference_quantity": 500
        },
        {
            "id": "mystery",
            "name": "Sin datos"
        }
    ]"#;

    #[test]
    fn test_from_json_resolves_modes() {
        let catalog = Catalog::from_json(CATALOG, Currency::ARS).unwrap();
        assert_eq!(catalog.len(), 3);

        let eggs = catalog.get(&ProductId::new("eggs")).unwrap();
        assert_eq!(eggs.selling_mode(), SellingMode::UnitBased);
        assert_eq!(eggs.cost_price, Some(Money::from_major(100, Currency::ARS)));
        assert_eq!(eggs.brand.as_deref(), Some("Granja Sur"));

        let almonds = catalog.get(&ProductId::new("almonds")).unwrap();
        assert_eq!(almonds.selling_mode(), SellingMode::WeightBased);
        assert_eq!(almonds.unit_abbrev(), Some("gr"));
    }

    #[test]
    fn test_missing_unit_defaults_to_weight_with_gr() {
        let catalog = Catalog::from_json(CATALOG, Currency::ARS).unwrap();
        let mystery = catalog.get(&ProductId::new("mystery")).unwrap();

        assert_eq!(mystery.selling_mode(), SellingMode::WeightBased);
        assert_eq!(mystery.unit_abbrev(), Some(DEFAULT_WEIGHT_ABBREV));
        assert_eq!(mystery.cost_price, None);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let records = vec![
            CatalogRecord {
                id: ProductId::new("a"),
                name: "A".into(),
                ..Default::default()
            },
            CatalogRecord {
                id: ProductId::new("a"),
                name: "A again".into(),
                ..Default::default()
            },
        ];
        let result = Catalog::from_records(records, Currency::ARS);
        assert!(matches!(result, Err(CommerceError::InvalidCatalog(_))));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let record = CatalogRecord {
            id: ProductId::new("neg"),
            name: "Negative".into(),
            cost_price: Some(Decimal::new(-1, 0)),
            ..Default::default()
        };
        assert!(Product::from_record(record, Currency::ARS).is_err());
    }

    #[test]
    fn test_malformed_json_is_invalid_catalog() {
        let result = Catalog::from_json("{not json", Currency::ARS);
        assert!(matches!(result, Err(CommerceError::InvalidCatalog(_))));
    }
}
