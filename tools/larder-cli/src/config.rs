//! CLI configuration.

use anyhow::{anyhow, Context, Result};
use larder_commerce::{Currency, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// File names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["larder.toml", ".larder.toml", "larder.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LarderConfig {
    /// Persistence configuration.
    #[serde(default)]
    pub store: StoreConfig,

    /// Pricing configuration.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Checkout configuration.
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl LarderConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(&content, path.ends_with(".json"))
            .with_context(|| format!("Failed to parse config file: {}", path))
    }

    fn parse(content: &str, json: bool) -> Result<Self> {
        if json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(toml::from_str(content)?)
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Configured currency.
    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.pricing.currency)
            .ok_or_else(|| anyhow!("Unknown currency code: {}", self.pricing.currency))
    }

    /// Flat delivery fee in the configured currency.
    pub fn shipping_fee(&self) -> Result<Money> {
        let currency = self.currency()?;
        Money::from_decimal(self.checkout.shipping_fee, currency)
            .ok_or_else(|| anyhow!("Shipping fee out of range: {}", self.checkout.shipping_fee))
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding carts and session state.
    #[serde(default = "default_store_dir")]
    pub dir: String,
}

fn default_store_dir() -> String {
    ".larder".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}

/// Pricing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "ARS".to_string()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

/// Checkout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Flat fee charged on delivery orders, in major units.
    #[serde(default)]
    pub shipping_fee: Decimal,

    /// Directory submitted orders are written to.
    #[serde(default = "default_outbox")]
    pub outbox: String,
}

fn default_outbox() -> String {
    ".larder/outbox".to_string()
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            shipping_fee: Decimal::ZERO,
            outbox: default_outbox(),
        }
    }
}

/// Catalog source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON file with an array of catalog records.
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

fn default_catalog_path() -> String {
    "catalog.json".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// Generate a default larder.toml config file.
pub fn generate_default_config() -> String {
    r#"# Larder configuration

[store]
dir = ".larder"

[pricing]
currency = "ARS"

[checkout]
# Flat fee for delivery orders, in major units
shipping_fee = 0
outbox = ".larder/outbox"

[catalog]
path = "catalog.json"
"#
    .to_string()
}
