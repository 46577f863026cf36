//! Price listing.

use anyhow::{bail, Result};
use larder_commerce::catalog::{Product, SellingMode};
use larder_commerce::pricing::{format_margin, DerivedPrices};
use larder_commerce::ProductId;
use serde::Serialize;

use super::PriceArgs;
use crate::context::Context;
use crate::output::unavailable_badge;

#[derive(Serialize)]
struct PriceRow<'a> {
    product: &'a Product,
    prices: DerivedPrices,
    unavailable: bool,
}

/// Run the price command.
pub fn run(args: PriceArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let engine = ctx.engine()?;

    let products: Vec<&Product> = match &args.product {
        Some(id) => match catalog.get(&ProductId::new(id.as_str())) {
            Some(product) => vec![product],
            None => bail!("Unknown product: {}", id),
        },
        None => catalog.iter().collect(),
    };

    let rows: Vec<PriceRow> = products
        .into_iter()
        .map(|product| {
            let prices = engine.derive_prices(product);
            let unavailable = prices.is_unavailable();
            PriceRow {
                product,
                prices,
                unavailable,
            }
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header(&format!("Prices ({} products)", rows.len()));
    let widths = [14, 28, 8, 16];
    ctx.output
        .table_row(&["ID", "NAME", "MARGIN", "PRICE"], &widths);
    for row in &rows {
        let margin = row
            .product
            .margin_rate
            .map(format_margin)
            .unwrap_or_else(|| "-".to_string());
        let price = if row.unavailable {
            unavailable_badge()
        } else {
            price_label(row.product, &row.prices)
        };
        ctx.output.table_row(
            &[row.product.id.as_str(), &row.product.name, &margin, &price],
            &widths,
        );
    }

    Ok(())
}

/// `$30,00 c/u` for unit products, `$60,00 / 100gr` for weight products.
fn price_label(product: &Product, prices: &DerivedPrices) -> String {
    let price = prices.sellable_price().display();
    match product.selling_mode() {
        SellingMode::UnitBased => format!("{} c/u", price),
        SellingMode::WeightBased => {
            format!("{} / 100{}", price, product.unit_abbrev().unwrap_or_default())
        }
    }
}
