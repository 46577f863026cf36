//! Cart commands.

use anyhow::{anyhow, Result};
use dialoguer::Confirm;
use larder_commerce::cart::{parse_quantity, CartLine, CartStore, LineQuantity};
use larder_commerce::{LineId, ProductId};
use serde_json::json;

use super::{CartArgs, CartCommand};
use crate::context::{Context, Ledger};
use crate::output::owner_label;

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let mut ledger = ctx.open_ledger(&session)?;

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {}
        CartCommand::Add { product, quantity } => add(&mut ledger, &product, quantity, ctx)?,
        CartCommand::Set { line, quantity } => {
            let id = resolve_line(ledger.cart(), &line);
            let changed = ledger.set_quantity_text(&id, &quantity)?;
            report(changed, &line, ctx);
        }
        CartCommand::Inc { line } => {
            let id = resolve_line(ledger.cart(), &line);
            let changed = ledger.increment(&id)?;
            report(changed, &line, ctx);
        }
        CartCommand::Dec { line } => {
            let id = resolve_line(ledger.cart(), &line);
            let changed = ledger.decrement(&id)?;
            report(changed, &line, ctx);
        }
        CartCommand::Remove { line } => {
            let id = resolve_line(ledger.cart(), &line);
            let changed = ledger.remove_line(&id)?;
            report(changed, &line, ctx);
        }
        CartCommand::Clear { yes } => {
            if ledger.cart().is_empty() {
                ctx.output.info("Cart is already empty");
                return Ok(());
            }
            if !yes && !ctx.output.is_json() {
                let confirmed = Confirm::new()
                    .with_prompt("Empty the cart?")
                    .default(false)
                    .interact()?;
                if !confirmed {
                    ctx.output.warn("Cancelled");
                    return Ok(());
                }
            }
            ledger.clear()?;
            ctx.output.success("Cart emptied");
        }
    }

    show(&ledger, ctx)
}

fn add(ledger: &mut Ledger, product: &str, quantity: Option<String>, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let product = catalog
        .get(&ProductId::new(product))
        .ok_or_else(|| anyhow!("Unknown product: {}", product))?;

    let requested = match quantity {
        Some(text) => match parse_quantity(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                ctx.output.warn(&format!("{}; using the default quantity", e));
                None
            }
        },
        None => None,
    };

    let prices = ledger.engine().derive_prices(product);
    if prices.is_unavailable() {
        ctx.output
            .warn(&format!("{} has no price yet; adding at $0", product.name));
    }

    let id = ledger.add_to_cart(product, requested)?;
    if let Some(line) = ledger.cart().line(&id) {
        ctx.output.success(&format!("Added {}", line.display_name()));
    }
    Ok(())
}

/// Accept a line id or a product id.
fn resolve_line(cart: &CartStore, key: &str) -> LineId {
    let id = LineId::new(key);
    if cart.line(&id).is_some() {
        return id;
    }
    cart.lines()
        .iter()
        .find(|l| l.product_id.as_str() == key)
        .map(|l| l.id.clone())
        .unwrap_or(id)
}

fn report(changed: bool, key: &str, ctx: &Context) {
    if !changed {
        ctx.output.warn(&format!("No cart line for {}; nothing changed", key));
    }
}

fn quantity_label(line: &CartLine) -> String {
    match &line.quantity {
        LineQuantity::Units { quantity } => format!("{} u", quantity.get()),
        LineQuantity::Weight {
            quantity,
            unit_abbrev,
            ..
        } => format!("{}{}", quantity.get(), unit_abbrev),
    }
}

fn show(ledger: &Ledger, ctx: &Context) -> Result<()> {
    let cart = ledger.cart();
    let total = cart.total()?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "owner": ledger.owner(),
            "lines": cart.lines(),
            "item_count": cart.item_count(),
            "total": total,
        }));
        return Ok(());
    }

    ctx.output
        .header(&format!("Cart of {}", owner_label(ledger.owner())));
    if cart.is_empty() {
        ctx.output.info("Cart is empty");
        return Ok(());
    }

    let widths = [34, 10, 14, 14];
    ctx.output
        .table_row(&["PRODUCT", "QTY", "PRICE", "TOTAL"], &widths);
    for line in cart.lines() {
        ctx.output.table_row(
            &[
                &line.display_name(),
                &quantity_label(line),
                &line.unit_price.display(),
                &line.line_total()?.display(),
            ],
            &widths,
        );
    }
    ctx.output.info("");
    ctx.output.kv("items", &cart.item_count().to_string());
    ctx.output.kv("total", &total.display());
    Ok(())
}
