//! Checkout command.

use anyhow::Result;
use dialoguer::Confirm;
use larder_commerce::checkout::{Fulfilment, OrderPayload, PaymentMethod};

use super::{CheckoutArgs, DeliveryPayment};
use crate::context::Context;
use crate::gateway::OutboxGateway;

/// Run the checkout command.
pub fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let mut ledger = ctx.open_ledger(&session)?;
    let assembler = ctx.assembler()?;
    let fulfilment = fulfilment(&args);

    // Assemble first so an empty cart or missing field fails before prompting.
    let preview = assembler.assemble(ledger.cart(), &fulfilment, ledger.owner().user_id())?;
    summarize(&preview, ctx);

    if args.dry_run {
        if ctx.output.is_json() {
            ctx.output.json(&preview);
        }
        ctx.output.info("Dry run; nothing submitted");
        return Ok(());
    }

    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt("Place this order?")
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Checkout cancelled");
            return Ok(());
        }
    }

    let gateway = OutboxGateway::new(ctx.outbox_dir()?);
    let (order, receipt) = ledger.complete_checkout(&assembler, &fulfilment, &gateway)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "order": order,
            "receipt": receipt,
        }));
        return Ok(());
    }
    ctx.output
        .success(&format!("Order {} placed ({})", order.id, receipt.reference));
    Ok(())
}

fn fulfilment(args: &CheckoutArgs) -> Fulfilment {
    if !args.delivery {
        return Fulfilment::Pickup;
    }
    Fulfilment::Delivery {
        phone: args.phone.clone(),
        street: args.street.clone(),
        street_number: args.number.clone(),
        between_streets: args.between.clone(),
        payment: match args.payment {
            DeliveryPayment::Cash => PaymentMethod::Cash,
            DeliveryPayment::Transfer => PaymentMethod::Transfer,
        },
    }
}

fn summarize(order: &OrderPayload, ctx: &Context) {
    ctx.output.header("Order summary");
    for line in &order.lines {
        ctx.output.list_item(&format!(
            "{}  {}",
            line.display_name,
            line.line_total.display()
        ));
    }
    ctx.output.info("");
    ctx.output.kv("subtotal", &order.subtotal.display());
    if order.fulfilment.is_delivery() {
        ctx.output.kv("shipping", &order.shipping_fee.display());
    }
    ctx.output.kv("total", &order.grand_total.display());
    ctx.output
        .kv("payment", order.fulfilment.payment().display_name());
}
