//! Listing of submitted orders.

use std::fs;

use anyhow::Result;
use chrono::{DateTime, Utc};
use larder_commerce::checkout::OrderPayload;

use super::OrdersArgs;
use crate::context::Context;

/// Run the orders command.
pub fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    let outbox = ctx.outbox_dir()?;

    let mut orders: Vec<OrderPayload> = Vec::new();
    for entry in fs::read_dir(&outbox)? {
        let path = entry?.path();
        if path.extension().map_or(true, |e| e != "json") {
            continue;
        }
        match fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str::<OrderPayload>(&content)?))
        {
            Ok(order) => orders.push(order),
            Err(e) => ctx
                .output
                .debug(&format!("Skipping {}: {}", path.display(), e)),
        }
    }

    // Newest first
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    if let Some(limit) = args.limit {
        orders.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    ctx.output.header("Submitted orders");
    if orders.is_empty() {
        ctx.output.info("No orders yet.");
        ctx.output.info("Run `larder checkout` to place one.");
        return Ok(());
    }

    let widths = [20, 34, 10, 14];
    ctx.output
        .table_row(&["PLACED", "ORDER", "METHOD", "TOTAL"], &widths);
    for order in &orders {
        let method = if order.fulfilment.is_delivery() {
            "delivery"
        } else {
            "pickup"
        };
        ctx.output.table_row(
            &[
                &format_time(order.created_at),
                order.id.as_str(),
                method,
                &order.grand_total.display(),
            ],
            &widths,
        );
    }
    Ok(())
}

fn format_time(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "1970-01-01 00:00");
        assert_eq!(format_time(i64::MAX), "-");
    }
}
