//! Order gateway that writes submitted orders to a directory.

use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use larder_commerce::checkout::{OrderGateway, OrderPayload, OrderReceipt};
use larder_commerce::CommerceError;

/// Writes each order as pretty JSON into the outbox directory.
pub struct OutboxGateway {
    dir: PathBuf,
}

impl OutboxGateway {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// File name for an order: assembly time, then id.
    pub fn file_name(order: &OrderPayload) -> String {
        let stamp = Utc
            .timestamp_opt(order.created_at, 0)
            .single()
            .unwrap_or_else(Utc::now)
            .format("%Y%m%d%H%M%S");
        format!("order-{}-{}.json", stamp, order.id)
    }
}

impl OrderGateway for OutboxGateway {
    fn submit(&self, order: &OrderPayload) -> Result<OrderReceipt, CommerceError> {
        let name = Self::file_name(order);
        let content = serde_json::to_string_pretty(order)?;
        std::fs::write(self.dir.join(&name), content)
            .map_err(|e| CommerceError::Gateway(format!("writing {}: {}", name, e)))?;
        tracing::debug!(file = %name, "order written to outbox");
        Ok(OrderReceipt {
            order_id: order.id.clone(),
            reference: name,
        })
    }
}
