use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::order::{OrderId, OrderRecord, OrderStatus};
use crate::errors::DomainError;

/// Read-only order table keyed by canonical order id.
#[derive(Clone, Debug, Default)]
pub struct OrderBook {
    orders: BTreeMap<OrderId, OrderRecord>,
}

/// Tool-facing view of a successful lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderLookup {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub order_date: NaiveDate,
    pub amount: String,
    pub found: bool,
}

impl From<&OrderRecord> for OrderLookup {
    fn from(record: &OrderRecord) -> Self {
        Self {
            order_id: record.order_id.clone(),
            status: record.status,
            tracking_number: record.tracking.clone(),
            order_date: record.date,
            amount: record.amount.clone(),
            found: true,
        }
    }
}

impl OrderBook {
    pub fn new(records: impl IntoIterator<Item = OrderRecord>) -> Self {
        let orders =
            records.into_iter().map(|record| (record.order_id.clone(), record)).collect();
        Self { orders }
    }

    pub fn seeded() -> Self {
        Self::new([
            seed("ORD001", OrderStatus::Delivered, Some("TRK123456"), (2025, 8, 25), "$89.99"),
            seed("ORD002", OrderStatus::Shipped, Some("TRK789012"), (2025, 8, 28), "$156.50"),
            seed("ORD003", OrderStatus::Processing, None, (2025, 8, 30), "$234.00"),
            seed("ORD004", OrderStatus::Pending, None, (2025, 8, 31), "$67.25"),
            seed("ORD005", OrderStatus::Cancelled, None, (2025, 8, 29), "$123.75"),
        ])
    }

    pub fn lookup(&self, raw_order_id: &str) -> Result<OrderLookup, DomainError> {
        let order_id = OrderId::normalize(raw_order_id);
        self.orders
            .get(&order_id)
            .map(OrderLookup::from)
            .ok_or(DomainError::OrderNotFound { order_id })
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

fn seed(
    order_id: &str,
    status: OrderStatus,
    tracking: Option<&str>,
    (year, month, day): (i32, u32, u32),
    amount: &str,
) -> OrderRecord {
    OrderRecord {
        order_id: OrderId(order_id.to_string()),
        status,
        tracking: tracking.map(str::to_string),
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        amount: amount.to_string(),
    }
}
